use crate::domain::models::{CheckItem, CheckReport, JobConfig};
use crate::services::environment;
use crate::services::pipeline::enter_workdir;
use crate::services::reporter::program_path;
use crate::services::scratch::{scratch_dir, ScratchPair};
use std::path::{Path, PathBuf};

fn item(name: &str, status: &str, detail: Option<String>) -> CheckItem {
    CheckItem {
        name: name.to_string(),
        status: status.to_string(),
        detail,
    }
}

/// Preflight checks for a loaded configuration. Runs nothing and sends no mail.
pub fn check(cfg: &JobConfig) -> CheckReport {
    let mut checks = vec![item("config", "ok", None)];

    let env_configured = cfg.environment.env_file.is_some()
        || cfg.environment.env_command.is_some()
        || !cfg.environment.required.is_empty();
    checks.push(match environment::resolve(&cfg.environment) {
        Ok(env) if env_configured => item(
            "environment",
            "ok",
            Some(format!("{} variables resolved", env.vars().len())),
        ),
        Ok(_) => item("environment", "not_configured", None),
        Err(e) => item("environment", "failed", Some(e.to_string())),
    });

    let workdir = enter_workdir(&cfg.reporter.workdir);
    checks.push(match &workdir {
        Ok(p) => item("reporter_workdir", "ok", Some(p.display().to_string())),
        Err(e) => item("reporter_workdir", "missing", Some(e.to_string())),
    });

    let program = program_path(&cfg.reporter.workdir, &cfg.reporter.program);
    checks.push(check_program(&program, cfg.reporter.interpreter.is_some()));

    if let Some(interp) = &cfg.reporter.interpreter {
        checks.push(match find_program(interp) {
            Some(p) => item("reporter_interpreter", "ok", Some(p.display().to_string())),
            None => item("reporter_interpreter", "missing", Some(interp.clone())),
        });
    }

    let mail_program = cfg.mail.command.first().cloned().unwrap_or_default();
    checks.push(match find_program(&mail_program) {
        Some(p) => item("mail_command", "ok", Some(p.display().to_string())),
        None => item("mail_command", "missing", Some(mail_program)),
    });

    let dir = scratch_dir(&cfg.scratch);
    checks.push(match ScratchPair::acquire(&cfg.scratch).and_then(ScratchPair::close) {
        Ok(()) => item("scratch_dir", "ok", Some(dir.display().to_string())),
        Err(e) => item("scratch_dir", "failed", Some(e.to_string())),
    });

    let overall = if checks
        .iter()
        .all(|c| c.status == "ok" || c.status == "not_configured")
    {
        "ok"
    } else {
        "needs_attention"
    }
    .to_string();

    CheckReport { overall, checks }
}

fn check_program(program: &Path, has_interpreter: bool) -> CheckItem {
    let detail = Some(program.display().to_string());
    if !program.is_file() {
        return item("reporter_program", "missing", detail);
    }
    if !has_interpreter && !is_executable(program) {
        return item("reporter_program", "not_executable", detail);
    }
    item("reporter_program", "ok", detail)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Resolves a program the way a shell would: paths as-is, bare names on `PATH`.
pub fn find_program(name: &str) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }
    if name.contains(std::path::MAIN_SEPARATOR) {
        let p = PathBuf::from(name);
        return p.is_file().then_some(p);
    }
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}
