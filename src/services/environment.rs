use crate::domain::models::EnvironmentConfig;
use crate::error::JobError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Variables resolved by the bootstrap step, applied to the reporter only.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReporterEnv {
    vars: BTreeMap<String, String>,
}

impl ReporterEnv {
    pub fn from_vars(vars: BTreeMap<String, String>) -> Self {
        Self { vars }
    }

    pub fn vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }

}

pub fn resolve(cfg: &EnvironmentConfig) -> Result<ReporterEnv, JobError> {
    let mut vars = BTreeMap::new();

    if let Some(file) = &cfg.env_file {
        let path = expand_home(file);
        let text = std::fs::read_to_string(&path).map_err(|e| {
            JobError::EnvironmentResolution(format!("cannot read {}: {}", path.display(), e))
        })?;
        parse_env_text(&text, &path.display().to_string(), &mut vars)?;
    }

    if let Some(cmd) = &cfg.env_command {
        let text = run_bootstrap_command(cmd)?;
        parse_env_text(&text, &cmd.join(" "), &mut vars)?;
    }

    for name in &cfg.required {
        let present = vars
            .get(name)
            .map(|v| !v.is_empty())
            .unwrap_or_else(|| std::env::var(name).map(|v| !v.is_empty()).unwrap_or(false));
        if !present {
            return Err(JobError::EnvironmentResolution(format!(
                "required variable {} is not set",
                name
            )));
        }
    }

    tracing::debug!(count = vars.len(), "bootstrap environment resolved");
    Ok(ReporterEnv::from_vars(vars))
}

fn run_bootstrap_command(cmd: &[String]) -> Result<String, JobError> {
    let (program, args) = cmd.split_first().ok_or_else(|| {
        JobError::EnvironmentResolution("bootstrap command is empty".to_string())
    })?;
    let out = std::process::Command::new(program)
        .args(args)
        .stdin(std::process::Stdio::null())
        .output()
        .map_err(|e| {
            JobError::EnvironmentResolution(format!("cannot run {}: {}", program, e))
        })?;
    if !out.status.success() {
        let stderr = String::from_utf8_lossy(&out.stderr);
        return Err(JobError::EnvironmentResolution(format!(
            "{} exited with {}: {}",
            program,
            out.status,
            stderr.trim()
        )));
    }
    String::from_utf8(out.stdout).map_err(|_| {
        JobError::EnvironmentResolution(format!("{} printed non-UTF-8 output", program))
    })
}

fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// Parses `KEY=VALUE` / `export KEY=VALUE` lines into `vars`. `source` and
/// `.` lines (shell completion hooks in `seiscomp print env`) are skipped.
pub fn parse_env_text(
    text: &str,
    source: &str,
    vars: &mut BTreeMap<String, String>,
) -> Result<(), JobError> {
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with("source ") || line.starts_with(". ") {
            tracing::debug!(source, line = idx + 1, "skipping sourced script");
            continue;
        }
        let line = line
            .strip_prefix("export ")
            .map(str::trim_start)
            .unwrap_or(line);
        let malformed = || {
            JobError::EnvironmentResolution(format!(
                "{}:{}: malformed line {:?}",
                source,
                idx + 1,
                raw
            ))
        };
        let (key, value) = line.split_once('=').ok_or_else(malformed)?;
        let key = key.trim();
        if !is_valid_name(key) {
            return Err(malformed());
        }
        let value = parse_value(value.trim(), vars).ok_or_else(malformed)?;
        vars.insert(key.to_string(), value);
    }
    Ok(())
}

fn is_valid_name(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_value(value: &str, vars: &BTreeMap<String, String>) -> Option<String> {
    if let Some(inner) = value.strip_prefix('\'') {
        let (body, rest) = inner.split_once('\'')?;
        return only_comment(rest).then(|| body.to_string());
    }
    if let Some(inner) = value.strip_prefix('"') {
        let (body, rest) = inner.split_once('"')?;
        return only_comment(rest).then(|| expand(body, vars));
    }
    let value = match value.find(" #").or_else(|| value.find("\t#")) {
        Some(at) => value[..at].trim_end(),
        None => value,
    };
    Some(expand(value, vars))
}

/// True when nothing but whitespace and an optional ` # comment` follows a
/// closing quote.
fn only_comment(rest: &str) -> bool {
    let trimmed = rest.trim_start();
    trimmed.is_empty() || (trimmed.starts_with('#') && trimmed.len() < rest.len())
}

fn lookup(name: &str, vars: &BTreeMap<String, String>) -> String {
    vars.get(name)
        .cloned()
        .or_else(|| std::env::var(name).ok())
        .unwrap_or_default()
}

fn expand(raw: &str, vars: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('{') => {
                chars.next();
                let mut name = String::new();
                let mut closed = false;
                for n in chars.by_ref() {
                    if n == '}' {
                        closed = true;
                        break;
                    }
                    name.push(n);
                }
                if closed {
                    out.push_str(&lookup(&name, vars));
                } else {
                    out.push_str("${");
                    out.push_str(&name);
                }
            }
            Some(n) if n.is_ascii_alphabetic() || *n == '_' => {
                let mut name = String::new();
                while let Some(n) = chars.peek() {
                    if n.is_ascii_alphanumeric() || *n == '_' {
                        name.push(*n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                out.push_str(&lookup(&name, vars));
            }
            _ => out.push('$'),
        }
    }
    out
}
