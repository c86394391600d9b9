use crate::domain::constants::DIAGNOSTICS_TAIL_LINES;
use crate::domain::models::ReporterConfig;
use crate::error::JobError;
use crate::services::environment::ReporterEnv;
use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Everything one reporter run needs.
#[derive(Debug)]
pub struct ReportInvocation<'a> {
    pub config: &'a ReporterConfig,
    pub env: &'a ReporterEnv,
    pub workdir: &'a Path,
    pub export_path: &'a Path,
    pub diagnostics_path: &'a Path,
}

pub trait Reporter {
    fn generate(&self, invocation: &ReportInvocation<'_>) -> Result<(), JobError>;
}

/// Runs the reporter program as a subprocess.
#[derive(Debug, Default)]
pub struct CommandReporter;

impl Reporter for CommandReporter {
    fn generate(&self, invocation: &ReportInvocation<'_>) -> Result<(), JobError> {
        let cfg = invocation.config;
        let program = program_path(invocation.workdir, &cfg.program);
        let stderr = File::options()
            .write(true)
            .truncate(true)
            .open(invocation.diagnostics_path)
            .map_err(|e| {
                JobError::ReporterExecution(format!(
                    "cannot open diagnostics file {}: {}",
                    invocation.diagnostics_path.display(),
                    e
                ))
            })?;

        let mut cmd = match &cfg.interpreter {
            Some(interp) => {
                let mut c = Command::new(interp);
                c.arg(&program);
                c
            }
            None => Command::new(&program),
        };
        cmd.args(reporter_args(cfg, invocation.export_path))
            .current_dir(invocation.workdir)
            .envs(invocation.env.vars())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(stderr));

        tracing::info!(program = %program.display(), "starting reporter");
        let started = Instant::now();
        let mut child = cmd.spawn().map_err(|e| {
            JobError::ReporterExecution(format!("cannot start {}: {}", program.display(), e))
        })?;

        let status = match cfg.timeout_secs {
            Some(secs) => wait_with_timeout(&mut child, Duration::from_secs(secs))?,
            None => child.wait().map_err(|e| {
                JobError::ReporterExecution(format!("waiting for reporter: {}", e))
            })?,
        };
        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            %status,
            "reporter finished"
        );

        if status.success() {
            return Ok(());
        }
        Err(failure_with_tail(
            format!("exited with {}", status),
            invocation.diagnostics_path,
        ))
    }
}

pub fn program_path(workdir: &Path, program: &Path) -> PathBuf {
    if program.is_absolute() {
        program.to_path_buf()
    } else {
        workdir.join(program)
    }
}

/// Command-line flags understood by the reporter.
pub fn reporter_args(cfg: &ReporterConfig, export_path: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-d".into(),
        cfg.database.clone().into(),
        "--host".into(),
        cfg.host.clone().into(),
        "--port".into(),
        cfg.port.to_string().into(),
    ];
    if cfg.debug {
        args.push("--debug".into());
    }
    let mut export = OsString::from("file:");
    export.push(export_path.as_os_str());
    args.push("--export".into());
    args.push(export);
    if let Some(start) = &cfg.start_time {
        args.push("-b".into());
        args.push(start.into());
    }
    if let Some(end) = &cfg.end_time {
        args.push("-e".into());
        args.push(end.into());
    }
    args
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<ExitStatus, JobError> {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) if Instant::now() >= deadline => {
                tracing::warn!(timeout_secs = timeout.as_secs(), "reporter timed out; killing");
                let _ = child.kill();
                let _ = child.wait();
                return Err(JobError::ReporterExecution(format!(
                    "timed out after {}s",
                    timeout.as_secs()
                )));
            }
            Ok(None) => std::thread::sleep(POLL_INTERVAL),
            Err(e) => {
                return Err(JobError::ReporterExecution(format!(
                    "waiting for reporter: {}",
                    e
                )))
            }
        }
    }
}

fn failure_with_tail(reason: String, diagnostics: &Path) -> JobError {
    let tail = diagnostics_tail(diagnostics, DIAGNOSTICS_TAIL_LINES);
    if tail.is_empty() {
        JobError::ReporterExecution(reason)
    } else {
        JobError::ReporterExecution(format!("{}: {}", reason, tail))
    }
}

/// Last `lines` non-empty lines of the diagnostics file, joined with " | ".
pub fn diagnostics_tail(path: &Path, lines: usize) -> String {
    let Ok(bytes) = std::fs::read(path) else {
        return String::new();
    };
    let text = String::from_utf8_lossy(&bytes);
    let kept: Vec<&str> = text
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.is_empty())
        .collect();
    let start = kept.len().saturating_sub(lines);
    kept[start..].join(" | ")
}
