//! The report-and-notify job: bootstrap, run the reporter, mail the report
//! and the diagnostics, clean up. The chain stops at the first failing step;
//! the scratch files are removed on every path.

use crate::domain::constants::{REPORT_SUBJECT, STATUS_SUBJECT};
use crate::domain::models::{JobConfig, RunFailure, RunReport, Step};
use crate::error::JobError;
use crate::services::environment::{self, ReporterEnv};
use crate::services::mailer::{ContentType, MailMessage, Mailer};
use crate::services::reporter::{ReportInvocation, Reporter};
use crate::services::scratch::ScratchPair;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub struct JobRunner<'a> {
    config: &'a JobConfig,
    reporter: &'a dyn Reporter,
    mailer: &'a dyn Mailer,
}

impl<'a> JobRunner<'a> {
    pub fn new(config: &'a JobConfig, reporter: &'a dyn Reporter, mailer: &'a dyn Mailer) -> Self {
        Self {
            config,
            reporter,
            mailer,
        }
    }

    pub fn run(&self) -> RunReport {
        let started = Instant::now();
        let mut report = RunReport {
            status: "running".to_string(),
            completed: Vec::new(),
            failure: None,
            scratch: None,
            mails_sent: 0,
            elapsed_ms: 0,
        };
        let mut current = Step::Environment;

        let result = self.execute(&mut report, &mut current);

        report.elapsed_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok(()) => {
                report.status = "ok".to_string();
                tracing::info!(elapsed_ms = report.elapsed_ms, "job finished");
            }
            Err(err) => {
                // The user-facing error line is printed by the caller.
                tracing::debug!(
                    step = ?current,
                    kind = err.kind(),
                    error = %err,
                    "job failed"
                );
                report.status = "failed".to_string();
                report.failure = Some(RunFailure {
                    step: current,
                    kind: err.kind().to_string(),
                    code: err.code().to_string(),
                    message: err.to_string(),
                    exit_code: err.exit_code(),
                });
            }
        }
        report
    }

    fn execute(&self, report: &mut RunReport, current: &mut Step) -> Result<(), JobError> {
        *current = Step::Environment;
        let env = environment::resolve(&self.config.environment)?;
        report.completed.push(Step::Environment);

        *current = Step::WorkingDirectory;
        let workdir = enter_workdir(&self.config.reporter.workdir)?;
        report.completed.push(Step::WorkingDirectory);

        *current = Step::TempFiles;
        let scratch = ScratchPair::acquire(&self.config.scratch)?;
        report.scratch = Some(scratch.paths());
        report.completed.push(Step::TempFiles);

        *current = Step::Reporter;
        self.generate(&env, &workdir, &scratch)?;
        report.completed.push(Step::Reporter);

        *current = Step::ReportMail;
        self.mailer.send(&MailMessage {
            recipients: self.config.mail.distribution.clone(),
            subject: REPORT_SUBJECT.to_string(),
            body_path: scratch.report_path().to_path_buf(),
            content_type: ContentType::Html,
        })?;
        report.mails_sent += 1;
        report.completed.push(Step::ReportMail);

        *current = Step::StatusMail;
        self.mailer.send(&MailMessage {
            recipients: vec![self.config.mail.maintainer.clone()],
            subject: STATUS_SUBJECT.to_string(),
            body_path: scratch.diagnostics_path().to_path_buf(),
            content_type: ContentType::Plain,
        })?;
        report.mails_sent += 1;
        report.completed.push(Step::StatusMail);

        *current = Step::Cleanup;
        scratch.close()?;
        report.completed.push(Step::Cleanup);
        Ok(())
    }

    fn generate(
        &self,
        env: &ReporterEnv,
        workdir: &Path,
        scratch: &ScratchPair,
    ) -> Result<(), JobError> {
        self.reporter.generate(&ReportInvocation {
            config: &self.config.reporter,
            env,
            workdir,
            export_path: scratch.report_path(),
            diagnostics_path: scratch.diagnostics_path(),
        })
    }
}

/// Checks that the reporter directory can be used as the child's working
/// directory. The runner's own working directory is left untouched.
pub fn enter_workdir(path: &Path) -> Result<PathBuf, JobError> {
    let to_err = |source| JobError::DirectoryChange {
        path: path.to_path_buf(),
        source,
    };
    let resolved = path.canonicalize().map_err(to_err)?;
    if !resolved.is_dir() {
        return Err(to_err(std::io::Error::new(
            std::io::ErrorKind::Other,
            "not a directory",
        )));
    }
    std::fs::read_dir(&resolved).map_err(to_err)?;
    Ok(resolved)
}
