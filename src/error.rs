use std::path::PathBuf;

/// Failures of the job pipeline. Every variant is fatal for the run.
#[derive(thiserror::Error, Debug)]
pub enum JobError {
    #[error("environment resolution failed: {0}")]
    EnvironmentResolution(String),
    #[error("cannot enter reporter directory {}: {source}", path.display())]
    DirectoryChange {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot create scratch file in {}: {source}", dir.display())]
    TempFileCreation {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("reporter failed: {0}")]
    ReporterExecution(String),
    #[error("mail to {recipients} failed: {detail}")]
    MailDispatch { recipients: String, detail: String },
    #[error("scratch cleanup failed: {0}")]
    Cleanup(#[source] std::io::Error),
}

impl JobError {
    pub fn kind(&self) -> &'static str {
        match self {
            JobError::EnvironmentResolution(_) => "EnvironmentResolutionError",
            JobError::DirectoryChange { .. } => "DirectoryChangeError",
            JobError::TempFileCreation { .. } => "TempFileCreationError",
            JobError::ReporterExecution(_) => "ReporterExecutionError",
            JobError::MailDispatch { .. } => "MailDispatchError",
            JobError::Cleanup(_) => "CleanupError",
        }
    }

    /// Machine-readable code used in `--json` error output.
    pub fn code(&self) -> &'static str {
        match self {
            JobError::EnvironmentResolution(_) => "ENVIRONMENT_RESOLUTION_ERROR",
            JobError::DirectoryChange { .. } => "DIRECTORY_CHANGE_ERROR",
            JobError::TempFileCreation { .. } => "TEMP_FILE_CREATION_ERROR",
            JobError::ReporterExecution(_) => "REPORTER_EXECUTION_ERROR",
            JobError::MailDispatch { .. } => "MAIL_DISPATCH_ERROR",
            JobError::Cleanup(_) => "CLEANUP_ERROR",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            JobError::EnvironmentResolution(_) => 10,
            JobError::DirectoryChange { .. } => 11,
            JobError::TempFileCreation { .. } => 12,
            JobError::ReporterExecution(_) => 13,
            JobError::MailDispatch { .. } => 14,
            JobError::Cleanup(_) => 15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::JobError;

    #[test]
    fn exit_codes_are_distinct_and_nonzero() {
        let errors = [
            JobError::EnvironmentResolution("x".into()),
            JobError::DirectoryChange {
                path: "/nope".into(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            },
            JobError::TempFileCreation {
                dir: "/nope".into(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            },
            JobError::ReporterExecution("exit status 1".into()),
            JobError::MailDispatch {
                recipients: "a@b".into(),
                detail: "exit status 1".into(),
            },
            JobError::Cleanup(std::io::Error::from(std::io::ErrorKind::Other)),
        ];
        let mut codes: Vec<u8> = errors.iter().map(|e| e.exit_code()).collect();
        assert!(codes.iter().all(|c| *c != 0));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn kind_matches_code() {
        let e = JobError::ReporterExecution("boom".into());
        assert_eq!(e.kind(), "ReporterExecutionError");
        assert_eq!(e.code(), "REPORTER_EXECUTION_ERROR");
        assert!(e.to_string().contains("boom"));
    }
}
