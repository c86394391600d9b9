use crate::domain::models::{ScratchConfig, ScratchPaths};
use crate::error::JobError;
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};

/// The two scoped temp files of a run. Dropping the pair deletes both files,
/// so every early return of the pipeline cleans up after itself.
#[derive(Debug)]
pub struct ScratchPair {
    diagnostics: NamedTempFile,
    report: NamedTempFile,
}

impl ScratchPair {
    pub fn acquire(cfg: &ScratchConfig) -> Result<Self, JobError> {
        let dir = scratch_dir(cfg);
        let diagnostics = create(&dir, &cfg.prefix, ".stderr")?;
        let report = create(&dir, &cfg.prefix, ".html")?;
        tracing::debug!(
            diagnostics = %diagnostics.path().display(),
            report = %report.path().display(),
            "scratch files created"
        );
        Ok(Self {
            diagnostics,
            report,
        })
    }

    pub fn diagnostics_path(&self) -> &Path {
        self.diagnostics.path()
    }

    pub fn report_path(&self) -> &Path {
        self.report.path()
    }

    pub fn paths(&self) -> ScratchPaths {
        ScratchPaths {
            diagnostics: self.diagnostics_path().to_path_buf(),
            report: self.report_path().to_path_buf(),
        }
    }

    /// Deletes both files, reporting the first failure. The second file is
    /// still removed when the first deletion fails.
    pub fn close(self) -> Result<(), JobError> {
        let first = self.diagnostics.close();
        let second = self.report.close();
        first.and(second).map_err(JobError::Cleanup)
    }
}

pub fn scratch_dir(cfg: &ScratchConfig) -> PathBuf {
    cfg.dir.clone().unwrap_or_else(std::env::temp_dir)
}

fn create(dir: &Path, prefix: &str, suffix: &str) -> Result<NamedTempFile, JobError> {
    Builder::new()
        .prefix(prefix)
        .suffix(suffix)
        .rand_bytes(10)
        .tempfile_in(dir)
        .map_err(|source| JobError::TempFileCreation {
            dir: dir.to_path_buf(),
            source,
        })
}
