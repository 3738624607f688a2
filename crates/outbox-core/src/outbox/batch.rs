// ── Batch processor ──────────────────────────────────────────────────────────
//
// Sequential per-file pipeline: discover → filter → upload → backup-move.
// One file's failure never prevents the next file from being attempted;
// anything that goes wrong inside the loop becomes a logged disposition,
// never an early return.

use crate::outbox::discovery::discover;
use crate::outbox::error::FatalError;
use crate::outbox::filter::FilterPolicy;
use crate::outbox::types::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub source_dir: PathBuf,
    pub policy: FilterPolicy,
    pub dest: RemoteDestination,
    /// `None` disables backups; successful files then stay in the source
    /// directory.
    pub backup_dir: Option<PathBuf>,
}

pub struct BatchProcessor<U: Uploader> {
    uploader: U,
    options: BatchOptions,
}

impl<U: Uploader> BatchProcessor<U> {
    pub fn new(uploader: U, options: BatchOptions) -> Self {
        Self { uploader, options }
    }

    /// Run one batch to completion. Fatal errors are only possible before
    /// the first upload; after that the run always finishes and returns a
    /// summary.
    pub fn run(&self) -> Result<RunSummary, FatalError> {
        let mut summary = RunSummary::new();

        let candidates = discover(&self.options.source_dir)?;
        summary.candidates = candidates.len();

        let mut eligible = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if self.options.policy.should_process(&candidate.extension) {
                eligible.push(candidate);
            } else {
                summary.record(FileDisposition::Skipped);
            }
        }

        info!("{} files need processing", eligible.len());

        for candidate in &eligible {
            debug!("processing {}", candidate.path.display());
            summary.record(self.process_one(candidate));
        }

        summary.finish();
        Ok(summary)
    }

    /// Two-phase state transition for one candidate:
    /// upload, then (if backups are enabled) move to backup.
    fn process_one(&self, candidate: &Candidate) -> FileDisposition {
        match self.uploader.upload(&self.options.dest, &candidate.path) {
            TransferOutcome::Failure(failure) => {
                error!("upload failed for {}: {}", candidate.path.display(), failure);
                FileDisposition::UploadFailed
            }
            TransferOutcome::Success => match &self.options.backup_dir {
                None => FileDisposition::Uploaded,
                Some(backup_dir) => {
                    let target = backup_dir.join(&candidate.file_name);
                    match move_to_backup(&candidate.path, &target) {
                        Ok(()) => FileDisposition::BackedUp,
                        Err(err) => {
                            // Uploaded but not backed up; the file stays in
                            // the source directory and is not re-sent.
                            error!(
                                "failed to move {} to backup path {}: {}",
                                candidate.path.display(),
                                target.display(),
                                err
                            );
                            FileDisposition::MoveFailed
                        }
                    }
                }
            },
        }
    }
}

/// Relocate a successfully-uploaded file into the backup directory under
/// its original basename. A basename collision overwrites the older backup,
/// so the newest successfully-sent bytes win. Falls back to copy + remove
/// when a plain rename is not possible (cross-device destinations).
fn move_to_backup(from: &Path, to: &Path) -> io::Result<()> {
    if to.exists() {
        fs::remove_file(to)?;
    }
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
    }
}
