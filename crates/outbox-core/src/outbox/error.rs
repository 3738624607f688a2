// ── Fatal errors ─────────────────────────────────────────────────────────────
//
// Everything here aborts the whole run before any file is touched. Per-file
// failures never take this path; they are values (`TransferOutcome`) handled
// inside the batch loop.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FatalError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("directory not found: {0}")]
    DirectoryNotFound(String),
}
