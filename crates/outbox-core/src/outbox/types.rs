// ── Types ─────────────────────────────────────────────────────────────────────

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

// ── Serde default helpers ────────────────────────────────────────────────────

fn default_port() -> u16 {
    22
}
fn default_timeout_secs() -> u64 {
    30
}

// ── Destination & authentication ─────────────────────────────────────────────

/// Where uploads land. Immutable for the duration of a run; built from
/// settings, read-only for the transfer client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDestination {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub private_key_path: Option<String>,
    #[serde(default)]
    pub private_key_passphrase: Option<String>,
    /// Remote directory all files land in, flat, under their local basename.
    pub remote_dir: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl RemoteDestination {
    /// Key auth is selected whenever a non-empty key path is configured;
    /// password auth is the fallback.
    pub fn key_auth_configured(&self) -> bool {
        self.private_key_path
            .as_deref()
            .map_or(false, |p| !p.is_empty())
    }
}

// ── Candidates ───────────────────────────────────────────────────────────────

/// A filesystem entry discovered under the source tree, not yet evaluated
/// for processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub path: PathBuf,
    pub file_name: String,
    /// Lower-cased, with the leading `.`; empty when the file has none.
    pub extension: String,
}

impl Candidate {
    pub fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        Self {
            path: path.to_path_buf(),
            file_name,
            extension,
        }
    }
}

// ── Transfer outcome ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransferErrorKind {
    Authentication,
    Permission,
    Protocol,
    Connection,
    /// Unclassified failures; reported like the rest, never distinguished.
    Other,
}

impl fmt::Display for TransferErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransferErrorKind::Authentication => "authentication",
            TransferErrorKind::Permission => "permission",
            TransferErrorKind::Protocol => "protocol",
            TransferErrorKind::Connection => "connection",
            TransferErrorKind::Other => "other",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferFailure {
    pub kind: TransferErrorKind,
    pub detail: String,
}

impl TransferFailure {
    pub fn new(kind: TransferErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for TransferFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.kind, self.detail)
    }
}

/// Result of one upload attempt. One call is one attempt; no retry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TransferOutcome {
    Success,
    Failure(TransferFailure),
}

impl TransferOutcome {
    pub fn failure(kind: TransferErrorKind, detail: impl Into<String>) -> Self {
        TransferOutcome::Failure(TransferFailure::new(kind, detail))
    }
}

// ── Uploader seam ────────────────────────────────────────────────────────────

/// Transfer client contract. The batch processor only ever sees outcomes,
/// so tests can script failure sequences without a server.
pub trait Uploader {
    fn upload(&self, dest: &RemoteDestination, local_path: &Path) -> TransferOutcome;
}

// ── Per-file disposition ─────────────────────────────────────────────────────

/// Terminal state of one candidate. `Uploaded` is the backups-disabled
/// terminal; with backups enabled it transitions to `BackedUp` or
/// `MoveFailed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FileDisposition {
    Skipped,
    UploadFailed,
    Uploaded,
    BackedUp,
    MoveFailed,
}

// ── Run summary ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Every regular file discovered under the source tree.
    pub candidates: usize,
    pub skipped: usize,
    pub attempted: usize,
    pub succeeded: usize,
    pub backed_up: usize,
    pub upload_failed: usize,
    pub move_failed: usize,
}

impl RunSummary {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            finished_at: None,
            candidates: 0,
            skipped: 0,
            attempted: 0,
            succeeded: 0,
            backed_up: 0,
            upload_failed: 0,
            move_failed: 0,
        }
    }

    pub fn record(&mut self, disposition: FileDisposition) {
        match disposition {
            FileDisposition::Skipped => self.skipped += 1,
            FileDisposition::UploadFailed => {
                self.attempted += 1;
                self.upload_failed += 1;
            }
            FileDisposition::Uploaded => {
                self.attempted += 1;
                self.succeeded += 1;
            }
            FileDisposition::BackedUp => {
                self.attempted += 1;
                self.succeeded += 1;
                self.backed_up += 1;
            }
            FileDisposition::MoveFailed => {
                // Uploaded but not retained locally; the upload still counts.
                self.attempted += 1;
                self.succeeded += 1;
                self.move_failed += 1;
            }
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}
