// ── outbox-core / outbox module ───────────────────────────────────────────────
//
// Core of the batch transfer pipeline:
//   • Candidate / outcome / summary types and the Uploader seam
//   • Extension filter policy (include / exclude / unrestricted)
//   • Recursive file discovery
//   • Sequential batch processor with per-file failure isolation

pub mod types;
pub mod filter;
pub mod discovery;
pub mod batch;
pub mod error;

pub use types::*;
pub use filter::FilterPolicy;
pub use discovery::discover;
pub use batch::{BatchOptions, BatchProcessor};
pub use error::FatalError;
