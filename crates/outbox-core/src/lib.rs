//! # sftp-outbox – core pipeline
//!
//! Batch transfer pipeline providing:
//!   • Extension include/exclude filtering
//!   • Recursive source-directory discovery
//!   • Sequential per-file upload orchestration with failure isolation
//!   • Upload → backup two-phase bookkeeping and run summaries

pub mod outbox;
