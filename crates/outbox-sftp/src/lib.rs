//! # sftp-outbox – SFTP transfer client
//!
//! Single-file SFTP uploads over ssh2 providing:
//!   • One fresh connection per file (no pooling, no shared session state)
//!   • Password and private-key authentication
//!   • Flat remote placement under the local basename, silent overwrite
//!   • Failure classification into the batch pipeline's outcome taxonomy

pub mod sftp;
