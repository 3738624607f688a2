// ── outbox-sftp / sftp module ────────────────────────────────────────────────

pub mod client;

pub use client::SftpUploader;
