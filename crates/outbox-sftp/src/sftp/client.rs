// ── SFTP upload client ───────────────────────────────────────────────────────
//
// One call is one attempt over one fresh connection. The session and its
// TCP stream close on drop, so every exit path releases the connection.

use outbox_core::outbox::{RemoteDestination, TransferErrorKind, TransferFailure, TransferOutcome, Uploader};
use ssh2::{ErrorCode, OpenFlags, OpenType, Session};
use std::fs::File;
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

const CHUNK_SIZE: usize = 1_048_576; // 1 MiB

// SFTP status code for a server-side permission denial.
const LIBSSH2_FX_PERMISSION_DENIED: i32 = 3;

#[derive(Debug, Default)]
pub struct SftpUploader;

impl SftpUploader {
    pub fn new() -> Self {
        Self
    }

    fn try_upload(
        &self,
        dest: &RemoteDestination,
        local_path: &Path,
    ) -> Result<(), TransferFailure> {
        let addr = resolve_destination(dest)?;

        debug!("connecting to {}", addr);
        let tcp = TcpStream::connect_timeout(&addr, Duration::from_secs(dest.timeout_secs))
            .map_err(|e| {
                TransferFailure::new(
                    TransferErrorKind::Connection,
                    format!("TCP connection to {} failed: {}", addr, e),
                )
            })?;

        let mut session = Session::new().map_err(|e| {
            TransferFailure::new(
                TransferErrorKind::Other,
                format!("failed to create SSH session: {}", e),
            )
        })?;
        session.set_tcp_stream(tcp);
        session.handshake().map_err(|e| {
            TransferFailure::new(
                TransferErrorKind::Connection,
                format!("SSH handshake with {} failed: {}", addr, e),
            )
        })?;

        authenticate(&session, dest)?;
        debug!("authenticated to {} as {}", addr, dest.username);

        let sftp = session.sftp().map_err(|e| {
            TransferFailure::new(
                TransferErrorKind::Protocol,
                format!("failed to open SFTP channel: {}", e),
            )
        })?;

        let file_name = local_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                TransferFailure::new(
                    TransferErrorKind::Protocol,
                    format!("local path '{}' has no usable basename", local_path.display()),
                )
            })?;
        let remote_path = format!("{}/{}", dest.remote_dir.trim_end_matches('/'), file_name);

        let mut local_file =
            File::open(local_path).map_err(|e| classify_local_io(e, local_path))?;

        // Flat placement, existing remote file of the same name is replaced.
        let mut remote_file = sftp
            .open_mode(
                Path::new(&remote_path),
                OpenFlags::WRITE | OpenFlags::CREATE | OpenFlags::TRUNCATE,
                0o644,
                OpenType::File,
            )
            .map_err(|e| classify_remote_open(e, dest, &remote_path))?;

        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            let n = local_file
                .read(&mut buf)
                .map_err(|e| classify_local_io(e, local_path))?;
            if n == 0 {
                break;
            }
            remote_file
                .write_all(&buf[..n])
                .map_err(|e| classify_remote_write(e, dest, &remote_path))?;
        }

        drop(remote_file);
        drop(sftp);
        let _ = session.disconnect(None, "file transferred", None);
        Ok(())
    }
}

impl Uploader for SftpUploader {
    fn upload(&self, dest: &RemoteDestination, local_path: &Path) -> TransferOutcome {
        match self.try_upload(dest, local_path) {
            Ok(()) => TransferOutcome::Success,
            Err(failure) => TransferOutcome::Failure(failure),
        }
    }
}

// ── Connection & authentication helpers ──────────────────────────────────────

fn resolve_destination(dest: &RemoteDestination) -> Result<SocketAddr, TransferFailure> {
    if dest.host.is_empty() {
        return Err(TransferFailure::new(
            TransferErrorKind::Protocol,
            "destination host is empty",
        ));
    }
    if dest.port == 0 {
        return Err(TransferFailure::new(
            TransferErrorKind::Protocol,
            "destination port 0 is invalid",
        ));
    }

    format!("{}:{}", dest.host, dest.port)
        .to_socket_addrs()
        .map_err(|e| {
            TransferFailure::new(
                TransferErrorKind::Connection,
                format!("failed to resolve '{}:{}': {}", dest.host, dest.port, e),
            )
        })?
        .next()
        .ok_or_else(|| {
            TransferFailure::new(
                TransferErrorKind::Connection,
                format!("'{}:{}' resolved to no addresses", dest.host, dest.port),
            )
        })
}

fn authenticate(session: &Session, dest: &RemoteDestination) -> Result<(), TransferFailure> {
    if dest.key_auth_configured() {
        let key_path = dest.private_key_path.as_deref().unwrap_or_default();
        session
            .userauth_pubkey_file(
                &dest.username,
                None,
                Path::new(key_path),
                dest.private_key_passphrase.as_deref(),
            )
            .map_err(|e| {
                TransferFailure::new(
                    TransferErrorKind::Authentication,
                    format!("public-key auth with '{}' failed: {}", key_path, e),
                )
            })?;
    } else {
        let password = dest.password.as_deref().unwrap_or_default();
        session
            .userauth_password(&dest.username, password)
            .map_err(|e| {
                TransferFailure::new(
                    TransferErrorKind::Authentication,
                    format!("password auth failed: {}", e),
                )
            })?;
    }

    if !session.authenticated() {
        return Err(TransferFailure::new(
            TransferErrorKind::Authentication,
            "not authenticated after auth attempt",
        ));
    }
    Ok(())
}

// ── Failure classification ───────────────────────────────────────────────────

fn classify_local_io(err: io::Error, local_path: &Path) -> TransferFailure {
    let kind = if err.kind() == io::ErrorKind::PermissionDenied {
        TransferErrorKind::Permission
    } else {
        TransferErrorKind::Other
    };
    TransferFailure::new(kind, format!("local file '{}': {}", local_path.display(), err))
}

fn classify_remote_open(
    err: ssh2::Error,
    dest: &RemoteDestination,
    remote_path: &str,
) -> TransferFailure {
    match err.code() {
        ErrorCode::SFTP(LIBSSH2_FX_PERMISSION_DENIED) => TransferFailure::new(
            TransferErrorKind::Permission,
            format!(
                "permission denied on destination {}:{}: {}",
                dest.host, remote_path, err
            ),
        ),
        _ => TransferFailure::new(
            TransferErrorKind::Other,
            format!("failed to open remote '{}': {}", remote_path, err),
        ),
    }
}

fn classify_remote_write(
    err: io::Error,
    dest: &RemoteDestination,
    remote_path: &str,
) -> TransferFailure {
    if err.kind() == io::ErrorKind::PermissionDenied {
        TransferFailure::new(
            TransferErrorKind::Permission,
            format!(
                "permission denied on destination {}:{}: {}",
                dest.host, remote_path, err
            ),
        )
    } else {
        TransferFailure::new(
            TransferErrorKind::Other,
            format!("write to remote '{}' failed: {}", remote_path, err),
        )
    }
}
