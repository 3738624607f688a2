// ── Settings ─────────────────────────────────────────────────────────────────
//
// Key/value run settings, loaded once at startup from a TOML file and
// validated before any file is touched. Extension lists keep the historic
// pipe-delimited form (".csv|.xml").

use outbox_core::outbox::{FatalError, FilterPolicy, RemoteDestination};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

fn default_port() -> u16 {
    22
}
fn default_true() -> bool {
    true
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub source_dir: PathBuf,
    #[serde(default)]
    pub source_include_ext: Option<String>,
    #[serde(default)]
    pub source_exclude_ext: Option<String>,

    pub dest_host: String,
    #[serde(default = "default_port")]
    pub dest_port: u16,
    pub dest_user: String,
    #[serde(default)]
    pub dest_password: Option<String>,
    #[serde(default)]
    pub dest_key: Option<String>,
    #[serde(default)]
    pub dest_key_passphrase: Option<String>,
    pub dest_path: String,
    #[serde(default = "default_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_true")]
    pub do_backup: bool,
    #[serde(default)]
    pub backup_dir: Option<PathBuf>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, FatalError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            FatalError::Configuration(format!("cannot read settings file '{}': {}", path.display(), e))
        })?;
        toml::from_str(&raw).map_err(|e| {
            FatalError::Configuration(format!("invalid settings file '{}': {}", path.display(), e))
        })
    }

    /// Pre-run validation. Any violation aborts the run before processing
    /// starts, with no partial side effects.
    pub fn validate(&self) -> Result<(), FatalError> {
        if self.dest_host.is_empty() {
            return Err(FatalError::Configuration("no destination host set".into()));
        }
        if self.dest_user.is_empty() {
            return Err(FatalError::Configuration("no ssh user set".into()));
        }
        if self.dest_path.is_empty() {
            return Err(FatalError::Configuration("no destination path set".into()));
        }
        if !self.source_dir.is_dir() {
            return Err(FatalError::DirectoryNotFound(
                self.source_dir.display().to_string(),
            ));
        }
        if self.do_backup {
            match &self.backup_dir {
                None => {
                    return Err(FatalError::Configuration(
                        "backups are enabled but no backup directory is set".into(),
                    ))
                }
                Some(dir) if !dir.is_dir() => {
                    return Err(FatalError::DirectoryNotFound(dir.display().to_string()))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    pub fn filter_policy(&self) -> FilterPolicy {
        FilterPolicy::from_lists(
            self.source_include_ext.as_deref(),
            self.source_exclude_ext.as_deref(),
        )
    }

    pub fn destination(&self) -> RemoteDestination {
        RemoteDestination {
            host: self.dest_host.clone(),
            port: self.dest_port,
            username: self.dest_user.clone(),
            password: self.dest_password.clone(),
            private_key_path: self.dest_key.clone(),
            private_key_passphrase: self.dest_key_passphrase.clone(),
            remote_dir: self.dest_path.clone(),
            timeout_secs: self.connect_timeout_secs,
        }
    }

    /// `None` when backups are disabled.
    pub fn backup_dir(&self) -> Option<PathBuf> {
        if self.do_backup {
            self.backup_dir.clone()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_toml(source: &Path) -> String {
        format!(
            r#"
            source_dir = "{}"
            dest_host = "sftp.example.net"
            dest_user = "batch"
            dest_password = "secret"
            dest_path = "/inbox"
            do_backup = false
            "#,
            source.display()
        )
    }

    #[test]
    fn defaults_are_applied() {
        let dir = tempfile::tempdir().unwrap();
        let settings: Settings = toml::from_str(&minimal_toml(dir.path())).unwrap();
        assert_eq!(settings.dest_port, 22);
        assert_eq!(settings.connect_timeout_secs, 30);
        assert!(settings.source_include_ext.is_none());
        settings.validate().unwrap();
    }

    #[test]
    fn empty_host_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let raw = minimal_toml(dir.path()).replace("sftp.example.net", "");
        let settings: Settings = toml::from_str(&raw).unwrap();
        assert!(matches!(
            settings.validate(),
            Err(FatalError::Configuration(_))
        ));
    }

    #[test]
    fn enabled_backups_require_an_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let raw = minimal_toml(dir.path()).replace("do_backup = false", "do_backup = true");
        let settings: Settings = toml::from_str(&raw).unwrap();
        assert!(matches!(
            settings.validate(),
            Err(FatalError::Configuration(_))
        ));

        let raw = format!("{raw}\nbackup_dir = \"{}\"\n", dir.path().join("gone").display());
        let settings: Settings = toml::from_str(&raw).unwrap();
        assert!(matches!(
            settings.validate(),
            Err(FatalError::DirectoryNotFound(_))
        ));
    }

    #[test]
    fn disabled_backups_hide_the_backup_directory() {
        let dir = tempfile::tempdir().unwrap();
        let raw = format!(
            "{}\nbackup_dir = \"{}\"\n",
            minimal_toml(dir.path()),
            dir.path().display()
        );
        let settings: Settings = toml::from_str(&raw).unwrap();
        assert!(settings.backup_dir().is_none());
    }

    #[test]
    fn key_settings_select_key_auth() {
        let dir = tempfile::tempdir().unwrap();
        let raw = format!("{}\ndest_key = \"/keys/id_ed25519\"\n", minimal_toml(dir.path()));
        let settings: Settings = toml::from_str(&raw).unwrap();
        assert!(settings.destination().key_auth_configured());
    }
}
