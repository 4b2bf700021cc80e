//! Credentials file access.
//!
//! The credentials file is standard AWS shared-credentials INI text: one
//! `[profile]` section per profile, `key = value` lines inside. The source
//! profile holds the long-term keys and the MFA device serial; the
//! destination profile receives the temporary session credentials:
//!
//! ```ini
//! [default]
//! aws_access_key_id=AKIA...
//! aws_secret_access_key=...
//! mfa_serial=arn:aws:iam::111111111111:mfa/user
//!
//! [mfa]
//! aws_access_key_id=ASIA...
//! aws_secret_access_key=...
//! aws_session_token=...
//! expires=2024-01-01T00:00:00Z
//! ```
//!
//! A read-modify-write cycle preserves every profile and key it does not
//! overlay, including keys this tool knows nothing about. Only the optional
//! backup copy keeps the original text byte-for-byte; the rewritten file is
//! re-serialized from the parsed mapping.

use std::path::{Path, PathBuf};

use aws_sdk_sts::types::Credentials;
use configparser::ini::Ini;
use log::info;
use tokio::fs;

use crate::error::{CliError, Result};

/// An AWS shared-credentials file, parsed, plus the path it came from.
#[derive(Debug)]
pub struct CredentialsStore {
    path: PathBuf,
    ini: Ini,
}

impl CredentialsStore {
    /// Reads and parses the credentials file at `path`.
    ///
    /// When `backup` is given, the raw file text is copied there verbatim
    /// before this function returns, so the backup reflects the file as it
    /// was found, comments and formatting included.
    pub async fn load(path: PathBuf, backup: Option<PathBuf>) -> Result<Self> {
        let raw = fs::read_to_string(&path)
            .await
            .map_err(|source| CliError::Read {
                path: path.clone(),
                source,
            })?;

        if let Some(backup_path) = backup {
            info!("Creating backup at {}", backup_path.display());
            fs::write(&backup_path, &raw)
                .await
                .map_err(|source| CliError::Write {
                    path: backup_path,
                    source,
                })?;
        }

        // Case-sensitive parser with an empty default-section name, so a
        // profile literally named "default" round-trips with its [default]
        // header instead of being folded into configparser's headerless
        // default section.
        let mut ini = Ini::new_cs();
        ini.set_default_section("");
        ini.read(raw).map_err(|reason| CliError::Parse {
            path: path.clone(),
            reason,
        })?;

        Ok(Self { path, ini })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has_profile(&self, name: &str) -> bool {
        self.ini.sections().iter().any(|s| s == name)
    }

    /// Looks up one key in one profile. `None` covers both a missing
    /// profile and a missing key.
    pub fn get(&self, profile: &str, key: &str) -> Option<String> {
        self.ini.get(profile, key)
    }

    /// Renders a profile's entries as a single `key=value, ...` line for
    /// diagnostic output.
    pub fn profile_dump(&self, name: &str) -> Option<String> {
        self.ini.get_map_ref().get(name).map(|section| {
            section
                .iter()
                .map(|(key, value)| format!("{key}={}", value.as_deref().unwrap_or("")))
                .collect::<Vec<_>>()
                .join(", ")
        })
    }

    /// Overlays the session credentials onto `profile`, creating the
    /// profile when absent. Exactly four keys are written; every other key
    /// already present in the profile is left as it was.
    pub fn merge_session(&mut self, profile: &str, session: &Credentials, expires: &str) {
        self.ini.set(
            profile,
            "aws_access_key_id",
            Some(session.access_key_id().to_string()),
        );
        self.ini.set(
            profile,
            "aws_secret_access_key",
            Some(session.secret_access_key().to_string()),
        );
        self.ini.set(
            profile,
            "aws_session_token",
            Some(session.session_token().to_string()),
        );
        self.ini.set(profile, "expires", Some(expires.to_string()));
    }

    /// Serializes the whole mapping back to the original path.
    pub async fn save(&self) -> Result<()> {
        let text = self.ini.writes();
        fs::write(&self.path, text)
            .await
            .map_err(|source| CliError::Write {
                path: self.path.clone(),
                source,
            })
    }
}

/// Expands a leading `~` to the user's home directory. Paths without a
/// tilde pass through unchanged.
pub fn expand_tilde(path: &str) -> Result<PathBuf> {
    if path == "~" {
        return dirs::home_dir().ok_or(CliError::NoHomeDir);
    }
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .ok_or(CliError::NoHomeDir),
        None => Ok(PathBuf::from(path)),
    }
}

/// The backup file lives next to the original: `<path><suffix>`.
pub fn backup_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}
