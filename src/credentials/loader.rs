//! Credential file loading and validation

use super::parser::{IniFile, DEFAULT_SECTION};
use super::types::CredentialProfile;
use crate::error::{ConfigErrorKind, Error, Result};
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

/// Profile used when none is requested
pub const DEFAULT_PROFILE: &str = DEFAULT_SECTION;

static OCID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9a-zA-Z_-]+[.:])([0-9a-zA-Z_-]*[.:]){3,}([0-9a-zA-Z_-]+)$").unwrap()
});

static FINGERPRINT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9a-f]{2}:){15}[0-9a-f]{2}$").unwrap());

const REQUIRED_KEYS: [&str; 5] = ["user", "fingerprint", "key_file", "tenancy", "region"];

/// Default credential file: `~/.oci/config`
pub fn default_location() -> PathBuf {
    expand_user("~/.oci/config")
}

/// Expand a leading `~` to the current user's home directory
pub fn expand_user(path: &str) -> PathBuf {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/")
    };

    match (rest, home::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Load and validate a named profile from an OCI configuration file
///
/// Failures are classified as:
/// - `FileNotFound` - `location` is not an existing file
/// - `InvalidConfig` - syntax errors, missing keys or malformed values
/// - `Unexpected` - the profile does not exist or the file cannot be read
pub fn load_profile(location: impl AsRef<Path>, profile_name: &str) -> Result<CredentialProfile> {
    let location = expand_user(&location.as_ref().to_string_lossy());

    if !location.is_file() {
        return Err(Error::credentials(
            ConfigErrorKind::FileNotFound,
            format!("config file {} not found", location.display()),
        ));
    }

    let content = std::fs::read_to_string(&location).map_err(|e| {
        Error::credentials(
            ConfigErrorKind::Unexpected,
            format!("failed to read {}: {e}", location.display()),
        )
    })?;

    let ini = IniFile::parse(&content).map_err(|e| {
        Error::credentials(
            ConfigErrorKind::InvalidConfig,
            format!("{}: {e}", location.display()),
        )
    })?;

    let values = ini.profile(profile_name).ok_or_else(|| {
        Error::credentials(
            ConfigErrorKind::Unexpected,
            format!(
                "profile '{profile_name}' not found in {} (available: {})",
                location.display(),
                ini.section_names().join(", ")
            ),
        )
    })?;

    debug!(
        "Loaded profile '{}' from {}",
        profile_name,
        location.display()
    );
    profile_from_values(&values)
}

/// Validate raw profile values and build a `CredentialProfile`
fn profile_from_values(values: &HashMap<String, String>) -> Result<CredentialProfile> {
    let missing: Vec<&str> = REQUIRED_KEYS
        .iter()
        .copied()
        .filter(|key| values.get(*key).map_or(true, |v| v.is_empty()))
        .collect();
    if !missing.is_empty() {
        return Err(Error::credentials(
            ConfigErrorKind::InvalidConfig,
            format!("missing required keys: {}", missing.join(", ")),
        ));
    }

    let get = |key: &str| values.get(key).cloned().unwrap_or_default();

    let mut malformed = Vec::new();
    if !OCID_REGEX.is_match(&get("user")) {
        malformed.push("user");
    }
    if !OCID_REGEX.is_match(&get("tenancy")) {
        malformed.push("tenancy");
    }
    if !FINGERPRINT_REGEX.is_match(&get("fingerprint")) {
        malformed.push("fingerprint");
    }
    if !malformed.is_empty() {
        return Err(Error::credentials(
            ConfigErrorKind::InvalidConfig,
            format!("malformed values for: {}", malformed.join(", ")),
        ));
    }

    Ok(CredentialProfile {
        tenancy_id: get("tenancy"),
        user_id: get("user"),
        fingerprint: get("fingerprint"),
        key_file_path: PathBuf::from(get("key_file")),
        region: get("region"),
    })
}
