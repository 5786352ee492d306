//! Tests for the credentials module

use super::parser::IniFile;
use super::*;
use crate::error::ConfigErrorKind;
use pretty_assertions::assert_eq;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

const USER: &str = "ocid1.user.oc1..aaaaaaaauser";
const TENANCY: &str = "ocid1.tenancy.oc1..aaaaaaaatenancy";
const FINGERPRINT: &str = "20:3b:97:13:55:1c:5b:0d:d3:37:d8:50:4e:c5:3a:34";

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn full_profile(section: &str, region: &str) -> String {
    format!(
        "[{section}]\nuser={USER}\nfingerprint={FINGERPRINT}\nkey_file=/keys/oci_api_key.pem\ntenancy={TENANCY}\nregion={region}\n"
    )
}

// ============================================================================
// INI Parsing Tests
// ============================================================================

#[test]
fn test_parse_sections_and_comments() {
    let ini = IniFile::parse(
        "# leading comment\n[DEFAULT]\nregion = us-ashburn-1\n\n; another\n[DEV]\nRegion: eu-frankfurt-1\n",
    )
    .unwrap();

    let default = ini.profile("DEFAULT").unwrap();
    assert_eq!(default.get("region").unwrap(), "us-ashburn-1");

    let dev = ini.profile("DEV").unwrap();
    assert_eq!(dev.get("region").unwrap(), "eu-frankfurt-1");
}

#[test]
fn test_parse_inherits_defaults() {
    let ini = IniFile::parse("[DEFAULT]\ntenancy=t\nregion=r1\n[OTHER]\nregion=r2\n").unwrap();
    let other = ini.profile("OTHER").unwrap();
    assert_eq!(other.get("tenancy").unwrap(), "t");
    assert_eq!(other.get("region").unwrap(), "r2");
}

#[test]
fn test_parse_default_always_present() {
    let ini = IniFile::parse("[ONLY]\nuser=u\n").unwrap();
    assert!(ini.has_profile("DEFAULT"));
    assert!(ini.profile("DEFAULT").unwrap().is_empty());
    assert!(ini.profile("MISSING").is_none());
}

#[test]
fn test_parse_value_keeps_colons() {
    let ini = IniFile::parse(&format!("[DEFAULT]\nfingerprint={FINGERPRINT}\n")).unwrap();
    assert_eq!(
        ini.profile("DEFAULT").unwrap().get("fingerprint").unwrap(),
        FINGERPRINT
    );
}

#[test]
fn test_parse_errors() {
    let err = IniFile::parse("user=u\n").unwrap_err();
    assert_eq!(err.line, 1);

    let err = IniFile::parse("[DEFAULT]\nthis is not a pair\n").unwrap_err();
    assert_eq!(err.line, 2);

    assert!(IniFile::parse("[BROKEN\n").is_err());
    assert!(IniFile::parse("[A]\n[A]\n").is_err());
}

// ============================================================================
// Profile Loading Tests
// ============================================================================

#[test]
fn test_load_default_profile() {
    let file = write_config(&full_profile("DEFAULT", "us-phoenix-1"));
    let profile = load_profile(file.path(), DEFAULT_PROFILE).unwrap();

    assert_eq!(
        profile,
        CredentialProfile {
            tenancy_id: TENANCY.to_string(),
            user_id: USER.to_string(),
            fingerprint: FINGERPRINT.to_string(),
            key_file_path: PathBuf::from("/keys/oci_api_key.pem"),
            region: "us-phoenix-1".to_string(),
        }
    );
    assert_eq!(
        profile.object_storage_hostname(),
        "https://objectstorage.us-phoenix-1.oraclecloud.com"
    );
}

#[test]
fn test_load_keeps_key_file_verbatim() {
    let content = full_profile("DEFAULT", "us-phoenix-1")
        .replace("/keys/oci_api_key.pem", "~/.oci/oci_api_key.pem");
    let file = write_config(&content);
    let profile = load_profile(file.path(), DEFAULT_PROFILE).unwrap();
    assert_eq!(
        profile.key_file_path,
        PathBuf::from("~/.oci/oci_api_key.pem")
    );
}

#[test]
fn test_load_named_profile() {
    let content = format!(
        "{}\n[ANALYTICS]\nregion=ap-tokyo-1\n",
        full_profile("DEFAULT", "us-ashburn-1")
    );
    let file = write_config(&content);
    let profile = load_profile(file.path(), "ANALYTICS").unwrap();
    assert_eq!(profile.region, "ap-tokyo-1");
    assert_eq!(profile.user_id, USER);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_profile(dir.path().join("config"), DEFAULT_PROFILE).unwrap_err();
    assert_eq!(err.credentials_kind(), Some(ConfigErrorKind::FileNotFound));
}

#[test]
fn test_load_directory_is_not_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_profile(dir.path(), DEFAULT_PROFILE).unwrap_err();
    assert_eq!(err.credentials_kind(), Some(ConfigErrorKind::FileNotFound));
}

#[test]
fn test_load_malformed_file() {
    let file = write_config("region=us-ashburn-1\n");
    let err = load_profile(file.path(), DEFAULT_PROFILE).unwrap_err();
    assert_eq!(err.credentials_kind(), Some(ConfigErrorKind::InvalidConfig));
}

#[test]
fn test_load_missing_keys() {
    let file = write_config(&format!("[DEFAULT]\nuser={USER}\nregion=\n"));
    let err = load_profile(file.path(), DEFAULT_PROFILE).unwrap_err();
    assert_eq!(err.credentials_kind(), Some(ConfigErrorKind::InvalidConfig));
    let message = err.to_string();
    assert!(message.contains("fingerprint"));
    assert!(message.contains("region"));
    assert!(!message.contains("user,"));
}

#[test]
fn test_load_bad_fingerprint() {
    let content = full_profile("DEFAULT", "us-ashburn-1").replace(FINGERPRINT, "not-a-fingerprint");
    let file = write_config(&content);
    let err = load_profile(file.path(), DEFAULT_PROFILE).unwrap_err();
    assert_eq!(err.credentials_kind(), Some(ConfigErrorKind::InvalidConfig));
    assert!(err.to_string().contains("fingerprint"));
}

#[test]
fn test_load_unknown_profile() {
    let file = write_config(&full_profile("DEFAULT", "us-ashburn-1"));
    let err = load_profile(file.path(), "NOPE").unwrap_err();
    assert_eq!(err.credentials_kind(), Some(ConfigErrorKind::Unexpected));
}

#[test]
fn test_expand_user() {
    assert_eq!(expand_user("/abs/path"), PathBuf::from("/abs/path"));
    assert_eq!(expand_user("rel/path"), PathBuf::from("rel/path"));
    if let Some(home) = home::home_dir() {
        assert_eq!(expand_user("~/.oci/config"), home.join(".oci/config"));
        assert_eq!(default_location(), home.join(".oci/config"));
    }
}
