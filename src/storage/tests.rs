//! Tests for the storage module

use super::*;
use crate::error::Error;
use crate::session::{keys, EngineConfiguration};
use bytes::Bytes;
use std::path::PathBuf;
use test_case::test_case;

// ============================================================================
// Location Parsing Tests
// ============================================================================

#[test]
fn test_parse_oci_uri() {
    let loc = StorageLocation::parse("oci://raw-data@mytenancy/events/2024/").unwrap();
    assert_eq!(
        loc,
        StorageLocation::Oci {
            bucket: "raw-data".to_string(),
            namespace: "mytenancy".to_string(),
            prefix: "events/2024".to_string(),
        }
    );
    assert_eq!(loc.scheme(), "oci");
    assert!(loc.is_cloud());
    assert_eq!(loc.to_string(), "oci://raw-data@mytenancy/events/2024");
}

#[test]
fn test_parse_oci_requires_bucket() {
    let err = StorageLocation::parse("oci://mytenancy/path").unwrap_err();
    assert!(matches!(err, Error::InvalidUri { .. }));
}

#[test_case("s3://bucket/a/b.json", "s3", "a/b.json" ; "s3")]
#[test_case("gs://bucket/a", "gs", "a" ; "gcs")]
#[test_case("az://container/x/y/", "az", "x/y" ; "azure")]
#[test_case("s3://bucket", "s3", "" ; "bucket root")]
fn test_parse_cloud_uris(uri: &str, scheme: &str, prefix: &str) {
    let loc = StorageLocation::parse(uri).unwrap();
    assert_eq!(loc.scheme(), scheme);
    assert_eq!(loc.prefix(), prefix);
    assert!(loc.is_cloud());
}

#[test_case("data/input.json" ; "relative")]
#[test_case("/tmp/input" ; "absolute")]
#[test_case("C:\\data\\input.json" ; "windows drive")]
fn test_parse_local_paths(path: &str) {
    let loc = StorageLocation::parse(path).unwrap();
    assert_eq!(loc, StorageLocation::Local(PathBuf::from(path)));
    assert!(!loc.is_cloud());
}

#[test]
fn test_parse_file_uri() {
    let loc = StorageLocation::parse("file:///tmp/data").unwrap();
    assert_eq!(loc, StorageLocation::Local(PathBuf::from("/tmp/data")));
}

#[test]
fn test_parse_unsupported_scheme() {
    let err = StorageLocation::parse("ftp://host/file").unwrap_err();
    assert!(err.to_string().contains("unsupported scheme"));
}

#[test_case("oci://b@ns/data", "oci://b@ns/data", true ; "oci same prefix")]
#[test_case("oci://b@ns/data", "oci://b@ns/data/day1", true ; "oci nested")]
#[test_case("oci://b@ns/", "oci://b@ns/out", true ; "oci bucket root")]
#[test_case("oci://b@ns/data", "oci://b@ns/database", false ; "oci sibling sharing a prefix string")]
#[test_case("oci://b@ns/data", "oci://b@other/data", false ; "oci other namespace")]
#[test_case("s3://b/in", "s3://b/in/out", true ; "s3 nested")]
#[test_case("s3://b/in", "s3://c/in", false ; "s3 other bucket")]
#[test_case("gs://b/in", "s3://b/in", false ; "different stores")]
#[test_case("az://c/x/y", "az://c/x", true ; "azure parent")]
fn test_cloud_overlaps(a: &str, b: &str, expected: bool) {
    let a = StorageLocation::parse(a).unwrap();
    let b = StorageLocation::parse(b).unwrap();
    assert_eq!(a.overlaps(&b), expected);
    assert_eq!(b.overlaps(&a), expected);
}

#[test]
fn test_local_overlaps_resolves_aliases() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    std::fs::create_dir(&input).unwrap();
    let local = |p: PathBuf| StorageLocation::Local(p);

    let original = local(input.clone());
    assert!(original.overlaps(&local(input.join("..").join("in"))));
    assert!(original.overlaps(&local(input.join("missing").join("out"))));
    assert!(!original.overlaps(&local(dir.path().join("out"))));
    assert!(!original.overlaps(&local(dir.path().join("in2"))));
}

// ============================================================================
// Storage Options Tests
// ============================================================================

#[test]
fn test_options_defaults() {
    let options = StorageOptions::from_config(&EngineConfiguration::new()).unwrap();
    assert_eq!(options.connection_closing, ConnectionClosing::Graceful);
    assert!(options.oci_hostname.is_none());
    assert!(options.s3.is_empty());
}

#[test]
fn test_options_immediate_closing() {
    let config = EngineConfiguration::new().with(keys::OCI_CONNECTION_CLOSING_STRATEGY, "immediate");
    let options = StorageOptions::from_config(&config).unwrap();
    assert_eq!(options.connection_closing, ConnectionClosing::Immediate);
}

#[test]
fn test_options_bad_closing_strategy() {
    let config = EngineConfiguration::new().with(keys::OCI_CONNECTION_CLOSING_STRATEGY, "later");
    let err = StorageOptions::from_config(&config).unwrap_err();
    assert!(matches!(err, Error::InvalidConfigValue { .. }));
}

#[test]
fn test_options_passthrough_keys() {
    let config = EngineConfiguration::new()
        .with("fs.s3.aws_access_key_id", "AKIA")
        .with("fs.s3.aws_secret_access_key", "secret")
        .with("fs.gs.google_service_account", "/sa.json");
    let options = StorageOptions::from_config(&config).unwrap();
    assert_eq!(options.s3.len(), 2);
    assert_eq!(options.gcs.len(), 1);
    assert!(options.azure.is_empty());
}

#[test]
fn test_options_unknown_passthrough_key() {
    let config = EngineConfiguration::new().with("fs.s3.not_a_real_option", "x");
    let err = StorageOptions::from_config(&config).unwrap_err();
    assert!(err.to_string().contains("fs.s3.not_a_real_option"));
}

#[test]
fn test_oci_region_from_hostname() {
    let config = EngineConfiguration::new().with(
        keys::OCI_HOSTNAME,
        "https://objectstorage.eu-frankfurt-1.oraclecloud.com",
    );
    let options = StorageOptions::from_config(&config).unwrap();
    assert_eq!(options.oci_region().unwrap(), "eu-frankfurt-1");
}

#[test]
fn test_oci_region_missing_or_bad() {
    let options = StorageOptions::default();
    assert!(matches!(options.oci_region(), Err(Error::Config { .. })));

    let options = StorageOptions {
        oci_hostname: Some("https://example.com".to_string()),
        ..StorageOptions::default()
    };
    assert!(matches!(
        options.oci_region(),
        Err(Error::InvalidConfigValue { .. })
    ));
}

#[test]
fn test_open_oci_needs_hostname() {
    let loc = StorageLocation::parse("oci://bucket@ns/out").unwrap();
    let err = ObjectLocation::open(&loc, &StorageOptions::default(), Access::Write).unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
}

// ============================================================================
// Local Store Tests
// ============================================================================

#[test]
fn test_open_local_missing_for_read() {
    let dir = tempfile::tempdir().unwrap();
    let loc = StorageLocation::Local(dir.path().join("missing"));
    let err = ObjectLocation::open(&loc, &StorageOptions::default(), Access::Read).unwrap_err();
    assert!(matches!(err, Error::PathNotFound { .. }));
}

#[test]
fn test_open_local_creates_for_write() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out/nested");
    let loc = StorageLocation::Local(target.clone());
    ObjectLocation::open(&loc, &StorageOptions::default(), Access::Write).unwrap();
    assert!(target.is_dir());
}

#[tokio::test]
async fn test_list_single_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("records.json");
    std::fs::write(&file, "{}\n").unwrap();

    let loc = StorageLocation::Local(file);
    let opened = ObjectLocation::open(&loc, &StorageOptions::default(), Access::Read).unwrap();
    let files = opened.list_data_files().await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].as_ref(), "records.json");
}

#[tokio::test]
async fn test_list_directory_skips_hidden() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("b.json"), "{}\n").unwrap();
    std::fs::write(dir.path().join("a.json"), "{}\n").unwrap();
    std::fs::write(dir.path().join("_SUCCESS"), "").unwrap();
    std::fs::write(dir.path().join(".a.json.crc"), "").unwrap();
    std::fs::create_dir(dir.path().join("_temporary")).unwrap();
    std::fs::write(dir.path().join("_temporary/part.json"), "{}\n").unwrap();
    std::fs::create_dir(dir.path().join("day1")).unwrap();
    std::fs::write(dir.path().join("day1/c.json"), "{}\n").unwrap();

    let loc = StorageLocation::Local(dir.path().to_path_buf());
    let opened = ObjectLocation::open(&loc, &StorageOptions::default(), Access::Read).unwrap();
    let files: Vec<String> = opened
        .list_data_files()
        .await
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(files, vec!["a.json", "b.json", "day1/c.json"]);
}

#[tokio::test]
async fn test_list_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let loc = StorageLocation::Local(dir.path().to_path_buf());
    let opened = ObjectLocation::open(&loc, &StorageOptions::default(), Access::Read).unwrap();
    let err = opened.list_data_files().await.unwrap_err();
    assert!(matches!(err, Error::PathNotFound { .. }));
}

#[tokio::test]
async fn test_clear_removes_everything() {
    let dir = tempfile::tempdir().unwrap();
    let loc = StorageLocation::Local(dir.path().to_path_buf());
    let opened = ObjectLocation::open(&loc, &StorageOptions::default(), Access::Write).unwrap();

    for name in ["part-0.parquet", "part-1.parquet", "_SUCCESS"] {
        opened
            .store()
            .put(&opened.child(name), Bytes::from_static(b"x").into())
            .await
            .unwrap();
    }

    assert_eq!(opened.clear().await.unwrap(), 3);
    assert!(opened.list_all().await.unwrap().is_empty());
}
