//! Engine configuration
//!
//! An ordered key/value table. Setting an existing key replaces its value
//! in place, so the first insertion fixes the position and the last write
//! fixes the value.

use crate::error::{Error, Result};
use serde_yaml::Value as YamlValue;
use std::fmt;
use std::path::Path;

/// Well-known configuration keys
pub mod keys {
    /// Tenancy OCID
    pub const OCI_TENANT_ID: &str = "fs.oci.client.auth.tenantId";
    /// User OCID
    pub const OCI_USER_ID: &str = "fs.oci.client.auth.userId";
    /// API key fingerprint
    pub const OCI_FINGERPRINT: &str = "fs.oci.client.auth.fingerprint";
    /// Path to the PEM private key
    pub const OCI_PEM_FILE_PATH: &str = "fs.oci.client.auth.pemfilepath";
    /// Object Storage endpoint
    pub const OCI_HOSTNAME: &str = "fs.oci.client.hostname";
    /// HTTP connection reuse policy (`immediate` or `graceful`)
    pub const OCI_CONNECTION_CLOSING_STRATEGY: &str =
        "fs.oci.client.apache.connection.closing.strategy";

    /// Parse each input file as a single JSON document
    pub const JSON_MULTILINE: &str = "json.multiline";
    /// Rows per decoded record batch
    pub const JSON_BATCH_SIZE: &str = "json.batch_size";
    /// Records sampled per file for schema inference
    pub const JSON_INFER_MAX_RECORDS: &str = "json.infer_max_records";

    /// Parquet compression codec
    pub const PARQUET_COMPRESSION: &str = "parquet.compression";
    /// Maximum rows per Parquet row group
    pub const PARQUET_ROW_GROUP_SIZE: &str = "parquet.row_group_size";
    /// Dictionary encoding on/off
    pub const PARQUET_DICTIONARY: &str = "parquet.dictionary";

    /// Prefix for `object_store` S3 builder options
    pub const S3_PREFIX: &str = "fs.s3.";
    /// Prefix for `object_store` GCS builder options
    pub const GCS_PREFIX: &str = "fs.gs.";
    /// Prefix for `object_store` Azure builder options
    pub const AZURE_PREFIX: &str = "fs.azure.";
}

/// Ordered engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfiguration {
    entries: Vec<(String, String)>,
}

impl EngineConfiguration {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key, replacing any previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Builder-style `set`
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Apply every entry of `other`, in order, over this configuration
    pub fn merge(&mut self, other: &EngineConfiguration) -> &mut Self {
        for (key, value) in other.iter() {
            self.set(key, value);
        }
        self
    }

    /// Get a value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether a key is set
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries whose key starts with `prefix`, with the prefix stripped
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.iter()
            .filter_map(move |(k, v)| k.strip_prefix(prefix).map(|rest| (rest, v)))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the configuration is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a YAML mapping of scalar values
    ///
    /// ```yaml
    /// json.multiline: true
    /// parquet.compression: zstd
    /// ```
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let value: YamlValue = serde_yaml::from_str(content)?;
        let mapping = match value {
            YamlValue::Null => return Ok(Self::new()),
            YamlValue::Mapping(mapping) => mapping,
            _ => return Err(Error::config("configuration file must be a mapping")),
        };

        let mut config = Self::new();
        for (key, value) in mapping {
            let key = yaml_scalar(&key)
                .ok_or_else(|| Error::config("configuration keys must be scalars"))?;
            let value = yaml_scalar(&value)
                .ok_or_else(|| Error::invalid_value(&key, "expected a scalar value"))?;
            config.set(key, value);
        }
        Ok(config)
    }

    /// Load a YAML configuration file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&content)
    }

    // ------------------------------------------------------------------------
    // Typed accessors
    // ------------------------------------------------------------------------

    /// Read a boolean key (`true`/`false`, case-insensitive)
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        self.get(key)
            .map(|v| match v.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                other => Err(Error::invalid_value(
                    key,
                    format!("expected true or false, got '{other}'"),
                )),
            })
            .transpose()
    }

    /// Read a strictly positive integer key
    pub fn get_positive(&self, key: &str) -> Result<Option<usize>> {
        self.get(key)
            .map(|v| match v.trim().parse::<usize>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(Error::invalid_value(
                    key,
                    format!("expected a positive integer, got '{v}'"),
                )),
            })
            .transpose()
    }
}

fn yaml_scalar(value: &YamlValue) -> Option<String> {
    match value {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Bool(b) => Some(b.to_string()),
        YamlValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl fmt::Display for EngineConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.iter().map(|(k, v)| format!("{k}={v}")).collect();
        write!(f, "{{{}}}", rendered.join(", "))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EngineConfiguration {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = Self::new();
        for (k, v) in iter {
            config.set(k, v);
        }
        config
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for EngineConfiguration {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}
