//! Storage options decoded from the engine configuration

use crate::error::{Error, Result};
use crate::session::{keys, EngineConfiguration};
use object_store::aws::AmazonS3ConfigKey;
use object_store::azure::AzureConfigKey;
use object_store::gcp::GoogleConfigKey;
use object_store::ClientOptions;
use std::str::FromStr;
use url::Url;

/// HTTP connection reuse policy for object-store clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionClosing {
    /// Keep idle connections pooled
    #[default]
    Graceful,
    /// Close connections as soon as a request completes
    ///
    /// Avoids draining the remainder of large objects read with range requests.
    Immediate,
}

impl FromStr for ConnectionClosing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "graceful" => Ok(Self::Graceful),
            "immediate" => Ok(Self::Immediate),
            other => Err(Error::invalid_value(
                keys::OCI_CONNECTION_CLOSING_STRATEGY,
                format!("expected immediate or graceful, got '{other}'"),
            )),
        }
    }
}

/// Options applied when building object stores
#[derive(Debug, Clone, Default)]
pub struct StorageOptions {
    /// Connection reuse policy
    pub connection_closing: ConnectionClosing,
    /// Object Storage endpoint (`fs.oci.client.hostname`)
    pub oci_hostname: Option<String>,
    /// Extra S3 builder options (`fs.s3.*`)
    pub s3: Vec<(AmazonS3ConfigKey, String)>,
    /// Extra GCS builder options (`fs.gs.*`)
    pub gcs: Vec<(GoogleConfigKey, String)>,
    /// Extra Azure builder options (`fs.azure.*`)
    pub azure: Vec<(AzureConfigKey, String)>,
}

impl StorageOptions {
    /// Decode storage options from the engine configuration
    pub fn from_config(config: &EngineConfiguration) -> Result<Self> {
        let connection_closing = config
            .get(keys::OCI_CONNECTION_CLOSING_STRATEGY)
            .map(str::parse)
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            connection_closing,
            oci_hostname: config.get(keys::OCI_HOSTNAME).map(str::to_string),
            s3: passthrough(config, keys::S3_PREFIX)?,
            gcs: passthrough(config, keys::GCS_PREFIX)?,
            azure: passthrough(config, keys::AZURE_PREFIX)?,
        })
    }

    /// HTTP client options shared by every cloud store
    pub fn client_options(&self) -> ClientOptions {
        let options = ClientOptions::new();
        match self.connection_closing {
            ConnectionClosing::Graceful => options,
            ConnectionClosing::Immediate => options.with_pool_max_idle_per_host(0),
        }
    }

    /// Region named by the Object Storage endpoint
    ///
    /// `https://objectstorage.us-ashburn-1.oraclecloud.com` → `us-ashburn-1`
    pub fn oci_region(&self) -> Result<String> {
        let hostname = self.oci_hostname.as_deref().ok_or_else(|| {
            Error::config(format!(
                "oci:// paths need '{}' to be set (done automatically in local mode)",
                keys::OCI_HOSTNAME
            ))
        })?;

        Url::parse(hostname)
            .ok()
            .and_then(|url| {
                url.host_str()
                    .and_then(|h| h.strip_prefix("objectstorage."))
                    .and_then(|h| h.strip_suffix(".oraclecloud.com"))
                    .filter(|region| !region.is_empty() && !region.contains('.'))
                    .map(str::to_string)
            })
            .ok_or_else(|| {
                Error::invalid_value(
                    keys::OCI_HOSTNAME,
                    format!("cannot determine region from '{hostname}'"),
                )
            })
    }
}

/// Collect `prefix<key>` entries as typed builder options
fn passthrough<K>(config: &EngineConfiguration, prefix: &str) -> Result<Vec<(K, String)>>
where
    K: FromStr<Err = object_store::Error>,
{
    config
        .with_prefix(prefix)
        .map(|(key, value)| {
            K::from_str(key)
                .map(|k| (k, value.to_string()))
                .map_err(|e| Error::invalid_value(format!("{prefix}{key}"), e.to_string()))
        })
        .collect()
}
