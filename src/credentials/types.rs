//! Credential profile types

use std::path::PathBuf;

/// A named set of OCI API-key credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialProfile {
    /// Tenancy OCID (`tenancy`)
    pub tenancy_id: String,
    /// User OCID (`user`)
    pub user_id: String,
    /// API key fingerprint (`fingerprint`)
    pub fingerprint: String,
    /// Path to the PEM private key, exactly as written in `key_file`
    pub key_file_path: PathBuf,
    /// Region identifier, e.g. `us-ashburn-1` (`region`)
    pub region: String,
}

impl CredentialProfile {
    /// Object Storage endpoint for this profile's region
    pub fn object_storage_hostname(&self) -> String {
        format!("https://objectstorage.{}.oraclecloud.com", self.region)
    }
}
