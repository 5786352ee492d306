//! Dataset location parsing

use crate::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Where a dataset lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    /// Local filesystem path (plain path or `file://` URI)
    Local(PathBuf),
    /// OCI Object Storage: `oci://bucket@namespace/prefix`
    Oci {
        bucket: String,
        namespace: String,
        prefix: String,
    },
    /// AWS S3: `s3://bucket/prefix`
    S3 { bucket: String, prefix: String },
    /// Google Cloud Storage: `gs://bucket/prefix`
    Gcs { bucket: String, prefix: String },
    /// Azure Blob Storage: `az://container/prefix`
    Azure { container: String, prefix: String },
}

impl StorageLocation {
    /// Parse a local path or object-store URI
    pub fn parse(uri: &str) -> Result<Self> {
        let url = match Url::parse(uri) {
            // Single-letter schemes are Windows drive letters
            Ok(url) if url.scheme().len() > 1 => url,
            _ => return Ok(Self::Local(PathBuf::from(uri))),
        };

        let prefix = url.path().trim_matches('/').to_string();
        let host = || {
            url.host_str()
                .filter(|h| !h.is_empty())
                .map(str::to_string)
                .ok_or_else(|| Error::invalid_uri(uri, "missing bucket"))
        };

        match url.scheme() {
            "file" => url
                .to_file_path()
                .map(Self::Local)
                .map_err(|()| Error::invalid_uri(uri, "not an absolute file path")),
            "oci" => {
                if url.username().is_empty() {
                    return Err(Error::invalid_uri(
                        uri,
                        "expected oci://bucket@namespace/path",
                    ));
                }
                let namespace = url
                    .host_str()
                    .filter(|h| !h.is_empty())
                    .ok_or_else(|| Error::invalid_uri(uri, "missing namespace"))?;
                Ok(Self::Oci {
                    bucket: url.username().to_string(),
                    namespace: namespace.to_string(),
                    prefix,
                })
            }
            "s3" => Ok(Self::S3 {
                bucket: host()?,
                prefix,
            }),
            "gs" => Ok(Self::Gcs {
                bucket: host()?,
                prefix,
            }),
            "az" => Ok(Self::Azure {
                container: host()?,
                prefix,
            }),
            scheme => Err(Error::invalid_uri(
                uri,
                format!("unsupported scheme '{scheme}'"),
            )),
        }
    }

    /// Scheme name (file, oci, s3, gs, az)
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Local(_) => "file",
            Self::Oci { .. } => "oci",
            Self::S3 { .. } => "s3",
            Self::Gcs { .. } => "gs",
            Self::Azure { .. } => "az",
        }
    }

    /// Check if this is a cloud location (not local)
    pub fn is_cloud(&self) -> bool {
        !matches!(self, Self::Local(_))
    }

    /// Object prefix within the bucket (empty for local paths)
    pub fn prefix(&self) -> &str {
        match self {
            Self::Local(_) => "",
            Self::Oci { prefix, .. }
            | Self::S3 { prefix, .. }
            | Self::Gcs { prefix, .. }
            | Self::Azure { prefix, .. } => prefix,
        }
    }

    /// Whether two locations share any object
    ///
    /// Local paths are compared after resolving symlinks and `..`; cloud
    /// locations overlap when they name the same bucket and one prefix
    /// contains the other.
    pub fn overlaps(&self, other: &StorageLocation) -> bool {
        match (self, other) {
            (Self::Local(a), Self::Local(b)) => {
                let (a, b) = (resolve_local(a), resolve_local(b));
                a.starts_with(&b) || b.starts_with(&a)
            }
            (
                Self::Oci {
                    bucket: a_bucket,
                    namespace: a_ns,
                    prefix: a,
                },
                Self::Oci {
                    bucket: b_bucket,
                    namespace: b_ns,
                    prefix: b,
                },
            ) => a_bucket == b_bucket && a_ns == b_ns && prefixes_overlap(a, b),
            (Self::S3 { bucket: x, prefix: a }, Self::S3 { bucket: y, prefix: b })
            | (Self::Gcs { bucket: x, prefix: a }, Self::Gcs { bucket: y, prefix: b })
            | (
                Self::Azure {
                    container: x,
                    prefix: a,
                },
                Self::Azure {
                    container: y,
                    prefix: b,
                },
            ) => x == y && prefixes_overlap(a, b),
            _ => false,
        }
    }
}

/// Absolute form of a local path with every existing ancestor canonicalized
fn resolve_local(path: &Path) -> PathBuf {
    if let Ok(resolved) = std::fs::canonicalize(path) {
        return resolved;
    }
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) => resolve_local(parent).join(name),
        _ => absolute,
    }
}

fn prefixes_overlap(a: &str, b: &str) -> bool {
    let contains = |outer: &str, inner: &str| {
        outer.is_empty()
            || inner == outer
            || inner
                .strip_prefix(outer)
                .is_some_and(|rest| rest.starts_with('/'))
    };
    contains(a, b) || contains(b, a)
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Oci {
                bucket,
                namespace,
                prefix,
            } => write!(f, "oci://{bucket}@{namespace}/{prefix}"),
            Self::S3 { bucket, prefix } => write!(f, "s3://{bucket}/{prefix}"),
            Self::Gcs { bucket, prefix } => write!(f, "gs://{bucket}/{prefix}"),
            Self::Azure { container, prefix } => write!(f, "az://{container}/{prefix}"),
        }
    }
}
