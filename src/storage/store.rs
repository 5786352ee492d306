//! Object store construction and listing

use super::location::StorageLocation;
use super::options::StorageOptions;
use crate::error::{Error, Result};
use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectMeta, ObjectStore};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Whether a location is opened for reading or writing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Must already exist
    Read,
    /// Created if missing (local directories)
    Write,
}

/// An object store plus the prefix a dataset occupies in it
#[derive(Clone)]
pub struct ObjectLocation {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Dataset prefix within the store
    prefix: ObjectPath,
    /// Original location for logging
    location: StorageLocation,
}

impl fmt::Debug for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectLocation")
            .field("location", &self.location)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl ObjectLocation {
    /// Open a location with the given storage options
    pub fn open(
        location: &StorageLocation,
        options: &StorageOptions,
        access: Access,
    ) -> Result<Self> {
        let (store, prefix): (Arc<dyn ObjectStore>, ObjectPath) = match location {
            StorageLocation::Local(path) => return Self::open_local(location, path, access),
            StorageLocation::Oci {
                bucket,
                namespace,
                prefix,
            } => {
                let region = options.oci_region()?;
                let endpoint =
                    format!("https://{namespace}.compat.objectstorage.{region}.oraclecloud.com");
                let mut builder = AmazonS3Builder::from_env()
                    .with_bucket_name(bucket)
                    .with_region(&region)
                    .with_endpoint(endpoint)
                    .with_virtual_hosted_style_request(false)
                    .with_client_options(options.client_options());
                for (key, value) in options.s3.iter().cloned() {
                    builder = builder.with_config(key, value);
                }
                let store = builder
                    .build()
                    .map_err(|e| Error::config(format!("Failed to create OCI client: {e}")))?;
                (Arc::new(store), ObjectPath::from(prefix.as_str()))
            }
            StorageLocation::S3 { bucket, prefix } => {
                let mut builder = AmazonS3Builder::from_env()
                    .with_bucket_name(bucket)
                    .with_client_options(options.client_options());
                for (key, value) in options.s3.iter().cloned() {
                    builder = builder.with_config(key, value);
                }
                let store = builder
                    .build()
                    .map_err(|e| Error::config(format!("Failed to create S3 client: {e}")))?;
                (Arc::new(store), ObjectPath::from(prefix.as_str()))
            }
            StorageLocation::Gcs { bucket, prefix } => {
                let mut builder = GoogleCloudStorageBuilder::from_env()
                    .with_bucket_name(bucket)
                    .with_client_options(options.client_options());
                for (key, value) in options.gcs.iter().cloned() {
                    builder = builder.with_config(key, value);
                }
                let store = builder
                    .build()
                    .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?;
                (Arc::new(store), ObjectPath::from(prefix.as_str()))
            }
            StorageLocation::Azure { container, prefix } => {
                let mut builder = MicrosoftAzureBuilder::from_env()
                    .with_container_name(container)
                    .with_client_options(options.client_options());
                for (key, value) in options.azure.iter().cloned() {
                    builder = builder.with_config(key, value);
                }
                let store = builder
                    .build()
                    .map_err(|e| Error::config(format!("Failed to create Azure client: {e}")))?;
                (Arc::new(store), ObjectPath::from(prefix.as_str()))
            }
        };

        debug!("Opened {} store for {}", location.scheme(), location);
        Ok(Self {
            store,
            prefix,
            location: location.clone(),
        })
    }

    /// Local paths are rooted at the directory itself, or at the parent of a file
    fn open_local(
        location: &StorageLocation,
        path: &std::path::Path,
        access: Access,
    ) -> Result<Self> {
        let (root, prefix) = if path.is_file() {
            let parent = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                _ => std::path::PathBuf::from("."),
            };
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            (parent, ObjectPath::from(name))
        } else if path.is_dir() {
            (path.to_path_buf(), ObjectPath::default())
        } else if access == Access::Write {
            std::fs::create_dir_all(path).map_err(|e| {
                Error::config(format!("Failed to create directory {}: {e}", path.display()))
            })?;
            (path.to_path_buf(), ObjectPath::default())
        } else {
            return Err(Error::path_not_found(path.display().to_string()));
        };

        let store = LocalFileSystem::new_with_prefix(&root)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            location: location.clone(),
        })
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Dataset prefix within the store
    pub fn prefix(&self) -> &ObjectPath {
        &self.prefix
    }

    /// The parsed location
    pub fn location(&self) -> &StorageLocation {
        &self.location
    }

    /// Path of a child object below the dataset prefix
    pub fn child(&self, name: &str) -> ObjectPath {
        self.prefix.child(name)
    }

    /// Every object below the prefix, sorted by path
    pub async fn list_all(&self) -> Result<Vec<ObjectMeta>> {
        let prefix = (!self.prefix.as_ref().is_empty()).then_some(&self.prefix);
        let mut objects: Vec<ObjectMeta> = self.store.list(prefix).try_collect().await?;
        objects.sort_by(|a, b| a.location.as_ref().cmp(b.location.as_ref()));
        Ok(objects)
    }

    /// Resolve the data files of a dataset
    ///
    /// A prefix naming a single object yields that object. Otherwise every
    /// object below the prefix is returned, skipping hidden entries (any path
    /// component starting with `_` or `.`, such as `_SUCCESS`).
    pub async fn list_data_files(&self) -> Result<Vec<ObjectPath>> {
        if !self.prefix.as_ref().is_empty() {
            match self.store.head(&self.prefix).await {
                Ok(meta) => return Ok(vec![meta.location]),
                Err(object_store::Error::NotFound { .. }) => {}
                Err(e) => return Err(e.into()),
            }
        }

        let files: Vec<ObjectPath> = self
            .list_all()
            .await?
            .into_iter()
            .map(|meta| meta.location)
            .filter(|path| !is_hidden(&self.prefix, path))
            .collect();

        if files.is_empty() {
            return Err(Error::path_not_found(self.location.to_string()));
        }
        Ok(files)
    }

    /// Delete every object below the prefix, returning how many were removed
    pub async fn clear(&self) -> Result<usize> {
        let objects = self.list_all().await?;
        for meta in &objects {
            self.store.delete(&meta.location).await?;
        }
        Ok(objects.len())
    }
}

fn is_hidden(prefix: &ObjectPath, path: &ObjectPath) -> bool {
    path.prefix_match(prefix)
        .is_some_and(|mut parts| parts.any(|part| part.as_ref().starts_with(['_', '.'])))
}
