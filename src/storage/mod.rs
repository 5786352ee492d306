//! Storage module
//!
//! Resolves dataset paths to object stores.
//!
//! # Overview
//!
//! - `StorageLocation` - parsed local path or `oci://`, `s3://`, `gs://`, `az://` URI
//! - `StorageOptions` - client settings decoded from the engine configuration
//! - `ObjectLocation` - an opened store plus the dataset prefix, with listing
//!   and clearing helpers used by the reader and the overwrite writer

mod location;
mod options;
mod store;

pub use location::StorageLocation;
pub use options::{ConnectionClosing, StorageOptions};
pub use store::{Access, ObjectLocation};

#[cfg(test)]
mod tests;
