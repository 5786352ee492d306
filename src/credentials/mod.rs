//! OCI credential profiles
//!
//! Loads a named profile from a local OCI configuration file
//! (`~/.oci/config` by default).
//!
//! # Overview
//!
//! - `CredentialProfile` - the five fields needed to sign Object Storage requests
//! - `load_profile` - read, parse and validate a profile, classifying failures
//!   into the three `ConfigErrorKind`s
//! - `default_location` / `DEFAULT_PROFILE` - the SDK defaults

mod loader;
mod parser;
mod types;

pub use loader::{default_location, expand_user, load_profile, DEFAULT_PROFILE};
pub use types::CredentialProfile;

#[cfg(test)]
mod tests;
