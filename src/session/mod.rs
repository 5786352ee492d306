//! Session module
//!
//! Provisions the session every dataset operation goes through.
//!
//! # Overview
//!
//! - `EngineConfiguration` - ordered key/value configuration (later writes win)
//! - `EngineOptions` - typed view of the recognized keys, validated at creation
//! - `SessionBuilder` / `Session` - process-wide get-or-create session
//! - `get_session` - chooses managed or local provisioning, maps OCI
//!   credentials into configuration and applies caller overrides last

mod builder;
mod config;
mod provisioner;

pub use builder::{EngineOptions, Session, SessionBuilder};
pub use config::{keys, EngineConfiguration};
pub use provisioner::{
    credential_config, get_session, report_diagnostic, session_builder, ExecutionMode,
    SessionRequest, DEFAULT_APP_NAME, MANAGED_HOME,
};
