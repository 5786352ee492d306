//! Session provisioning for local and OCI Data Flow runs

use super::builder::{Session, SessionBuilder};
use super::config::{keys, EngineConfiguration};
use crate::credentials::{self, CredentialProfile};
use crate::error::{Error, Result};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};

/// `HOME` of processes running inside OCI Data Flow
pub const MANAGED_HOME: &str = "/home/dataflow";

/// Application name used when none is given
pub const DEFAULT_APP_NAME: &str = "DataFlow_JSON2Parquet";

/// Where the program runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Inside OCI Data Flow, which authenticates implicitly
    Managed,
    /// On a developer machine, authenticating with a local profile
    Local,
}

impl ExecutionMode {
    /// Detect the mode from the process environment
    pub fn detect() -> Self {
        Self::from_home(std::env::var("HOME").ok().as_deref())
    }

    /// Mode for a given `HOME` value
    pub fn from_home(home: Option<&str>) -> Self {
        if home == Some(MANAGED_HOME) {
            Self::Managed
        } else {
            Self::Local
        }
    }
}

/// Everything needed to provision a session
#[derive(Debug, Clone)]
pub struct SessionRequest {
    /// Application name
    pub app_name: String,
    /// Execution mode, normally from [`ExecutionMode::detect`]
    pub mode: ExecutionMode,
    /// Credential file (default `~/.oci/config`), local mode only
    pub profile_location: Option<PathBuf>,
    /// Credential profile (default `DEFAULT`), local mode only
    pub profile_name: Option<String>,
    /// Applied last, overriding any colliding key
    pub extra_config: EngineConfiguration,
}

impl SessionRequest {
    /// Request with defaults for the given mode
    pub fn new(mode: ExecutionMode) -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            mode,
            profile_location: None,
            profile_name: None,
            extra_config: EngineConfiguration::new(),
        }
    }

    /// Set the application name
    #[must_use]
    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    /// Set the credential file location
    #[must_use]
    pub fn with_profile_location(mut self, location: Option<PathBuf>) -> Self {
        self.profile_location = location;
        self
    }

    /// Set the credential profile name
    #[must_use]
    pub fn with_profile_name(mut self, name: Option<String>) -> Self {
        self.profile_name = name;
        self
    }

    /// Set the extra configuration
    #[must_use]
    pub fn with_extra_config(mut self, config: EngineConfiguration) -> Self {
        self.extra_config = config;
        self
    }
}

/// Engine configuration derived from a credential profile
pub fn credential_config(profile: &CredentialProfile) -> EngineConfiguration {
    EngineConfiguration::new()
        .with(keys::OCI_TENANT_ID, &profile.tenancy_id)
        .with(keys::OCI_USER_ID, &profile.user_id)
        .with(keys::OCI_FINGERPRINT, &profile.fingerprint)
        .with(
            keys::OCI_PEM_FILE_PATH,
            profile.key_file_path.to_string_lossy(),
        )
        .with(keys::OCI_HOSTNAME, profile.object_storage_hostname())
}

/// Assemble the session builder for a request without finalizing it
///
/// In local mode this loads the credential profile; a failure is logged with
/// a diagnostic for its kind and returned unchanged.
pub fn session_builder(request: &SessionRequest) -> Result<SessionBuilder> {
    let mut builder = Session::builder().app_name(&request.app_name);

    match request.mode {
        ExecutionMode::Managed => {
            info!("Running in OCI Data Flow, using its implicit authentication");
        }
        ExecutionMode::Local => {
            let location = request
                .profile_location
                .clone()
                .unwrap_or_else(credentials::default_location);
            let profile_name = request
                .profile_name
                .as_deref()
                .unwrap_or(credentials::DEFAULT_PROFILE);

            debug!(
                "Running locally with profile '{}' from {}",
                profile_name,
                location.display()
            );

            let profile = credentials::load_profile(&location, profile_name).inspect_err(|e| {
                error!("Failed to load OCI credentials: {}", e);
                report_diagnostic(&mut std::io::stderr(), e);
            })?;

            builder = builder
                .config_all(&credential_config(&profile))
                .config(keys::OCI_CONNECTION_CLOSING_STRATEGY, "immediate");
        }
    }

    Ok(builder.config_all(&request.extra_config))
}

/// Write the diagnostic line for a credential failure
///
/// Goes to the console regardless of the log filter. Other errors write
/// nothing.
pub fn report_diagnostic(out: &mut impl Write, err: &Error) {
    if let Some(kind) = err.credentials_kind() {
        // Nowhere left to report a failed console write
        let _ = writeln!(out, "{}", kind.diagnostic());
    }
}

/// Provision the process-wide session
pub fn get_session(request: &SessionRequest) -> Result<Arc<Session>> {
    session_builder(request)?.get_or_create()
}
