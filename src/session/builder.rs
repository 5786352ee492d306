//! Session and session builder

use super::config::EngineConfiguration;
use crate::dataset::{Dataset, ParquetWriterConfig, ReadOptions, SourceFormat};
use crate::error::Result;
use crate::storage::StorageOptions;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// The session returned by every `get_or_create` in this process
static ACTIVE_SESSION: Mutex<Option<Arc<Session>>> = Mutex::new(None);

/// Typed view of the recognized configuration keys
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// JSON reading
    pub read: ReadOptions,
    /// Parquet writing
    pub writer: ParquetWriterConfig,
    /// Object store clients
    pub storage: StorageOptions,
}

impl EngineOptions {
    /// Decode and validate every recognized key
    pub fn from_config(config: &EngineConfiguration) -> Result<Self> {
        Ok(Self {
            read: ReadOptions::from_config(config)?,
            writer: ParquetWriterConfig::from_config(config)?,
            storage: StorageOptions::from_config(config)?,
        })
    }
}

/// Handle through which datasets are read
#[derive(Debug)]
pub struct Session {
    app_name: String,
    config: EngineConfiguration,
    options: Arc<EngineOptions>,
}

impl Session {
    /// Start building a session
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Application name
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Configuration the session was created with
    pub fn config(&self) -> &EngineConfiguration {
        &self.config
    }

    /// Typed options decoded from the configuration
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Open a JSON dataset (file, directory or object-store prefix)
    pub async fn read_json(&self, path: &str) -> Result<Dataset> {
        Dataset::open(Arc::clone(&self.options), path, SourceFormat::Json).await
    }

    /// Open a Parquet dataset
    pub async fn read_parquet(&self, path: &str) -> Result<Dataset> {
        Dataset::open(Arc::clone(&self.options), path, SourceFormat::Parquet).await
    }

    /// The process-wide active session, if one was created
    pub fn active() -> Option<Arc<Session>> {
        ACTIVE_SESSION
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Builder for [`Session`]
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    app_name: String,
    config: EngineConfiguration,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBuilder {
    /// Create a builder with no configuration
    pub fn new() -> Self {
        Self {
            app_name: crate::NAME.to_string(),
            config: EngineConfiguration::new(),
        }
    }

    /// Set the application name
    #[must_use]
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    /// Set one configuration key, replacing any previous value
    #[must_use]
    pub fn config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.set(key, value);
        self
    }

    /// Apply a whole configuration, in order
    #[must_use]
    pub fn config_all(mut self, config: &EngineConfiguration) -> Self {
        self.config.merge(config);
        self
    }

    /// Configured application name
    pub fn get_app_name(&self) -> &str {
        &self.app_name
    }

    /// Configuration accumulated so far
    pub fn get_config(&self) -> &EngineConfiguration {
        &self.config
    }

    /// Build a new session, independent of the active one
    pub fn create(self) -> Result<Session> {
        let options = EngineOptions::from_config(&self.config)?;
        debug!(
            "Session '{}' configured with keys: {}",
            self.app_name,
            self.config.keys().collect::<Vec<_>>().join(", ")
        );
        Ok(Session {
            app_name: self.app_name,
            config: self.config,
            options: Arc::new(options),
        })
    }

    /// Return the active session, creating it on first use
    ///
    /// Later calls return the same session; configuration carried by those
    /// calls is not applied.
    pub fn get_or_create(self) -> Result<Arc<Session>> {
        let mut active = ACTIVE_SESSION
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(session) = active.as_ref() {
            if session.config != self.config || session.app_name != self.app_name {
                warn!("Using an existing session; new configuration will not take effect");
            }
            return Ok(Arc::clone(session));
        }

        let session = Arc::new(self.create()?);
        info!("Created session '{}'", session.app_name);
        *active = Some(Arc::clone(&session));
        Ok(session)
    }
}
