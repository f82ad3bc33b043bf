//! # Application State
//!
//! Configuration read from the environment and the shared state handed to
//! every handler. The state is cheap to clone: the catalog is a `Copy`
//! profile selector over static tables, and the document generator and the
//! form view sit behind `Arc`.

use std::sync::Arc;

use thiserror::Error;

use pform_core::{Catalog, CatalogProfile, UnknownProfile};
use pform_document::{DocumentError, DocumentGenerator, PdfGenerator};

use crate::routes::form::FormView;

/// Port used when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 8080;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Invalid value in the environment.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `PORT` is not a valid TCP port.
    #[error("invalid PORT {0:?}")]
    InvalidPort(String),

    /// `PFORM_PROFILE` names no catalog profile.
    #[error(transparent)]
    Profile(#[from] UnknownProfile),

    /// `PFORM_LOG_FORMAT` is neither `text` nor `json`.
    #[error("invalid PFORM_LOG_FORMAT {0:?} (expected text or json)")]
    InvalidLogFormat(String),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Catalog profile served by the running instance.
    pub profile: CatalogProfile,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            profile: CatalogProfile::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Read `PORT`, `PFORM_PROFILE` and `PFORM_LOG_FORMAT` from the process
    /// environment. Unset variables take their defaults; set but invalid
    /// ones are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("PORT") {
            config.port = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?;
        }
        if let Some(raw) = lookup("PFORM_PROFILE") {
            config.profile = raw.parse()?;
        }
        if let Some(raw) = lookup("PFORM_LOG_FORMAT") {
            config.log_format = match raw.trim().to_ascii_lowercase().as_str() {
                "text" | "" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => return Err(ConfigError::InvalidLogFormat(raw)),
            };
        }

        Ok(config)
    }
}

/// Failure while building [`AppState`].
#[derive(Error, Debug)]
pub enum StartupError {
    /// The notice template did not register.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The form page template did not register.
    #[error("form view template error: {0}")]
    View(String),
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Configuration the state was built from.
    pub config: AppConfig,
    /// Reference data for the configured profile.
    pub catalog: Catalog,
    /// Renders completed submissions into downloadable documents.
    pub generator: Arc<dyn DocumentGenerator>,
    /// Renders the HTML form page.
    pub view: Arc<FormView>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("catalog", &self.catalog)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// State with the default configuration and the PDF generator.
    pub fn new() -> Result<Self, StartupError> {
        Self::with_config(AppConfig::default())
    }

    /// State for `config` with the PDF generator.
    pub fn with_config(config: AppConfig) -> Result<Self, StartupError> {
        let generator: Arc<dyn DocumentGenerator> = Arc::new(PdfGenerator::new()?);
        Self::with_generator(config, generator)
    }

    /// State for `config` with a caller-supplied generator.
    pub fn with_generator(
        config: AppConfig,
        generator: Arc<dyn DocumentGenerator>,
    ) -> Result<Self, StartupError> {
        Ok(Self {
            catalog: Catalog::new(config.profile),
            view: Arc::new(FormView::new()?),
            generator,
            config,
        })
    }
}
