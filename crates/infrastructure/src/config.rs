//! Client settings loading.
//!
//! Sources, lowest priority first:
//! 1. built-in defaults (`ClientSettings::default()`)
//! 2. a TOML file (`backoffice.toml` in the working directory unless a
//!    path is given)
//! 3. `BACKOFFICE_*` environment variables, e.g. `BACKOFFICE_BASE_URL`
//!
//! `BACKOFFICE_RETRY_EXCLUSIONS` takes a comma-separated list.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use backoffice_domain::{ClientSettings, DomainError};
use config::{Config, Environment, File};
use thiserror::Error;
use tracing::debug;

use crate::persistence::default_credentials_path;

/// Prefix of the environment variables read by [`load_settings`].
pub const ENV_PREFIX: &str = "BACKOFFICE";

/// Name of the settings file looked up in the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "backoffice.toml";

/// Errors from loading the settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or parsed.
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    /// The merged settings are not usable.
    #[error(transparent)]
    Invalid(#[from] DomainError),

    /// No credentials path was configured and the platform has no config dir.
    #[error("no credentials path configured and no platform config directory found")]
    NoCredentialsPath,
}

/// Loads and validates the settings.
///
/// `file` overrides the default settings file; a missing default file is
/// not an error, a missing explicit file is.
///
/// # Errors
///
/// Returns an error if a source cannot be parsed or the result is invalid.
pub fn load_settings(file: Option<&Path>) -> Result<ClientSettings, ConfigError> {
    load_settings_from(file, None)
}

/// Like [`load_settings`], reading environment values from `env` instead of
/// the process environment when given.
///
/// # Errors
///
/// Returns an error if a source cannot be parsed or the result is invalid.
pub fn load_settings_from(
    file: Option<&Path>,
    env: Option<HashMap<String, String>>,
) -> Result<ClientSettings, ConfigError> {
    let file_source = match file {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_SETTINGS_FILE).required(false),
    };
    let environment = Environment::with_prefix(ENV_PREFIX)
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("retry_exclusions")
        .source(env);

    let settings: ClientSettings = Config::builder()
        .add_source(Config::try_from(&ClientSettings::default())?)
        .add_source(file_source)
        .add_source(environment)
        .build()?
        .try_deserialize()?;

    settings.validate()?;
    debug!(base_url = %settings.base_url, "Settings loaded");
    Ok(settings)
}

/// Returns the configured credentials path, or the platform default.
///
/// # Errors
///
/// Returns `ConfigError::NoCredentialsPath` if neither is available.
pub fn credentials_path(settings: &ClientSettings) -> Result<PathBuf, ConfigError> {
    settings
        .credentials_path
        .clone()
        .or_else(default_credentials_path)
        .ok_or(ConfigError::NoCredentialsPath)
}
