//! Configuration loading: optional YAML file, then `HIRELINK_*`
//! environment overrides, then validation.
//!
//! ```yaml
//! api_base_url: https://api.hirelink.example/api
//! cache_ttl_minutes: 2
//! retry:
//!   max_retries: 3
//!   mode: server_status
//! realtime:
//!   url: wss://ws.hirelink.example
//!   app_key: hirelink-key
//! ```

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use hirelink_domain::{ClientConfig, DomainError};
use thiserror::Error;
use tracing::{debug, info};

/// Path of the YAML configuration file.
pub const CONFIG_PATH_VAR: &str = "HIRELINK_CONFIG";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("could not read {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid YAML for the configuration.
    #[error("invalid configuration file {path}: {message}")]
    Parse {
        /// File path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// An environment variable holds an unusable value.
    #[error("invalid value for {key}: {message}")]
    InvalidVar {
        /// Variable name.
        key: &'static str,
        /// Reason.
        message: String,
    },

    /// The merged configuration is invalid.
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Loads configuration from `path` (or `HIRELINK_CONFIG`) and the
/// process environment.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a variable is
/// malformed, or the result fails validation.
pub async fn load_config(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok()).await
}

/// Like [`load_config`], reading variables through `lookup`.
///
/// # Errors
///
/// Same as [`load_config`].
pub async fn load_config_with<F>(
    path: Option<&Path>,
    lookup: F,
) -> Result<ClientConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let path = path
        .map(Path::to_path_buf)
        .or_else(|| lookup(CONFIG_PATH_VAR).map(PathBuf::from));

    let mut config = match &path {
        Some(path) => read_file(path).await?,
        None => ClientConfig::default(),
    };

    apply_env(&mut config, &lookup)?;
    config.validate()?;

    info!(
        api = %config.api_base_url,
        file = ?path,
        retry_mode = ?config.retry.mode,
        "configuration loaded"
    );
    Ok(config)
}

async fn read_file(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    if content.trim().is_empty() {
        return Ok(ClientConfig::default());
    }
    serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Overrides fields from `HIRELINK_*` variables.
fn apply_env<F>(config: &mut ClientConfig, lookup: &F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("HIRELINK_API_URL") {
        config.api_base_url = url;
    }
    if let Some(secs) = parse_var(lookup, "HIRELINK_READ_TIMEOUT_SECS")? {
        config.read_timeout_secs = secs;
    }
    if let Some(secs) = parse_var(lookup, "HIRELINK_WRITE_TIMEOUT_SECS")? {
        config.write_timeout_secs = secs;
    }
    if let Some(minutes) = parse_var(lookup, "HIRELINK_CACHE_TTL_MINUTES")? {
        config.cache_ttl_minutes = minutes;
    }
    if let Some(retries) = parse_var(lookup, "HIRELINK_MAX_RETRIES")? {
        config.retry.max_retries = retries;
    }
    if let Some(mode) = parse_var(lookup, "HIRELINK_RETRY_MODE")? {
        config.retry.mode = mode;
    }
    if let Some(raw) = lookup("HIRELINK_TRANSFORM_KEYS") {
        config.transform_keys = parse_bool("HIRELINK_TRANSFORM_KEYS", &raw)?;
    }
    if let Some(url) = lookup("HIRELINK_WS_URL") {
        config.realtime.url = url;
    }
    if let Some(key) = lookup("HIRELINK_WS_KEY") {
        config.realtime.app_key = key;
    }
    if let Some(file) = lookup("HIRELINK_TOKEN_FILE") {
        config.token_file = Some(PathBuf::from(file));
    }
    Ok(())
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    debug!(key, "environment override");
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|e| ConfigError::InvalidVar {
            key,
            message: format!("{e}: {raw:?}"),
        })
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidVar {
            key,
            message: format!("expected a boolean, got {other:?}"),
        }),
    }
}
