//! Configuration management for pfs
//!
//! Settings come from the process environment, falling back to
//! `~/.pfs.env`. Environment variables take precedence over the file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const BASE_URL_VAR: &str = "OLLAMA_BASE_URL";
pub const MODEL_VAR: &str = "OLLAMA_MODEL";
pub const TIMEOUT_VAR: &str = "PFS_TIMEOUT_SECS";

const ENV_FILE_NAME: &str = ".pfs.env";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{var} must be a positive number of seconds, got '{value}'")]
    InvalidTimeout { var: &'static str, value: String },

    #[error("failed to load {path}: {reason}")]
    EnvFile { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root URL of the inference server, e.g. `http://localhost:11434`
    pub base_url: String,
    /// Model identifier passed to the generate endpoint
    pub model: String,
    /// Upper bound for each HTTP request, including generation
    pub request_timeout: Duration,
}

impl Config {
    /// Build a config from a key lookup. Blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let base_url = get(BASE_URL_VAR).ok_or(ConfigError::Missing(BASE_URL_VAR))?;
        let model = get(MODEL_VAR).ok_or(ConfigError::Missing(MODEL_VAR))?;

        let request_timeout = match get(TIMEOUT_VAR) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidTimeout {
                        var: TIMEOUT_VAR,
                        value: raw,
                    })
                }
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            base_url,
            model,
            request_timeout,
        })
    }

    /// Load config from the environment plus an env file.
    ///
    /// An explicit `env_file` must exist; the default `~/.pfs.env` is optional.
    pub fn load(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        let file_values = match env_file {
            Some(path) => read_env_file(path)?,
            None => match Self::default_env_file() {
                Some(path) if path.exists() => read_env_file(&path)?,
                Some(path) => {
                    tracing::debug!(path = %path.display(), "no env file, using environment only");
                    HashMap::new()
                }
                None => HashMap::new(),
            },
        };

        Self::from_lookup(layered(|key: &str| std::env::var(key).ok(), &file_values))
    }

    /// Get the default env file path
    pub fn default_env_file() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(ENV_FILE_NAME))
    }
}

/// Environment first, env file second. A blank environment value does not
/// hide the file's value.
fn layered<'a, E>(
    env: E,
    file_values: &'a HashMap<String, String>,
) -> impl Fn(&str) -> Option<String> + 'a
where
    E: Fn(&str) -> Option<String> + 'a,
{
    move |key: &str| {
        env(key)
            .filter(|value| !value.trim().is_empty())
            .or_else(|| file_values.get(key).cloned())
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let env_file_error = |reason: String| ConfigError::EnvFile {
        path: path.to_path_buf(),
        reason,
    };

    let iter = dotenvy::from_path_iter(path).map_err(|e| env_file_error(e.to_string()))?;
    let mut values = HashMap::new();
    for item in iter {
        let (key, value) = item.map_err(|e| env_file_error(e.to_string()))?;
        values.insert(key, value);
    }

    tracing::debug!(path = %path.display(), keys = values.len(), "loaded env file");
    Ok(values)
}
