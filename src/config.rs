// Startup configuration read from CAROUSEL_* environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::models::{ParseViewModeError, ViewMode};
use crate::pager::throttle::DEFAULT_THROTTLE;

const ENV_VIEW: &str = "CAROUSEL_VIEW";
const ENV_BORDER: &str = "CAROUSEL_BORDER";
const ENV_THROTTLE_MS: &str = "CAROUSEL_THROTTLE_MS";
const ENV_ASSET_DIR: &str = "CAROUSEL_ASSET_DIR";

/// Upper bound for the scroll sample interval.
const MAX_THROTTLE_MS: u64 = 2_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: {source}")]
    View {
        var: &'static str,
        #[source]
        source: ParseViewModeError,
    },
    #[error("{var}: expected a boolean, got {value:?}")]
    Bool { var: &'static str, value: String },
    #[error("{var}: expected milliseconds in 0..={max}, got {value:?}")]
    Millis {
        var: &'static str,
        value: String,
        max: u64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarouselConfig {
    pub view: ViewMode,
    pub border: bool,
    pub throttle: Duration,
    pub asset_dir: PathBuf,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            view: ViewMode::Multi,
            border: false,
            throttle: DEFAULT_THROTTLE,
            asset_dir: default_asset_dir(),
        }
    }
}

fn default_asset_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets"))
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Bool {
            var,
            value: value.to_string(),
        }),
    }
}

fn parse_millis(var: &'static str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|ms| *ms <= MAX_THROTTLE_MS)
        .map(Duration::from_millis)
        .ok_or_else(|| ConfigError::Millis {
            var,
            value: value.to_string(),
            max: MAX_THROTTLE_MS,
        })
}

impl CarouselConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self {
        let (config, errors) = Self::from_lookup(|key| std::env::var(key).ok());
        for err in errors {
            tracing::warn!(error = %err, "Ignoring invalid configuration value");
        }
        config
    }

    /// Builds a configuration from a key lookup. Invalid values keep their
    /// default and are returned alongside the configuration.
    pub fn from_lookup<F>(lookup: F) -> (Self, Vec<ConfigError>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let mut errors = Vec::new();

        if let Some(value) = lookup(ENV_VIEW) {
            match value.parse::<ViewMode>() {
                Ok(view) => config.view = view,
                Err(source) => errors.push(ConfigError::View {
                    var: ENV_VIEW,
                    source,
                }),
            }
        }

        if let Some(value) = lookup(ENV_BORDER) {
            match parse_bool(ENV_BORDER, &value) {
                Ok(border) => config.border = border,
                Err(err) => errors.push(err),
            }
        }

        if let Some(value) = lookup(ENV_THROTTLE_MS) {
            match parse_millis(ENV_THROTTLE_MS, &value) {
                Ok(throttle) => config.throttle = throttle,
                Err(err) => errors.push(err),
            }
        }

        if let Some(value) = lookup(ENV_ASSET_DIR).filter(|v| !v.trim().is_empty()) {
            config.asset_dir = PathBuf::from(value);
        }

        (config, errors)
    }
}
