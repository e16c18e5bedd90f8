//! Loader configuration, from `axle.toml` with environment overrides.

use axle_common::env::{env_string, env_to_bool};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Shared libraries to probe for the driver provider entry point.
    #[serde(default)]
    pub driver_paths: Vec<String>,
    /// Register the in-process null driver.
    #[serde(default)]
    pub enable_null_driver: bool,
    /// Interpose the parameter-validation layer on every driver.
    #[serde(default)]
    pub enable_validation: bool,
    /// Interpose the API tracing layer on every driver.
    #[serde(default)]
    pub enable_tracing: bool,
    /// Default-driver selection: empty or "first" for the first
    /// successfully initialized driver, an integer for a registry
    /// index, anything else for a driver name.
    #[serde(default)]
    pub default_driver: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            driver_paths: Vec::new(),
            enable_null_driver: false,
            enable_validation: false,
            enable_tracing: false,
            default_driver: String::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Which registered driver becomes the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultDriverPolicy {
    /// First successfully initialized driver (discovery order).
    First,
    ByIndex(u32),
    ByName(String),
}

impl DefaultDriverPolicy {
    pub fn parse(spec: &str) -> Self {
        if spec.is_empty() || spec == "first" {
            return DefaultDriverPolicy::First;
        }
        match spec.parse::<u32>() {
            Ok(index) => DefaultDriverPolicy::ByIndex(index),
            Err(_) => DefaultDriverPolicy::ByName(spec.to_string()),
        }
    }
}

impl LoaderConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration from file if it exists, otherwise return defaults.
    pub fn load_or_default(path: &str) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Config file merged with the environment; env wins where set.
    pub fn from_env() -> Self {
        let mut cfg = Self::load_or_default(&config_path());

        if let Some(paths) = env_string("AXLE_DRIVER_PATHS") {
            cfg.driver_paths.extend(
                std::env::split_paths(&paths).map(|p| p.display().to_string()),
            );
        }
        if env_to_bool("AXLE_ENABLE_NULL_DRIVER") {
            cfg.enable_null_driver = true;
        }
        if env_to_bool("AXLE_ENABLE_PARAMETER_VALIDATION") {
            cfg.enable_validation = true;
        }
        if env_to_bool("AXLE_ENABLE_API_TRACING") {
            cfg.enable_tracing = true;
        }
        if let Some(spec) = env_string("AXLE_DEFAULT_DRIVER") {
            cfg.default_driver = spec;
        }
        cfg
    }

    pub fn default_driver_policy(&self) -> DefaultDriverPolicy {
        DefaultDriverPolicy::parse(&self.default_driver)
    }
}

fn config_path() -> String {
    env_string("AXLE_CONFIG").unwrap_or_else(|| "axle.toml".to_string())
}
