//! Application Configuration
//!
//! This module provides configuration management for the application,
//! supporting a YAML configuration file with sensible defaults and a few
//! environment variable overrides for deployment.

use crate::error::ConfigError;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Default location of the log4rs configuration file
pub const DEFAULT_LOG_CONFIG_PATH: &str = "server_log.yaml";

/// Path of the log4rs configuration, from `LOOK_LOG_CONFIG` or the default.
///
/// Resolved without reading `config.yaml` so logging can be up before the
/// application configuration is loaded.
pub fn log_config_path() -> String {
    env::var("LOOK_LOG_CONFIG").unwrap_or_else(|_| DEFAULT_LOG_CONFIG_PATH.to_string())
}

/// Storage backend types
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub enum StorageBackend {
    #[default]
    LocalFs,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "localfs" | "local" | "fs" => Ok(StorageBackend::LocalFs),
            "memory" | "mock" => Ok(StorageBackend::Memory),
            _ => Err(format!("Unknown storage backend: {}", s)),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Storage configuration
    pub storage: StorageConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Number of worker threads
    pub workers: usize,
}

/// Image storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage backend type
    pub backend: StorageBackend,
    /// Directory holding stored images
    pub base_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            workers: 4,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::LocalFs,
            base_path: "./data/images".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `LOOK_CONFIG` or `config.yaml`, then apply
    /// environment overrides. Defaults are used if the file is missing.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = env::var("LOOK_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_file(&config_path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Read configuration from a YAML file, falling back to defaults
    pub fn from_file(config_path: &str) -> Result<Self, ConfigError> {
        if !Path::new(config_path).exists() {
            warn!("Config file {} not found, using defaults", config_path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|source| ConfigError::Io {
            path: config_path.to_string(),
            source,
        })?;
        let config: AppConfig = serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: config_path.to_string(),
            source,
        })?;
        info!("Loaded configuration from {}", config_path);
        Ok(config)
    }

    /// Apply `LOOK_*` environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = env::var("LOOK_STORAGE_PATH") {
            info!("Using storage path from environment: {}", path);
            self.storage.base_path = path;
        }

        if let Ok(backend_str) = env::var("LOOK_STORAGE_BACKEND") {
            match backend_str.parse::<StorageBackend>() {
                Ok(backend) => {
                    info!("Using storage backend from environment: {:?}", backend);
                    self.storage.backend = backend;
                }
                Err(e) => warn!("Invalid storage backend in environment: {}. Keeping {:?}.", e, self.storage.backend),
            }
        }

        if let Ok(host) = env::var("LOOK_HOST") {
            self.server.host = host;
        }

        if let Ok(port_str) = env::var("LOOK_PORT") {
            match port_str.parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("Invalid port in environment: {}. Keeping {}.", port_str, self.server.port),
            }
        }
    }
}
