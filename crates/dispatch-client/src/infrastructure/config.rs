//! TOML-based configuration for the client application.
//!
//! Reads and writes `AppConfig` from the platform-appropriate config file:
//! - Windows:  `%APPDATA%\Dispatch\config.toml`
//! - Linux:    `~/.config/dispatch/config.toml`
//! - macOS:    `~/Library/Application Support/Dispatch/config.toml`
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return
//! value of `some_fn()` when absent from the file, so the app works on first
//! run (before a config file exists) and when upgrading from an older file
//! that is missing newer fields.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level application configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    pub client: ClientConfig,
    pub backend: BackendConfig,
    pub geocoding: GeocodingConfig,
    pub planner: PlannerConfig,
    pub map: MapConfig,
}

/// General client behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Backend REST endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackendConfig {
    /// Base URL of the backend, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Geocoding provider settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeocodingConfig {
    /// Geocoding endpoint URL.
    #[serde(default = "default_geocode_endpoint")]
    pub endpoint: String,
    /// Provider API key.  Empty means unset; depot commands will fail with
    /// a lookup error until one is configured.
    #[serde(default)]
    pub api_key: String,
}

/// Route-planning settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlannerConfig {
    /// Number of vehicle slots requested from the optimizer.
    #[serde(default = "default_num_vehicles")]
    pub num_vehicles: u32,
}

/// Map viewport settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapConfig {
    /// Viewport center latitude used before a depot exists.
    #[serde(default = "default_center_lat")]
    pub default_center_lat: f64,
    /// Viewport center longitude used before a depot exists.
    #[serde(default = "default_center_lng")]
    pub default_center_lng: f64,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}
fn default_geocode_endpoint() -> String {
    "https://maps.googleapis.com/maps/api/geocode/json".to_string()
}
fn default_num_vehicles() -> u32 {
    4
}
fn default_center_lat() -> f64 {
    40.7128
}
fn default_center_lng() -> f64 {
    -74.0060
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            backend: BackendConfig::default(),
            geocoding: GeocodingConfig::default(),
            planner: PlannerConfig::default(),
            map: MapConfig::default(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { log_level: default_log_level() }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self { base_url: default_base_url() }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            endpoint: default_geocode_endpoint(),
            api_key: String::new(),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self { num_vehicles: default_num_vehicles() }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_center_lat: default_center_lat(),
            default_center_lng: default_center_lng(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config
/// base directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot
/// be determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from disk, returning `AppConfig::default()` if the file
/// does not yet exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not
/// found", and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let path = config_file_path()?;

    match std::fs::read_to_string(&path) {
        Ok(content) => {
            let cfg: AppConfig = toml::from_str(&content)?;
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io { path, source: e }),
    }
}

/// Persists `config` to disk, creating the directory and file as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    let path = config_file_path()?;

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(&path, content).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(())
}

/// Resolves the platform config base directory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Dispatch"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("dispatch"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(|h| PathBuf::from(h).join("Library").join("Application Support").join("Dispatch"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
