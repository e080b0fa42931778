//! Configuration loading and validation for Agentdeck.
//!
//! Loads configuration from `~/.agentdeck/config.toml` with environment
//! variable overrides. The cloud project and region are required:
//! `GCP_PROJECT_ID` and `GCP_LOCATION` (or the same keys in the file)
//! must be set, and startup fails when they are not.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.agentdeck/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Cloud project hosting the reasoning engines. Required.
    #[serde(default)]
    pub project: String,

    /// Cloud region the engines are deployed in. Required.
    #[serde(default)]
    pub location: String,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Long-running-operation polling configuration
    #[serde(default)]
    pub poll: PollConfig,

    /// Credential configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Probe command configuration
    #[serde(default)]
    pub probe: ProbeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// User identifier reported to the remote service on every query.
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8080
}
fn default_user_id() -> String {
    "webapp-user-001".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            user_id: default_user_id(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Seconds between operation status fetches.
    #[serde(default = "default_poll_interval")]
    pub interval_secs: u64,

    /// Give up after this many fetches and report a timeout.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_poll_interval() -> u64 {
    2
}
fn default_max_attempts() -> u32 {
    150
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval(),
            max_attempts: default_max_attempts(),
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Fixed bearer token. When unset, tokens are minted via the gcloud CLI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Default engine for `agentdeck probe` — a short id or full resource name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.agentdeck/config.toml),
    /// apply environment overrides, and validate.
    ///
    /// Environment variables:
    /// - `GCP_PROJECT_ID` — overrides `project`
    /// - `GCP_LOCATION` — overrides `location`
    /// - `AGENTDECK_ACCESS_TOKEN` — overrides `auth.access_token`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if let Ok(project) = std::env::var("GCP_PROJECT_ID") {
            config.project = project;
        }
        if let Ok(location) = std::env::var("GCP_LOCATION") {
            config.location = location;
        }
        if config.auth.access_token.is_none() {
            config.auth.access_token = std::env::var("AGENTDECK_ACCESS_TOKEN").ok();
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path without applying
    /// environment overrides or required-field validation.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".agentdeck")
    }

    /// Validate the configuration. Missing project or location is fatal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project.is_empty() || self.location.is_empty() {
            return Err(ConfigError::ValidationError(
                "GCP_PROJECT_ID and GCP_LOCATION must be set (env or config.toml)".into(),
            ));
        }

        if self.poll.interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "poll.interval_secs must be at least 1".into(),
            ));
        }

        if self.poll.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "poll.max_attempts must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project: String::new(),
            location: String::new(),
            gateway: GatewayConfig::default(),
            poll: PollConfig::default(),
            auth: AuthConfig::default(),
            probe: ProbeConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn configured() -> AppConfig {
        AppConfig {
            project: "demo-project".into(),
            location: "us-central1".into(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn defaults_fill_gateway_and_poll() {
        let config = AppConfig::default();
        assert_eq!(config.gateway.host, "127.0.0.1");
        assert_eq!(config.gateway.port, 8080);
        assert_eq!(config.gateway.user_id, "webapp-user-001");
        assert_eq!(config.poll.interval_secs, 2);
        assert_eq!(config.poll.max_attempts, 150);
    }

    #[test]
    fn missing_project_and_location_rejected() {
        assert!(AppConfig::default().validate().is_err());
        assert!(configured().validate().is_ok());
    }

    #[test]
    fn zero_poll_interval_rejected() {
        let config = AppConfig {
            poll: PollConfig {
                interval_secs: 0,
                ..PollConfig::default()
            },
            ..configured()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = configured();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.project, "demo-project");
        assert_eq!(parsed.gateway.port, config.gateway.port);
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert!(result.unwrap().project.is_empty());
    }

    #[test]
    fn partial_file_parses_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "project = \"demo\"\nlocation = \"europe-west4\"").unwrap();
        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.project, "demo");
        assert_eq!(config.location, "europe-west4");
        assert_eq!(config.gateway.port, 8080);
    }

    #[test]
    fn auth_debug_redacts_token() {
        let auth = AuthConfig {
            access_token: Some("ya29.secret".into()),
        };
        let rendered = format!("{auth:?}");
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains("ya29.secret"));
    }
}
