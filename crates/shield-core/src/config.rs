//! Client configuration
//!
//! Endpoint locations and navigation-guard settings, loadable from TOML.
//! Capture cadence and reconnect policy live with the channel crate; this is
//! only what every component needs to find the backend.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use url::Url;

/// Paths that require a session cookie before navigation is allowed.
const DEFAULT_PROTECTED_PATHS: &[&str] = &["/camera", "/recognize", "/admin"];

/// Configuration loading failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The file was not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Where the backend lives and which routes are protected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the HTTP API.
    pub api_base: Url,
    /// WebSocket endpoint of the capture/recognition channel.
    pub channel_url: Url,
    /// Attach the identity token as a `token` query parameter when opening
    /// the channel.
    pub channel_auth: bool,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Path prefixes the navigation guard redirects to sign-in when no
    /// session cookie is present.
    pub protected_paths: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            // Development defaults match the backend's local bind address.
            api_base: Url::parse("http://localhost:5000").expect("static url"),
            channel_url: Url::parse("ws://localhost:5000").expect("static url"),
            channel_auth: false,
            request_timeout_secs: 30,
            protected_paths: DEFAULT_PROTECTED_PATHS
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
        }
    }
}

impl ClientConfig {
    /// Parse a TOML document; missing keys fall back to defaults.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_local_backend() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base.as_str(), "http://localhost:5000/");
        assert_eq!(config.channel_url.scheme(), "ws");
        assert_eq!(
            config.protected_paths,
            vec!["/camera", "/recognize", "/admin"]
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ClientConfig::from_toml_str(
            r#"
            api_base = "https://shield.example.com/api"
            channel_auth = true
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base.as_str(), "https://shield.example.com/api");
        assert!(config.channel_auth);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.protected_paths.len(), 3);
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "request_timeout_secs = 5").unwrap();

        let config = ClientConfig::load(file.path()).unwrap();
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn test_bad_toml_is_a_parse_error() {
        let err = ClientConfig::from_toml_str("api_base = 12").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
