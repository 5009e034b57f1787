use hostbridge_core::{API_VERSION, DEFAULT_NAMESPACE};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Host configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Global object on the web side that receives `handle*` calls.
    pub namespace: String,
    pub api_version: String,
    /// Rolling log files go here when set; console only otherwise.
    pub log_dir: Option<PathBuf>,
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub log_filter: String,
    /// Scripts buffered per event subscriber before it starts lagging.
    pub event_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            namespace: DEFAULT_NAMESPACE.to_string(),
            api_version: API_VERSION.to_string(),
            log_dir: None,
            log_filter: "hostbridge=debug,tower_http=info,warn".to_string(),
            event_buffer: 256,
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `HOSTBRIDGE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`ServerConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(host) = lookup("HOSTBRIDGE_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("HOSTBRIDGE_PORT") {
            config.port = port.parse().map_err(|_| ConfigError::Invalid {
                var: "HOSTBRIDGE_PORT",
                expected: "a port number",
                value: port,
            })?;
        }
        if let Some(namespace) = lookup("HOSTBRIDGE_NAMESPACE") {
            config.namespace = namespace;
        }
        if let Some(api_version) = lookup("HOSTBRIDGE_API_VERSION") {
            config.api_version = api_version;
        }
        if let Some(log_dir) = lookup("HOSTBRIDGE_LOG_DIR") {
            config.log_dir = Some(PathBuf::from(log_dir));
        }
        if let Some(filter) = lookup("HOSTBRIDGE_LOG") {
            config.log_filter = filter;
        }
        if let Some(buffer) = lookup("HOSTBRIDGE_EVENT_BUFFER") {
            config.event_buffer = buffer
                .parse()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid {
                    var: "HOSTBRIDGE_EVENT_BUFFER",
                    expected: "a positive integer",
                    value: buffer,
                })?;
        }

        Ok(config)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
