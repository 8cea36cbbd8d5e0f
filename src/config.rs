//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::api::AdminCredentials;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StorageConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub admin: AdminConfig,

    #[serde(default)]
    pub realtime: RealtimeConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Waitlist store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_broadcast_capacity")]
    pub broadcast_capacity: usize,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("stellar-forge").to_string_lossy().to_string())
        .unwrap_or_else(|| "./stellar_forge_data".to_string())
}

/// Resolve a leading `~` against the user's home directory
fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return PathBuf::from(path),
    };

    match dirs::home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => PathBuf::from(path),
    }
}

fn default_broadcast_capacity() -> usize {
    1024
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            broadcast_capacity: default_broadcast_capacity(),
        }
    }
}

impl StorageConfig {
    pub fn to_store_config(&self) -> crate::store::StoreConfig {
        crate::store::StoreConfig {
            data_dir: expand_home(&self.data_dir),
            broadcast_capacity: self.broadcast_capacity,
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:8091".to_string()]
}

fn default_max_body_size() -> usize {
    64 * 1024 // 64 KiB
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            max_body_size: default_max_body_size(),
        }
    }
}

impl ApiConfig {
    pub fn to_server_config(&self) -> crate::api::ApiConfig {
        crate::api::ApiConfig {
            host: self.host.clone(),
            port: self.port,
            max_body_size: self.max_body_size,
            cors_origins: self.cors_origins.clone(),
        }
    }
}

/// Admin dashboard access
#[derive(Clone, Default, Deserialize)]
pub struct AdminConfig {
    /// Shared admin code; empty disables admin access
    #[serde(default)]
    pub code: String,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("code", &if self.code.is_empty() { "" } else { "<redacted>" })
            .finish()
    }
}

impl AdminConfig {
    pub fn credentials(&self) -> AdminCredentials {
        AdminCredentials::new(self.code.as_str())
    }
}

/// Live query (WebSocket) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeConfig {
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

fn default_max_connections() -> usize {
    1000
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
        }
    }
}

impl RealtimeConfig {
    pub fn to_hub_config(&self) -> crate::websocket::HubConfig {
        crate::websocket::HubConfig {
            max_connections: self.max_connections,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load an explicit file, or fall back to the default locations
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let config = Self::load_with_env(path)?;
                tracing::info!("Loaded config from {:?}", path);
                Ok(config)
            }
            None => Ok(Self::load_default()),
        }
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("stellar-forge").join("config.toml")),
            Some(PathBuf::from("/etc/stellar-forge/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `STELLAR_FORGE_*` overrides read through `lookup`
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(data_dir) = lookup("STELLAR_FORGE_DATA_DIR") {
            self.store.data_dir = data_dir;
        }

        if let Some(host) = lookup("STELLAR_FORGE_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("STELLAR_FORGE_API_PORT") {
            match port.parse() {
                Ok(p) => self.api.port = p,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid STELLAR_FORGE_API_PORT"),
            }
        }

        if let Some(code) = lookup("STELLAR_FORGE_ADMIN_CODE") {
            self.admin.code = code;
        }

        if let Some(level) = lookup("STELLAR_FORGE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("STELLAR_FORGE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    format!(
        r#"# Stellar Forge Configuration
#
# Environment variables override these settings:
# - STELLAR_FORGE_DATA_DIR
# - STELLAR_FORGE_API_HOST
# - STELLAR_FORGE_API_PORT
# - STELLAR_FORGE_ADMIN_CODE
# - STELLAR_FORGE_LOG_LEVEL
# - STELLAR_FORGE_LOG_FORMAT

[store]
# Directory holding waitlist.db
data_dir = '{data_dir}'

# Pending change notifications before slow live queries resync
broadcast_capacity = 1024

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8090

# Allowed CORS origins (empty allows any origin)
cors_origins = ["http://localhost:8091"]

# Maximum request body size (bytes)
max_body_size = 65536

[admin]
# Shared code for the admin dashboard; leave empty to disable admin access
code = ""

[realtime]
# Maximum concurrent WebSocket connections
max_connections = 1000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#,
        data_dir = default_data_dir()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.port, 8090);
        assert_eq!(config.api.cors_origins, vec!["http://localhost:8091"]);
        assert_eq!(config.api.max_body_size, 65536);
        assert_eq!(config.realtime.max_connections, 1000);
        assert_eq!(config.store.broadcast_capacity, 1024);
        assert!(config.admin.code.is_empty());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::parse(
            r#"
            [api]
            port = 9000

            [admin]
            code = "forge"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.admin.code, "forge");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_template_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.api.port, 8090);
        assert!(!config.admin.credentials().is_enabled());
    }

    #[test]
    fn test_generated_template_uses_real_data_dir() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.store.data_dir, default_data_dir());
        assert!(!config.store.to_store_config().data_dir.starts_with("~"));
    }

    #[test]
    fn test_home_relative_data_dir_expanded() {
        let config = Config::parse(
            r#"
            [store]
            data_dir = "~/.local/share/stellar-forge"
            "#,
        )
        .unwrap();
        let data_dir = config.store.to_store_config().data_dir;

        match dirs::home_dir() {
            Some(home) => assert_eq!(data_dir, home.join(".local/share/stellar-forge")),
            None => assert_eq!(data_dir, PathBuf::from("~/.local/share/stellar-forge")),
        }
        assert_eq!(expand_home("/var/lib/forge"), PathBuf::from("/var/lib/forge"));
        assert_eq!(expand_home("~forge/data"), PathBuf::from("~forge/data"));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("STELLAR_FORGE_DATA_DIR", "/tmp/forge"),
            ("STELLAR_FORGE_API_PORT", "7000"),
            ("STELLAR_FORGE_ADMIN_CODE", "secret"),
            ("STELLAR_FORGE_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.store.data_dir, "/tmp/forge");
        assert_eq!(config.api.port, 7000);
        assert_eq!(config.admin.code, "secret");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_port_override_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| {
            (key == "STELLAR_FORGE_API_PORT").then(|| "not-a-port".to_string())
        });
        assert_eq!(config.api.port, 8090);
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nport = ").unwrap();

        match Config::load(&path) {
            Err(ConfigError::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_admin_code_redacted() {
        let admin = AdminConfig {
            code: "secret".to_string(),
        };
        assert!(!format!("{:?}", admin).contains("secret"));
    }
}
