use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, error};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Environment (dev, staging, prod)
    #[serde(default = "default_environment")]
    pub environment: String,

    /// CORS allowed origins, comma separated
    pub cors_origins: Option<String>,

    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Directory holding saved documents
    #[serde(default = "default_storage_dir")]
    pub storage_dir: String,

    /// Extension of saved document files
    #[serde(default = "default_file_extension")]
    pub file_extension: String,

    /// Room joined by `/ws`
    #[serde(default = "default_room")]
    pub default_room: String,

    /// Inactivity after which a typer is stopped automatically
    #[serde(default = "default_typing_idle_ms")]
    pub typing_idle_ms: u64,

    /// Capacity of each room's command queue
    #[serde(default = "default_room_queue_capacity")]
    pub room_queue_capacity: usize,

    /// Largest accepted HTTP request body
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables or app.env file
    pub fn load() -> Result<Self, ConfigError> {
        // Try to load from app.env file first
        if std::path::Path::new("app.env").exists() {
            dotenvy::from_filename("app.env").ok();
        } else {
            // Fallback to .env file
            dotenvy::dotenv().ok();
        }

        // Load from environment variables using envy
        match envy::from_env::<Config>() {
            Ok(config) => {
                info!("✅ Configuration loaded successfully");
                Ok(config)
            }
            Err(e) => {
                error!("❌ Failed to load configuration: {}", e);
                Err(ConfigError::EnvError(e))
            }
        }
    }

    /// Get the full server address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode
    pub fn is_development(&self) -> bool {
        self.environment.to_lowercase() == "dev" || self.environment.to_lowercase() == "development"
    }

    /// Parsed CORS allow-list; empty when unset
    pub fn cors_origin_list(&self) -> Vec<String> {
        self.cors_origins
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn typing_idle(&self) -> Duration {
        Duration::from_millis(self.typing_idle_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            cors_origins: None,
            service_name: default_service_name(),
            storage_dir: default_storage_dir(),
            file_extension: default_file_extension(),
            default_room: default_room(),
            typing_idle_ms: default_typing_idle_ms(),
            room_queue_capacity: default_room_queue_capacity(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    EnvError(envy::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EnvError(e) => write!(f, "Environment variable error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_service_name() -> String {
    "colab-text".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_storage_dir() -> String {
    "savedfiles".to_string()
}

fn default_file_extension() -> String {
    "txt".to_string()
}

fn default_room() -> String {
    "main".to_string()
}

fn default_typing_idle_ms() -> u64 {
    1000
}

fn default_room_queue_capacity() -> usize {
    100
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.server_address(), "0.0.0.0:5000");
        assert!(config.is_development());
        assert_eq!(config.typing_idle(), Duration::from_secs(1));
        assert!(config.cors_origin_list().is_empty());
    }

    #[test]
    fn parses_origin_list() {
        let config = Config {
            cors_origins: Some("http://localhost:3000, https://example.org ,".into()),
            ..Config::default()
        };
        assert_eq!(
            config.cors_origin_list(),
            vec!["http://localhost:3000", "https://example.org"]
        );
    }

    #[test]
    fn reads_from_env_pairs() {
        let vars = vec![
            ("PORT".to_string(), "8080".to_string()),
            ("STORAGE_DIR".to_string(), "/tmp/docs".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.storage_dir, "/tmp/docs");
        assert_eq!(config.default_room, "main");
    }
}
