use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SurrealDB connection address
    pub url: String,
    /// Namespace
    pub namespace: String,
    /// Database name
    pub database: String,
    /// Username
    pub username: String,
    /// Password
    pub password: String,
    /// Connection timeout (seconds)
    pub connection_timeout: u64,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Request timeout (seconds)
    pub request_timeout: u64,
    /// Maximum request body size (bytes)
    pub max_request_size: usize,
}

/// Conversation memory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Inactivity window after which a new session is started (hours)
    pub session_timeout_hours: i64,
    /// How far back candidate entries are fetched (days)
    pub candidate_window_days: i64,
    /// Default number of context items handed to the responder
    pub context_limit: usize,
    /// Combined relevance score below which entries are discarded
    pub relevance_threshold: f32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            session_timeout_hours: 24,
            candidate_window_days: 30,
            context_limit: 5,
            relevance_threshold: 0.1,
        }
    }
}

/// Generative responder configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Generation server address
    pub url: String,
    /// Model name
    pub model: String,
    /// Request timeout (seconds)
    pub timeout: u64,
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SecurityConfig {
    /// Rate limiting enabled
    pub rate_limit_enabled: bool,
    /// Requests per minute per client
    pub requests_per_minute: u32,
    /// Sliding window size (seconds)
    pub window_size_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log file directory (stdout when unset)
    pub log_dir: Option<PathBuf>,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Database configuration
    pub database: DatabaseConfig,
    /// Server configuration
    pub server: ServerConfig,
    /// Conversation memory configuration
    pub memory: MemoryConfig,
    /// Generative responder configuration
    pub generator: GeneratorConfig,
    /// Security configuration
    pub security: SecurityConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Application name
    pub app_name: String,
    /// Environment
    pub environment: String,
}

impl AppConfig {
    /// Development configuration
    pub fn development() -> Self {
        Self {
            database: DatabaseConfig {
                url: "http://localhost:8000".into(),
                namespace: "showroom".into(),
                database: "conversations".into(),
                username: "root".into(),
                password: "root".into(),
                connection_timeout: 30,
            },
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: 8080,
                request_timeout: 30,
                max_request_size: 1024 * 1024,
            },
            memory: MemoryConfig::default(),
            generator: GeneratorConfig {
                url: "http://localhost:11434".into(),
                model: "llama3.2".into(),
                timeout: 60,
            },
            security: SecurityConfig {
                rate_limit_enabled: false,
                requests_per_minute: 100,
                window_size_seconds: 60,
            },
            logging: LoggingConfig {
                level: "debug".into(),
                log_dir: None,
            },
            app_name: "showroom".into(),
            environment: "development".into(),
        }
    }

    /// Production configuration
    pub fn production() -> Self {
        let mut config = Self::development();
        config.environment = "production".into();
        config.logging.level = "info".into();
        config.logging.log_dir = Some(PathBuf::from("./logs"));
        config.security.rate_limit_enabled = true;
        config
    }
}
