/// Configuration management for gazette
///
/// This module handles loading and managing configuration from environment
/// variables. Every field has a default suitable for local development, so
/// the server starts with no environment at all.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Feed pagination configuration
    pub feed: FeedConfig,
    /// Home page cache configuration
    pub cache: CacheConfig,
    /// Uploaded media configuration
    pub media: MediaConfig,
    /// Identity/login redirect configuration
    pub auth: AuthConfig,
    /// Presentation knobs
    pub display: DisplayConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
}

/// Feed pagination configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Posts per feed page
    pub page_size: u32,
}

/// Home page cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Seconds a rendered home feed page stays cached; 0 disables caching
    pub page_ttl_secs: u64,
}

/// Uploaded media configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Directory uploaded images are written under
    pub root: String,
}

/// Identity/login redirect configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Login route unauthenticated requests are redirected to
    pub login_url: String,
}

/// Presentation knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Characters of post text kept in short previews (log lines etc.)
    pub preview_chars: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            app: AppConfig {
                env: app_env,
                host: std::env::var("GAZETTE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("GAZETTE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite:gazette.db".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5),
            },
            feed: FeedConfig {
                page_size: std::env::var("GAZETTE_PAGE_SIZE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            },
            cache: CacheConfig {
                page_ttl_secs: std::env::var("GAZETTE_CACHE_SECONDS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(20),
            },
            media: MediaConfig {
                root: std::env::var("GAZETTE_MEDIA_ROOT").unwrap_or_else(|_| "media".to_string()),
            },
            auth: AuthConfig {
                login_url: std::env::var("GAZETTE_LOGIN_URL")
                    .unwrap_or_else(|_| "/auth/login/".to_string()),
            },
            display: DisplayConfig {
                preview_chars: std::env::var("GAZETTE_PREVIEW_CHARS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(15),
            },
        })
    }
}
