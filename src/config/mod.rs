//! Configuration module for the admin console.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;

/// Default page size requested by list fetches that feed the dashboard.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Console configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the platform REST API, without a trailing slash
    pub api_base_url: String,
    /// Path to the persisted key/value storage file holding the session token
    pub token_path: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Page size for list requests issued by the dashboard
    pub page_size: u32,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_base_url = env::var("PUJA_ADMIN_API_URL")
            .unwrap_or_else(|_| "http://localhost:5000/api".to_string())
            .trim_end_matches('/')
            .to_string();

        let token_path = env::var("PUJA_ADMIN_TOKEN_PATH")
            .unwrap_or_else(|_| "./data/session.json".to_string())
            .into();

        let log_level = env::var("PUJA_ADMIN_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let page_size = match env::var("PUJA_ADMIN_PAGE_SIZE") {
            Ok(raw) => match raw.parse::<u32>() {
                Ok(size) if size > 0 => size,
                _ => {
                    tracing::warn!("Ignoring invalid PUJA_ADMIN_PAGE_SIZE {:?}", raw);
                    DEFAULT_PAGE_SIZE
                }
            },
            Err(_) => DEFAULT_PAGE_SIZE,
        };

        Self {
            api_base_url,
            token_path,
            log_level,
            page_size,
        }
    }

    /// Configuration pointing at an explicit API base URL, used by tests and CLI overrides.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.api_base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}
