use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::limiter::{RateLimitPolicy, RateLimitSettings};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub identity: IdentityConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Hosted identity provider used for session resolution.
///
/// `service_key` has no preset default; it only comes from the
/// environment so a key never lands in source control.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub base_url: String,
    pub service_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_rate_limiting: bool,
    /// Budget for the shared "api" action applied across the gated surface.
    pub rate_limit_requests: u32,
    pub rate_limit_window_secs: u64,
    /// Budgets for the platform's AI actions; independent of the api budget.
    pub chat_limit_requests: u32,
    pub chat_window_secs: u64,
    pub analyze_limit_requests: u32,
    pub analyze_window_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl IdentityConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ApiConfig {
    /// Snapshot of the configured budgets, handed to the app state so
    /// middleware never reads the config singleton per request.
    pub fn limits(&self) -> RateLimitSettings {
        RateLimitSettings {
            enabled: self.enable_rate_limiting,
            api: RateLimitPolicy {
                max_requests: self.rate_limit_requests,
                window: Duration::from_secs(self.rate_limit_window_secs),
            },
            chat: RateLimitPolicy {
                max_requests: self.chat_limit_requests,
                window: Duration::from_secs(self.chat_window_secs),
            },
            analyze: RateLimitPolicy {
                max_requests: self.analyze_limit_requests,
                window: Duration::from_secs(self.analyze_window_secs),
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Identity provider overrides
        if let Ok(v) = env::var("IDENTITY_BASE_URL") {
            self.identity.base_url = v;
        }
        if let Ok(v) = env::var("IDENTITY_SERVICE_KEY") {
            self.identity.service_key = v;
        }
        if let Ok(v) = env::var("IDENTITY_TIMEOUT_SECS") {
            self.identity.timeout_secs = v.parse().unwrap_or(self.identity.timeout_secs);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_ACQUIRE_TIMEOUT_SECS") {
            self.database.acquire_timeout_secs =
                v.parse().unwrap_or(self.database.acquire_timeout_secs);
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_RATE_LIMITING") {
            self.api.enable_rate_limiting = v.parse().unwrap_or(self.api.enable_rate_limiting);
        }
        if let Ok(v) = env::var("API_RATE_LIMIT_REQUESTS") {
            self.api.rate_limit_requests = v.parse().unwrap_or(self.api.rate_limit_requests);
        }
        if let Ok(v) = env::var("API_RATE_LIMIT_WINDOW_SECS") {
            self.api.rate_limit_window_secs =
                v.parse().unwrap_or(self.api.rate_limit_window_secs);
        }
        if let Ok(v) = env::var("API_CHAT_LIMIT_REQUESTS") {
            self.api.chat_limit_requests = v.parse().unwrap_or(self.api.chat_limit_requests);
        }
        if let Ok(v) = env::var("API_CHAT_WINDOW_SECS") {
            self.api.chat_window_secs = v.parse().unwrap_or(self.api.chat_window_secs);
        }
        if let Ok(v) = env::var("API_ANALYZE_LIMIT_REQUESTS") {
            self.api.analyze_limit_requests =
                v.parse().unwrap_or(self.api.analyze_limit_requests);
        }
        if let Ok(v) = env::var("API_ANALYZE_WINDOW_SECS") {
            self.api.analyze_window_secs = v.parse().unwrap_or(self.api.analyze_window_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            identity: IdentityConfig {
                base_url: "http://localhost:54321".to_string(),
                service_key: String::new(),
                timeout_secs: 10,
            },
            database: DatabaseConfig {
                max_connections: 10,
                acquire_timeout_secs: 30,
            },
            api: ApiConfig {
                enable_rate_limiting: false,
                rate_limit_requests: 1000,
                rate_limit_window_secs: 60,
                chat_limit_requests: 100,
                chat_window_secs: 60,
                analyze_limit_requests: 100,
                analyze_window_secs: 60,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            identity: IdentityConfig {
                base_url: "https://auth.staging.example.com".to_string(),
                service_key: String::new(),
                timeout_secs: 10,
            },
            database: DatabaseConfig {
                max_connections: 20,
                acquire_timeout_secs: 10,
            },
            api: ApiConfig {
                enable_rate_limiting: true,
                rate_limit_requests: 100,
                rate_limit_window_secs: 60,
                chat_limit_requests: 30,
                chat_window_secs: 60,
                analyze_limit_requests: 20,
                analyze_window_secs: 60,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            identity: IdentityConfig {
                base_url: "https://auth.example.com".to_string(),
                service_key: String::new(),
                timeout_secs: 10,
            },
            database: DatabaseConfig {
                max_connections: 50,
                acquire_timeout_secs: 5,
            },
            api: ApiConfig {
                enable_rate_limiting: true,
                rate_limit_requests: 60,
                rate_limit_window_secs: 60,
                chat_limit_requests: 20,
                chat_window_secs: 60,
                analyze_limit_requests: 10,
                analyze_window_secs: 60,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(!config.api.enable_rate_limiting);
        assert_eq!(config.identity.timeout_secs, 10);
        assert!(config.security.enable_cors);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.api.enable_rate_limiting);
        assert_eq!(config.api.rate_limit_requests, 60);
        assert_eq!(config.api.rate_limit_window_secs, 60);
    }

    #[test]
    fn test_limits_snapshot_matches_api_config() {
        let config = AppConfig::production();
        let limits = config.api.limits();
        assert!(limits.enabled);
        assert_eq!(limits.api.max_requests, 60);
        assert_eq!(limits.api.window, Duration::from_secs(60));
        assert_eq!(limits.chat.max_requests, 20);
        assert_eq!(limits.analyze.max_requests, 10);
    }
}
