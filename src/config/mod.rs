use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub pdf: PdfConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub request_timeout_secs: u64,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub token_expiry_minutes: i64,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfConfig {
    /// Explicit Chromium binary path. None lets chromiumoxide auto-detect.
    pub chromium_path: Option<String>,
    pub render_timeout_secs: u64,
    /// Delay after the cleanup script runs, so late layout work settles
    /// before printing.
    pub settle_delay_ms: u64,
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
        // Server overrides
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("REQUEST_TIMEOUT_SECS") {
            self.server.request_timeout_secs = v.parse().unwrap_or(self.server.request_timeout_secs);
        }
        if let Ok(v) = env::var("CORS_ORIGINS") {
            self.server.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECT_TIMEOUT_SECS") {
            self.database.connect_timeout_secs = v.parse().unwrap_or(self.database.connect_timeout_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("TOKEN_EXPIRY_MINUTES") {
            self.security.token_expiry_minutes = v.parse().unwrap_or(self.security.token_expiry_minutes);
        }
        if let Ok(v) = env::var("BCRYPT_COST") {
            self.security.bcrypt_cost = v.parse().unwrap_or(self.security.bcrypt_cost);
        }

        // PDF overrides
        if let Ok(v) = env::var("CHROMIUM_PATH") {
            self.pdf.chromium_path = Some(v);
        }
        if let Ok(v) = env::var("PDF_RENDER_TIMEOUT_SECS") {
            self.pdf.render_timeout_secs = v.parse().unwrap_or(self.pdf.render_timeout_secs);
        }
        if let Ok(v) = env::var("PDF_SETTLE_DELAY_MS") {
            self.pdf.settle_delay_ms = v.parse().unwrap_or(self.pdf.settle_delay_ms);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 8080,
                request_timeout_secs: 60,
                cors_origins: vec!["http://localhost:5173".to_string()],
            },
            database: DatabaseConfig {
                max_connections: 10,
                connect_timeout_secs: 30,
            },
            security: SecurityConfig {
                jwt_secret: "insecure-dev-secret".to_string(),
                token_expiry_minutes: 60,
                // Minimum cost keeps local registration and the test suite fast
                bcrypt_cost: 4,
            },
            pdf: PdfConfig {
                chromium_path: None,
                render_timeout_secs: 30,
                settle_delay_ms: 2000,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 8080,
                request_timeout_secs: 60,
                cors_origins: vec![
                    "https://apostilab.onrender.com".to_string(),
                    "http://localhost:5173".to_string(),
                ],
            },
            database: DatabaseConfig {
                max_connections: 20,
                connect_timeout_secs: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                token_expiry_minutes: 60,
                bcrypt_cost: bcrypt::DEFAULT_COST,
            },
            pdf: PdfConfig {
                chromium_path: Some("/usr/bin/chromium".to_string()),
                render_timeout_secs: 30,
                settle_delay_ms: 2000,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 8080,
                request_timeout_secs: 60,
                cors_origins: vec!["https://apostilab.onrender.com".to_string()],
            },
            database: DatabaseConfig {
                max_connections: 20,
                connect_timeout_secs: 5,
            },
            security: SecurityConfig {
                // Empty secret fails closed: token generation and validation
                // both error until JWT_SECRET is provided.
                jwt_secret: String::new(),
                token_expiry_minutes: 60,
                bcrypt_cost: bcrypt::DEFAULT_COST,
            },
            pdf: PdfConfig {
                chromium_path: Some("/usr/bin/chromium".to_string()),
                render_timeout_secs: 30,
                settle_delay_ms: 2000,
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
    fn development_defaults() {
        let config = AppConfig::development();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.security.token_expiry_minutes, 60);
        assert!(!config.security.jwt_secret.is_empty());
        assert!(config.pdf.chromium_path.is_none());
    }

    #[test]
    fn production_fails_closed_on_jwt_secret() {
        let config = AppConfig::production();
        assert!(config.security.jwt_secret.is_empty());
        assert_eq!(config.security.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(config.pdf.chromium_path.as_deref(), Some("/usr/bin/chromium"));
    }

    #[test]
    fn production_cors_is_locked_down() {
        let config = AppConfig::production();
        assert_eq!(
            config.server.cors_origins,
            vec!["https://apostilab.onrender.com"]
        );
    }
}
