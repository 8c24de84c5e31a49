use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub mail: MailConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Which store implementation backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub password_hash_cost: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub from: String,
    pub frontend_url: String,
    pub relay_url: Option<String>,
    pub relay_api_key: Option<String>,
    pub token_ttl_minutes: i64,
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
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
            self.database.backend = StoreBackend::Postgres;
        }
        if let Ok(v) = env::var("DATABASE_BACKEND") {
            match v.as_str() {
                "memory" => self.database.backend = StoreBackend::Memory,
                "postgres" => self.database.backend = StoreBackend::Postgres,
                other => tracing::warn!("Ignoring unknown DATABASE_BACKEND '{}'", other),
            }
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Mail overrides come before CORS so the frontend joins the whitelist
        if let Ok(v) = env::var("FRONTEND_URL") {
            self.mail.frontend_url = v.trim_end_matches('/').to_string();
            if !self.security.cors_origins.contains(&self.mail.frontend_url) {
                self.security.cors_origins.push(self.mail.frontend_url.clone());
            }
        }
        if let Ok(v) = env::var("MAIL_FROM") {
            self.mail.from = v;
        }
        if let Ok(v) = env::var("MAIL_RELAY_URL") {
            self.mail.relay_url = Some(v);
        }
        if let Ok(v) = env::var("MAIL_RELAY_API_KEY") {
            self.mail.relay_api_key = Some(v);
        }
        if let Ok(v) = env::var("MAIL_TOKEN_TTL_MINUTES") {
            self.mail.token_ttl_minutes = v.parse().unwrap_or(self.mail.token_ttl_minutes);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_PASSWORD_HASH_COST") {
            self.security.password_hash_cost = v.parse().unwrap_or(self.security.password_hash_cost);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 4000,
            },
            database: DatabaseConfig {
                backend: StoreBackend::Memory,
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            security: SecurityConfig {
                cors_origins: vec!["http://localhost:5173".to_string()],
                jwt_secret: "development-only-secret".to_string(),
                jwt_expiry_hours: 24 * 180, // 180 days
                password_hash_cost: 4,
            },
            mail: MailConfig {
                from: "Home Task <admin@hometask.com>".to_string(),
                frontend_url: "http://localhost:5173".to_string(),
                relay_url: None,
                relay_api_key: None,
                token_ttl_minutes: 10,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 4000,
            },
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 1024 * 1024,
            },
            security: SecurityConfig {
                cors_origins: vec!["https://staging.hometask.com".to_string()],
                jwt_secret: String::new(),
                jwt_expiry_hours: 24 * 180,
                password_hash_cost: 10,
            },
            mail: MailConfig {
                from: "Home Task <admin@hometask.com>".to_string(),
                frontend_url: "https://staging.hometask.com".to_string(),
                relay_url: None,
                relay_api_key: None,
                token_ttl_minutes: 10,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 4000,
            },
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            api: ApiConfig {
                enable_request_logging: false,
                max_request_size_bytes: 512 * 1024,
            },
            security: SecurityConfig {
                cors_origins: vec!["https://app.hometask.com".to_string()],
                jwt_secret: String::new(),
                jwt_expiry_hours: 24 * 180,
                password_hash_cost: bcrypt::DEFAULT_COST,
            },
            mail: MailConfig {
                from: "Home Task <admin@hometask.com>".to_string(),
                frontend_url: "https://app.hometask.com".to_string(),
                relay_url: None,
                relay_api_key: None,
                token_ttl_minutes: 10,
            },
        }
    }

    /// Problems that make this configuration unusable for serving traffic
    pub fn startup_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.security.jwt_secret.is_empty() {
            errors.push("JWT_SECRET must be set".to_string());
        }
        if self.database.backend == StoreBackend::Postgres && self.database.url.is_none() {
            errors.push("DATABASE_URL must be set for the postgres backend".to_string());
        }
        if self.environment == Environment::Production && self.database.backend == StoreBackend::Memory {
            errors.push("the memory backend is not allowed in production".to_string());
        }
        if !(1..=MAX_JWT_EXPIRY_HOURS).contains(&self.security.jwt_expiry_hours) {
            errors.push(format!("SECURITY_JWT_EXPIRY_HOURS must be between 1 and {}", MAX_JWT_EXPIRY_HOURS));
        }
        if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&self.mail.token_ttl_minutes) {
            errors.push(format!("MAIL_TOKEN_TTL_MINUTES must be between 1 and {}", MAX_TOKEN_TTL_MINUTES));
        }
        if self.security.cors_origins.iter().any(|origin| origin == "*") {
            errors.push("SECURITY_CORS_ORIGINS cannot contain '*' when credentials are allowed".to_string());
        }
        errors
    }
}

pub const MAX_JWT_EXPIRY_HOURS: u64 = 24 * 365 * 10;
pub const MAX_TOKEN_TTL_MINUTES: i64 = 24 * 60;

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}
