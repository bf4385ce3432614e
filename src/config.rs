//! Application Configuration
//! Loaded once at startup from the environment (and `.env`), then passed
//! explicitly to the components that need it.

use crate::db::DbConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    /// Explicit log level; falls back to `info` in production and `debug` otherwise.
    pub log_level: Option<String>,
    pub log_dir: String,
    /// Origins allowed by CORS. Empty means the localhost development defaults.
    pub allowed_origins: Vec<String>,
    pub db: DbConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = Environment::parse(&env_or("ENVIRONMENT", "development"));

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .ok()
            .map(|s| split_origins(&s))
            .filter(|origins| !origins.is_empty())
            .or_else(|| std::env::var("FRONTEND_ORIGIN").ok().map(|s| split_origins(&s)))
            .unwrap_or_default();

        Self {
            environment,
            host: env_or("HOST", "127.0.0.1"),
            port: env_parse("PORT", 3001),
            log_level: std::env::var("LOG_LEVEL").ok().filter(|s| !s.is_empty()),
            log_dir: env_or("LOG_DIR", "logs"),
            allowed_origins,
            db: DbConfig::from_env(),
        }
    }

    pub fn effective_log_level(&self) -> &str {
        match &self.log_level {
            Some(level) => level,
            None if self.environment.is_production() => "info",
            None => "debug",
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub(crate) fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

pub(crate) fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
