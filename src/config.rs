//! Application configuration
//!
//! Loaded from a TOML file (default `~/.config/election-service/config.toml`).
//! Every section and key is optional; missing values fall back to the
//! defaults below. `JWT_SECRET` and `DATABASE_URL` in the environment
//! override the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::infrastructure::database::PoolConfig;
use crate::infrastructure::storage::DEFAULT_MAX_PHOTO_BYTES;
use crate::shared::errors::AppError;
use crate::shared::time::LocalZone;

pub const CONFIG_ENV: &str = "ELECTION_CONFIG";

/// `~/.config/election-service/config.toml`, or `./config.toml` when no
/// config directory can be determined.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("election-service"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("config.toml")
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub security: SecurityConfig,
    pub admin: AdminConfig,
    pub logging: LoggingConfig,
    pub elections: ElectionsConfig,
    pub uploads: UploadsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Full connection URL; takes precedence over `path`
    pub url: Option<String>,
    /// SQLite file, created if missing
    pub path: String,
    pub pool: PoolConfig,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            path: "./elections.db".to_string(),
            pool: PoolConfig::default(),
        }
    }
}

impl DatabaseSettings {
    pub fn connection_url(&self) -> String {
        match self.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => format!("sqlite://{}?mode=rwc", self.path),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-this-secret-in-production".to_string(),
            jwt_expiration_hours: 24,
        }
    }
}

/// Admin account seeded on first start
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            name: "Administrator".to_string(),
            email: "admin@localhost".to_string(),
            username: "admin".to_string(),
            password: "admin123".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter directive, e.g. `info` or `election_service=debug,sqlx=warn`
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ElectionsConfig {
    /// Offset used to read admin-entered times, e.g. `+05:30` or `UTC`
    pub utc_offset: String,
    /// Attempts for a vote that hits lock contention
    pub vote_retry_attempts: u32,
}

impl Default for ElectionsConfig {
    fn default() -> Self {
        Self {
            utc_offset: "+05:30".to_string(),
            vote_retry_attempts: 3,
        }
    }
}

impl ElectionsConfig {
    pub fn zone(&self) -> Result<LocalZone, AppError> {
        LocalZone::parse(&self.utc_offset).map_err(|e| AppError::Config(e.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadsConfig {
    /// Directory candidate photos are written to and served from
    pub dir: PathBuf,
    pub max_bytes: usize,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            max_bytes: DEFAULT_MAX_PHOTO_BYTES,
        }
    }
}

impl AppConfig {
    /// Read `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
            Self::from_toml(&raw)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, AppError> {
        toml::from_str(raw).map_err(|e| AppError::Config(e.to_string()))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            if !secret.is_empty() {
                self.security.jwt_secret = secret;
            }
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.is_empty() {
                self.database.url = Some(url);
            }
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.elections.zone()?;
        if self.security.jwt_secret.trim().is_empty() {
            return Err(AppError::Config("security.jwt_secret must not be empty".into()));
        }
        if self.security.jwt_expiration_hours <= 0 {
            return Err(AppError::Config(
                "security.jwt_expiration_hours must be positive".into(),
            ));
        }
        if self.uploads.max_bytes == 0 {
            return Err(AppError::Config("uploads.max_bytes must be positive".into()));
        }
        if self.elections.vote_retry_attempts == 0 {
            return Err(AppError::Config(
                "elections.vote_retry_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.server.api_port, 8080);
        assert_eq!(config.elections.utc_offset, "+05:30");
        assert_eq!(config.database.connection_url(), "sqlite://./elections.db?mode=rwc");
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            api_port = 9090

            [elections]
            utc_offset = "-08:00"

            [database.pool]
            max_connections = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.server.api_port, 9090);
        assert_eq!(config.server.api_host, "0.0.0.0");
        assert_eq!(config.database.pool.max_connections, 2);
        assert_eq!(
            config.elections.zone().unwrap().offset().local_minus_utc(),
            -8 * 3600
        );
        assert_eq!(config.logging.format, "text");
    }

    #[test]
    fn explicit_url_wins_over_path() {
        let config = AppConfig::from_toml(
            r#"
            [database]
            url = "sqlite::memory:"
            path = "ignored.db"
            "#,
        )
        .unwrap();
        assert_eq!(config.database.connection_url(), "sqlite::memory:");
    }

    #[test]
    fn bad_offset_fails_validation() {
        let mut config = AppConfig::default();
        config.elections.utc_offset = "India".into();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        assert!(matches!(
            AppConfig::from_toml("[server\napi_port = 1"),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join(format!("missing-{}.toml", uuid::Uuid::new_v4()));
        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.admin.username, "admin");
    }
}
