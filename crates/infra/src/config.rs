//! Process configuration.
//!
//! Sources, lowest precedence first: built-in defaults, an optional
//! `config/vendorhub.{toml,yaml,json}` file, then `VENDORHUB_*` environment
//! variables (e.g. `VENDORHUB_JWT_SECRET`).

use chrono::Duration;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use tracing::debug;

pub use vendorhub_observability::LogFormat;

/// Signing secret used when none is configured. Startup warns when it is in use.
pub const DEV_JWT_SECRET: &str = "dev-secret";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_COOKIE: &str = "vendorhub.sid";
const DEFAULT_TOKEN_TTL_DAYS: i64 = vendorhub_auth::DEFAULT_TOKEN_TTL_DAYS;
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;
const DEFAULT_BCRYPT_COST: u32 = 10;
const DEFAULT_ADMIN_NAME: &str = "Administrator";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub bind_addr: String,
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    pub session_cookie: String,
    pub session_ttl_hours: i64,
    pub bcrypt_cost: u32,
    /// Selects the Postgres backend when the `postgres` feature is compiled in.
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub admin_email: Option<String>,
    #[serde(default)]
    pub admin_password: Option<String>,
    pub admin_name: String,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl_days: DEFAULT_TOKEN_TTL_DAYS,
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            database_url: None,
            admin_email: None,
            admin_password: None,
            admin_name: DEFAULT_ADMIN_NAME.to_string(),
            log_format: LogFormat::Json,
        }
    }
}

impl AppConfig {
    /// Load from the default file location and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Self::defaults()?
            .add_source(File::with_name("config/vendorhub").required(false))
            .add_source(Environment::with_prefix("VENDORHUB"));
        Self::build(builder)
    }

    /// Builder pre-populated with every default; callers layer sources on top.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("bind_addr", DEFAULT_BIND_ADDR)?
            .set_default("jwt_secret", DEV_JWT_SECRET)?
            .set_default("token_ttl_days", DEFAULT_TOKEN_TTL_DAYS)?
            .set_default("session_cookie", DEFAULT_SESSION_COOKIE)?
            .set_default("session_ttl_hours", DEFAULT_SESSION_TTL_HOURS)?
            .set_default("bcrypt_cost", i64::from(DEFAULT_BCRYPT_COST))?
            .set_default("admin_name", DEFAULT_ADMIN_NAME)?
            .set_default("log_format", "json")
    }

    pub fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.check()?;
        debug!(
            bind_addr = %config.bind_addr,
            log_format = ?config.log_format,
            persistent = config.database_url.is_some(),
            "configuration loaded"
        );
        Ok(config)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::Message("jwt_secret must not be empty".to_string()));
        }
        if self.token_ttl_days <= 0 {
            return Err(ConfigError::Message("token_ttl_days must be positive".to_string()));
        }
        if self.session_ttl_hours <= 0 {
            return Err(ConfigError::Message("session_ttl_hours must be positive".to_string()));
        }
        // bcrypt rejects costs outside 4..=31.
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::Message("bcrypt_cost must be between 4 and 31".to_string()));
        }
        Ok(())
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::days(self.token_ttl_days)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::hours(self.session_ttl_hours)
    }

    /// Admin seed credentials, if both halves are configured.
    pub fn admin_seed(&self) -> Option<(&str, &str)> {
        match (&self.admin_email, &self.admin_password) {
            (Some(email), Some(password)) => Some((email.as_str(), password.as_str())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn from_toml(toml: &str) -> Result<AppConfig, ConfigError> {
        let builder = AppConfig::defaults()?.add_source(File::from_str(toml, FileFormat::Toml));
        AppConfig::build(builder)
    }

    #[test]
    fn defaults_match_default_impl() {
        let loaded = AppConfig::build(AppConfig::defaults().unwrap()).unwrap();
        let expected = AppConfig::default();
        assert_eq!(loaded.bind_addr, expected.bind_addr);
        assert_eq!(loaded.token_ttl_days, 30);
        assert_eq!(loaded.session_cookie, "vendorhub.sid");
        assert_eq!(loaded.bcrypt_cost, 10);
        assert_eq!(loaded.log_format, LogFormat::Json);
        assert!(loaded.database_url.is_none());
        assert!(loaded.uses_dev_secret());
        assert!(loaded.admin_seed().is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let cfg = from_toml(
            r#"
            jwt_secret = "prod-secret"
            log_format = "pretty"
            session_ttl_hours = 2
            admin_email = "root@example.com"
            admin_password = "hunter22"
            "#,
        )
        .unwrap();

        assert!(!cfg.uses_dev_secret());
        assert_eq!(cfg.log_format, LogFormat::Pretty);
        assert_eq!(cfg.session_ttl(), Duration::hours(2));
        assert_eq!(cfg.admin_seed(), Some(("root@example.com", "hunter22")));
    }

    #[test]
    fn half_configured_admin_is_ignored() {
        let cfg = from_toml(r#"admin_email = "root@example.com""#).unwrap();
        assert!(cfg.admin_seed().is_none());
    }

    #[test]
    fn rejects_nonsense_values() {
        assert!(from_toml("token_ttl_days = 0").is_err());
        assert!(from_toml("bcrypt_cost = 99").is_err());
        assert!(from_toml(r#"jwt_secret = """#).is_err());
        assert!(from_toml(r#"log_format = "xml""#).is_err());
    }
}
