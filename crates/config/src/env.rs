use std::env;
use std::fmt;
use std::str::FromStr;

use catalog_common::error::{CatalogError, CatalogResult};
use serde::Deserialize;

#[derive(Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub jwt_secret: String,
    pub jwt_expires_in_secs: u64,
    pub sync_scheduler_enabled: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    /// Loads `.env` file if present, then reads required vars.
    pub fn from_env() -> CatalogResult<Self> {
        // Best-effort .env load; ignore if missing
        let _ = dotenvy::dotenv();

        Ok(Self {
            database_url: get_var("DATABASE_URL")?,
            host: get_var_or("HOST", "0.0.0.0"),
            port: get_var_or("PORT", "3000")
                .parse()
                .map_err(|e| CatalogError::Config(format!("invalid PORT: {e}")))?,
            log_level: get_var_or("LOG_LEVEL", "info"),
            jwt_secret: get_var("JWT_SECRET")?,
            jwt_expires_in_secs: get_var_or("JWT_EXPIRES_IN_SECS", "3600")
                .parse()
                .map_err(|e| CatalogError::Config(format!("invalid JWT_EXPIRES_IN_SECS: {e}")))?,
            sync_scheduler_enabled: env_flag("SYNC_SCHEDULER_ENABLED", true),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expires_in_secs", &self.jwt_expires_in_secs)
            .field("sync_scheduler_enabled", &self.sync_scheduler_enabled)
            .finish()
    }
}

fn get_var(key: &str) -> CatalogResult<String> {
    env::var(key).map_err(|_| CatalogError::Config(format!("{key} is required but not set")))
}

fn get_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an optional env var, falling back to `default` when unset or malformed.
pub fn env_parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Boolean env var: `1`/`true`/`yes`/`on` are true, `0`/`false`/`no`/`off` false.
pub fn env_flag(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn config_from_env_succeeds_with_required_vars() {
        let _guard = ENV_LOCK.lock().expect("env lock poisoned");

        env::set_var("DATABASE_URL", "postgres://localhost/catalog_test");
        env::set_var("JWT_SECRET", "test-secret");
        env::remove_var("PORT");
        env::remove_var("SYNC_SCHEDULER_ENABLED");

        let cfg = AppConfig::from_env().expect("should parse config");
        assert_eq!(cfg.database_url, "postgres://localhost/catalog_test");
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.jwt_expires_in_secs, 3600);
        assert!(cfg.sync_scheduler_enabled);

        env::remove_var("DATABASE_URL");
        env::remove_var("JWT_SECRET");
    }

    #[test]
    fn config_from_env_fails_without_jwt_secret() {
        let _guard = ENV_LOCK.lock().expect("env lock poisoned");

        env::set_var("DATABASE_URL", "postgres://localhost/catalog_test");
        env::remove_var("JWT_SECRET");
        let err = AppConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"), "got: {err}");
        env::remove_var("DATABASE_URL");
    }

    #[test]
    fn config_from_env_rejects_bad_port() {
        let _guard = ENV_LOCK.lock().expect("env lock poisoned");

        env::set_var("DATABASE_URL", "postgres://localhost/catalog_test");
        env::set_var("JWT_SECRET", "s");
        env::set_var("PORT", "not-a-port");
        let err = AppConfig::from_env().unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
        env::remove_var("PORT");
        env::remove_var("DATABASE_URL");
        env::remove_var("JWT_SECRET");
    }

    #[test]
    fn bind_addr_formats_correctly() {
        let cfg = AppConfig {
            database_url: String::new(),
            host: "127.0.0.1".to_owned(),
            port: 3000,
            log_level: "debug".to_owned(),
            jwt_secret: "s".to_owned(),
            jwt_expires_in_secs: 60,
            sync_scheduler_enabled: false,
        };
        assert_eq!(cfg.bind_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn debug_output_hides_secrets() {
        let cfg = AppConfig {
            database_url: "postgres://user:pw@db/catalog".to_owned(),
            host: "0.0.0.0".to_owned(),
            port: 3000,
            log_level: "info".to_owned(),
            jwt_secret: "super-secret".to_owned(),
            jwt_expires_in_secs: 60,
            sync_scheduler_enabled: true,
        };
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("pw@db"));
    }

    #[test]
    fn env_flag_parses_common_spellings() {
        let _guard = ENV_LOCK.lock().expect("env lock poisoned");

        env::set_var("_TEST_FLAG", "off");
        assert!(!env_flag("_TEST_FLAG", true));
        env::set_var("_TEST_FLAG", "Yes");
        assert!(env_flag("_TEST_FLAG", false));
        env::set_var("_TEST_FLAG", "maybe");
        assert!(env_flag("_TEST_FLAG", true));
        env::remove_var("_TEST_FLAG");
        assert!(!env_flag("_TEST_FLAG", false));
    }

    #[test]
    fn env_parse_or_falls_back_on_garbage() {
        let _guard = ENV_LOCK.lock().expect("env lock poisoned");

        env::set_var("_TEST_NUM", "25");
        assert_eq!(env_parse_or("_TEST_NUM", 10u32), 25);
        env::set_var("_TEST_NUM", "lots");
        assert_eq!(env_parse_or("_TEST_NUM", 10u32), 10);
        env::remove_var("_TEST_NUM");
    }
}
