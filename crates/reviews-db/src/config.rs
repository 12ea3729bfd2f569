//! Database connection configuration loaded from the environment.
//!
//! `DATABASE_URL` wins when set. Otherwise the connection is assembled from
//! the individual `DB_*` variables:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DB_HOST` | `localhost` |
//! | `DB_PORT` | `5432` |
//! | `DB_USER` | `postgres` |
//! | `DB_PASSWORD` | (none) |
//! | `DB_NAME` | `reviews` |
//! | `DB_MAX_CONNECTIONS` | `10` |
//! | `DB_ACQUIRE_TIMEOUT_SECS` | `30` |

use std::time::Duration;

use sqlx::postgres::PgConnectOptions;

use reviews_core::{Error, Result};

use crate::pool::{PoolConfig, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MAX_CONNECTIONS};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_USER: &str = "postgres";
pub const DEFAULT_NAME: &str = "reviews";

/// Where and how to connect to the review store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// Full connection URL; overrides the individual fields when present.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub database: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            user: DEFAULT_USER.to_string(),
            password: None,
            database: DEFAULT_NAME.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl DbConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("DB_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| Error::Config(format!("DB_PORT must be a port number, got '{}'", raw)))?,
            None => defaults.port,
        };

        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(Error::Config(format!(
                        "DB_MAX_CONNECTIONS must be a positive integer, got '{}'",
                        raw
                    )))
                }
            },
            None => defaults.max_connections,
        };

        let acquire_timeout = match get("DB_ACQUIRE_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map(Duration::from_secs).map_err(|_| {
                Error::Config(format!(
                    "DB_ACQUIRE_TIMEOUT_SECS must be a number of seconds, got '{}'",
                    raw
                ))
            })?,
            None => defaults.acquire_timeout,
        };

        Ok(Self {
            url: get("DATABASE_URL"),
            host: get("DB_HOST").unwrap_or(defaults.host),
            port,
            user: get("DB_USER").unwrap_or(defaults.user),
            password: get("DB_PASSWORD"),
            database: get("DB_NAME").unwrap_or(defaults.database),
            max_connections,
            acquire_timeout,
        })
    }

    /// Connection options for sqlx.
    pub fn connect_options(&self) -> Result<PgConnectOptions> {
        if let Some(url) = &self.url {
            return url.parse::<PgConnectOptions>().map_err(|e| {
                Error::Config(format!("DATABASE_URL is not a valid connection string: {}", e))
            });
        }

        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database);
        if let Some(password) = &self.password {
            options = options.password(password);
        }
        Ok(options)
    }

    /// Pool settings derived from this configuration.
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::default()
            .max_connections(self.max_connections)
            .connect_timeout(self.acquire_timeout)
    }

    /// Human-readable target for logs; never includes the password.
    pub fn display_target(&self) -> String {
        match &self.url {
            Some(_) => "DATABASE_URL".to_string(),
            None => format!("{}@{}:{}/{}", self.user, self.host, self.port, self.database),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = DbConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, DbConfig::default());
        assert_eq!(config.display_target(), "postgres@localhost:5432/reviews");
    }

    #[test]
    fn test_reads_db_variables() {
        let config = DbConfig::from_lookup(lookup(&[
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "6543"),
            ("DB_USER", "reviewer"),
            ("DB_NAME", "sdc"),
            ("DB_PASSWORD", "hunter2"),
            ("DB_MAX_CONNECTIONS", "25"),
        ]))
        .unwrap();

        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, 6543);
        assert_eq!(config.user, "reviewer");
        assert_eq!(config.database, "sdc");
        assert_eq!(config.password.as_deref(), Some("hunter2"));
        assert_eq!(config.max_connections, 25);
        assert!(!config.display_target().contains("hunter2"));
        assert!(config.connect_options().is_ok());
    }

    #[test]
    fn test_empty_values_fall_back_to_defaults() {
        let config = DbConfig::from_lookup(lookup(&[("DB_HOST", "  "), ("DB_PORT", "")])).unwrap();
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let err = DbConfig::from_lookup(lookup(&[("DB_PORT", "five")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("DB_PORT"));
    }

    #[test]
    fn test_zero_max_connections_rejected() {
        let err = DbConfig::from_lookup(lookup(&[("DB_MAX_CONNECTIONS", "0")])).unwrap_err();
        assert!(err.to_string().contains("DB_MAX_CONNECTIONS"));
    }

    #[test]
    fn test_database_url_overrides() {
        let config = DbConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://u:p@example.com:5433/other"),
            ("DB_HOST", "ignored"),
        ]))
        .unwrap();
        assert_eq!(config.display_target(), "DATABASE_URL");
        assert!(config.connect_options().is_ok());
    }

    #[test]
    fn test_invalid_database_url() {
        let config = DbConfig {
            url: Some("not a connection url".to_string()),
            ..Default::default()
        };
        assert!(matches!(config.connect_options(), Err(Error::Config(_))));
    }

    #[test]
    fn test_pool_config_follows_settings() {
        let config = DbConfig {
            max_connections: 3,
            acquire_timeout: Duration::from_secs(2),
            ..Default::default()
        };
        let pool = config.pool_config();
        assert_eq!(pool.max_connections, 3);
        assert_eq!(pool.connect_timeout, Duration::from_secs(2));
    }
}
