//! Server configuration loaded from the environment.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `3000` |
//! | `ALLOWED_ORIGINS` | `http://localhost:3000` (comma-separated) |
//! | `BODY_LIMIT_BYTES` | `1048576` |
//!
//! Database settings live in [`reviews_db::DbConfig`].

use std::net::SocketAddr;

use axum::http::HeaderValue;
use reviews_core::{Error, Result};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// HTTP listener and middleware settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS.
    pub allowed_origins: Vec<HeaderValue>,
    /// Largest accepted request body.
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            allowed_origins: parse_allowed_origins(DEFAULT_ALLOWED_ORIGINS),
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

impl ServerConfig {
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

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| Error::Config(format!("PORT must be a port number, got '{}'", raw)))?,
            None => defaults.port,
        };

        let body_limit_bytes = match get("BODY_LIMIT_BYTES") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                Error::Config(format!("BODY_LIMIT_BYTES must be a byte count, got '{}'", raw))
            })?,
            None => defaults.body_limit_bytes,
        };

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            allowed_origins: get("ALLOWED_ORIGINS")
                .map(|raw| parse_allowed_origins(&raw))
                .unwrap_or(defaults.allowed_origins),
            body_limit_bytes,
        })
    }

    /// Socket address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("invalid listen address: {}", e)))
    }
}

/// Parse a comma-separated origin list, skipping entries that are not valid
/// header values.
pub fn parse_allowed_origins(raw: &str) -> Vec<HeaderValue> {
    raw.split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(vars: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.allowed_origins, vec![HeaderValue::from_static("http://localhost:3000")]);
        assert_eq!(config.socket_addr().unwrap().port(), 3000);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("ALLOWED_ORIGINS", "https://shop.example, http://localhost:5173"),
            ("BODY_LIMIT_BYTES", "2048"),
        ]))
        .unwrap();
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8080");
        assert_eq!(config.allowed_origins.len(), 2);
        assert_eq!(config.body_limit_bytes, 2048);
    }

    #[test]
    fn test_invalid_port() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_invalid_host_rejected_at_bind_time() {
        let config = ServerConfig::from_lookup(lookup(&[("HOST", "not a host")])).unwrap();
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn test_parse_allowed_origins_skips_blanks_and_invalid() {
        let origins = parse_allowed_origins("https://a.example, ,bad\norigin,https://b.example");
        assert_eq!(
            origins,
            vec![
                HeaderValue::from_static("https://a.example"),
                HeaderValue::from_static("https://b.example"),
            ]
        );
    }
}
