//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_PAYMENT_METHOD, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    MIN_JWT_SECRET_LENGTH,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    /// Redis is only used for rate limiting; `None` disables it.
    pub redis_url: Option<String>,
    jwt_secret: String,
    pub server_host: String,
    pub server_port: u16,
    pub default_payment_method: String,
    /// Reject backwards order status moves (e.g. DELIVERED -> PAID).
    pub strict_order_lifecycle: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &self.redis_url.as_ref().map(|_| "[REDACTED]"))
            .field("jwt_secret", &"[REDACTED]")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("default_payment_method", &self.default_payment_method)
            .field("strict_order_lifecycle", &self.strict_order_lifecycle)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short (security requirement).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            jwt_secret,
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            default_payment_method: env::var("DEFAULT_PAYMENT_METHOD")
                .ok()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
            strict_order_lifecycle: env::var("STRICT_ORDER_LIFECYCLE")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }

    /// Build a configuration directly (tests, embedding).
    pub fn new(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            redis_url: None,
            jwt_secret: jwt_secret.into(),
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            default_payment_method: DEFAULT_PAYMENT_METHOD.to_string(),
            strict_order_lifecycle: false,
        }
    }

    /// Get JWT secret bytes for token verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Bind address, with CLI overrides taking precedence.
    pub fn server_addr(&self, host: Option<String>, port: Option<u16>) -> String {
        format!(
            "{}:{}",
            host.unwrap_or_else(|| self.server_host.clone()),
            port.unwrap_or(self.server_port)
        )
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" ON "));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::new("postgres://user:pass@db/shop", "x".repeat(40));
        let debug = format!("{:?}", config);
        assert!(!debug.contains("pass@db"));
        assert!(!debug.contains(&"x".repeat(40)));
        assert!(debug.contains("MockPay"));
    }

    #[test]
    fn test_server_addr_overrides() {
        let config = Config::new("sqlite::memory:", "x".repeat(40));
        assert_eq!(config.server_addr(None, None), "0.0.0.0:3000");
        assert_eq!(
            config.server_addr(Some("127.0.0.1".to_string()), Some(8080)),
            "127.0.0.1:8080"
        );
    }
}
