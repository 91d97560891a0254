use crate::domain::entities::LockPolicy;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub lock_ttl_ms: u64,
    pub lock_max_attempts: u32,
    pub lock_retry_delay_ms: u64,
    pub lease_renew_ratio: f64,
    pub lease_renew_margin_ms: u64,
    pub sale_window_hours: i64,
    pub catalog_base_url: String,
    pub catalog_timeout_ms: u64,
    pub otel_exporter_endpoint: Option<String>,
    pub service_name: String,
    pub metrics_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .unwrap_or_else(|| "sqlite://seckill.db?mode=rwc".to_string());

        let server_host = lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let server_port = lookup("SERVER_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let lock_ttl_ms = parse_or(&lookup, "LOCK_TTL_MS", 5_000)?;
        let lock_max_attempts = parse_or(&lookup, "LOCK_MAX_ATTEMPTS", 5)?;
        let lock_retry_delay_ms = parse_or(&lookup, "LOCK_RETRY_DELAY_MS", 10)?;
        let lease_renew_margin_ms = parse_or(&lookup, "LEASE_RENEW_MARGIN_MS", 2_000)?;
        let sale_window_hours = parse_or(&lookup, "SALE_WINDOW_HOURS", 2)?;
        let catalog_timeout_ms = parse_or(&lookup, "CATALOG_TIMEOUT_MS", 3_000)?;

        let lease_renew_ratio: f64 = parse_or(&lookup, "LEASE_RENEW_RATIO", 0.8)?;
        if !(lease_renew_ratio > 0.0 && lease_renew_ratio < 1.0) {
            return Err(ConfigError::InvalidRenewRatio(lease_renew_ratio));
        }

        if lock_ttl_ms == 0 {
            return Err(ConfigError::InvalidNumber("LOCK_TTL_MS"));
        }
        if lock_max_attempts == 0 {
            return Err(ConfigError::InvalidNumber("LOCK_MAX_ATTEMPTS"));
        }

        let catalog_base_url =
            lookup("CATALOG_BASE_URL").unwrap_or_else(|| "http://127.0.0.1:8081".to_string());

        let otel_exporter_endpoint = lookup("OTEL_EXPORTER_OTLP_ENDPOINT");

        let service_name = lookup("SERVICE_NAME").unwrap_or_else(|| "seckill".to_string());

        let metrics_port = parse_or(&lookup, "METRICS_PORT", 9000)?;

        Ok(Config {
            database_url,
            server_host,
            server_port,
            lock_ttl_ms,
            lock_max_attempts,
            lock_retry_delay_ms,
            lease_renew_ratio,
            lease_renew_margin_ms,
            sale_window_hours,
            catalog_base_url,
            catalog_timeout_ms,
            otel_exporter_endpoint,
            service_name,
            metrics_port,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn lock_ttl(&self) -> Duration {
        Duration::from_millis(self.lock_ttl_ms)
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_millis(self.catalog_timeout_ms)
    }

    pub fn lock_policy(&self) -> LockPolicy {
        LockPolicy {
            max_attempts: self.lock_max_attempts,
            retry_delay: Duration::from_millis(self.lock_retry_delay_ms),
            renew_ratio: self.lease_renew_ratio,
            renew_margin: Duration::from_millis(self.lease_renew_margin_ms),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber(key)),
        None => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("{0} must be a positive number")]
    InvalidNumber(&'static str),

    #[error("LEASE_RENEW_RATIO must be between 0 and 1 exclusive, got {0}")]
    InvalidRenewRatio(f64),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.server_address(), "127.0.0.1:8080");
        assert_eq!(config.lock_ttl(), Duration::from_secs(5));
        assert_eq!(config.sale_window_hours, 2);

        let policy = config.lock_policy();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.retry_delay, Duration::from_millis(10));
        assert_eq!(policy.renew_margin, Duration::from_secs(2));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("LOCK_TTL_MS", "30000"),
            ("LEASE_RENEW_RATIO", "0.5"),
            ("SERVER_PORT", "9090"),
        ])
        .unwrap();

        assert_eq!(config.lock_ttl(), Duration::from_secs(30));
        assert_eq!(config.lock_policy().renew_ratio, 0.5);
        assert_eq!(config.server_port, 9090);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            config_from(&[("SERVER_PORT", "http")]),
            Err(ConfigError::InvalidPort)
        ));
        assert!(matches!(
            config_from(&[("LOCK_TTL_MS", "-1")]),
            Err(ConfigError::InvalidNumber("LOCK_TTL_MS"))
        ));
        assert!(matches!(
            config_from(&[("LOCK_MAX_ATTEMPTS", "0")]),
            Err(ConfigError::InvalidNumber("LOCK_MAX_ATTEMPTS"))
        ));
        assert!(matches!(
            config_from(&[("LEASE_RENEW_RATIO", "1.0")]),
            Err(ConfigError::InvalidRenewRatio(_))
        ));
        assert!(matches!(
            config_from(&[("METRICS_PORT", "x")]),
            Err(ConfigError::InvalidNumber("METRICS_PORT"))
        ));
    }
}
