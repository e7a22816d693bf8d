use anyhow::{bail, Result};
use std::env;

use super::parse_or;

const DEV_JWT_SECRET: &str = "dev-secret-change-in-production";
const MAX_JWT_EXPIRES_IN_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub log_level: String,
    pub jwt_secret: String,
    pub jwt_expires_in_hours: i64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", 4000u16)?;
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        let jwt_expires_in_hours = parse_or(&lookup, "JWT_EXPIRES_IN_HOURS", 72i64)?;

        if !(1..=MAX_JWT_EXPIRES_IN_HOURS).contains(&jwt_expires_in_hours) {
            bail!(
                "JWT_EXPIRES_IN_HOURS must be between 1 and {MAX_JWT_EXPIRES_IN_HOURS}, got {jwt_expires_in_hours}"
            );
        }

        let jwt_secret = match lookup("JWT_SECRET").filter(|secret| !secret.is_empty()) {
            Some(secret) => secret,
            None if environment == "production" => {
                bail!("JWT_SECRET must be set in production");
            }
            None => DEV_JWT_SECRET.to_string(),
        };

        Ok(AppConfig {
            host,
            port,
            environment,
            log_level,
            jwt_secret,
            jwt_expires_in_hours,
        })
    }

    /// True when no `JWT_SECRET` was supplied and the built-in one is in use.
    pub fn uses_development_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.server_address(), "0.0.0.0:4000");
        assert_eq!(config.jwt_expires_in_hours, 72);
        assert!(config.uses_development_secret());
        assert_eq!(config.environment, "development");
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_EXPIRES_IN_HOURS", "1"),
        ]))
        .unwrap();

        assert_eq!(config.server_address(), "127.0.0.1:8080");
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.jwt_expires_in_hours, 1);
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        assert!(AppConfig::from_lookup(lookup_from(&[("PORT", "not-a-port")])).is_err());
    }

    #[test]
    fn test_out_of_range_expiry_is_an_error() {
        assert!(AppConfig::from_lookup(lookup_from(&[("JWT_EXPIRES_IN_HOURS", "0")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[(
            "JWT_EXPIRES_IN_HOURS",
            "9223372036854775807"
        )]))
        .is_err());

        let config =
            AppConfig::from_lookup(lookup_from(&[("JWT_EXPIRES_IN_HOURS", "8760")])).unwrap();
        assert_eq!(config.jwt_expires_in_hours, 8760);
    }

    #[test]
    fn test_production_requires_secret() {
        let result = AppConfig::from_lookup(lookup_from(&[("ENVIRONMENT", "production")]));
        assert!(result.is_err());

        let config = AppConfig::from_lookup(lookup_from(&[
            ("ENVIRONMENT", "production"),
            ("JWT_SECRET", "prod-secret"),
        ]))
        .unwrap();
        assert!(!config.uses_development_secret());
    }
}
