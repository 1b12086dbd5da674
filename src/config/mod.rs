use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Errors raised while assembling configuration from the environment
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub jwt: JwtConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string. Only required when running against PostgreSQL.
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
}

/// Signing material and claim values for bearer tokens
#[derive(Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub key: String,
    pub issuer: String,
    pub audience: String,
    pub expiry_secs: i64,
}

// Keep the signing key out of debug output.
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("key", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("expiry_secs", &self.expiry_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

/// Minimum HS256 key length accepted outside development
pub const MIN_JWT_KEY_BYTES: usize = 32;

/// Token lifetime used when JWT_EXPIRY_SECS is not set
pub const DEFAULT_JWT_EXPIRY_SECS: i64 = 3600;

impl AppConfig {
    /// Build configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(&lookup)?;

        config.validate()?;
        Ok(config)
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Database overrides
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse("DATABASE_MAX_CONNECTIONS", &v)?;
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = parse("DATABASE_CONNECTION_TIMEOUT", &v)?;
        }

        // API overrides
        if let Some(v) = lookup("API_PORT").or_else(|| lookup("PORT")) {
            self.api.port = parse("API_PORT", &v)?;
        }

        // JWT overrides
        if let Some(v) = lookup("JWT_KEY") {
            self.jwt.key = v;
        }
        if let Some(v) = lookup("JWT_ISSUER") {
            self.jwt.issuer = v;
        }
        if let Some(v) = lookup("JWT_AUDIENCE") {
            self.jwt.audience = v;
        }
        if let Some(v) = lookup("JWT_EXPIRY_SECS") {
            self.jwt.expiry_secs = parse("JWT_EXPIRY_SECS", &v)?;
        }

        // Security overrides
        if let Some(v) = lookup("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = parse("SECURITY_ENABLE_CORS", &v)?;
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.key.is_empty() {
            return Err(ConfigError::Missing("JWT_KEY"));
        }
        if self.environment != Environment::Development
            && self.jwt.key.len() < MIN_JWT_KEY_BYTES
        {
            return Err(ConfigError::Invalid {
                key: "JWT_KEY",
                reason: format!("must be at least {} bytes", MIN_JWT_KEY_BYTES),
            });
        }
        if self.jwt.expiry_secs <= 0 {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRY_SECS",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Connection string for the PostgreSQL store
    pub fn database_url(&self) -> Result<&str, ConfigError> {
        self.database
            .url
            .as_deref()
            .ok_or(ConfigError::Missing("DATABASE_URL"))
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig { port: 3000 },
            jwt: JwtConfig {
                key: String::new(),
                issuer: "thomas-crud".to_string(),
                audience: "thomas-crud".to_string(),
                expiry_secs: DEFAULT_JWT_EXPIRY_SECS,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            api: ApiConfig { port: 8080 },
            jwt: JwtConfig {
                key: String::new(),
                issuer: "thomas-crud".to_string(),
                audience: "thomas-crud".to_string(),
                expiry_secs: DEFAULT_JWT_EXPIRY_SECS,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            api: ApiConfig { port: 8080 },
            jwt: JwtConfig {
                key: String::new(),
                issuer: "thomas-crud".to_string(),
                audience: "thomas-crud".to_string(),
                expiry_secs: DEFAULT_JWT_EXPIRY_SECS,
            },
            security: SecurityConfig {
                enable_cors: false,
                cors_origins: Vec::new(),
            },
        }
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
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
    fn test_default_development_config() {
        let config = AppConfig::from_lookup(lookup_from(&[("JWT_KEY", "dev")])).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.jwt.expiry_secs, 3600);
        assert_eq!(config.api.port, 3000);
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_missing_jwt_key_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_KEY")));
    }

    #[test]
    fn test_short_key_rejected_in_production() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("APP_ENV", "production"),
            ("JWT_KEY", "too-short"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "JWT_KEY", .. }));
    }

    #[test]
    fn test_overrides_applied() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("JWT_KEY", "k"),
            ("JWT_ISSUER", "issuer-a"),
            ("JWT_AUDIENCE", "audience-b"),
            ("PORT", "4100"),
            ("DATABASE_URL", "postgres://localhost/thomas"),
            ("SECURITY_CORS_ORIGINS", "https://a.test, https://b.test"),
        ]))
        .unwrap();
        assert_eq!(config.jwt.issuer, "issuer-a");
        assert_eq!(config.jwt.audience, "audience-b");
        assert_eq!(config.api.port, 4100);
        assert_eq!(config.database_url().unwrap(), "postgres://localhost/thomas");
        assert_eq!(config.security.cors_origins, vec!["https://a.test", "https://b.test"]);
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("JWT_KEY", "k"),
            ("DATABASE_MAX_CONNECTIONS", "lots"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "DATABASE_MAX_CONNECTIONS", .. }));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = AppConfig::from_lookup(lookup_from(&[("JWT_KEY", "super-secret")])).unwrap();
        let rendered = format!("{:?}", config.jwt);
        assert!(!rendered.contains("super-secret"));
    }
}
