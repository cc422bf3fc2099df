//! Application configuration
//!
//! Loaded from environment variables, with a `.env` file honoured when present.

use std::env;
use std::str::FromStr;

use serde::Deserialize;

const MIN_JWT_SECRET_LEN: usize = 32;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub snowflake: SnowflakeConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" | "dev" => Ok(Self::Development),
            _ => Err(()),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Apply pending migrations at startup
    pub run_migrations: bool,
}

/// Token lifetimes are in seconds
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry: i64,
    pub refresh_token_expiry: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst: u32,
}

/// An empty origin list allows any origin outside production
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    pub worker_id: u16,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let secret = vars.required("JWT_SECRET")?;
        if secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET",
                format!("must be at least {MIN_JWT_SECRET_LEN} characters"),
            ));
        }

        let env = match vars.get("APP_ENV") {
            Some(raw) => raw
                .parse()
                .map_err(|()| ConfigError::InvalidValue("APP_ENV", raw))?,
            None => Environment::default(),
        };

        Ok(Self {
            app: AppSettings {
                name: vars.get("APP_NAME").unwrap_or_else(|| "recipe-api".to_string()),
                env,
            },
            server: ServerConfig {
                host: vars.get("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
                port: vars.parsed("PORT", 8080)?,
                request_timeout_secs: vars.parsed("REQUEST_TIMEOUT_SECS", 30)?,
            },
            database: DatabaseConfig {
                url: vars.required("DATABASE_URL")?,
                max_connections: vars.parsed("DATABASE_MAX_CONNECTIONS", 20)?,
                min_connections: vars.parsed("DATABASE_MIN_CONNECTIONS", 2)?,
                run_migrations: vars.parsed("RUN_MIGRATIONS", true)?,
            },
            jwt: JwtConfig {
                secret,
                // 1 hour
                access_token_expiry: vars.parsed("JWT_ACCESS_TOKEN_EXPIRY", 3600)?,
                // 7 days
                refresh_token_expiry: vars.parsed("JWT_REFRESH_TOKEN_EXPIRY", 604_800)?,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: vars.parsed("RATE_LIMIT_REQUESTS_PER_SECOND", 10)?,
                burst: vars.parsed("RATE_LIMIT_BURST", 50)?,
            },
            cors: CorsConfig {
                allowed_origins: vars
                    .get("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|o| !o.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            snowflake: SnowflakeConfig {
                worker_id: vars.parsed("WORKER_ID", 0)?,
            },
        })
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::MissingVar(key))
    }

    fn parsed<T: FromStr>(&self, key: &'static str, default: T) -> Result<T, ConfigError> {
        match self.get(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key, raw)),
            None => Ok(default),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
