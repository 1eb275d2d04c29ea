use crate::domain::user::SentinelIdentity;
use anyhow::{Context, Result};
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    pub cors_origin: String,
    pub identity: SentinelIdentity,
}

impl Config {
    /// Reads configuration from the process environment, after loading `.env`
    /// if one exists.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = SentinelIdentity::default();
        Ok(Self {
            host: load(&lookup, "HOST", "127.0.0.1".to_string())?,
            port: load(&lookup, "PORT", 8080)?,
            database_url: load(&lookup, "DATABASE_URL", "sqlite://study_coach.db".to_string())?,
            max_connections: load(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            cors_origin: load(&lookup, "CORS_ORIGIN", "http://localhost:5173".to_string())?,
            identity: SentinelIdentity {
                email: load(&lookup, "DEFAULT_USER_EMAIL", defaults.email)?,
                name: load(&lookup, "DEFAULT_USER_NAME", defaults.name)?,
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn load<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: '{}'", key, raw)),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
