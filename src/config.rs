use std::{fmt::Display, str::FromStr};

use anyhow::{anyhow, Context};
use axum::http::HeaderValue;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://hostconnect.db?mode=rwc";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub session_inactivity: time::Duration,
    /// Enables `POST /session/dev`, which trusts the posted user id.
    pub dev_login: bool,
    /// Allowed browser origin; `None` leaves CORS off.
    pub cors_origin: Option<HeaderValue>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            bind_addr: DEFAULT_BIND_ADDR.to_owned(),
            db_max_connections: 16,
            session_inactivity: time::Duration::minutes(60),
            dev_login: false,
            cors_origin: None,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let cors_origin = match dotenv::var("CORS_ORIGIN") {
            Ok(origin) => Some(HeaderValue::from_str(&origin).with_context(|| {
                format!("CORS_ORIGIN {origin:?} is not a valid header value")
            })?),
            Err(_) => None,
        };

        Ok(Self {
            database_url: dotenv::var("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: dotenv::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            db_max_connections: var_or("DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            session_inactivity: time::Duration::minutes(var_or(
                "SESSION_INACTIVITY_MINUTES",
                defaults.session_inactivity.whole_minutes(),
            )?),
            dev_login: var_or("DEV_LOGIN", defaults.dev_login)?,
            cors_origin,
        })
    }
}

fn var_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match dotenv::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|err| anyhow!("{key} must be valid: {err}")),
        Err(_) => Ok(default),
    }
}
