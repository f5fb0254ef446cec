// src/config.rs
use std::{env, time::Duration};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    database_url: String,
    listen_addr: String,
    session_secret: String,
    session_ttl: Duration,
    admin_password: Option<String>,
    super_admin_password: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_database_url() -> String {
    "sqlite://newsdesk.db?mode=rwc".into()
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".into()
}

fn default_session_ttl() -> u64 {
    8 * 3600
}

impl AppConfig {
    /// Build configuration from environment variables. Uses sensible
    /// defaults for optional values and validates required keys.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Allow dotenv files to populate env vars when present.
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| default_database_url());
        let listen_addr = env::var("LISTEN_ADDR").unwrap_or_else(|_| default_listen_addr());

        let session_secret =
            env::var("SESSION_SECRET").map_err(|_| ConfigError::Missing("SESSION_SECRET"))?;
        if session_secret.len() < 32 {
            return Err(ConfigError::Invalid(
                "SESSION_SECRET must be at least 32 bytes".into(),
            ));
        }

        let session_ttl_secs = env::var("SESSION_TTL_SECONDS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or_else(default_session_ttl);

        let admin_password = env::var("ADMIN_PASSWORD").ok();
        let super_admin_password = env::var("SUPER_ADMIN_PASSWORD").ok();

        Ok(Self {
            database_url,
            listen_addr,
            session_secret,
            session_ttl: Duration::from_secs(session_ttl_secs),
            admin_password,
            super_admin_password,
        })
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    pub fn session_secret(&self) -> &str {
        &self.session_secret
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    pub fn admin_password(&self) -> Option<&str> {
        self.admin_password.as_deref()
    }

    pub fn super_admin_password(&self) -> Option<&str> {
        self.super_admin_password.as_deref()
    }
}
