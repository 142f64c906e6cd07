//! Process configuration, read once at startup.
//!
//! # Environment Variables
//! - `INTAKE_DATABASE_PATH`: SQLite file (default: "clinic_intake.db", ":memory:" for in-memory)
//! - `INTAKE_REST_ADDR`: listen address (default: "0.0.0.0:3000")
//! - `INTAKE_JWT_SECRET`: HS256 secret shared with the login service (required)
//! - `INTAKE_TOKEN_TTL_HOURS`: lifetime of issued tokens (default: 24)
//! - `INTAKE_UNKNOWN_TEMPLATE`: "degrade" (default) or "reject"

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clinic_intake_core::{CoreConfig, UnknownTemplatePolicy};

pub const DEFAULT_DATABASE_PATH: &str = "clinic_intake.db";
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub rest_addr: SocketAddr,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub core: CoreConfig,
}

impl AppConfig {
    /// Resolve configuration from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let rest_addr: SocketAddr = lookup("INTAKE_REST_ADDR")
            .unwrap_or_else(|| DEFAULT_REST_ADDR.into())
            .parse()
            .context("INTAKE_REST_ADDR is not a valid socket address")?;

        let jwt_secret = lookup("INTAKE_JWT_SECRET").unwrap_or_default();
        if jwt_secret.trim().is_empty() {
            bail!("INTAKE_JWT_SECRET must be set");
        }

        let token_ttl_hours = match lookup("INTAKE_TOKEN_TTL_HOURS") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .context("INTAKE_TOKEN_TTL_HOURS must be an integer")?,
            None => DEFAULT_TOKEN_TTL_HOURS,
        };
        if token_ttl_hours <= 0 {
            bail!("INTAKE_TOKEN_TTL_HOURS must be positive");
        }

        let policy = match lookup("INTAKE_UNKNOWN_TEMPLATE") {
            Some(raw) => raw
                .parse::<UnknownTemplatePolicy>()
                .map_err(anyhow::Error::msg)?,
            None => UnknownTemplatePolicy::default(),
        };

        let database_path =
            PathBuf::from(lookup("INTAKE_DATABASE_PATH").unwrap_or_else(|| DEFAULT_DATABASE_PATH.into()));
        let core = CoreConfig::new(database_path, policy)?;

        Ok(Self {
            rest_addr,
            jwt_secret,
            token_ttl_hours,
            core,
        })
    }
}
