//! Configuration for Board Service
//!
//! Loads settings from:
//! 1. Environment variables
//! 2. .env file (local development)

use anyhow::{Context, Result};
use identity_client::{AuthConfig, MembershipConfig};
use notification_dispatch::NotificationConfig;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub membership: MembershipConfig,
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let port = match env::var("APP_PORT") {
            Ok(p) => p
                .parse()
                .with_context(|| format!("APP_PORT is not a valid port: {}", p))?,
            Err(_) => 8080,
        };

        Ok(Self {
            server: ServerConfig {
                host: env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port,
            },
            auth: AuthConfig::from_env()?,
            membership: MembershipConfig::from_env()?,
            notifications: NotificationConfig::from_env()?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
