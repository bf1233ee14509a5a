//! Base configuration shared by the sales back-office services.
//!
//! Values come from an optional `configuration` file overlaid with
//! `APP__`-prefixed environment variables; services flatten this struct
//! into their own config types.

use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

/// Settings every service carries regardless of domain.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// HTTP listen port.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Config {
    /// Load from the `configuration` file (if present) and `APP__`
    /// environment variables.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
