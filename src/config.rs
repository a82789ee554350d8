use anyhow::Context;
use std::{env, path::PathBuf, time::Duration};

use crate::{api::DEFAULT_API_URL, authoring::StaticLocator, token_store::TokenStore};

const DEFAULT_TOKEN_PATH: &str = ".quiztopia/token";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `QUIZTOPIA_API_URL`
    pub api_url: String,
    /// `QUIZTOPIA_TOKEN_PATH`
    pub token_path: PathBuf,
    /// `QUIZTOPIA_DEVICE_LOCATION`, a `lat,lng` pair
    pub device_location: Option<String>,
    /// `QUIZTOPIA_TIMEOUT_SECS`
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
            device_location: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Reads the process environment, after loading `.env` if there is one.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let set = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let timeout = match set("QUIZTOPIA_TIMEOUT_SECS") {
            Some(secs) => Duration::from_secs(
                secs.trim()
                    .parse()
                    .context(format!("QUIZTOPIA_TIMEOUT_SECS must be a whole number of seconds, got '{}'", secs))?,
            ),
            None => defaults.timeout,
        };

        Ok(Self {
            api_url: set("QUIZTOPIA_API_URL").unwrap_or(defaults.api_url),
            token_path: set("QUIZTOPIA_TOKEN_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.token_path),
            device_location: set("QUIZTOPIA_DEVICE_LOCATION"),
            timeout,
        })
    }

    pub fn token_store(&self) -> TokenStore {
        TokenStore::new(&self.token_path)
    }

    pub fn locator(&self) -> StaticLocator {
        StaticLocator::new(self.device_location.clone())
    }
}
