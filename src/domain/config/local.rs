use std::{fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::config::error::ConfigError;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_STORAGE_ROOT: &str = "./storage";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    #[default]
    #[serde(rename = "local")]
    Local,
    #[serde(rename = "supabase")]
    Supabase,
    #[serde(rename = "s3")]
    S3,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Local => "local",
            Provider::Supabase => "supabase",
            Provider::S3 => "s3",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Provider::Local),
            "supabase" => Ok(Provider::Supabase),
            "s3" => Ok(Provider::S3),
            other => Err(ConfigError::InvalidValue {
                name: "STORAGE_PROVIDER",
                reason: format!("unknown provider '{}'", other),
            }),
        }
    }
}

/// Per-instance settings read from the environment at startup.
#[derive(Debug, Clone)]
pub struct LocalConfig {
    pub server_id: String,
    pub port: u16,
    pub provider: Provider,
    pub storage_root: PathBuf,
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl LocalConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_id = lookup("SERVER_ID")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVar("SERVER_ID"))?;

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                name: "PORT",
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let provider = match lookup("STORAGE_PROVIDER") {
            Some(raw) => raw.parse()?,
            None => Provider::default(),
        };

        let storage_root = lookup("STORAGE_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_ROOT));

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        Ok(LocalConfig {
            server_id,
            port,
            provider,
            storage_root,
            cors_allowed_origins,
        })
    }
}
