//! Process configuration, read once from the environment at startup.

use crate::pipeline::{ImportSettings, DEFAULT_BATCH_SIZE};
use log::info;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_SQLITE_PATH: &str = "crm.sqlite";
const DOTENV_PATH: &str = ".env";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has an invalid value '{value}': {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("SUPABASE_URL and SUPABASE_SERVICE_KEY must be set together")]
    IncompleteSupabase,

    #[error("Could not read {path}: {reason}")]
    DotEnv { path: String, reason: String },
}

/// Where contacts live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatastoreConfig {
    Sqlite { path: PathBuf },
    Postgrest { url: String, service_key: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub datastore: DatastoreConfig,
    pub import: ImportSettings,
    pub open_browser: bool,
}

impl AppConfig {
    /// Reads the process environment. Variables it lacks are taken from a
    /// `.env` file in the working directory, when one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        let dotenv = read_dotenv(Path::new(DOTENV_PATH))?;
        if !dotenv.is_empty() {
            info!("Loaded {} variables from {}", dotenv.len(), DOTENV_PATH);
        }
        Self::from_lookup(|name| std::env::var(name).ok().or_else(|| dotenv.get(name).cloned()))
    }

    /// Builds the configuration from any variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let datastore = match (var("SUPABASE_URL"), var("SUPABASE_SERVICE_KEY")) {
            (Some(url), Some(service_key)) => DatastoreConfig::Postgrest { url, service_key },
            (None, None) => DatastoreConfig::Sqlite {
                path: var("CRM_SQLITE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_SQLITE_PATH)),
            },
            _ => return Err(ConfigError::IncompleteSupabase),
        };

        let batch_size = match var("CRM_IMPORT_BATCH_SIZE") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "CRM_IMPORT_BATCH_SIZE",
                        value: raw,
                        reason: "expected a positive integer".to_string(),
                    })
                }
            },
            None => DEFAULT_BATCH_SIZE,
        };

        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidValue {
                    name: "PORT",
                    value: raw.clone(),
                    reason: e.to_string(),
                })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            datastore,
            import: ImportSettings {
                batch_size,
                strict_dates: parse_flag("CRM_STRICT_DATES", var("CRM_STRICT_DATES"), true)?,
            },
            open_browser: parse_flag("CRM_OPEN_BROWSER", var("CRM_OPEN_BROWSER"), false)?,
        })
    }
}

/// Variables declared in a dotenv file. A missing file declares none.
pub fn read_dotenv(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let failure = |e: dotenvy::Error| ConfigError::DotEnv {
        path: path.display().to_string(),
        reason: e.to_string(),
    };
    match dotenvy::from_path_iter(path) {
        Ok(items) => items.map(|item| item.map_err(failure)).collect(),
        Err(e) if e.not_found() => Ok(HashMap::new()),
        Err(e) => Err(failure(e)),
    }
}

fn parse_flag(name: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            value: raw,
            reason: "expected true or false".to_string(),
        }),
    }
}

/// Reports whether a secret is present without printing it.
pub fn presence(value: Option<&str>) -> &'static str {
    match value {
        Some(v) if !v.is_empty() => "Set",
        _ => "Not set",
    }
}
