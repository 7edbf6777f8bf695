use std::{env, fmt::Display, fs::read_to_string, path::PathBuf, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_SPREADSHEET_ID: &str = "1oSyu-xaWxzfiOB4X-gYu9DiGu3Lj4f-cqT2xBt3mPs0";
pub const DEFAULT_SHEETS_API_URL: &str = "https://sheets.googleapis.com";
pub const DEFAULT_KEY_FILE: &str = "service-account.json";
pub const CREDENTIALS_KEY: &str = "GOOGLE_SERVICE_ACCOUNT_KEY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Sheets,
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sheets" => Ok(StoreKind::Sheets),
            "memory" => Ok(StoreKind::Memory),
            other => Err(format!("unknown store '{other}', expected sheets or memory")),
        }
    }
}

/// Where the service account key comes from. Inline JSON wins over a key file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CredentialSource {
    Inline(String),
    File(PathBuf),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub store: StoreKind,
    pub spreadsheet_id: String,
    pub credentials: CredentialSource,
    pub sheets_api_url: String,
    pub token_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            store: StoreKind::Memory,
            spreadsheet_id: DEFAULT_SPREADSHEET_ID.to_string(),
            credentials: CredentialSource::File(PathBuf::from(DEFAULT_KEY_FILE)),
            sheets_api_url: DEFAULT_SHEETS_API_URL.to_string(),
            token_url: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            port: try_load("RUST_PORT", "5000")?,
            store: try_load("STORE", "sheets")?,
            spreadsheet_id: try_load("SPREADSHEET_ID", DEFAULT_SPREADSHEET_ID)?,
            credentials: load_credentials()?,
            sheets_api_url: try_load("SHEETS_API_URL", DEFAULT_SHEETS_API_URL)?,
            token_url: var("GOOGLE_TOKEN_URL").ok(),
        })
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        info!("Environment variable {key} not found");
    })
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key,
                reason: e.to_string(),
            }
        })
}

fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            info!("No {secret_name} secret: {e}");
        })
        .ok()
}

fn load_credentials() -> Result<CredentialSource, ConfigError> {
    let inline = var(CREDENTIALS_KEY).ok();
    let secret = match inline {
        Some(_) => None,
        None => read_secret(CREDENTIALS_KEY),
    };
    let file = try_load("GOOGLE_SERVICE_ACCOUNT_FILE", DEFAULT_KEY_FILE)?;

    Ok(select_credentials(inline, secret, file))
}

/// Inline env value, then the mounted secret, then the key file.
pub fn select_credentials(
    inline: Option<String>,
    secret: Option<String>,
    file: PathBuf,
) -> CredentialSource {
    if let Some(inline) = inline {
        info!("Using inline service account key from {CREDENTIALS_KEY}");
        return CredentialSource::Inline(inline);
    }

    if let Some(secret) = secret {
        info!("Using service account key from secrets");
        return CredentialSource::Inline(secret);
    }

    info!("Using service account key file {}", file.display());
    CredentialSource::File(file)
}
