//! Runtime settings resolved once at startup.
//!
//! Precedence: command-line flags, then environment (including `.env`), then
//! built-in defaults. The resolved `Settings` value is passed down explicitly;
//! nothing below `app` reads the environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_API_URL: &str = "https://api.db.nomics.world/v22";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 2;

const ENV_API_URL: &str = "KZ_API_URL";
const ENV_TIMEOUT_SECS: &str = "KZ_TIMEOUT_SECS";
const ENV_MAX_RETRIES: &str = "KZ_MAX_RETRIES";
const ENV_EXPORT_DIR: &str = "KZ_EXPORT_DIR";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// DBnomics API root, without trailing slash.
    pub api_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    /// Where TUI exports and the TUI log file are written.
    pub export_dir: PathBuf,
    pub countries: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            export_dir: PathBuf::from("exports"),
            countries: crate::domain::COUNTRY_CODES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Values that may be given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub export_dir: Option<PathBuf>,
}

impl Settings {
    /// Load `.env`, then resolve settings from the process environment.
    pub fn resolve(overrides: &Overrides) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve settings using `lookup` for environment values.
    pub fn resolve_with(
        overrides: &Overrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let mut settings = Settings::default();

        if let Some(url) = overrides.api_url.clone().or_else(|| lookup(ENV_API_URL)) {
            let url = url.trim().trim_end_matches('/').to_string();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(AppError::config(format!("Invalid API URL '{url}' (expected http(s)://...).")));
            }
            settings.api_url = url;
        }

        let timeout_secs = match overrides.timeout_secs {
            Some(v) => Some(v),
            None => lookup(ENV_TIMEOUT_SECS)
                .map(|raw| parse_env_number::<u64>(ENV_TIMEOUT_SECS, &raw))
                .transpose()?,
        };
        if let Some(secs) = timeout_secs {
            if secs == 0 {
                return Err(AppError::config("Request timeout must be at least 1 second."));
            }
            settings.timeout = Duration::from_secs(secs);
        }

        let retries = match overrides.max_retries {
            Some(v) => Some(v),
            None => lookup(ENV_MAX_RETRIES)
                .map(|raw| parse_env_number::<u32>(ENV_MAX_RETRIES, &raw))
                .transpose()?,
        };
        if let Some(retries) = retries {
            settings.max_retries = retries;
        }

        if let Some(dir) = overrides
            .export_dir
            .clone()
            .or_else(|| lookup(ENV_EXPORT_DIR).map(PathBuf::from))
        {
            settings.export_dir = dir;
        }

        Ok(settings)
    }
}

fn parse_env_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| AppError::config(format!("Invalid {key} value '{raw}'.")))
}
