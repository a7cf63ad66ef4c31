//! Configuration for fructcheck.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{FructError, FructResult};

/// Environment variable holding the Nutritionix application id.
pub const APP_ID_ENV: &str = "NUTRITIONIX_APP_ID";

/// Environment variable holding the Nutritionix application key.
pub const APP_KEY_ENV: &str = "NUTRITIONIX_APP_KEY";

/// Main configuration for fructcheck.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Nutritionix API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Fructose limit settings.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Search cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

/// Nutritionix API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Natural-language nutrients endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout (in seconds).
    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,

    /// Value sent in the `x-remote-user-id` header.
    #[serde(default = "default_remote_user_id")]
    pub remote_user_id: String,

    /// Application id. `NUTRITIONIX_APP_ID` overrides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,

    /// Application key. `NUTRITIONIX_APP_KEY` overrides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_key: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_api_timeout(),
            remote_user_id: default_remote_user_id(),
            app_id: None,
            app_key: None,
        }
    }
}

fn default_endpoint() -> String {
    "https://trackapi.nutritionix.com/v2/natural/nutrients".to_string()
}

fn default_api_timeout() -> u64 {
    30
}

fn default_remote_user_id() -> String {
    "0".to_string()
}

/// Fructose limit settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Grams of fructose allowed in one serving.
    #[serde(default = "default_fructose_grams")]
    pub fructose_grams: f64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            fructose_grams: default_fructose_grams(),
        }
    }
}

fn default_fructose_grams() -> f64 {
    3.0
}

/// Search cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// SQLite database path.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Write API responses back to the cache after a `search`.
    #[serde(default = "default_true")]
    pub write_back: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            db_path: default_db_path(),
            write_back: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_db_path() -> PathBuf {
    PathBuf::from(".fructcheck/searches.db")
}

/// Nutritionix credentials, resolved once before the first request.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    pub app_id: String,
    pub app_key: String,
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("app_id", &self.app_id)
            .field("app_key", &"[REDACTED]")
            .finish()
    }
}

impl ApiCredentials {
    /// Picks each credential from the environment first, then the config file.
    pub fn resolve(
        env_id: Option<&str>,
        env_key: Option<&str>,
        file_id: Option<&str>,
        file_key: Option<&str>,
    ) -> FructResult<Self> {
        let pick = |env: Option<&str>, file: Option<&str>| {
            env.filter(|v| !v.is_empty())
                .or_else(|| file.filter(|v| !v.is_empty()))
                .map(str::to_string)
        };

        let app_id = pick(env_id, file_id)
            .ok_or_else(|| FructError::MissingCredentials(APP_ID_ENV.to_string()))?;
        let app_key = pick(env_key, file_key)
            .ok_or_else(|| FructError::MissingCredentials(APP_KEY_ENV.to_string()))?;

        Ok(Self { app_id, app_key })
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> FructResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> FructResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Creates default configuration.
    pub fn default_config() -> Self {
        Self {
            general: GeneralConfig::default(),
            api: ApiConfig::default(),
            limits: LimitsConfig::default(),
            cache: CacheConfig::default(),
        }
    }

    /// Tries to load configuration from current directory or uses default.
    pub fn load_or_default() -> Self {
        Self::load("fructcheck.toml").unwrap_or_else(|_| Self::default_config())
    }

    /// Rejects values the evaluator cannot work with.
    pub fn validate(&self) -> FructResult<()> {
        if !(self.limits.fructose_grams.is_finite() && self.limits.fructose_grams > 0.0) {
            return Err(FructError::config(format!(
                "limits.fructose_grams must be a positive number, got {}",
                self.limits.fructose_grams
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(FructError::config("api.timeout_secs must be at least 1"));
        }
        Ok(())
    }

    /// Resolves the Nutritionix credentials from the environment and this file.
    pub fn credentials(&self) -> FructResult<ApiCredentials> {
        let env_id = std::env::var(APP_ID_ENV).ok();
        let env_key = std::env::var(APP_KEY_ENV).ok();
        ApiCredentials::resolve(
            env_id.as_deref(),
            env_key.as_deref(),
            self.api.app_id.as_deref(),
            self.api.app_key.as_deref(),
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
