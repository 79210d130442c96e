//! # Configuration Module
//!
//! Runtime configuration read from the environment (and `.env`), with the
//! defaults the bot ships with.

use anyhow::{Context, Result};
use chrono::Duration;
use reqwest::Url;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

// Defaults for access control
pub const DEFAULT_RATE_LIMIT_SECS: i64 = 60;
pub const DEFAULT_CACHE_TTL_SECS: i64 = 5 * 60;
pub const DEFAULT_FREE_ATTEMPTS: u32 = 1;
pub const DEFAULT_ACCESS_PRICE_RUB: u32 = 299;
pub const DEFAULT_SUPPORT_URL: &str = "https://t.me/Oblastyle";

/// Limits and pricing applied to every user
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    /// Minimum delay between two cooking requests of the same user
    pub rate_limit_secs: i64,
    /// How long an entitled user's last recommendation stays reusable
    pub cache_ttl_secs: i64,
    /// Recommendations granted before payment is required
    pub free_attempts: u32,
    /// Price of lifetime access shown in upsell messages
    pub access_price_rub: u32,
}

impl AccessPolicy {
    pub fn rate_limit_window(&self) -> Duration {
        Duration::seconds(self.rate_limit_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::seconds(self.cache_ttl_secs)
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            rate_limit_secs: DEFAULT_RATE_LIMIT_SECS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            free_attempts: DEFAULT_FREE_ATTEMPTS,
            access_price_rub: DEFAULT_ACCESS_PRICE_RUB,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("unknown log format '{other}'"),
        }
    }
}

/// Options for the inline keyboards
#[derive(Debug, Clone)]
pub struct UiConfig {
    /// Target of the "Support" button under every keyboard; `None` hides it
    pub support_url: Option<Url>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            support_url: Url::parse(DEFAULT_SUPPORT_URL).ok(),
        }
    }
}

/// Complete bot configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub telegram_token: String,
    pub access: AccessPolicy,
    pub ui: UiConfig,
    /// External dish catalog replacing the built-in one
    pub dishes_path: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl BotConfig {
    /// Read the configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let telegram_token =
            env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?;

        let access = AccessPolicy {
            rate_limit_secs: env_or("RATE_LIMIT_SECS", DEFAULT_RATE_LIMIT_SECS)?,
            cache_ttl_secs: env_or("CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?,
            free_attempts: env_or("FREE_ATTEMPTS", DEFAULT_FREE_ATTEMPTS)?,
            access_price_rub: env_or("ACCESS_PRICE_RUB", DEFAULT_ACCESS_PRICE_RUB)?,
        };

        let support_url = match env::var("SUPPORT_URL") {
            Ok(raw) if raw.trim().is_empty() => None,
            Ok(raw) => Some(Url::parse(raw.trim()).context("SUPPORT_URL is not a valid URL")?),
            Err(_) => Some(Url::parse(DEFAULT_SUPPORT_URL)?),
        };

        let dishes_path = env::var("DISHES_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let log_format = env_or("LOG_FORMAT", LogFormat::default())?;

        Ok(Self {
            telegram_token,
            access,
            ui: UiConfig { support_url },
            dishes_path,
            log_format,
        })
    }
}

/// Parse an optional environment variable, using `default` when it is unset
fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid value for {key}: {e}")),
        Err(_) => Ok(default),
    }
}
