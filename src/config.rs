//! Application configuration loaded from environment variables.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;
use url::Url;

use crate::arbitrage::ScanParams;
use crate::error::{AppError, Result};
use crate::odds::Region;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Credentials ===
    /// The Odds API key.
    #[serde(default)]
    pub api_key: Option<String>,

    // === Scan Parameters ===
    /// Bookmaker region (eu, us, au, uk).
    #[serde(default)]
    pub region: Region,

    /// Minimum profit margin in percent (10 = 10%).
    #[serde(default = "default_cutoff")]
    pub cutoff: Decimal,

    /// Space-separated sport key substrings to restrict the scan to.
    #[serde(default)]
    pub sports: Option<String>,

    /// Include matches that have already started.
    #[serde(default = "default_true")]
    pub live: bool,

    /// Betting unit split across the outcomes of each opportunity.
    #[serde(default = "default_unit")]
    pub unit: Decimal,

    // === Upstream ===
    /// The Odds API base URL.
    #[serde(default = "default_odds_api_url")]
    pub odds_api_url: String,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,

    // === Logging ===
    /// Log level filter used when RUST_LOG is not set.
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Log output format: text or json.
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_cutoff() -> Decimal {
    Decimal::new(10, 0) // 10%
}

fn default_unit() -> Decimal {
    Decimal::new(10, 0)
}

fn default_true() -> bool {
    true
}

fn default_odds_api_url() -> String {
    "https://api.the-odds-api.com/v4".to_string()
}

fn default_http_timeout_ms() -> u64 {
    30_000
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn invalid(reason: impl Into<String>) -> AppError {
    AppError::InvalidConfig(reason.into())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            region: Region::default(),
            cutoff: default_cutoff(),
            sports: None,
            live: default_true(),
            unit: default_unit(),
            odds_api_url: default_odds_api_url(),
            http_timeout_ms: default_http_timeout_ms(),
            rust_log: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    ///
    /// `overrides` are `(VARIABLE, value)` pairs that replace the environment
    /// before anything is parsed, so a malformed variable never fails the
    /// load when an override supersedes it.
    pub fn load<I>(overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars().chain(overrides))
    }

    /// Build configuration from `(VARIABLE, value)` pairs. Later pairs win.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: HashMap<String, String> = vars.into_iter().collect();
        Ok(envy::from_iter(vars)?)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<()> {
        match self.api_key.as_deref() {
            None | Some("") => return Err(invalid("API_KEY is required")),
            Some(_) => {}
        }

        if self.cutoff < Decimal::ZERO || self.cutoff >= Decimal::ONE_HUNDRED {
            return Err(invalid("CUTOFF must be in [0, 100)"));
        }

        if self.unit <= Decimal::ZERO {
            return Err(invalid("UNIT must be positive"));
        }

        if Url::parse(&self.odds_api_url).is_err() {
            return Err(invalid(format!(
                "ODDS_API_URL is not a valid URL: {}",
                self.odds_api_url
            )));
        }

        if !matches!(self.log_format.as_str(), "text" | "json") {
            return Err(invalid("LOG_FORMAT must be text or json"));
        }

        Ok(())
    }

    /// Sport filters parsed from the space-separated list.
    pub fn sport_filters(&self) -> Vec<String> {
        self.sports
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    /// Cutoff as a fraction (10% -> 0.10).
    pub fn cutoff_fraction(&self) -> Decimal {
        self.cutoff / Decimal::ONE_HUNDRED
    }

    /// Whether logs should be emitted as JSON.
    pub fn log_json(&self) -> bool {
        self.log_format == "json"
    }

    /// Parameters for a scan run.
    pub fn scan_params(&self) -> ScanParams {
        ScanParams {
            region: self.region,
            cutoff: self.cutoff_fraction(),
            live: self.live,
            unit: self.unit,
            sports: self.sport_filters(),
        }
    }
}
