//! Screener Configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `gap-screener.{toml,yaml,json}` in the working directory, then `GAP_*`
//! environment variables (`__` separates nested keys, e.g.
//! `GAP_NEWS__API_KEY`).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::types::{Result, ScreenerError};

const FILE_NAME: &str = "gap-screener";
const ENV_PREFIX: &str = "GAP";

/// Risk parameters the position sizing is bounded by
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct RiskConfig {
    /// Money in the trading account
    #[serde(default = "default_account_balance")]
    pub account_balance: f64,
    /// Fraction of the balance that may be lost on one trade (e.g., 0.02 for 2%)
    #[serde(default = "default_loss_tolerance")]
    pub loss_tolerance: f64,
    /// Fraction of the gap's value to take as profit
    #[serde(default = "default_profit_capture_ratio")]
    pub profit_capture_ratio: f64,
}

impl RiskConfig {
    /// Risk budget for a single trade
    pub fn max_loss_per_trade(&self) -> f64 {
        self.account_balance * self.loss_tolerance
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            account_balance: default_account_balance(),
            loss_tolerance: default_loss_tolerance(),
            profit_capture_ratio: default_profit_capture_ratio(),
        }
    }
}

fn default_account_balance() -> f64 { 100_000.0 }
fn default_loss_tolerance() -> f64 { 0.02 }
fn default_profit_capture_ratio() -> f64 { 0.8 }

/// News provider settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct NewsConfig {
    #[serde(default = "default_news_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Headlines requested per ticker
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// HTTP timeout for one provider request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Upper bound on a whole pipeline task's news lookup; unset waits forever
    #[serde(default)]
    pub task_timeout_secs: Option<u64>,
}

impl NewsConfig {
    pub fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ScreenerError::Config(format!(
                    "news.api_key is required (set {}_NEWS__API_KEY)",
                    ENV_PREFIX
                ))
            })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn task_timeout(&self) -> Option<Duration> {
        self.task_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: default_news_base_url(),
            api_key: None,
            page_size: default_page_size(),
            request_timeout_secs: default_request_timeout_secs(),
            task_timeout_secs: None,
        }
    }
}

fn default_news_base_url() -> String { "https://seeking-alpha.p.rapidapi.com".to_string() }
fn default_page_size() -> u32 { 5 }
fn default_request_timeout_secs() -> u64 { 10 }

/// Top-level settings for one screening run
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Settings {
    #[serde(default = "default_input_path")]
    pub input_path: PathBuf,
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    /// Candidates gapping less than this (absolute) are dropped
    #[serde(default = "default_min_gap")]
    pub min_gap: f64,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub news: NewsConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_path: default_input_path(),
            output_path: default_output_path(),
            min_gap: default_min_gap(),
            risk: RiskConfig::default(),
            news: NewsConfig::default(),
        }
    }
}

fn default_input_path() -> PathBuf { PathBuf::from("./opg.csv") }
fn default_output_path() -> PathBuf { PathBuf::from("./opg.json") }
fn default_min_gap() -> f64 { 0.1 }

impl Settings {
    /// Load from the optional config file and `GAP_*` environment variables
    pub fn load() -> Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(FILE_NAME).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::from_builder(builder)
    }

    /// Build from any source stack; missing keys fall back to defaults
    pub fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        builder
            .build()
            .and_then(|cfg| cfg.try_deserialize::<Settings>())
            .map_err(|e| ScreenerError::Config(e.to_string()))
    }
}
