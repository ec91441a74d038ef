//! Configuration loader and application settings.

use crate::errors::{AppError, Result};
use std::str::FromStr;

pub const DEFAULT_ETHERSCAN_API_URL: &str = "https://api.etherscan.io/api";
pub const DEFAULT_COINPAPRIKA_API_URL: &str = "https://api.coinpaprika.com/v1/tickers/";

/// How the aggregator treats a failed token-balance fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BalanceFailurePolicy {
    /// Abort the whole query, like any other fetch failure.
    #[default]
    Fail,
    /// Log the failure and continue with zero tokens.
    Empty,
}

impl FromStr for BalanceFailurePolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "empty" => Ok(Self::Empty),
            other => Err(AppError::Config(format!(
                "BALANCE_FAILURE_POLICY must be `fail` or `empty`, got `{other}`"
            ))),
        }
    }
}

/// Rendering of the results panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(AppError::Config(format!(
                "OUTPUT_FORMAT must be `text` or `json`, got `{other}`"
            ))),
        }
    }
}

/// Consolidated application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// QuickNode JSON-RPC endpoint serving `qn_getWalletTokenBalance`.
    pub quicknode_api_url: Option<String>,
    /// Etherscan API key for the native balance lookup.
    pub etherscan_api_key: Option<String>,
    pub etherscan_api_url: String,
    pub coinpaprika_api_url: String,
    pub balance_failure_policy: BalanceFailurePolicy,
    pub output_format: OutputFormat,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Missing credentials are not an error here; the affected call fails
    /// when it is made.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let balance_failure_policy = match non_empty("BALANCE_FAILURE_POLICY") {
            Some(raw) => raw.parse()?,
            None => BalanceFailurePolicy::default(),
        };
        let output_format = match non_empty("OUTPUT_FORMAT") {
            Some(raw) => raw.parse()?,
            None => OutputFormat::default(),
        };

        Ok(Self {
            quicknode_api_url: non_empty("QUICKNODE_API_URL"),
            etherscan_api_key: non_empty("ETHERSCAN_API_KEY"),
            etherscan_api_url: non_empty("ETHERSCAN_API_URL")
                .unwrap_or_else(|| DEFAULT_ETHERSCAN_API_URL.into()),
            coinpaprika_api_url: non_empty("COINPAPRIKA_API_URL")
                .unwrap_or_else(|| DEFAULT_COINPAPRIKA_API_URL.into()),
            balance_failure_policy,
            output_format,
        })
    }
}
