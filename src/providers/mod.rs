//! External data sources for a wallet position.
//!
//! Responsibilities:
//! • Token balances from a QuickNode JSON-RPC endpoint.
//! • USD prices from the Coinpaprika ticker.
//! • Native ETH balance from Etherscan.

pub mod coinpaprika;
pub mod etherscan;
pub mod quicknode;

use crate::config::AppConfig;
use crate::errors::FetchError;
use crate::models::{PriceQuote, TokenBalance};
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub use coinpaprika::CoinpaprikaClient;
pub use etherscan::EtherscanClient;
pub use quicknode::QuickNodeClient;

/// Decimals of the native asset (wei → ETH).
pub const NATIVE_DECIMALS: u32 = 18;

/// The three calls a position query depends on.
#[async_trait]
pub trait PortfolioSource: Send + Sync {
    /// Decimal-adjusted token balances held by `address`.
    async fn fetch_balances(&self, address: &str) -> Result<Vec<TokenBalance>, FetchError>;

    /// Full ticker snapshot.
    async fn fetch_prices(&self) -> Result<Vec<PriceQuote>, FetchError>;

    /// Native balance of `address`, already converted from wei.
    async fn fetch_native_balance(&self, address: &str) -> Result<f64, FetchError>;
}

/// Production source backed by the three HTTP providers.
#[derive(Clone)]
pub struct HttpPortfolioSource {
    balances: QuickNodeClient,
    prices: CoinpaprikaClient,
    native: EtherscanClient,
}

impl HttpPortfolioSource {
    pub fn new(
        balances: QuickNodeClient,
        prices: CoinpaprikaClient,
        native: EtherscanClient,
    ) -> Self {
        Self {
            balances,
            prices,
            native,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::new();
        Ok(Self::new(
            QuickNodeClient::new(config.quicknode_api_url.as_deref())?,
            CoinpaprikaClient::new(http.clone(), &config.coinpaprika_api_url)?,
            EtherscanClient::new(
                http,
                &config.etherscan_api_url,
                config.etherscan_api_key.clone(),
            )?,
        ))
    }
}

#[async_trait]
impl PortfolioSource for HttpPortfolioSource {
    async fn fetch_balances(&self, address: &str) -> Result<Vec<TokenBalance>, FetchError> {
        self.balances.fetch_balances(address).await
    }

    async fn fetch_prices(&self) -> Result<Vec<PriceQuote>, FetchError> {
        self.prices.fetch_prices().await
    }

    async fn fetch_native_balance(&self, address: &str) -> Result<f64, FetchError> {
        self.native.fetch_native_balance(address).await
    }
}

/// Provider fields that show up either as JSON strings or numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum NumberOrString {
    Number(serde_json::Number),
    Text(String),
}

impl NumberOrString {
    pub(crate) fn to_text(&self) -> String {
        match self {
            NumberOrString::Number(n) => n.to_string(),
            NumberOrString::Text(s) => s.trim().to_string(),
        }
    }
}

/// `raw / 10^decimals` in arbitrary precision, then narrowed to `f64`.
pub(crate) fn scale_down(raw: &str, decimals: u32) -> Result<f64, FetchError> {
    let amount = BigDecimal::from_str(raw)
        .map_err(|e| FetchError::Malformed(format!("amount `{raw}` is not a number: {e}")))?;
    let unit = BigDecimal::new(BigInt::from(1), i64::from(decimals));
    (amount * unit)
        .to_f64()
        .ok_or_else(|| FetchError::Malformed(format!("amount `{raw}` does not fit in f64")))
}
