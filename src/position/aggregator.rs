//! End-to-end valuation of one wallet.

use crate::config::BalanceFailurePolicy;
use crate::errors::QueryError;
use crate::models::{Position, PositionSnapshot, PriceTable, TokenBalance, TokenDisplay};
use crate::position::metrics::compute_metrics;
use crate::providers::PortfolioSource;
use crate::utils::is_valid_address;
use std::sync::Arc;
use tracing::{info, warn};

/// Stablecoins counted as debt; every other priced holding is collateral.
pub const DEBT_SYMBOLS: [&str; 3] = ["USDC", "USDT", "DAI"];
/// Ticker symbol of the native asset.
pub const NATIVE_SYMBOL: &str = "ETH";

pub fn is_debt_symbol(symbol: &str) -> bool {
    DEBT_SYMBOLS.contains(&symbol)
}

/// Trim the input and check it is a 40-hex-digit address, `0x` optional.
pub fn validate_address(input: &str) -> Result<&str, QueryError> {
    let address = input.trim();
    if address.is_empty() {
        return Err(QueryError::EmptyAddress);
    }
    if !is_valid_address(address) {
        return Err(QueryError::InvalidAddress(address.to_string()));
    }
    Ok(address)
}

/// Price every holding and split the priced value into collateral and debt.
pub fn value_position(
    balances: &[TokenBalance],
    prices: &PriceTable,
    eth_balance: f64,
) -> (Vec<TokenDisplay>, Position) {
    let mut collateral_value = 0.0;
    let mut debt_value = 0.0;

    let eth_value = prices
        .usd_price(NATIVE_SYMBOL)
        .map(|price| eth_balance * price);
    if let Some(value) = eth_value {
        collateral_value += value;
    }

    let tokens = balances
        .iter()
        .map(|token| {
            let value = match prices.usd_price(&token.symbol) {
                Some(price) => {
                    let value = token.balance * price;
                    if is_debt_symbol(&token.symbol) {
                        debt_value += value;
                    } else {
                        collateral_value += value;
                    }
                    value
                }
                None => 0.0,
            };
            TokenDisplay {
                symbol: token.symbol.clone(),
                balance: token.balance,
                value,
            }
        })
        .collect();

    let metrics = compute_metrics(collateral_value, debt_value);
    let position = Position {
        collateral_value,
        debt_value,
        health_factor: metrics.health_factor,
        risk_level: metrics.risk_level,
        liquidation_price: metrics.liquidation_price,
        eth_balance,
        eth_value,
    };
    (tokens, position)
}

/// Combines the three data sources into a `PositionSnapshot`.
#[derive(Clone)]
pub struct PositionAggregator {
    source: Arc<dyn PortfolioSource>,
    balance_failure_policy: BalanceFailurePolicy,
}

impl PositionAggregator {
    pub fn new(source: Arc<dyn PortfolioSource>, balance_failure_policy: BalanceFailurePolicy) -> Self {
        Self {
            source,
            balance_failure_policy,
        }
    }

    /// Validate, fetch balances, prices and the native balance in that order,
    /// then value the position. Validation failures issue no network call.
    pub async fn load_position(&self, input: &str) -> Result<PositionSnapshot, QueryError> {
        let address = validate_address(input)?;

        let balances = match self.source.fetch_balances(address).await {
            Ok(balances) => balances,
            Err(e) if self.balance_failure_policy == BalanceFailurePolicy::Empty => {
                warn!(error = %e, "[BALANCES] fetch failed; continuing with no tokens");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        let prices = PriceTable::from_quotes(self.source.fetch_prices().await?);
        let eth_balance = self.source.fetch_native_balance(address).await?;

        let (tokens, position) = value_position(&balances, &prices, eth_balance);
        info!(
            address,
            tokens = tokens.len(),
            priced = prices.len(),
            collateral = position.collateral_value,
            debt = position.debt_value,
            risk = %position.risk_level,
            "[QUERY] position computed"
        );

        Ok(PositionSnapshot {
            address: address.to_string(),
            tokens,
            position,
        })
    }
}
