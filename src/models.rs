//! Shared data structures used throughout the application.

use serde::Serialize;
use std::collections::HashMap;

/// Decimal-adjusted ERC-20 holding for one wallet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenBalance {
    pub name: String,
    pub symbol: String,
    /// Human-readable quantity (`raw / 10^decimals`).
    pub balance: f64,
    pub decimals: u8,
}

/// USD price for a ticker symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceQuote {
    pub symbol: String,
    pub usd_price: f64,
}

/// Ticker snapshot keyed by exact, case-sensitive symbol.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    prices: HashMap<String, f64>,
}

impl PriceTable {
    /// The first quote for a symbol wins; the ticker is ordered by rank, so
    /// later rows with the same symbol are low-ranked namesakes.
    pub fn from_quotes(quotes: impl IntoIterator<Item = PriceQuote>) -> Self {
        let mut prices = HashMap::new();
        for quote in quotes {
            prices.entry(quote.symbol).or_insert(quote.usd_price);
        }
        Self { prices }
    }

    pub fn usd_price(&self, symbol: &str) -> Option<f64> {
        self.prices.get(symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// One row of the holdings list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenDisplay {
    pub symbol: String,
    pub balance: f64,
    /// `balance * usd_price`, or 0 when the symbol has no price.
    pub value: f64,
}

/// Categorical risk derived from the health factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    #[serde(rename = "LOW")]
    Low,
    #[serde(rename = "MEDIUM")]
    Medium,
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "NO RISK")]
    NoRisk,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::NoRisk => "NO RISK",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Collateral/debt totals and the metrics derived from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub collateral_value: f64,
    pub debt_value: f64,
    pub health_factor: f64,
    pub risk_level: RiskLevel,
    /// `None` when debt exists against zero collateral.
    pub liquidation_price: Option<f64>,
    pub eth_balance: f64,
    /// `None` when the ticker has no ETH price.
    pub eth_value: Option<f64>,
}

/// Immutable result of one completed query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionSnapshot {
    pub address: String,
    pub tokens: Vec<TokenDisplay>,
    pub position: Position,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(symbol: &str, usd_price: f64) -> PriceQuote {
        PriceQuote {
            symbol: symbol.into(),
            usd_price,
        }
    }

    #[test]
    fn duplicate_symbols_keep_the_first_quote() {
        let table = PriceTable::from_quotes(vec![quote("ETH", 3000.0), quote("ETH", 0.0004)]);
        assert_eq!(table.usd_price("ETH"), Some(3000.0));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let table = PriceTable::from_quotes(vec![quote("USDC", 1.0)]);
        assert_eq!(table.usd_price("usdc"), None);
        assert_eq!(table.usd_price("USDC"), Some(1.0));
    }

    #[test]
    fn risk_level_serializes_as_label() {
        let json = serde_json::to_string(&RiskLevel::NoRisk).unwrap();
        assert_eq!(json, "\"NO RISK\"");
        assert_eq!(RiskLevel::Medium.to_string(), "MEDIUM");
    }
}
