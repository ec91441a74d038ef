use crate::errors::FetchError;
use crate::models::TokenBalance;
use crate::providers::{NumberOrString, scale_down};
use ethers::providers::{Http, Provider};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const WALLET_TOKEN_BALANCE_METHOD: &str = "qn_getWalletTokenBalance";

#[derive(Debug, Serialize)]
struct WalletParams<'a> {
    wallet: &'a str,
}

// `Provider::request` requires a serializable response type; it traces the
// decoded value.
#[derive(Debug, Serialize, Deserialize)]
struct WalletTokenBalances {
    result: Vec<RawTokenBalance>,
    #[serde(rename = "totalPages", default, skip_serializing_if = "Option::is_none")]
    total_pages: Option<u64>,
}

/// One row as returned by the provider, before decimal adjustment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RawTokenBalance {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    symbol: Option<String>,
    #[serde(rename = "totalBalance")]
    total_balance: NumberOrString,
    decimals: NumberOrString,
}

/// Token balance fetcher backed by a QuickNode endpoint with the token API add-on.
#[derive(Clone)]
pub struct QuickNodeClient {
    provider: Option<Provider<Http>>,
}

impl QuickNodeClient {
    /// A missing URL is accepted here; `fetch_balances` reports it.
    pub fn new(api_url: Option<&str>) -> Result<Self, FetchError> {
        let provider = api_url
            .map(|url| Provider::<Http>::try_from(url))
            .transpose()?;
        Ok(Self { provider })
    }

    pub async fn fetch_balances(&self, address: &str) -> Result<Vec<TokenBalance>, FetchError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(FetchError::MissingConfig("QUICKNODE_API_URL"))?;

        let response: WalletTokenBalances = provider
            .request(
                WALLET_TOKEN_BALANCE_METHOD,
                [WalletParams { wallet: address }],
            )
            .await?;

        if let Some(pages) = response.total_pages.filter(|p| *p > 1) {
            warn!(pages, "[BALANCES] provider paginated the result; only the first page is used");
        }

        let balances = normalize_rows(response.result);
        debug!(count = balances.len(), "[BALANCES] fetched token balances");
        Ok(balances)
    }
}

/// Rows that fail to normalize are logged and skipped.
fn normalize_rows(rows: Vec<RawTokenBalance>) -> Vec<TokenBalance> {
    rows.into_iter()
        .filter_map(|raw| {
            let symbol = raw.symbol.clone().unwrap_or_default();
            match normalize_balance(raw) {
                Ok(balance) => Some(balance),
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "[BALANCES] skipping malformed token row");
                    None
                }
            }
        })
        .collect()
}

pub(crate) fn normalize_balance(raw: RawTokenBalance) -> Result<TokenBalance, FetchError> {
    let decimals_text = raw.decimals.to_text();
    let decimals: u8 = decimals_text.parse().map_err(|_| {
        FetchError::Malformed(format!("decimals `{decimals_text}` is not a small integer"))
    })?;
    let balance = scale_down(&raw.total_balance.to_text(), u32::from(decimals))?;
    Ok(TokenBalance {
        name: raw.name.unwrap_or_default(),
        symbol: raw.symbol.unwrap_or_default(),
        balance,
        decimals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> WalletTokenBalances {
        serde_json::from_str(raw).expect("json should parse")
    }

    #[test]
    fn parses_and_normalizes_provider_rows() {
        let raw = r#"{
            "result": [
                {"name": "USD Coin", "symbol": "USDC", "totalBalance": "100000000", "decimals": "6"},
                {"name": "Wrapped BTC", "symbol": "WBTC", "totalBalance": 50000000, "decimals": 8}
            ],
            "totalItems": 2,
            "totalPages": 1,
            "pageNumber": 1
        }"#;
        let balances: Vec<TokenBalance> = parse(raw)
            .result
            .into_iter()
            .map(normalize_balance)
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(balances.len(), 2);
        assert_eq!(balances[0].symbol, "USDC");
        assert_eq!(balances[0].decimals, 6);
        assert!((balances[0].balance - 100.0).abs() < 1e-9);
        assert_eq!(balances[1].name, "Wrapped BTC");
        assert!((balances[1].balance - 0.5).abs() < 1e-12);
    }

    #[test]
    fn missing_name_and_symbol_become_empty() {
        let raw = r#"{"result": [{"totalBalance": "1", "decimals": 0}]}"#;
        let row = parse(raw).result.remove(0);
        let balance = normalize_balance(row).unwrap();
        assert_eq!(balance.symbol, "");
        assert_eq!(balance.balance, 1.0);
    }

    #[test]
    fn bad_decimals_are_malformed() {
        let raw = r#"{"result": [{"symbol": "X", "totalBalance": "1", "decimals": "eighteen"}]}"#;
        let row = parse(raw).result.remove(0);
        assert!(matches!(
            normalize_balance(row),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn malformed_rows_are_skipped_and_the_rest_kept() {
        let raw = r#"{"result": [
            {"symbol": "BAD", "totalBalance": "1", "decimals": "eighteen"},
            {"symbol": "DAI", "totalBalance": "2500000000000000000", "decimals": 18},
            {"symbol": "WIDE", "totalBalance": "1", "decimals": 300}
        ]}"#;
        let balances = normalize_rows(parse(raw).result);

        assert_eq!(balances.len(), 1);
        assert_eq!(balances[0].symbol, "DAI");
        assert!((balances[0].balance - 2.5).abs() < 1e-12);
    }

    #[tokio::test]
    async fn missing_endpoint_fails_at_request_time() {
        let client = QuickNodeClient::new(None).unwrap();
        let err = client
            .fetch_balances("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::MissingConfig("QUICKNODE_API_URL")));
    }

    #[test]
    fn rejects_unparseable_endpoint() {
        assert!(matches!(
            QuickNodeClient::new(Some("not a url")),
            Err(FetchError::UrlParse(_))
        ));
    }
}
