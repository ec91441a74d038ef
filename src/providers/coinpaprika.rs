use crate::errors::FetchError;
use crate::models::PriceQuote;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

#[derive(Debug, Deserialize)]
struct TickerRow {
    #[serde(default)]
    symbol: String,
    #[serde(default)]
    quotes: Option<TickerQuotes>,
}

#[derive(Debug, Deserialize)]
struct TickerQuotes {
    #[serde(rename = "USD", default)]
    usd: Option<UsdQuote>,
}

#[derive(Debug, Deserialize)]
struct UsdQuote {
    #[serde(default)]
    price: Option<f64>,
}

/// Coinpaprika `/v1/tickers` client. One call returns every listed coin.
#[derive(Clone)]
pub struct CoinpaprikaClient {
    client: Client,
    endpoint: Url,
}

impl CoinpaprikaClient {
    pub fn new(client: Client, endpoint: &str) -> Result<Self, FetchError> {
        Ok(Self {
            client,
            endpoint: Url::parse(endpoint)?,
        })
    }

    pub async fn fetch_prices(&self) -> Result<Vec<PriceQuote>, FetchError> {
        let body = self
            .client
            .get(self.endpoint.clone())
            .header("accept", "application/json")
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let quotes = parse_tickers(&body)?;
        debug!(count = quotes.len(), "[PRICES] fetched ticker snapshot");
        Ok(quotes)
    }
}

/// Rows without a USD price are dropped; a body that is not an array is an error.
fn parse_tickers(body: &[u8]) -> Result<Vec<PriceQuote>, FetchError> {
    let rows: Vec<TickerRow> = serde_json::from_slice(body)?;
    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let usd_price = row.quotes?.usd?.price?;
            Some(PriceQuote {
                symbol: row.symbol,
                usd_price,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ticker_rows_and_skips_missing_prices() {
        let raw = br#"[
            {"id": "btc-bitcoin", "symbol": "BTC", "quotes": {"USD": {"price": 60000.5, "volume_24h": 1.0}}},
            {"id": "eth-ethereum", "symbol": "ETH", "quotes": {"USD": {"price": 3000}}},
            {"id": "no-usd", "symbol": "NOUSD", "quotes": {"EUR": {"price": 1.0}}},
            {"id": "null-price", "symbol": "NULL", "quotes": {"USD": {"price": null}}},
            {"id": "no-quotes", "symbol": "BARE"}
        ]"#;
        let quotes = parse_tickers(raw).unwrap();
        assert_eq!(
            quotes,
            vec![
                PriceQuote {
                    symbol: "BTC".into(),
                    usd_price: 60000.5
                },
                PriceQuote {
                    symbol: "ETH".into(),
                    usd_price: 3000.0
                },
            ]
        );
    }

    #[test]
    fn non_array_body_is_an_error() {
        let raw = br#"{"error": "rate limited"}"#;
        assert!(matches!(parse_tickers(raw), Err(FetchError::Json(_))));
    }

    #[test]
    fn rejects_bad_endpoint() {
        assert!(CoinpaprikaClient::new(Client::new(), "::not-a-url").is_err());
    }
}
