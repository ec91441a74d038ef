use crate::errors::FetchError;
use crate::providers::{NATIVE_DECIMALS, NumberOrString, scale_down};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

#[derive(Debug, Deserialize)]
struct BalanceResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    result: NumberOrString,
}

/// Etherscan account API client for the native ETH balance.
#[derive(Clone)]
pub struct EtherscanClient {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl EtherscanClient {
    pub fn new(client: Client, endpoint: &str, api_key: Option<String>) -> Result<Self, FetchError> {
        Ok(Self {
            client,
            endpoint: Url::parse(endpoint)?,
            api_key,
        })
    }

    fn balance_url(&self, address: &str, api_key: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("module", "account")
            .append_pair("action", "balance")
            .append_pair("address", address)
            .append_pair("tag", "latest")
            .append_pair("apikey", api_key);
        url
    }

    /// Balance in ETH (wei / 10^18).
    pub async fn fetch_native_balance(&self, address: &str) -> Result<f64, FetchError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(FetchError::MissingConfig("ETHERSCAN_API_KEY"))?;

        let body = self
            .client
            .get(self.balance_url(address, api_key))
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let eth = parse_balance(&body)?;
        debug!(eth, "[NATIVE] fetched native balance");
        Ok(eth)
    }
}

fn parse_balance(body: &[u8]) -> Result<f64, FetchError> {
    let response: BalanceResponse = serde_json::from_slice(body)?;
    let result = response.result.to_text();
    if response.status.as_deref() == Some("0") {
        return Err(FetchError::Api(format!(
            "{}: {}",
            response.message.as_deref().unwrap_or("NOTOK"),
            result
        )));
    }
    scale_down(&result, NATIVE_DECIMALS)
}
