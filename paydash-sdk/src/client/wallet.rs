//! Wallet API client (dashboard → wallet service).
//!
//! Requests are authenticated with the project API key in the `X-API-KEY`
//! header. The client is bound to a single wallet and a single token.

use reqwest::Client;
use rust_decimal::Decimal;
use url::Url;

use super::{ClientError, parse_response, segment};
use crate::objects::wallet::{ActivityFeed, TransferReceipt, TransferRequest, WalletBalances};

const API_KEY_HEADER: &str = "X-API-KEY";

/// Typed HTTP client for one wallet on the external **wallet API**.
#[derive(Debug, Clone)]
pub struct WalletClient {
    http: Client,
    base_url: Url,
    api_key: String,
    address: String,
    chain: String,
    token: String,
}

impl WalletClient {
    /// Create a new `WalletClient`.
    ///
    /// * `base_url` – root URL of the wallet API, ending with `/`.
    /// * `address` – the wallet this client reads and sends from.
    /// * `chain` / `token` – e.g. `base-sepolia` / `usdc`.
    pub fn new(
        base_url: Url,
        api_key: impl Into<String>,
        address: impl Into<String>,
        chain: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url,
            api_key: api_key.into(),
            address: address.into(),
            chain: chain.into(),
            token: token.into(),
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Fully qualified token identifier, `{chain}:{token}`.
    pub fn token_locator(&self) -> String {
        format!("{}:{}", self.chain, self.token)
    }

    /// `GET wallets/{address}/balances?tokens={chain}:{token}`
    pub async fn balances(&self) -> Result<WalletBalances, ClientError> {
        let url = self
            .base_url
            .join(&format!("wallets/{}/balances", segment(&self.address)))?;

        let resp = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[("tokens", self.token_locator())])
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `GET wallets/{address}/activity?chain={chain}`
    pub async fn activity(&self) -> Result<ActivityFeed, ClientError> {
        let url = self
            .base_url
            .join(&format!("wallets/{}/activity", segment(&self.address)))?;

        let resp = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[("chain", self.chain.as_str())])
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `POST wallets/{address}/tokens/{chain}:{token}/transfers` – send
    /// `amount` of the bound token to `recipient`.
    pub async fn send(
        &self,
        recipient: &str,
        amount: Decimal,
    ) -> Result<TransferReceipt, ClientError> {
        let url = self.base_url.join(&format!(
            "wallets/{}/tokens/{}/transfers",
            segment(&self.address),
            segment(&self.token_locator())
        ))?;

        let body = TransferRequest {
            recipient: recipient.to_owned(),
            amount: amount.normalize().to_string(),
        };

        let resp = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        parse_response(resp).await
    }
}
