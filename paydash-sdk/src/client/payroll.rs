//! Payroll backend client.
//!
//! The payroll backend funds a contractor wallet when asked to. It is an
//! optional collaborator: the dashboard treats every failure as non-fatal.

use reqwest::Client;
use serde::Serialize;
use url::Url;

use super::{ClientError, expect_success};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClaimSalaryRequest<'a> {
    wallet_address: &'a str,
}

/// Typed HTTP client for the payroll backend.
#[derive(Debug, Clone)]
pub struct PayrollClient {
    http: Client,
    base_url: Url,
}

impl PayrollClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `POST api/claim-salary` – ask the backend to pay out to `wallet_address`.
    pub async fn claim_salary(&self, wallet_address: &str) -> Result<(), ClientError> {
        let url = self.base_url.join("api/claim-salary")?;

        let resp = self
            .http
            .post(url)
            .json(&ClaimSalaryRequest { wallet_address })
            .send()
            .await?;

        expect_success(resp).await
    }
}
