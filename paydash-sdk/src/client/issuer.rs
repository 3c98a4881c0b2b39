//! Card-issuance API client (proxy → issuer).
//!
//! Every request carries the issuer API key in the `Api-Key` header.

use reqwest::Client;
use url::Url;

use super::{ClientError, expect_success, parse_response, segment};
use crate::objects::issuer::{
    ApplicationRequest, Card, CreateCardRequest, CreateContractRequest, IssuerUser,
    UserApplication, UserContract, UserCreditBalances,
};

const API_KEY_HEADER: &str = "Api-Key";

/// Typed HTTP client for the external **card-issuance API**.
#[derive(Debug, Clone)]
pub struct IssuerClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl IssuerClient {
    /// Create a new `IssuerClient`.
    ///
    /// * `base_url` – root URL of the issuer API, ending with `/`
    ///   (e.g. `https://api.issuer.example/v1/`).
    /// * `api_key` – the issuer API key.
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url,
            api_key: api_key.into(),
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `GET issuing/users?limit={limit}`
    pub async fn list_users(&self, limit: u32) -> Result<Vec<IssuerUser>, ClientError> {
        let url = self.base_url.join("issuing/users")?;

        let resp = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[("limit", limit)])
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `GET issuing/applications/user/{user_id}`
    pub async fn get_user_application(
        &self,
        user_id: &str,
    ) -> Result<UserApplication, ClientError> {
        let url = self
            .base_url
            .join(&format!("issuing/applications/user/{}", segment(user_id)))?;

        let resp = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `POST issuing/applications/user` – create a user together with its
    /// KYC application.
    pub async fn start_user_application(
        &self,
        application: &ApplicationRequest,
    ) -> Result<UserApplication, ClientError> {
        let url = self.base_url.join("issuing/applications/user")?;

        let resp = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(application)
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `GET issuing/users/{user_id}/balances`
    pub async fn get_user_credit_balances(
        &self,
        user_id: &str,
    ) -> Result<UserCreditBalances, ClientError> {
        let url = self
            .base_url
            .join(&format!("issuing/users/{}/balances", segment(user_id)))?;

        let resp = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `GET issuing/users/{user_id}/contracts`
    pub async fn get_user_contracts(
        &self,
        user_id: &str,
    ) -> Result<Vec<UserContract>, ClientError> {
        let url = self
            .base_url
            .join(&format!("issuing/users/{}/contracts", segment(user_id)))?;

        let resp = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `POST issuing/users/{user_id}/contracts` – deploy the card contract
    /// on `chain_id`. The issuer answers `409` if it already exists.
    pub async fn create_user_contract(
        &self,
        user_id: &str,
        chain_id: u64,
    ) -> Result<(), ClientError> {
        let url = self
            .base_url
            .join(&format!("issuing/users/{}/contracts", segment(user_id)))?;

        let resp = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&CreateContractRequest { chain_id })
            .send()
            .await?;

        expect_success(resp).await
    }

    /// `POST issuing/users/{user_id}/cards`
    pub async fn create_card(
        &self,
        user_id: &str,
        request: &CreateCardRequest,
    ) -> Result<Card, ClientError> {
        let url = self
            .base_url
            .join(&format!("issuing/users/{}/cards", segment(user_id)))?;

        let resp = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `GET issuing/cards?userId={user_id}`
    pub async fn list_cards(&self, user_id: &str) -> Result<Vec<Card>, ClientError> {
        let url = self.base_url.join("issuing/cards")?;

        let resp = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[("userId", user_id)])
            .send()
            .await?;

        parse_response(resp).await
    }
}
