//! The card-issuance API seam.

use async_trait::async_trait;
use paydash_sdk::client::{ClientError, IssuerClient};
use paydash_sdk::objects::{
    ApplicationRequest, Card, CreateCardRequest, IssuerUser, UserApplication, UserContract,
    UserCreditBalances,
};

/// Operations the dashboard needs from the card-issuance API.
#[async_trait]
pub trait CardIssuer: Send + Sync {
    async fn list_users(&self, limit: u32) -> Result<Vec<IssuerUser>, ClientError>;

    async fn get_user_application(&self, user_id: &str) -> Result<UserApplication, ClientError>;

    async fn start_user_application(
        &self,
        application: &ApplicationRequest,
    ) -> Result<UserApplication, ClientError>;

    async fn get_user_credit_balances(
        &self,
        user_id: &str,
    ) -> Result<UserCreditBalances, ClientError>;

    async fn get_user_contracts(&self, user_id: &str) -> Result<Vec<UserContract>, ClientError>;

    /// Errors with a 409 when the contract already exists.
    async fn create_user_contract(&self, user_id: &str, chain_id: u64) -> Result<(), ClientError>;

    async fn create_card(
        &self,
        user_id: &str,
        request: &CreateCardRequest,
    ) -> Result<Card, ClientError>;

    async fn list_cards(&self, user_id: &str) -> Result<Vec<Card>, ClientError>;
}

#[async_trait]
impl CardIssuer for IssuerClient {
    async fn list_users(&self, limit: u32) -> Result<Vec<IssuerUser>, ClientError> {
        IssuerClient::list_users(self, limit).await
    }

    async fn get_user_application(&self, user_id: &str) -> Result<UserApplication, ClientError> {
        IssuerClient::get_user_application(self, user_id).await
    }

    async fn start_user_application(
        &self,
        application: &ApplicationRequest,
    ) -> Result<UserApplication, ClientError> {
        IssuerClient::start_user_application(self, application).await
    }

    async fn get_user_credit_balances(
        &self,
        user_id: &str,
    ) -> Result<UserCreditBalances, ClientError> {
        IssuerClient::get_user_credit_balances(self, user_id).await
    }

    async fn get_user_contracts(&self, user_id: &str) -> Result<Vec<UserContract>, ClientError> {
        IssuerClient::get_user_contracts(self, user_id).await
    }

    async fn create_user_contract(&self, user_id: &str, chain_id: u64) -> Result<(), ClientError> {
        IssuerClient::create_user_contract(self, user_id, chain_id).await
    }

    async fn create_card(
        &self,
        user_id: &str,
        request: &CreateCardRequest,
    ) -> Result<Card, ClientError> {
        IssuerClient::create_card(self, user_id, request).await
    }

    async fn list_cards(&self, user_id: &str) -> Result<Vec<Card>, ClientError> {
        IssuerClient::list_cards(self, user_id).await
    }
}
