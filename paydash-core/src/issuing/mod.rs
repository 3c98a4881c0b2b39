//! Issuer-facing operations behind the proxy routes and the card flows.
//!
//! [`IssuerProcessor`] wraps a [`CardIssuer`] and the [`KeyValueStore`] and
//! implements one [`Processor`] per operation. Each operation validates its
//! identifying inputs, calls the issuer once (the contract lookup is the only
//! retried call) and reshapes the answer for the caller.

mod retry;

use retry::RetryPolicy;

use crate::issuer::CardIssuer;
use crate::store::{self, KeyValueStore, StoreError};
use kanau::processor::Processor;
use paydash_sdk::client::ClientError;
use paydash_sdk::objects::{
    ApplicationRequest, Card, ContractCreated, CreateCardRequest, RegisteredUser, UserContract,
    UserCreditBalances,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Page size used when searching issuer users by wallet address.
const USER_SEARCH_LIMIT: u32 = 100;
const DEFAULT_APPLICATION_STATUS: &str = "approved";

#[derive(Debug, Error)]
pub enum IssuingError {
    /// A required identifying input was missing or empty.
    #[error("{0}")]
    Validation(&'static str),
    #[error("issuer request failed: {0}")]
    Upstream(#[from] ClientError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Create or reuse the issuer user of a wallet.
#[derive(Debug, Clone)]
pub struct EnsureUser {
    pub wallet_address: String,
    pub email: Option<String>,
}

/// Deploy the user's card contract. Succeeds if it already exists.
#[derive(Debug, Clone)]
pub struct EnsureContract {
    pub user_id: String,
    pub chain_id: u64,
}

/// Look up the user's contract on one chain.
#[derive(Debug, Clone)]
pub struct FetchContract {
    pub user_id: String,
    pub chain_id: u64,
}

#[derive(Debug, Clone)]
pub struct FetchCreditBalances {
    pub user_id: String,
}

/// Issue a virtual card and remember its last four digits.
#[derive(Debug, Clone)]
pub struct IssueCard {
    pub user_id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ListCards {
    pub user_id: String,
}

pub struct IssuerProcessor {
    issuer: Arc<dyn CardIssuer>,
    store: Arc<dyn KeyValueStore>,
    contract_retry: RetryPolicy,
    card_limit_cents: u64,
}

impl IssuerProcessor {
    pub fn new(issuer: Arc<dyn CardIssuer>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            issuer,
            store,
            contract_retry: RetryPolicy::default(),
            card_limit_cents: 100_000,
        }
    }

    pub fn with_card_limit(mut self, cents: u64) -> Self {
        self.card_limit_cents = cents;
        self
    }

    pub fn issuer(&self) -> &Arc<dyn CardIssuer> {
        &self.issuer
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    async fn remember_user(&self, wallet_address: &str, user_id: &str) {
        if let Err(e) = self.store.put(store::USER_IDS, wallet_address, user_id).await {
            warn!(wallet = %wallet_address, error = %e, "Failed to cache issuer user id");
        }
    }
}

fn require(value: &str, message: &'static str) -> Result<(), IssuingError> {
    if value.trim().is_empty() {
        return Err(IssuingError::Validation(message));
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Processor<EnsureUser> for IssuerProcessor {
    type Output = RegisteredUser;
    type Error = IssuingError;
    #[tracing::instrument(skip_all, err, name = "Issuer:EnsureUser")]
    async fn process(&self, request: EnsureUser) -> Result<RegisteredUser, IssuingError> {
        let wallet = request.wallet_address.trim();
        require(wallet, "walletAddress is required")?;
        let email = non_empty(request.email);

        if let Some(user_id) = self.store.get(store::USER_IDS, wallet).await? {
            debug!(wallet = %wallet, user_id = %user_id, "Issuer user found in cache");
            let application = match self.issuer.get_user_application(&user_id).await {
                Ok(application) => Some(application),
                Err(e) => {
                    debug!(user_id = %user_id, error = %e, "Could not fetch application");
                    None
                }
            };
            let (status, stored_email) = application
                .map(|a| (a.application_status, a.email))
                .unwrap_or_default();
            return Ok(RegisteredUser {
                issuer_user_id: user_id,
                application_status: non_empty(status)
                    .unwrap_or_else(|| DEFAULT_APPLICATION_STATUS.to_owned()),
                email: non_empty(stored_email).or(email),
            });
        }

        match self.issuer.list_users(USER_SEARCH_LIMIT).await {
            Ok(users) => {
                if let Some(user) = users
                    .into_iter()
                    .find(|u| u.wallet_address.as_deref() == Some(wallet))
                {
                    info!(wallet = %wallet, user_id = %user.id, "Found existing issuer user");
                    self.remember_user(wallet, &user.id).await;
                    return Ok(RegisteredUser {
                        issuer_user_id: user.id,
                        application_status: non_empty(user.application_status)
                            .unwrap_or_else(|| DEFAULT_APPLICATION_STATUS.to_owned()),
                        email: user.email,
                    });
                }
            }
            Err(e) => debug!(error = %e, "Listing issuer users failed, creating a new one"),
        }

        let applicant_email = email.unwrap_or_else(|| format!("{wallet}@example.com"));
        let application = self
            .issuer
            .start_user_application(&ApplicationRequest::sandbox_approved(
                wallet,
                &applicant_email,
            ))
            .await?;
        info!(wallet = %wallet, user_id = %application.id, "Started issuer application");
        self.remember_user(wallet, &application.id).await;

        Ok(RegisteredUser {
            issuer_user_id: application.id,
            application_status: non_empty(application.application_status)
                .unwrap_or_else(|| DEFAULT_APPLICATION_STATUS.to_owned()),
            email: non_empty(application.email).or(Some(applicant_email)),
        })
    }
}

impl Processor<EnsureContract> for IssuerProcessor {
    type Output = ContractCreated;
    type Error = IssuingError;
    #[tracing::instrument(skip_all, err, name = "Issuer:EnsureContract")]
    async fn process(&self, request: EnsureContract) -> Result<ContractCreated, IssuingError> {
        require(&request.user_id, "userId and chainId are required")?;
        if request.chain_id == 0 {
            return Err(IssuingError::Validation("userId and chainId are required"));
        }

        match self
            .issuer
            .create_user_contract(&request.user_id, request.chain_id)
            .await
        {
            Ok(()) => {
                info!(user_id = %request.user_id, chain_id = request.chain_id, "Contract created");
                Ok(ContractCreated {
                    success: true,
                    message: "Contract created".to_owned(),
                })
            }
            Err(e) if e.is_conflict() => {
                info!(
                    user_id = %request.user_id,
                    chain_id = request.chain_id,
                    conflict = %e,
                    "Contract already exists"
                );
                Ok(ContractCreated {
                    success: true,
                    message: "Contract already exists".to_owned(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Processor<FetchContract> for IssuerProcessor {
    type Output = Option<UserContract>;
    type Error = IssuingError;
    #[tracing::instrument(skip_all, err, name = "Issuer:FetchContract")]
    async fn process(&self, request: FetchContract) -> Result<Option<UserContract>, IssuingError> {
        require(&request.user_id, "userId is required")?;

        let issuer = &self.issuer;
        let user_id = request.user_id.as_str();
        let chain_id = request.chain_id;
        let lookup = || async move {
            let contracts = issuer.get_user_contracts(user_id).await?;
            Ok::<_, ClientError>(contracts.into_iter().find(|c| c.chain_id == chain_id))
        };

        let contract = self
            .contract_retry
            .run(lookup, |result| match result {
                Ok(found) => found.is_none(),
                Err(e) => e.is_transient(),
            })
            .await?;

        if contract.is_none() {
            debug!(user_id = %request.user_id, chain_id = request.chain_id, "No contract on chain");
        }
        Ok(contract)
    }
}

impl Processor<FetchCreditBalances> for IssuerProcessor {
    type Output = UserCreditBalances;
    type Error = IssuingError;

    async fn process(
        &self,
        request: FetchCreditBalances,
    ) -> Result<UserCreditBalances, IssuingError> {
        require(&request.user_id, "userId is required")?;
        Ok(self
            .issuer
            .get_user_credit_balances(&request.user_id)
            .await?)
    }
}

impl Processor<IssueCard> for IssuerProcessor {
    type Output = Card;
    type Error = IssuingError;
    #[tracing::instrument(skip_all, err, name = "Issuer:IssueCard")]
    async fn process(&self, request: IssueCard) -> Result<Card, IssuingError> {
        require(&request.user_id, "userId is required")?;

        let card_request = CreateCardRequest::virtual_card(
            self.card_limit_cents,
            non_empty(request.display_name),
        );
        let card = self
            .issuer
            .create_card(&request.user_id, &card_request)
            .await?;
        info!(user_id = %request.user_id, card_id = %card.id, "Virtual card issued");

        if let Some(last4) = card.last4.as_deref() {
            if let Err(e) = self.store.put(store::DISPLAY, store::CARD_LAST4, last4).await {
                warn!(error = %e, "Failed to cache card last4");
            }
        }
        Ok(card)
    }
}

impl Processor<ListCards> for IssuerProcessor {
    type Output = Vec<Card>;
    type Error = IssuingError;

    async fn process(&self, request: ListCards) -> Result<Vec<Card>, IssuingError> {
        require(&request.user_id, "userId is required")?;
        Ok(self.issuer.list_cards(&request.user_id).await?)
    }
}
