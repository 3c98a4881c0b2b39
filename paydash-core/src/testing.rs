//! Scripted in-memory fakes of the external services.
//!
//! Each operation is backed by a [`Script`]: queued replies are consumed in
//! order, after which the fallback reply repeats. Replies are either a value
//! or an HTTP status that surfaces as [`ClientError::Api`].

use crate::issuer::CardIssuer;
use crate::wallet::WalletHandle;
use async_trait::async_trait;
use paydash_sdk::client::ClientError;
use paydash_sdk::objects::{
    ActivityEvent, ActivityFeed, ApplicationRequest, Card, CreateCardRequest, IssuerUser,
    TokenAmount, TransferReceipt, UserApplication, UserContract, UserCreditBalances,
    WalletBalances,
};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Script<T> {
    queue: Mutex<VecDeque<Result<T, StatusCode>>>,
    fallback: Mutex<Result<T, StatusCode>>,
    calls: AtomicUsize,
}

impl<T: Clone> Script<T> {
    pub fn new(fallback: Result<T, StatusCode>) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(fallback),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn push_ok(&self, value: T) {
        lock(&self.queue).push_back(Ok(value));
    }

    pub fn push_status(&self, status: StatusCode) {
        lock(&self.queue).push_back(Err(status));
    }

    pub fn set_fallback(&self, reply: Result<T, StatusCode>) {
        *lock(&self.fallback) = reply;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next(&self) -> Result<T, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = lock(&self.queue)
            .pop_front()
            .unwrap_or_else(|| lock(&self.fallback).clone());
        reply.map_err(|status| ClientError::Api {
            status,
            body: format!("scripted {}", status.as_u16()),
        })
    }
}

pub fn usdc_balance(amount: Decimal) -> WalletBalances {
    WalletBalances {
        usdc: Some(TokenAmount { amount }),
        tokens: Vec::new(),
    }
}

pub fn activity_event(hash: &str, to: &str, amount: &str, timestamp: i64) -> ActivityEvent {
    ActivityEvent {
        transaction_hash: hash.to_owned(),
        to_address: to.to_owned(),
        from_address: None,
        amount: amount.to_owned(),
        timestamp,
    }
}

pub fn card(id: &str, last4: &str) -> Card {
    Card {
        id: id.to_owned(),
        status: "active".to_owned(),
        last4: Some(last4.to_owned()),
        brand: Some("visa".to_owned()),
        exp_month: Some(12),
        exp_year: Some(2030),
    }
}

pub fn contract(chain_id: u64, deposit_address: &str) -> UserContract {
    UserContract {
        id: Some(format!("contract-{chain_id}")),
        chain_id,
        deposit_address: Some(deposit_address.to_owned()),
        extra: Default::default(),
    }
}

pub fn spending_power(amount: Decimal) -> UserCreditBalances {
    UserCreditBalances {
        spending_power: Some(amount),
        ..UserCreditBalances::default()
    }
}

pub struct FakeWallet {
    address: String,
    pub balances: Script<WalletBalances>,
    pub activity: Script<ActivityFeed>,
    pub send: Script<TransferReceipt>,
    sent: Mutex<Vec<(String, Decimal)>>,
    send_delay: Option<Duration>,
}

impl FakeWallet {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_owned(),
            balances: Script::new(Ok(WalletBalances::default())),
            activity: Script::new(Ok(ActivityFeed::default())),
            send: Script::new(Ok(TransferReceipt {
                id: Some("transfer-1".to_owned()),
                hash: Some("0xfeed".to_owned()),
            })),
            sent: Mutex::new(Vec::new()),
            send_delay: None,
        }
    }

    /// Make every `send` take `delay` before it answers.
    pub fn with_send_delay(mut self, delay: Duration) -> Self {
        self.send_delay = Some(delay);
        self
    }

    /// Every `(recipient, amount)` passed to `send`, successful or not.
    pub fn sent(&self) -> Vec<(String, Decimal)> {
        lock(&self.sent).clone()
    }
}

#[async_trait]
impl WalletHandle for FakeWallet {
    fn address(&self) -> &str {
        &self.address
    }

    async fn balances(&self) -> Result<WalletBalances, ClientError> {
        self.balances.next()
    }

    async fn activity(&self) -> Result<ActivityFeed, ClientError> {
        self.activity.next()
    }

    async fn send(&self, recipient: &str, amount: Decimal) -> Result<TransferReceipt, ClientError> {
        lock(&self.sent).push((recipient.to_owned(), amount));
        if let Some(delay) = self.send_delay {
            tokio::time::sleep(delay).await;
        }
        self.send.next()
    }
}

pub struct FakeIssuer {
    pub users: Script<Vec<IssuerUser>>,
    pub application: Script<UserApplication>,
    pub start_application: Script<UserApplication>,
    pub credit_balances: Script<UserCreditBalances>,
    pub contracts: Script<Vec<UserContract>>,
    pub create_contract: Script<()>,
    pub create_card: Script<Card>,
    pub cards: Script<Vec<Card>>,
    started: Mutex<Vec<ApplicationRequest>>,
}

impl FakeIssuer {
    pub fn new() -> Self {
        Self {
            users: Script::new(Ok(Vec::new())),
            application: Script::new(Err(StatusCode::NOT_FOUND)),
            start_application: Script::new(Ok(UserApplication {
                id: "user-1".to_owned(),
                application_status: Some("approved".to_owned()),
                email: None,
            })),
            credit_balances: Script::new(Ok(UserCreditBalances::default())),
            contracts: Script::new(Ok(Vec::new())),
            create_contract: Script::new(Ok(())),
            create_card: Script::new(Ok(card("card-1", "4242"))),
            cards: Script::new(Ok(Vec::new())),
            started: Mutex::new(Vec::new()),
        }
    }

    /// Applications submitted through `start_user_application`.
    pub fn started(&self) -> Vec<ApplicationRequest> {
        lock(&self.started).clone()
    }
}

impl Default for FakeIssuer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CardIssuer for FakeIssuer {
    async fn list_users(&self, _limit: u32) -> Result<Vec<IssuerUser>, ClientError> {
        self.users.next()
    }

    async fn get_user_application(&self, _user_id: &str) -> Result<UserApplication, ClientError> {
        self.application.next()
    }

    async fn start_user_application(
        &self,
        application: &ApplicationRequest,
    ) -> Result<UserApplication, ClientError> {
        lock(&self.started).push(application.clone());
        self.start_application.next()
    }

    async fn get_user_credit_balances(
        &self,
        _user_id: &str,
    ) -> Result<UserCreditBalances, ClientError> {
        self.credit_balances.next()
    }

    async fn get_user_contracts(&self, _user_id: &str) -> Result<Vec<UserContract>, ClientError> {
        self.contracts.next()
    }

    async fn create_user_contract(&self, _user_id: &str, _chain_id: u64) -> Result<(), ClientError> {
        self.create_contract.next()
    }

    async fn create_card(
        &self,
        _user_id: &str,
        _request: &CreateCardRequest,
    ) -> Result<Card, ClientError> {
        self.create_card.next()
    }

    async fn list_cards(&self, _user_id: &str) -> Result<Vec<Card>, ClientError> {
        self.cards.next()
    }
}
