//! The wallet seam.
//!
//! Pollers and flows only see [`WalletHandle`]; production wires in the
//! SDK's [`WalletClient`], tests a scripted fake.

use async_trait::async_trait;
use paydash_sdk::client::{ClientError, WalletClient};
use paydash_sdk::objects::{ActivityFeed, TransferReceipt, WalletBalances};
use rust_decimal::Decimal;

#[async_trait]
pub trait WalletHandle: Send + Sync {
    /// Address of the wallet this handle operates on.
    fn address(&self) -> &str;

    async fn balances(&self) -> Result<WalletBalances, ClientError>;

    async fn activity(&self) -> Result<ActivityFeed, ClientError>;

    /// Send `amount` USDC to `recipient`.
    async fn send(&self, recipient: &str, amount: Decimal) -> Result<TransferReceipt, ClientError>;
}

#[async_trait]
impl WalletHandle for WalletClient {
    fn address(&self) -> &str {
        WalletClient::address(self)
    }

    async fn balances(&self) -> Result<WalletBalances, ClientError> {
        WalletClient::balances(self).await
    }

    async fn activity(&self) -> Result<ActivityFeed, ClientError> {
        WalletClient::activity(self).await
    }

    async fn send(&self, recipient: &str, amount: Decimal) -> Result<TransferReceipt, ClientError> {
        WalletClient::send(self, recipient, amount).await
    }
}
