use super::{
    Dashboard, ERROR_RESET_AFTER, FlowError, SUCCESS_RESET_AFTER, Slot, fund_status, reset_after,
};
use crate::issuing::{EnsureContract, EnsureUser, FetchContract, IssueCard, IssuingError};
use crate::processors::{CardBalancePoller, CardPollerConfig, TransactionWatcher, WatcherConfig};
use crate::utils::task_guard::TaskGuard;
use kanau::processor::Processor;
use paydash_sdk::objects::{Card, CardStatus, DashboardEvent, TransferAccepted, TransferStatus};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

impl Dashboard {
    /// Register with the issuer, deploy the card contract and issue a
    /// virtual card. On success the card balance is polled and the deposit
    /// address is published.
    pub async fn create_card(&self) -> Result<Card, FlowError> {
        let claimed = self.state.update_if(|v| {
            if v.card_status == CardStatus::Creating {
                return false;
            }
            v.card_status = CardStatus::Creating;
            true
        });
        if !claimed {
            return Err(FlowError::Busy("card creation"));
        }
        self.state.clear_error();

        let (user_id, card) = match self.issue_card().await {
            Ok(issued) => issued,
            Err(e) => {
                self.state.update(|v| v.card_status = CardStatus::Error);
                self.state.report_error(e.to_string());
                return Err(e.into());
            }
        };

        self.state.update(|v| {
            v.card_last4 = card.last4.clone().or(v.card_last4.take());
            v.card = Some(card.clone());
            v.card_status = CardStatus::Created;
            v.issuer_user_id = Some(user_id.clone());
        });

        self.discover_deposit_address(&user_id).await;

        let poller = CardBalancePoller::new(
            self.issuing.issuer().clone(),
            self.state.clone(),
            user_id,
            CardPollerConfig::after_card_created(),
        );
        self.replace_task(
            Slot::CardPoll,
            TaskGuard::spawn(async move {
                poller.run().await;
            }),
        );

        Ok(card)
    }

    async fn issue_card(&self) -> Result<(String, Card), IssuingError> {
        let user = self
            .issuing
            .process(EnsureUser {
                wallet_address: self.wallet.address().to_owned(),
                email: self.owner_email.clone(),
            })
            .await?;

        // Contract deployment failures do not block card issuance.
        if let Err(e) = self
            .issuing
            .process(EnsureContract {
                user_id: user.issuer_user_id.clone(),
                chain_id: self.chain_id,
            })
            .await
        {
            warn!(user_id = %user.issuer_user_id, error = %e, "Contract deployment failed");
        }

        let card = self
            .issuing
            .process(IssueCard {
                user_id: user.issuer_user_id.clone(),
                display_name: user.email,
            })
            .await?;
        Ok((user.issuer_user_id, card))
    }

    async fn discover_deposit_address(&self, user_id: &str) {
        let contract = self
            .issuing
            .process(FetchContract {
                user_id: user_id.to_owned(),
                chain_id: self.chain_id,
            })
            .await;

        match contract {
            Ok(Some(contract)) => match contract.deposit_address {
                Some(address) => {
                    info!(user_id, address = %address, "Deposit address discovered");
                    self.state
                        .update(|v| v.deposit_address = Some(address.clone()));
                    self.bus
                        .publish(DashboardEvent::DepositAddressDiscovered { address });
                }
                None => debug!(user_id, "Contract has no deposit address yet"),
            },
            Ok(None) => debug!(user_id, "No contract found for deposit address"),
            Err(e) => debug!(user_id, error = %e, "Deposit address lookup failed"),
        }
    }

    /// Send `amount` USDC to the card's deposit address.
    pub async fn fund_card(&self, amount: Decimal) -> Result<TransferAccepted, FlowError> {
        let view = self.state.view();
        if view.fund_status == TransferStatus::Processing {
            return Err(FlowError::Busy("card funding"));
        }
        let deposit_address = match view.deposit_address {
            Some(address) if amount > Decimal::ZERO => address,
            _ => {
                let err = FlowError::NoDepositAddress;
                self.state.report_error(err.to_string());
                return Err(err);
            }
        };

        self.begin_transfer(Slot::Funding, fund_status, "card funding")?;

        let receipt = match self.wallet.send(&deposit_address, amount).await {
            Ok(receipt) => receipt,
            Err(e) => {
                self.state.report_error(format!("Fund card failed: {e}"));
                self.fail_transfer(Slot::Funding, fund_status);
                return Err(e.into());
            }
        };
        let hash = receipt.hash.clone().unwrap_or_default();
        info!(%amount, hash = %hash, "Card funding submitted");

        let policy = self.config.read().await.settlement_policy;
        let watcher = TransactionWatcher::new(self.wallet.clone(), WatcherConfig::with_policy(policy));
        let poller = view.issuer_user_id.map(|user_id| {
            CardBalancePoller::new(
                self.issuing.issuer().clone(),
                self.state.clone(),
                user_id,
                CardPollerConfig::after_funding(),
            )
        });
        let state = self.state.clone();

        self.replace_task(
            Slot::Funding,
            TaskGuard::spawn(async move {
                if !watcher.watch(&hash).await.is_success() {
                    state.update(|v| v.fund_status = TransferStatus::Error);
                    state.report_error("Card funding was not confirmed");
                    reset_after(
                        state,
                        fund_status,
                        TransferStatus::Error,
                        ERROR_RESET_AFTER,
                    )
                    .await;
                    return;
                }

                state.update(|v| v.fund_status = TransferStatus::Success);
                let reset = reset_after(
                    state,
                    fund_status,
                    TransferStatus::Success,
                    SUCCESS_RESET_AFTER,
                );
                match poller {
                    Some(poller) => {
                        tokio::join!(poller.run(), reset);
                    }
                    None => reset.await,
                }
            }),
        );

        Ok(TransferAccepted {
            transaction_hash: receipt.hash,
            status: TransferStatus::Processing,
        })
    }
}
