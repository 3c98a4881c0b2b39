use super::{
    Dashboard, ERROR_RESET_AFTER, FlowError, SUCCESS_RESET_AFTER, Slot, offramp_status, reset_after,
};
use crate::processors::{TransactionWatcher, WatcherConfig};
use crate::utils::task_guard::TaskGuard;
use paydash_sdk::objects::{DashboardEvent, TransferAccepted, TransferStatus};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{info, warn};

impl Dashboard {
    /// Send `amount` USDC to the treasury and credit the mock bank account
    /// once the transfer settles.
    pub async fn offramp(&self, amount: Decimal) -> Result<TransferAccepted, FlowError> {
        if self.state.view().offramp_status == TransferStatus::Processing {
            return Err(FlowError::Busy("offramp"));
        }
        if amount <= Decimal::ZERO {
            self.fail_transfer(Slot::Offramp, offramp_status);
            return Err(FlowError::InvalidAmount);
        }
        let config = self.config.snapshot().await;
        let Some(treasury) = config.treasury_address.filter(|t| !t.is_empty()) else {
            self.fail_transfer(Slot::Offramp, offramp_status);
            return Err(FlowError::TreasuryNotConfigured);
        };

        self.begin_transfer(Slot::Offramp, offramp_status, "offramp")?;

        let receipt = match self.wallet.send(&treasury, amount).await {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!(%amount, error = %e, "Offramp transfer failed");
                self.fail_transfer(Slot::Offramp, offramp_status);
                return Err(e.into());
            }
        };
        let hash = receipt.hash.clone().unwrap_or_default();
        info!(%amount, hash = %hash, "Offramp submitted");

        let watcher = TransactionWatcher::new(
            self.wallet.clone(),
            WatcherConfig::with_policy(config.settlement_policy),
        );
        let state = self.state.clone();
        let bus = self.bus.clone();
        self.replace_task(
            Slot::Offramp,
            TaskGuard::spawn(async move {
                let outcome = watcher.watch(&hash).await;
                if !outcome.is_success() {
                    state.update(|v| v.offramp_status = TransferStatus::Error);
                    state.report_error("Offramp transfer was not confirmed");
                    reset_after(
                        state,
                        offramp_status,
                        TransferStatus::Error,
                        ERROR_RESET_AFTER,
                    )
                    .await;
                    return;
                }

                state.update(|v| {
                    v.offramp_status = TransferStatus::Success;
                    v.bank_balance = (v.bank_balance + amount)
                        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
                });
                bus.publish(DashboardEvent::OfframpSucceeded { amount });
                reset_after(
                    state,
                    offramp_status,
                    TransferStatus::Success,
                    SUCCESS_RESET_AFTER,
                )
                .await;
            }),
        );

        Ok(TransferAccepted {
            transaction_hash: receipt.hash,
            status: TransferStatus::Processing,
        })
    }
}
