use super::{Dashboard, FlowError};
use crate::events::BalanceCommand;
use paydash_sdk::client::PayrollClient;
use tracing::{info, warn};

impl Dashboard {
    /// Claim the contractor's salary.
    ///
    /// The payroll backend call is best effort: when it is not configured or
    /// fails, the claim still reports success and the balance poller keeps
    /// watching for funds through the claim window.
    pub async fn claim_payroll(&self) -> Result<(), FlowError> {
        self.state.clear_error();
        self.state.update(|v| {
            v.claiming = true;
            v.claim_succeeded = false;
        });

        let result = self.submit_claim().await;

        self.state.update(|v| {
            v.claiming = false;
            v.claim_succeeded = result.is_ok();
        });
        result
    }

    async fn submit_claim(&self) -> Result<(), FlowError> {
        self.command(BalanceCommand::ClaimStarted).await?;

        let backend = self.config.read().await.payroll_backend_url.clone();
        match backend {
            Some(url) => {
                let client = PayrollClient::new(url).with_http_client(self.http.clone());
                match client.claim_salary(self.wallet.address()).await {
                    Ok(()) => info!(wallet = %self.wallet.address(), "Payroll claim submitted"),
                    Err(e) => warn!(
                        wallet = %self.wallet.address(),
                        error = %e,
                        "Payroll backend rejected claim, continuing"
                    ),
                }
            }
            None => info!("No payroll backend configured, skipping claim request"),
        }

        self.command(BalanceCommand::Refresh).await
    }
}

#[cfg(test)]
mod tests {
    use crate::flows::test_support::{dashboard, treasury_config};
    use crate::testing::{FakeIssuer, FakeWallet, usdc_balance};
    use rust_decimal::Decimal;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_claim_marks_success_and_polls_until_funded() {
        let t = dashboard(FakeWallet::new("0xwallet"), FakeIssuer::new(), treasury_config());
        tokio::time::sleep(Duration::from_millis(10)).await;

        t.dashboard.claim_payroll().await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let view = t.dashboard.state().view();
        assert!(!view.claiming);
        assert!(view.claim_succeeded);
        assert!(view.awaiting_payroll);

        t.wallet
            .balances
            .set_fallback(Ok(usdc_balance(Decimal::from(2500))));
        tokio::time::sleep(Duration::from_secs(4)).await;

        let view = t.dashboard.state().view();
        assert!(!view.awaiting_payroll);
        assert!(!view.claim_succeeded);
        assert_eq!(t.dashboard.state().snapshot().wallet_balance, "2500.00");
    }
}
