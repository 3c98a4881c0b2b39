//! Watch-channel backed dashboard state.
//!
//! Every component writes through [`DashboardState::update`]; readers either
//! take a [`DashboardSnapshot`] or [`subscribe`](DashboardState::subscribe)
//! to be woken on each change (the WebSocket handler does the latter).

use crate::utils::balance_display::format_amount;
use paydash_sdk::objects::{Card, CardBalance, CardStatus, DashboardSnapshot, TransferStatus};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tracing::warn;

/// How long an inline error stays visible.
pub const ERROR_DISMISS_AFTER: Duration = Duration::from_secs(3);

/// Raw dashboard state. Amounts are kept as decimals and only formatted
/// when a snapshot is taken.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardView {
    pub wallet_address: String,
    /// `None` until the first successful fetch, and after a failed one.
    pub wallet_balance: Option<Decimal>,
    /// A claim request is in flight.
    pub claiming: bool,
    /// The balance poller is in its aggressive post-claim mode.
    pub awaiting_payroll: bool,
    pub claim_succeeded: bool,
    pub offramp_status: TransferStatus,
    /// Mock bank account, credited by successful offramps.
    pub bank_balance: Decimal,
    pub card_status: CardStatus,
    pub card: Option<Card>,
    pub card_balance: Option<CardBalance>,
    pub card_last4: Option<String>,
    pub fund_status: TransferStatus,
    pub deposit_address: Option<String>,
    pub issuer_user_id: Option<String>,
    pub error: Option<String>,
}

impl DashboardView {
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            wallet_address: self.wallet_address.clone(),
            wallet_balance: format_amount(self.wallet_balance.unwrap_or(Decimal::ZERO)),
            claiming: self.claiming,
            awaiting_payroll: self.awaiting_payroll,
            claim_succeeded: self.claim_succeeded,
            offramp_status: self.offramp_status,
            bank_balance: format_amount(self.bank_balance),
            card_status: self.card_status,
            card: self.card.clone(),
            card_balance: format_amount(
                self.card_balance
                    .as_ref()
                    .map(|b| b.current)
                    .unwrap_or(Decimal::ZERO),
            ),
            card_last4: self.card_last4.clone(),
            fund_status: self.fund_status,
            deposit_address: self.deposit_address.clone(),
            issuer_user_id: self.issuer_user_id.clone(),
            error: self.error.clone(),
        }
    }
}

#[derive(Clone)]
pub struct DashboardState {
    tx: watch::Sender<DashboardView>,
    error_generation: Arc<AtomicU64>,
}

impl DashboardState {
    pub fn new(wallet_address: impl Into<String>) -> Self {
        let view = DashboardView {
            wallet_address: wallet_address.into(),
            ..DashboardView::default()
        };
        let (tx, _) = watch::channel(view);
        Self {
            tx,
            error_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn view(&self) -> DashboardView {
        self.tx.borrow().clone()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.tx.borrow().snapshot()
    }

    /// Mutate the state in place and notify subscribers.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut DashboardView),
    {
        self.tx.send_modify(f);
    }

    /// Like [`update`](Self::update), but only notifies when `f` returns
    /// `true`. Used to claim a status atomically.
    pub fn update_if<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut DashboardView) -> bool,
    {
        self.tx.send_if_modified(f)
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.tx.subscribe()
    }

    /// Show an inline error, dismissed after [`ERROR_DISMISS_AFTER`] unless
    /// a newer error replaced it in the meantime.
    pub fn report_error(&self, message: impl Into<String>) {
        let message = message.into();
        warn!(error = %message, "Dashboard error");

        let generation = self.error_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.update(|v| v.error = Some(message));

        let state = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(ERROR_DISMISS_AFTER).await;
            if state.error_generation.load(Ordering::SeqCst) == generation {
                state.update(|v| v.error = None);
            }
        });
    }

    pub fn clear_error(&self) {
        self.error_generation.fetch_add(1, Ordering::SeqCst);
        self.update(|v| v.error = None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_formats_amounts() {
        let state = DashboardState::new("0xwallet");
        state.update(|v| {
            v.wallet_balance = Some(Decimal::new(12345, 3));
            v.bank_balance = Decimal::new(5, 0);
            v.card_balance = Some(CardBalance::usd(Decimal::new(2550, 2)));
        });

        let snapshot = state.snapshot();
        assert_eq!(snapshot.wallet_address, "0xwallet");
        assert_eq!(snapshot.wallet_balance, "12.35");
        assert_eq!(snapshot.bank_balance, "5.00");
        assert_eq!(snapshot.card_balance, "25.50");
    }

    #[test]
    fn test_missing_balances_render_zero() {
        let snapshot = DashboardState::new("0xwallet").snapshot();
        assert_eq!(snapshot.wallet_balance, "0.00");
        assert_eq!(snapshot.card_balance, "0.00");
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_auto_dismisses() {
        let state = DashboardState::new("0xwallet");
        state.report_error("boom");
        assert_eq!(state.view().error.as_deref(), Some("boom"));

        tokio::time::sleep(ERROR_DISMISS_AFTER + Duration::from_millis(10)).await;
        assert_eq!(state.view().error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_error_survives_older_dismissal() {
        let state = DashboardState::new("0xwallet");
        state.report_error("first");
        tokio::time::sleep(Duration::from_secs(2)).await;
        state.report_error("second");
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(state.view().error.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let state = DashboardState::new("0xwallet");
        let mut rx = state.subscribe();
        state.update(|v| v.card_status = CardStatus::Creating);

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().card_status, CardStatus::Creating);
    }
}
