//! Payroll balance poller.
//!
//! Keeps the wallet's USDC balance in the dashboard state fresh. Three
//! schedules run side by side inside one task:
//!
//! - **baseline**: immediately on start, then every 60s. A failure shows an
//!   inline error and clears the balance so stale funds are never shown.
//! - **aggressive**: after [`BalanceCommand::ClaimStarted`], every 3s until a
//!   positive balance is observed or the claim window (30s) closes.
//! - **burst**: after a [`DashboardEvent::OfframpSucceeded`], wait 3s, then
//!   poll every 3s for 30s so the debit shows up quickly.
//!
//! Aggressive and burst failures are silent.

use crate::events::{BalanceCommand, BalanceCommandReceiver, DashboardEvent};
use crate::state::DashboardState;
use crate::utils::balance_display::resolve_usdc_amount;
use crate::wallet::WalletHandle;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::time::{Instant, MissedTickBehavior, interval, sleep_until};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy)]
pub struct BalancePollerConfig {
    pub baseline_interval: Duration,
    pub aggressive_interval: Duration,
    /// Upper bound on the aggressive phase after a claim.
    pub claim_window: Duration,
    pub burst_delay: Duration,
    pub burst_interval: Duration,
    pub burst_polls: u32,
}

impl Default for BalancePollerConfig {
    fn default() -> Self {
        Self {
            baseline_interval: Duration::from_secs(60),
            aggressive_interval: Duration::from_secs(3),
            claim_window: Duration::from_secs(30),
            burst_delay: Duration::from_secs(3),
            burst_interval: Duration::from_secs(3),
            burst_polls: 10,
        }
    }
}

struct Aggressive {
    next_poll: Instant,
    until: Instant,
}

struct Burst {
    next_poll: Instant,
    remaining: u32,
}

pub struct BalancePoller {
    wallet: Arc<dyn WalletHandle>,
    state: DashboardState,
    config: BalancePollerConfig,
    command_rx: BalanceCommandReceiver,
    event_rx: broadcast::Receiver<DashboardEvent>,
    shutdown_rx: watch::Receiver<bool>,
    aggressive: Option<Aggressive>,
    burst: Option<Burst>,
}

/// Deadline used for disabled `select!` branches.
fn far_future() -> Instant {
    Instant::now() + Duration::from_secs(86_400 * 365)
}

impl BalancePoller {
    pub fn new(
        wallet: Arc<dyn WalletHandle>,
        state: DashboardState,
        config: BalancePollerConfig,
        command_rx: BalanceCommandReceiver,
        event_rx: broadcast::Receiver<DashboardEvent>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            wallet,
            state,
            config,
            command_rx,
            event_rx,
            shutdown_rx,
            aggressive: None,
            burst: None,
        }
    }

    pub async fn run(mut self) {
        info!(wallet = %self.wallet.address(), "BalancePoller started");

        let mut baseline = interval(self.config.baseline_interval);
        baseline.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut commands_open = true;
        let mut events_open = true;

        loop {
            let aggressive_at = self
                .aggressive
                .as_ref()
                .map(|a| a.next_poll.min(a.until));
            let burst_at = self.burst.as_ref().map(|b| b.next_poll);

            tokio::select! {
                biased;

                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        info!("BalancePoller received shutdown signal");
                        break;
                    }
                }

                command = self.command_rx.recv(), if commands_open => match command {
                    Some(command) => self.handle_command(command).await,
                    None => commands_open = false,
                },

                event = self.event_rx.recv(), if events_open => match event {
                    Ok(DashboardEvent::OfframpSucceeded { amount }) => {
                        debug!(%amount, "Offramp settled, scheduling balance burst");
                        self.burst = Some(Burst {
                            next_poll: Instant::now()
                                + self.config.burst_delay
                                + self.config.burst_interval,
                            remaining: self.config.burst_polls,
                        });
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "BalancePoller lagged behind the event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => events_open = false,
                },

                _ = sleep_until(aggressive_at.unwrap_or_else(far_future)), if aggressive_at.is_some() => {
                    self.aggressive_tick().await;
                }

                _ = sleep_until(burst_at.unwrap_or_else(far_future)), if burst_at.is_some() => {
                    self.burst_tick().await;
                }

                _ = baseline.tick() => {
                    self.baseline_poll().await;
                }
            }
        }

        info!("BalancePoller shutdown complete");
    }

    async fn handle_command(&mut self, command: BalanceCommand) {
        match command {
            BalanceCommand::ClaimStarted => {
                let now = Instant::now();
                self.aggressive = Some(Aggressive {
                    next_poll: now + self.config.aggressive_interval,
                    until: now + self.config.claim_window,
                });
                self.state.update(|v| v.awaiting_payroll = true);
                info!("Claim started, polling balance aggressively");
            }
            BalanceCommand::Refresh => self.baseline_poll().await,
        }
    }

    async fn aggressive_tick(&mut self) {
        let Some(aggressive) = self.aggressive.as_mut() else {
            return;
        };
        if Instant::now() >= aggressive.until {
            info!("Claim window closed without observing funds");
            self.end_aggressive();
            return;
        }
        aggressive.next_poll += self.config.aggressive_interval;

        match self.silent_poll().await {
            Some(amount) if amount > Decimal::ZERO => {
                info!(%amount, "Payroll funds observed");
                self.end_aggressive();
            }
            _ => {}
        }
    }

    fn end_aggressive(&mut self) {
        self.aggressive = None;
        self.state.update(|v| {
            v.awaiting_payroll = false;
            v.claim_succeeded = false;
        });
    }

    async fn burst_tick(&mut self) {
        let Some(burst) = self.burst.as_mut() else {
            return;
        };
        burst.remaining = burst.remaining.saturating_sub(1);
        if burst.remaining == 0 {
            self.burst = None;
        } else {
            burst.next_poll += self.config.burst_interval;
        }
        self.silent_poll().await;
    }

    async fn baseline_poll(&self) {
        match self.wallet.balances().await {
            Ok(balances) => {
                let amount = resolve_usdc_amount(&balances);
                self.state.update(|v| v.wallet_balance = amount);
            }
            Err(e) => {
                self.state.update(|v| v.wallet_balance = None);
                self.state.report_error(e.to_string());
            }
        }
    }

    /// Poll without surfacing errors. Returns the resolved amount, if any.
    async fn silent_poll(&self) -> Option<Decimal> {
        match self.wallet.balances().await {
            Ok(balances) => {
                let amount = resolve_usdc_amount(&balances);
                self.state.update(|v| v.wallet_balance = amount);
                amount
            }
            Err(e) => {
                debug!(error = %e, "Balance poll failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventBus, balance_command_channel};
    use crate::testing::{FakeWallet, usdc_balance};
    use crate::utils::task_guard::TaskGuard;
    use reqwest::StatusCode;

    struct Harness {
        wallet: Arc<FakeWallet>,
        state: DashboardState,
        bus: EventBus,
        commands: crate::events::BalanceCommandSender,
        shutdown_tx: watch::Sender<bool>,
        task: TaskGuard,
    }

    fn start(wallet: FakeWallet) -> Harness {
        let wallet = Arc::new(wallet);
        let state = DashboardState::new("0xwallet");
        let bus = EventBus::new();
        let (commands, command_rx) = balance_command_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let poller = BalancePoller::new(
            wallet.clone(),
            state.clone(),
            BalancePollerConfig::default(),
            command_rx,
            bus.subscribe(),
            shutdown_rx,
        );
        Harness {
            wallet,
            state,
            bus,
            commands,
            shutdown_tx,
            task: TaskGuard::spawn(poller.run()),
        }
    }

    async fn advance(secs: u64) {
        tokio::time::sleep(Duration::from_secs(secs)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_baseline_polls_every_minute() {
        let wallet = FakeWallet::new("0xwallet");
        wallet.balances.set_fallback(Ok(usdc_balance(Decimal::new(12345, 3))));
        let h = start(wallet);

        advance(1).await;
        assert_eq!(h.wallet.balances.calls(), 1);
        assert_eq!(h.state.snapshot().wallet_balance, "12.35");

        advance(60).await;
        assert_eq!(h.wallet.balances.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_baseline_failure_clears_balance_and_reports() {
        let wallet = FakeWallet::new("0xwallet");
        wallet.balances.push_ok(usdc_balance(Decimal::from(7)));
        wallet.balances.set_fallback(Err(StatusCode::INTERNAL_SERVER_ERROR));
        let h = start(wallet);

        advance(1).await;
        assert_eq!(h.state.snapshot().wallet_balance, "7.00");

        advance(60).await;
        let snapshot = h.state.snapshot();
        assert_eq!(snapshot.wallet_balance, "0.00");
        assert!(snapshot.error.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_claim_polls_aggressively_until_funds_arrive() {
        let wallet = FakeWallet::new("0xwallet");
        let h = start(wallet);
        advance(1).await;

        h.commands.send(BalanceCommand::ClaimStarted).await.unwrap();
        advance(1).await;
        assert!(h.state.view().awaiting_payroll);

        // Two empty aggressive polls, then funds.
        advance(6).await;
        assert_eq!(h.wallet.balances.calls(), 3);
        h.wallet.balances.set_fallback(Ok(usdc_balance(Decimal::from(100))));
        advance(3).await;

        let view = h.state.view();
        assert!(!view.awaiting_payroll);
        assert_eq!(view.wallet_balance, Some(Decimal::from(100)));

        let calls = h.wallet.balances.calls();
        advance(20).await;
        assert_eq!(h.wallet.balances.calls(), calls);
    }

    #[tokio::test(start_paused = true)]
    async fn test_claim_window_closes_after_thirty_seconds() {
        let wallet = FakeWallet::new("0xwallet");
        let h = start(wallet);
        advance(1).await;

        h.commands.send(BalanceCommand::ClaimStarted).await.unwrap();
        h.state.update(|v| v.claim_succeeded = true);
        advance(31).await;

        let view = h.state.view();
        assert!(!view.awaiting_payroll);
        assert!(!view.claim_succeeded);
        // Baseline poll plus nine aggressive polls at 3s..27s.
        assert_eq!(h.wallet.balances.calls(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_offramp_success_triggers_delayed_burst() {
        let wallet = FakeWallet::new("0xwallet");
        let h = start(wallet);
        advance(1).await;
        assert_eq!(h.wallet.balances.calls(), 1);

        h.bus.publish(DashboardEvent::OfframpSucceeded {
            amount: Decimal::from(5),
        });
        advance(5).await;
        assert_eq!(h.wallet.balances.calls(), 1);

        // First burst poll at 6s, last at 33s.
        advance(29).await;
        assert_eq!(h.wallet.balances.calls(), 11);
        advance(10).await;
        assert_eq!(h.wallet.balances.calls(), 11);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_poller() {
        let wallet = FakeWallet::new("0xwallet");
        let h = start(wallet);
        advance(1).await;

        h.shutdown_tx.send(true).unwrap();
        advance(1).await;
        assert!(h.task.is_finished());
    }
}
