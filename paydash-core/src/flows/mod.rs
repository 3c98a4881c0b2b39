//! User-facing dashboard actions.
//!
//! A [`Dashboard`] owns the state container, the event bus and the balance
//! poller, and exposes one async method per action (claim payroll, offramp,
//! create card, fund card, read the activity feed). Background work started
//! by an action is held in a [`TaskGuard`] slot, so starting the same action
//! again or dropping the dashboard cancels it.

mod activity;
mod card;
mod claim;
mod offramp;

pub use activity::{ActivityLabels, classify_event};

use crate::config::{ConfigStore, DashboardConfig};
use crate::events::{BalanceCommand, BalanceCommandSender, EventBus, balance_command_channel};
use crate::issuing::{IssuerProcessor, IssuingError};
use crate::processors::{BalancePoller, BalancePollerConfig};
use crate::state::{DashboardState, DashboardView};
use crate::store::{self, KeyValueStore};
use crate::utils::task_guard::TaskGuard;
use crate::wallet::WalletHandle;
use paydash_sdk::client::ClientError;
use paydash_sdk::objects::TransferStatus;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tracing::debug;

/// Delay before a successful transfer returns to idle.
pub const SUCCESS_RESET_AFTER: Duration = Duration::from_secs(5);
/// Delay before a failed transfer returns to idle.
pub const ERROR_RESET_AFTER: Duration = Duration::from_secs(3);

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("amount must be greater than zero")]
    InvalidAmount,
    #[error("treasury address is not configured")]
    TreasuryNotConfigured,
    #[error("Please enter a valid amount and ensure deposit address is available")]
    NoDepositAddress,
    #[error("{0} already in progress")]
    Busy(&'static str),
    #[error("wallet request failed: {0}")]
    Wallet(#[from] ClientError),
    #[error(transparent)]
    Issuing(#[from] IssuingError),
    #[error("balance poller is not running")]
    PollerStopped,
}

/// Everything a [`Dashboard`] needs from the outside.
pub struct DashboardDeps {
    pub wallet: Arc<dyn WalletHandle>,
    pub issuing: Arc<IssuerProcessor>,
    pub config: ConfigStore<DashboardConfig>,
    /// Chain the card contract is deployed on.
    pub chain_id: u64,
    /// Email submitted with the issuer application.
    pub owner_email: Option<String>,
    /// Shared HTTP client for the payroll backend.
    pub http: reqwest::Client,
}

#[derive(Default)]
struct FlowTasks {
    offramp: Option<TaskGuard>,
    funding: Option<TaskGuard>,
    card_poll: Option<TaskGuard>,
}

impl FlowTasks {
    fn slot(&mut self, slot: Slot) -> &mut Option<TaskGuard> {
        match slot {
            Slot::Offramp => &mut self.offramp,
            Slot::Funding => &mut self.funding,
            Slot::CardPoll => &mut self.card_poll,
        }
    }
}

#[derive(Clone, Copy)]
enum Slot {
    Offramp,
    Funding,
    CardPoll,
}

pub struct Dashboard {
    wallet: Arc<dyn WalletHandle>,
    issuing: Arc<IssuerProcessor>,
    config: ConfigStore<DashboardConfig>,
    state: DashboardState,
    bus: EventBus,
    balance_commands: BalanceCommandSender,
    chain_id: u64,
    owner_email: Option<String>,
    http: reqwest::Client,
    tasks: Mutex<FlowTasks>,
    _balance_poller: TaskGuard,
}

impl Dashboard {
    /// Build the dashboard and spawn its balance poller.
    pub fn start(
        deps: DashboardDeps,
        poller_config: BalancePollerConfig,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        let state = DashboardState::new(deps.wallet.address());
        tokio::spawn(seed_card_last4(deps.issuing.store().clone(), state.clone()));
        let bus = EventBus::new();
        let (balance_commands, command_rx) = balance_command_channel();

        let poller = BalancePoller::new(
            deps.wallet.clone(),
            state.clone(),
            poller_config,
            command_rx,
            bus.subscribe(),
            shutdown_rx,
        );

        Self {
            wallet: deps.wallet,
            issuing: deps.issuing,
            config: deps.config,
            state,
            bus,
            balance_commands,
            chain_id: deps.chain_id,
            owner_email: deps.owner_email,
            http: deps.http,
            tasks: Mutex::new(FlowTasks::default()),
            _balance_poller: TaskGuard::spawn(poller.run()),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn config(&self) -> &ConfigStore<DashboardConfig> {
        &self.config
    }

    async fn command(&self, command: BalanceCommand) -> Result<(), FlowError> {
        self.balance_commands
            .send(command)
            .await
            .map_err(|_| FlowError::PollerStopped)
    }

    fn tasks(&self) -> MutexGuard<'_, FlowTasks> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Install `task` in `slot`, cancelling whatever ran there before.
    fn replace_task(&self, slot: Slot, task: TaskGuard) {
        *self.tasks().slot(slot) = Some(task);
    }

    /// Atomically move a transfer status from anything but `Processing` to
    /// `Processing`, and cancel the previous transfer's pending reset in
    /// `slot` so it cannot fire mid-transfer.
    fn begin_transfer(
        &self,
        slot: Slot,
        status: fn(&mut DashboardView) -> &mut TransferStatus,
        what: &'static str,
    ) -> Result<(), FlowError> {
        let mut tasks = self.tasks();
        let claimed = self.state.update_if(|v| {
            let current = status(v);
            if *current == TransferStatus::Processing {
                return false;
            }
            *current = TransferStatus::Processing;
            true
        });
        if !claimed {
            return Err(FlowError::Busy(what));
        }
        tasks.slot(slot).take();
        Ok(())
    }

    /// Mark a transfer failed and schedule its return to idle.
    fn fail_transfer(
        &self,
        slot: Slot,
        status: fn(&mut DashboardView) -> &mut TransferStatus,
    ) {
        self.state.update(|v| *status(v) = TransferStatus::Error);
        self.replace_task(
            slot,
            TaskGuard::spawn(reset_after(
                self.state.clone(),
                status,
                TransferStatus::Error,
                ERROR_RESET_AFTER,
            )),
        );
    }
}

/// Show the last four digits remembered from an earlier run.
async fn seed_card_last4(kv: Arc<dyn KeyValueStore>, state: DashboardState) {
    match kv.get(store::DISPLAY, store::CARD_LAST4).await {
        Ok(Some(last4)) => {
            state.update_if(|v| {
                if v.card_last4.is_some() {
                    return false;
                }
                v.card_last4 = Some(last4);
                true
            });
        }
        Ok(None) => {}
        Err(e) => debug!(error = %e, "Could not load cached card last4"),
    }
}

fn offramp_status(v: &mut DashboardView) -> &mut TransferStatus {
    &mut v.offramp_status
}

fn fund_status(v: &mut DashboardView) -> &mut TransferStatus {
    &mut v.fund_status
}

/// Return a transfer to idle after `delay`, unless it left `from` meanwhile.
async fn reset_after(
    state: DashboardState,
    status: fn(&mut DashboardView) -> &mut TransferStatus,
    from: TransferStatus,
    delay: Duration,
) {
    tokio::time::sleep(delay).await;
    state.update_if(|v| {
        let current = status(v);
        if *current != from {
            return false;
        }
        *current = TransferStatus::Idle;
        true
    });
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::store::MemoryStore;
    use crate::testing::{FakeIssuer, FakeWallet};
    use paydash_sdk::objects::BASE_SEPOLIA_CHAIN_ID;

    pub struct TestDashboard {
        pub dashboard: Dashboard,
        pub wallet: Arc<FakeWallet>,
        pub issuer: Arc<FakeIssuer>,
        pub store: Arc<MemoryStore>,
        pub _shutdown_tx: watch::Sender<bool>,
    }

    pub fn treasury_config() -> DashboardConfig {
        DashboardConfig {
            treasury_address: Some("0xTreasury".to_owned()),
            ..DashboardConfig::default()
        }
    }

    pub fn dashboard(wallet: FakeWallet, issuer: FakeIssuer, config: DashboardConfig) -> TestDashboard {
        dashboard_with_store(wallet, issuer, config, Arc::new(MemoryStore::new()))
    }

    pub fn dashboard_with_store(
        wallet: FakeWallet,
        issuer: FakeIssuer,
        config: DashboardConfig,
        store: Arc<MemoryStore>,
    ) -> TestDashboard {
        let wallet = Arc::new(wallet);
        let issuer = Arc::new(issuer);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let dashboard = Dashboard::start(
            DashboardDeps {
                wallet: wallet.clone(),
                issuing: Arc::new(IssuerProcessor::new(issuer.clone(), store.clone())),
                config: ConfigStore::new(config),
                chain_id: BASE_SEPOLIA_CHAIN_ID,
                owner_email: Some("owner@example.com".to_owned()),
                http: reqwest::Client::new(),
            },
            BalancePollerConfig::default(),
            shutdown_rx,
        );

        TestDashboard {
            dashboard,
            wallet,
            issuer,
            store,
            _shutdown_tx: shutdown_tx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{dashboard_with_store, treasury_config};
    use crate::store::{self, KeyValueStore, MemoryStore};
    use crate::testing::{FakeIssuer, FakeWallet};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_start_restores_cached_card_last4() {
        let kv = Arc::new(MemoryStore::new());
        kv.put(store::DISPLAY, store::CARD_LAST4, "9876").await.unwrap();

        let t = dashboard_with_store(
            FakeWallet::new("0xwallet"),
            FakeIssuer::new(),
            treasury_config(),
            kv,
        );
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(
            t.dashboard.state().snapshot().card_last4.as_deref(),
            Some("9876")
        );
    }
}
