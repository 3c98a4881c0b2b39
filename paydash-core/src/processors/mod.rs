//! Long-running and one-shot pollers.
//!
//! - `BalancePoller`: keeps the wallet's USDC balance fresh, reacting to
//!   `BalanceCommand`s and `OfframpSucceeded` events
//! - `TransactionWatcher`: waits for a submitted transfer to appear in the
//!   wallet's activity feed
//! - `CardBalancePoller`: follows the card's spending power after it is
//!   created or funded

pub mod balance_poller;
pub mod card_balance_poller;
pub mod transaction_watcher;

pub use balance_poller::{BalancePoller, BalancePollerConfig};
pub use card_balance_poller::{
    CardBalancePoller, CardPollSummary, CardPollerConfig, PollStop, StopRule,
};
pub use transaction_watcher::{
    SettlementOutcome, SettlementPolicy, TransactionWatcher, WatcherConfig,
};
