//! Transaction settlement watcher.
//!
//! After a transfer is submitted the wallet service only hands back a hash;
//! the transfer counts as settled once an event with that hash shows up in
//! the wallet's activity feed. The watcher polls the feed at a fixed
//! interval (first poll immediately) and gives up after a timeout, at which
//! point the configured [`SettlementPolicy`] decides the outcome.
//!
//! Dropping the future returned by [`TransactionWatcher::watch`] stops both
//! the polling and the timeout.

use crate::wallet::WalletHandle;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval, sleep};
use tracing::{debug, info, warn};

/// What to report when no matching activity appeared before the timeout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SettlementPolicy {
    /// Assume the transfer settled. Activity feeds lag behind the chain, so
    /// this is what the demo does.
    #[default]
    SoftTimeout,
    /// Report a timeout, which callers treat as a failure.
    RequireConfirmation,
}

impl SettlementPolicy {
    fn on_timeout(self) -> SettlementOutcome {
        match self {
            SettlementPolicy::SoftTimeout => SettlementOutcome::AssumedSettled,
            SettlementPolicy::RequireConfirmation => SettlementOutcome::TimedOut,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementOutcome {
    /// A matching event was found in the activity feed.
    Confirmed,
    /// Timed out under [`SettlementPolicy::SoftTimeout`].
    AssumedSettled,
    /// Timed out under [`SettlementPolicy::RequireConfirmation`].
    TimedOut,
}

impl SettlementOutcome {
    pub fn is_success(self) -> bool {
        !matches!(self, SettlementOutcome::TimedOut)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WatcherConfig {
    pub poll_interval: Duration,
    pub timeout: Duration,
    pub policy: SettlementPolicy,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(3),
            timeout: Duration::from_secs(30),
            policy: SettlementPolicy::default(),
        }
    }
}

impl WatcherConfig {
    pub fn with_policy(policy: SettlementPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }
}

pub struct TransactionWatcher {
    wallet: Arc<dyn WalletHandle>,
    config: WatcherConfig,
}

impl TransactionWatcher {
    pub fn new(wallet: Arc<dyn WalletHandle>, config: WatcherConfig) -> Self {
        Self { wallet, config }
    }

    /// Wait until `hash` settles or the timeout elapses.
    ///
    /// An empty hash never matches, so it always ends in the timeout
    /// outcome.
    pub async fn watch(&self, hash: &str) -> SettlementOutcome {
        debug!(hash, timeout = ?self.config.timeout, "Watching transaction");

        let outcome = tokio::select! {
            biased;

            _ = self.poll_until_found(hash) => SettlementOutcome::Confirmed,
            _ = sleep(self.config.timeout) => self.config.policy.on_timeout(),
        };

        match outcome {
            SettlementOutcome::Confirmed => info!(hash, "Transaction confirmed"),
            SettlementOutcome::AssumedSettled => {
                info!(hash, "Transaction not seen before timeout, assuming settled")
            }
            SettlementOutcome::TimedOut => warn!(hash, "Transaction not seen before timeout"),
        }
        outcome
    }

    async fn poll_until_found(&self, hash: &str) {
        let mut ticker = interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match self.wallet.activity().await {
                Ok(feed) if feed.events.iter().any(|e| e.has_hash(hash)) => return,
                Ok(_) => {}
                Err(e) => debug!(hash, error = %e, "Activity poll failed, retrying"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeWallet, activity_event};
    use paydash_sdk::objects::ActivityFeed;
    use reqwest::StatusCode;
    use tokio::time::Instant;

    fn feed_with(hash: &str) -> ActivityFeed {
        ActivityFeed {
            events: vec![activity_event(hash, "0xtreasury", "5", 1_700_000_000)],
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirms_when_hash_appears() {
        let wallet = Arc::new(FakeWallet::new("0xwallet"));
        wallet.activity.push_ok(ActivityFeed::default());
        wallet.activity.push_status(StatusCode::BAD_GATEWAY);
        wallet.activity.push_ok(feed_with("0xABCDEF"));

        let watcher = TransactionWatcher::new(wallet.clone(), WatcherConfig::default());
        let started = Instant::now();
        let outcome = watcher.watch("0xabcdef").await;

        assert_eq!(outcome, SettlementOutcome::Confirmed);
        assert_eq!(wallet.activity.calls(), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_soft_timeout_reports_success_at_deadline() {
        let wallet = Arc::new(FakeWallet::new("0xwallet"));
        let watcher = TransactionWatcher::new(wallet.clone(), WatcherConfig::default());

        let started = Instant::now();
        let outcome = watcher.watch("0xmissing").await;

        assert_eq!(outcome, SettlementOutcome::AssumedSettled);
        assert!(outcome.is_success());
        assert_eq!(started.elapsed(), Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_require_confirmation_fails_at_deadline() {
        let wallet = Arc::new(FakeWallet::new("0xwallet"));
        let watcher = TransactionWatcher::new(
            wallet,
            WatcherConfig::with_policy(SettlementPolicy::RequireConfirmation),
        );

        let outcome = watcher.watch("0xmissing").await;
        assert_eq!(outcome, SettlementOutcome::TimedOut);
        assert!(!outcome.is_success());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_hash_never_matches() {
        let wallet = Arc::new(FakeWallet::new("0xwallet"));
        wallet.activity.set_fallback(Ok(feed_with("")));
        let watcher = TransactionWatcher::new(wallet, WatcherConfig::default());

        assert_eq!(watcher.watch("").await, SettlementOutcome::AssumedSettled);
    }

    #[test]
    fn test_policy_names() {
        let policy: SettlementPolicy = serde_json::from_str(r#""require-confirmation""#).unwrap();
        assert_eq!(policy, SettlementPolicy::RequireConfirmation);
        assert_eq!(
            serde_json::to_string(&SettlementPolicy::SoftTimeout).unwrap(),
            r#""soft-timeout""#
        );
    }
}
