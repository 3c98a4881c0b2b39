//! Card balance poller.
//!
//! The issuer updates a card's spending power asynchronously after the card
//! is created or funded. This poller re-reads it on a two-phase schedule
//! (see [`card_poll_interval`]) and publishes each observation into the
//! dashboard state, until a [`StopRule`] fires or the poll cap is reached.

use crate::issuer::CardIssuer;
use crate::state::DashboardState;
use crate::utils::poll_schedule::card_poll_interval;
use paydash_sdk::objects::CardBalance;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, info};

/// When a polling run may end before hitting its cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopRule {
    /// Stop once this many consecutive polls returned an unchanged balance.
    Stable { unchanged_polls: u32 },
    /// Stop on the first balance that differs from the starting one.
    Changed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardPollerConfig {
    pub max_polls: u32,
    pub stop_rule: StopRule,
}

impl CardPollerConfig {
    /// Watching a freshly created card.
    pub fn after_card_created() -> Self {
        Self {
            max_polls: 60,
            stop_rule: StopRule::Stable { unchanged_polls: 6 },
        }
    }

    /// Waiting for a funding transfer to show up.
    pub fn after_funding() -> Self {
        Self {
            max_polls: 12,
            stop_rule: StopRule::Changed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStop {
    Stable,
    Changed,
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardPollSummary {
    /// Polls issued, failed ones included.
    pub polls: u32,
    pub stop: PollStop,
    pub last_balance: Option<Decimal>,
}

pub struct CardBalancePoller {
    issuer: Arc<dyn CardIssuer>,
    state: DashboardState,
    user_id: String,
    config: CardPollerConfig,
}

impl CardBalancePoller {
    pub fn new(
        issuer: Arc<dyn CardIssuer>,
        state: DashboardState,
        user_id: impl Into<String>,
        config: CardPollerConfig,
    ) -> Self {
        Self {
            issuer,
            state,
            user_id: user_id.into(),
            config,
        }
    }

    /// Poll until a stop condition is met. The first poll is immediate.
    pub async fn run(self) -> CardPollSummary {
        let starting = self
            .state
            .view()
            .card_balance
            .map(|b| b.current)
            .unwrap_or(Decimal::ZERO);
        let mut last = starting;
        let mut last_seen = None;
        let mut unchanged = 0u32;
        let mut polls = 0u32;

        let stop = loop {
            if polls > 0 {
                sleep(card_poll_interval(polls)).await;
            }
            polls += 1;

            match self.issuer.get_user_credit_balances(&self.user_id).await {
                Ok(balances) => {
                    let current = balances.spending_power.unwrap_or(Decimal::ZERO);
                    self.state
                        .update(|v| v.card_balance = Some(CardBalance::usd(current)));
                    last_seen = Some(current);

                    debug!(user_id = %self.user_id, poll = polls, %current, "Polled card balance");

                    match self.config.stop_rule {
                        StopRule::Changed if current != starting => break PollStop::Changed,
                        StopRule::Stable { unchanged_polls } => {
                            if current == last {
                                unchanged += 1;
                            } else {
                                unchanged = 0;
                            }
                            if unchanged >= unchanged_polls {
                                break PollStop::Stable;
                            }
                        }
                        StopRule::Changed => {}
                    }
                    last = current;
                }
                Err(e) => {
                    debug!(user_id = %self.user_id, poll = polls, error = %e, "Card balance poll failed");
                }
            }

            if polls >= self.config.max_polls {
                break PollStop::Exhausted;
            }
        };

        info!(user_id = %self.user_id, polls, ?stop, "Card balance polling finished");
        CardPollSummary {
            polls,
            stop,
            last_balance: last_seen,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeIssuer, spending_power};
    use reqwest::StatusCode;
    use std::time::Duration;
    use tokio::time::Instant;

    fn poller(issuer: &Arc<FakeIssuer>, state: &DashboardState, config: CardPollerConfig) -> CardBalancePoller {
        CardBalancePoller::new(issuer.clone(), state.clone(), "user-1", config)
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_after_six_unchanged_polls() {
        let issuer = Arc::new(FakeIssuer::new());
        issuer.credit_balances.push_ok(spending_power(Decimal::from(5)));
        issuer
            .credit_balances
            .set_fallback(Ok(spending_power(Decimal::from(20))));
        let state = DashboardState::new("0xwallet");

        let summary = poller(&issuer, &state, CardPollerConfig::after_card_created())
            .run()
            .await;

        // 5 (changed from 0), then 20 (changed), then six unchanged 20s.
        assert_eq!(summary.stop, PollStop::Stable);
        assert_eq!(summary.polls, 8);
        assert_eq!(summary.last_balance, Some(Decimal::from(20)));
        assert_eq!(state.snapshot().card_balance, "20.00");
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_exceeds_poll_cap() {
        let issuer = Arc::new(FakeIssuer::new());
        issuer.credit_balances.set_fallback(Err(StatusCode::BAD_GATEWAY));
        let state = DashboardState::new("0xwallet");

        let summary = poller(&issuer, &state, CardPollerConfig::after_card_created())
            .run()
            .await;

        assert_eq!(summary.stop, PollStop::Exhausted);
        assert_eq!(summary.polls, 60);
        assert_eq!(issuer.credit_balances.calls(), 60);
        assert_eq!(summary.last_balance, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_slows_down_after_six_polls() {
        let issuer = Arc::new(FakeIssuer::new());
        issuer.credit_balances.set_fallback(Err(StatusCode::BAD_GATEWAY));
        let state = DashboardState::new("0xwallet");
        let config = CardPollerConfig {
            max_polls: 8,
            stop_rule: StopRule::Changed,
        };

        let started = Instant::now();
        poller(&issuer, &state, config).run().await;

        // Polls at 0,10,20,30,40,50 then 80,110.
        assert_eq!(started.elapsed(), Duration::from_secs(110));
    }

    #[tokio::test(start_paused = true)]
    async fn test_after_funding_stops_on_change() {
        let issuer = Arc::new(FakeIssuer::new());
        let state = DashboardState::new("0xwallet");
        state.update(|v| v.card_balance = Some(CardBalance::usd(Decimal::from(10))));
        issuer.credit_balances.push_ok(spending_power(Decimal::from(10)));
        issuer.credit_balances.push_status(StatusCode::SERVICE_UNAVAILABLE);
        issuer.credit_balances.push_ok(spending_power(Decimal::from(35)));

        let summary = poller(&issuer, &state, CardPollerConfig::after_funding())
            .run()
            .await;

        assert_eq!(summary.stop, PollStop::Changed);
        assert_eq!(summary.polls, 3);
        assert_eq!(state.snapshot().card_balance, "35.00");
    }

    #[tokio::test(start_paused = true)]
    async fn test_after_funding_gives_up_after_twelve_polls() {
        let issuer = Arc::new(FakeIssuer::new());
        let state = DashboardState::new("0xwallet");

        let summary = poller(&issuer, &state, CardPollerConfig::after_funding())
            .run()
            .await;

        assert_eq!(summary.stop, PollStop::Exhausted);
        assert_eq!(summary.polls, 12);
    }
}
