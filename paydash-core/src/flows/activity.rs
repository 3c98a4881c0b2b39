//! Labelled activity feed.

use super::{Dashboard, FlowError};
use crate::issuing::ListCards;
use crate::store;
use crate::utils::relative_time::{format_relative, now_millis};
use kanau::processor::Processor;
use paydash_sdk::objects::{ActivityDirection, ActivityEntry, ActivityEvent};
use tracing::debug;

const UNKNOWN_LAST4: &str = "••••";

/// Display labels for the counterparties of wallet transfers.
#[derive(Debug, Clone, Default)]
pub struct ActivityLabels {
    pub employer: String,
    pub bank: String,
    pub treasury_address: Option<String>,
    pub card_last4: Option<String>,
}

/// Label one activity event as seen from `wallet_address`.
///
/// Incoming transfers come from the employer. Outgoing ones go either to
/// the treasury (the bank offramp) or, failing that, to the card.
pub fn classify_event(
    event: &ActivityEvent,
    wallet_address: &str,
    labels: &ActivityLabels,
    now_ms: i64,
) -> ActivityEntry {
    let incoming = event.to_address.eq_ignore_ascii_case(wallet_address);
    let to_treasury = labels
        .treasury_address
        .as_deref()
        .is_some_and(|t| !t.is_empty() && event.to_address.eq_ignore_ascii_case(t));

    let (direction, counterparty, sign) = if incoming {
        (ActivityDirection::Received, format!("From {}", labels.employer), '+')
    } else if to_treasury {
        (ActivityDirection::Sent, format!("To {}", labels.bank), '-')
    } else {
        let last4 = labels.card_last4.as_deref().unwrap_or(UNKNOWN_LAST4);
        (
            ActivityDirection::Sent,
            format!("To Virtual Card · Ending {last4}"),
            '-',
        )
    };

    ActivityEntry {
        transaction_hash: event.transaction_hash.clone(),
        direction,
        counterparty,
        amount: format!("{sign}${}", event.amount),
        when: format_relative(event.timestamp, now_ms),
    }
}

impl Dashboard {
    pub async fn activity(&self) -> Result<Vec<ActivityEntry>, FlowError> {
        let feed = self.wallet.activity().await?;
        let config = self.config.snapshot().await;
        let labels = ActivityLabels {
            employer: config.employer_label,
            bank: config.bank_label,
            treasury_address: config.treasury_address,
            card_last4: self.card_last4().await,
        };
        let now = now_millis();

        Ok(feed
            .events
            .iter()
            .map(|e| classify_event(e, self.wallet.address(), &labels, now))
            .collect())
    }

    /// Last four digits of the card for display: dashboard state first, then
    /// the store, then the issuer's card list. Lookup failures yield `None`.
    async fn card_last4(&self) -> Option<String> {
        let view = self.state.view();
        if let Some(last4) = view.card_last4 {
            return Some(last4);
        }

        let kv = self.issuing.store();
        match kv.get(store::DISPLAY, store::CARD_LAST4).await {
            Ok(Some(last4)) => {
                self.state.update(|v| v.card_last4 = Some(last4.clone()));
                return Some(last4);
            }
            Ok(None) => {}
            Err(e) => debug!(error = %e, "Could not read cached card last4"),
        }

        let user_id = match view.issuer_user_id {
            Some(id) => id,
            None => kv
                .get(store::USER_IDS, self.wallet.address())
                .await
                .ok()
                .flatten()?,
        };
        let cards = match self.issuing.process(ListCards { user_id }).await {
            Ok(cards) => cards,
            Err(e) => {
                debug!(error = %e, "Could not list cards for last4");
                return None;
            }
        };
        let last4 = cards.into_iter().find_map(|c| c.last4)?;

        if let Err(e) = kv.put(store::DISPLAY, store::CARD_LAST4, &last4).await {
            debug!(error = %e, "Could not cache card last4");
        }
        self.state.update(|v| v.card_last4 = Some(last4.clone()));
        Some(last4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::test_support::{dashboard, treasury_config};
    use crate::store::KeyValueStore;
    use crate::testing::{FakeIssuer, FakeWallet, activity_event, card};
    use paydash_sdk::objects::ActivityFeed;

    const NOW_MS: i64 = 1_700_000_000_000;

    fn labels(last4: Option<&str>) -> ActivityLabels {
        ActivityLabels {
            employer: "GlobalTech - Contract".to_owned(),
            bank: "NovaBank · Ending 9820".to_owned(),
            treasury_address: Some("0xTreasury".to_owned()),
            card_last4: last4.map(str::to_owned),
        }
    }

    #[test]
    fn test_incoming_transfer() {
        let event = activity_event("0x1", "0xWALLET", "100", NOW_MS / 1000 - 120);
        let entry = classify_event(&event, "0xwallet", &labels(None), NOW_MS);

        assert_eq!(entry.direction, ActivityDirection::Received);
        assert_eq!(entry.counterparty, "From GlobalTech - Contract");
        assert_eq!(entry.amount, "+$100");
        assert_eq!(entry.when, "2m ago");
    }

    #[test]
    fn test_outgoing_to_treasury_and_card() {
        let bank = activity_event("0x2", "0xtreasury", "5", NOW_MS);
        let entry = classify_event(&bank, "0xwallet", &labels(Some("4242")), NOW_MS);
        assert_eq!(entry.counterparty, "To NovaBank · Ending 9820");
        assert_eq!(entry.amount, "-$5");

        let card = activity_event("0x3", "0xdeposit", "7", NOW_MS);
        let entry = classify_event(&card, "0xwallet", &labels(Some("4242")), NOW_MS);
        assert_eq!(entry.counterparty, "To Virtual Card · Ending 4242");

        let entry = classify_event(&card, "0xwallet", &labels(None), NOW_MS);
        assert_eq!(entry.counterparty, "To Virtual Card · Ending ••••");
    }

    #[tokio::test(start_paused = true)]
    async fn test_activity_looks_up_last4_from_issuer() {
        let wallet = FakeWallet::new("0xwallet");
        wallet.activity.set_fallback(Ok(ActivityFeed {
            events: vec![activity_event("0x3", "0xdeposit", "7", 1_700_000_000)],
        }));
        let issuer = FakeIssuer::new();
        issuer.cards.set_fallback(Ok(vec![card("card-2", "9999")]));
        let t = dashboard(wallet, issuer, treasury_config());
        t.store.put(store::USER_IDS, "0xwallet", "user-1").await.unwrap();

        let entries = t.dashboard.activity().await.unwrap();
        assert_eq!(entries[0].counterparty, "To Virtual Card · Ending 9999");
        assert_eq!(
            t.store
                .get(store::DISPLAY, store::CARD_LAST4)
                .await
                .unwrap()
                .as_deref(),
            Some("9999")
        );

        // Served from state afterwards.
        t.dashboard.activity().await.unwrap();
        assert_eq!(t.issuer.cards.calls(), 1);
    }
}
