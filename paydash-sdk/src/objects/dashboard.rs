//! Dashboard API types.
//!
//! The dashboard runtime exposes its state as [`DashboardSnapshot`] and
//! pushes [`WsServerMessage`] frames over `GET /dashboard/ws`.
//!
//! # Protocol
//!
//! 1. The server sends a [`WsServerMessage::Snapshot`] right after the
//!    upgrade.
//! 2. Every state change produces another snapshot; every bus signal is
//!    forwarded as a [`WsServerMessage::Event`].
//! 3. The client never needs to send anything; a close frame ends the
//!    stream.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::issuer::Card;

/// Signals exchanged between dashboard components.
///
/// Serialized as an internally-tagged JSON object:
///
/// ```json
/// {"type":"offramp_succeeded","amount":"12.5"}
/// {"type":"deposit_address_discovered","address":"0x..."}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardEvent {
    /// An offramp transfer settled.
    OfframpSucceeded { amount: Decimal },
    /// The card's deposit address became known.
    DepositAddressDiscovered { address: String },
}

/// Progress of a wallet transfer (offramp or card funding).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    #[default]
    Idle,
    Processing,
    Success,
    Error,
}

/// Lifecycle of the virtual card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    #[default]
    Idle,
    Creating,
    Created,
    Error,
}

/// Spending power of the card, as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardBalance {
    pub currency: String,
    pub available: Decimal,
    pub current: Decimal,
}

impl CardBalance {
    /// A USD balance where available and current are the same amount.
    pub fn usd(amount: Decimal) -> Self {
        Self {
            currency: "USD".to_owned(),
            available: amount,
            current: amount,
        }
    }
}

/// Point-in-time view of the whole dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub wallet_address: String,
    /// Wallet USDC balance, formatted with two decimals.
    pub wallet_balance: String,
    pub claiming: bool,
    pub awaiting_payroll: bool,
    pub claim_succeeded: bool,
    pub offramp_status: TransferStatus,
    /// Mock bank balance, formatted with two decimals.
    pub bank_balance: String,
    pub card_status: CardStatus,
    pub card: Option<Card>,
    /// Card spending power, formatted with two decimals.
    pub card_balance: String,
    pub card_last4: Option<String>,
    pub fund_status: TransferStatus,
    pub deposit_address: Option<String>,
    pub issuer_user_id: Option<String>,
    pub error: Option<String>,
}

/// Request body for amount-driven actions (offramp, card funding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountRequest {
    pub amount: Decimal,
}

/// Response for a transfer that was submitted and is now being watched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferAccepted {
    pub transaction_hash: Option<String>,
    pub status: TransferStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityDirection {
    Received,
    Sent,
}

/// An activity feed event, labelled for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub transaction_hash: String,
    pub direction: ActivityDirection,
    /// Counterparty description, e.g. `To Virtual Card · Ending 4242`.
    pub counterparty: String,
    /// Signed amount, e.g. `+$12.50`.
    pub amount: String,
    /// Relative time, e.g. `5m ago`.
    pub when: String,
}

/// Server-to-client frame on the dashboard WebSocket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsServerMessage {
    Snapshot { dashboard: DashboardSnapshot },
    Event { event: DashboardEvent },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_tagging() {
        let event = DashboardEvent::DepositAddressDiscovered {
            address: "0xdead".to_owned(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "deposit_address_discovered");
        assert_eq!(json["address"], "0xdead");

        let parsed: DashboardEvent =
            serde_json::from_str(r#"{"type":"offramp_succeeded","amount":"12.5"}"#).unwrap();
        assert_eq!(
            parsed,
            DashboardEvent::OfframpSucceeded {
                amount: Decimal::new(125, 1)
            }
        );
    }
}
