//! Wallet API types.
//!
//! These are the shapes returned by the external wallet service for
//! balances, the activity feed and token transfers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Balances for a wallet.
///
/// Depending on the token list requested, the wallet service reports USDC
/// either as a dedicated `usdc` field or as an element of `tokens`. Both
/// are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletBalances {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usdc: Option<TokenAmount>,
    #[serde(default)]
    pub tokens: Vec<TokenBalance>,
}

/// An amount of a single, implied token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAmount {
    pub amount: Decimal,
}

/// A balance entry in the generic token list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBalance {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub amount: Decimal,
}

/// The wallet's on-chain history as reported by the wallet service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityFeed {
    #[serde(default)]
    pub events: Vec<ActivityEvent>,
}

/// One on-chain transfer in the activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub transaction_hash: String,
    pub to_address: String,
    #[serde(default)]
    pub from_address: Option<String>,
    /// Token amount exactly as the wallet service formats it.
    pub amount: String,
    /// Unix timestamp, in seconds or milliseconds depending on the chain.
    pub timestamp: i64,
}

impl ActivityEvent {
    /// Case-insensitive comparison against a transaction hash.
    pub fn has_hash(&self, hash: &str) -> bool {
        !hash.is_empty() && self.transaction_hash.eq_ignore_ascii_case(hash)
    }
}

/// Request body for sending tokens from the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub recipient: String,
    pub amount: String,
}

/// Result of a submitted token transfer.
///
/// The hash may be missing while the transaction is still being assembled
/// by the wallet service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "transactionHash")]
    pub hash: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balances_accept_both_shapes() {
        let direct: WalletBalances = serde_json::from_str(r#"{"usdc":{"amount":"12.345"}}"#).unwrap();
        assert_eq!(direct.usdc.unwrap().amount, Decimal::new(12345, 3));
        assert!(direct.tokens.is_empty());

        let listed: WalletBalances =
            serde_json::from_str(r#"{"tokens":[{"symbol":"USDC","amount":"3.5"},{"amount":"1"}]}"#)
                .unwrap();
        assert!(listed.usdc.is_none());
        assert_eq!(listed.tokens.len(), 2);
        assert_eq!(listed.tokens[1].symbol, None);
    }

    #[test]
    fn test_hash_match_is_case_insensitive() {
        let event = ActivityEvent {
            transaction_hash: "0xAbCdEf".to_string(),
            to_address: "0x1".to_string(),
            from_address: None,
            amount: "1.00".to_string(),
            timestamp: 0,
        };
        assert!(event.has_hash("0xabcdef"));
        assert!(event.has_hash("0XABCDEF"));
        assert!(!event.has_hash("0xabcde"));
        assert!(!event.has_hash(""));
    }
}
