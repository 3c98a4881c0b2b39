//! Card-issuance API types.
//!
//! Field names follow the issuer's camelCase JSON. Unknown fields on the
//! passthrough types are preserved in `extra` so the proxy can forward them
//! untouched.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A user record as listed by the issuer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuerUser {
    pub id: String,
    #[serde(default)]
    pub wallet_address: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub application_status: Option<String>,
}

/// The KYC application attached to an issuer user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserApplication {
    pub id: String,
    #[serde(default)]
    pub application_status: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Full application payload used to create a new issuer user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRequest {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
    pub national_id: String,
    pub country_of_issue: String,
    pub email: String,
    pub address: ApplicantAddress,
    pub ip_address: String,
    pub phone_country_code: String,
    pub phone_number: String,
    pub annual_salary: String,
    pub account_purpose: String,
    pub expected_monthly_volume: String,
    pub is_terms_of_service_accepted: bool,
    pub wallet_address: String,
}

impl ApplicationRequest {
    /// Placeholder applicant that the issuer's sandbox auto-approves.
    ///
    /// The sandbox approves any application whose last name is `approved`.
    pub fn sandbox_approved(wallet_address: &str, email: &str) -> Self {
        Self {
            first_name: email.to_owned(),
            last_name: "approved".to_owned(),
            birth_date: "1990-01-01".to_owned(),
            national_id: "123456789".to_owned(),
            country_of_issue: "US".to_owned(),
            email: email.to_owned(),
            address: ApplicantAddress {
                line1: "123 Test Street".to_owned(),
                city: "San Francisco".to_owned(),
                region: "CA".to_owned(),
                postal_code: "94105".to_owned(),
                country_code: "US".to_owned(),
            },
            ip_address: "127.0.0.1".to_owned(),
            phone_country_code: "1".to_owned(),
            phone_number: "5551234567".to_owned(),
            annual_salary: "75000".to_owned(),
            account_purpose: "personal".to_owned(),
            expected_monthly_volume: "2000".to_owned(),
            is_terms_of_service_accepted: true,
            wallet_address: wallet_address.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantAddress {
    pub line1: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub country_code: String,
}

/// Credit balances of an issuer user. `spendingPower` is what the card can
/// currently spend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreditBalances {
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub spending_power: Option<Decimal>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub credit_limit: Option<Decimal>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub balance_due: Option<Decimal>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A card-linked smart contract deployed for a user on one chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContract {
    #[serde(default)]
    pub id: Option<String>,
    pub chain_id: u64,
    #[serde(default)]
    pub deposit_address: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Request body for deploying a user contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContractRequest {
    pub chain_id: u64,
}

/// A virtual card.
///
/// The issuer reports the last four digits as either `last4` or `lastFour`
/// and the expiry as `expirationMonth`/`expirationYear`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub status: String,
    #[serde(default, alias = "lastFour")]
    pub last4: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default, alias = "expirationMonth")]
    pub exp_month: Option<u8>,
    #[serde(default, alias = "expirationYear")]
    pub exp_year: Option<u16>,
}

impl Card {
    /// `MM/YYYY` expiry label, if both parts are known.
    pub fn expiry_label(&self) -> Option<String> {
        match (self.exp_month, self.exp_year) {
            (Some(month), Some(year)) => Some(format!("{month:02}/{year}")),
            _ => None,
        }
    }
}

/// Request body for issuing a new virtual card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub limit: CardLimit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl CreateCardRequest {
    /// An active virtual card with the given spend limit (in cents) per
    /// frequency window.
    pub fn virtual_card(limit_cents: u64, display_name: Option<String>) -> Self {
        Self {
            kind: "virtual".to_owned(),
            status: "active".to_owned(),
            limit: CardLimit {
                frequency: "allTime".to_owned(),
                amount: limit_cents,
            },
            display_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardLimit {
    pub frequency: String,
    pub amount: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_accepts_last_four_alias() {
        let card: Card = serde_json::from_str(
            r#"{"id":"c1","status":"active","lastFour":"4242","expirationMonth":3,"expirationYear":2029}"#,
        )
        .unwrap();
        assert_eq!(card.last4.as_deref(), Some("4242"));
        assert_eq!(card.expiry_label().as_deref(), Some("03/2029"));

        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["last4"], "4242");
        assert_eq!(json["expMonth"], 3);
    }

    #[test]
    fn test_credit_balances_keep_unknown_fields() {
        let balances: UserCreditBalances = serde_json::from_str(
            r#"{"spendingPower":2500,"creditLimit":5000,"pendingCharges":12}"#,
        )
        .unwrap();
        assert_eq!(balances.spending_power, Some(Decimal::from(2500)));
        assert_eq!(balances.extra["pendingCharges"], 12);

        let json = serde_json::to_value(&balances).unwrap();
        assert_eq!(json["pendingCharges"], 12);
        assert!(json["spendingPower"].is_number());
        assert!(json.get("balanceDue").is_none());
    }
}
