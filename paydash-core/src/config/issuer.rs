//! Card-issuance API configuration.

use url::Url;

/// Connection settings for the card-issuance API.
#[derive(Debug, Clone)]
pub struct IssuerConfig {
    /// Root URL of the issuer API. Always ends with `/`.
    pub base_url: Url,
    pub api_key: String,
    /// Chain the card contracts are deployed on.
    pub chain_id: u64,
    /// Spend limit of newly issued cards, in cents.
    pub card_limit_cents: u64,
}
