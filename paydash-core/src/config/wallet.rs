//! Wallet configuration.

use url::Url;

/// The contractor wallet the dashboard operates on.
#[derive(Debug, Clone)]
pub struct WalletConfig {
    /// Root URL of the wallet API. Always ends with `/`.
    pub base_url: Url,
    pub api_key: String,
    /// The wallet address.
    pub address: String,
    /// Chain slug, e.g. `base-sepolia`.
    pub chain: String,
    /// Token symbol, e.g. `usdc`.
    pub token: String,
    /// Email of the wallet owner, used when registering with the issuer.
    pub owner_email: Option<String>,
}
