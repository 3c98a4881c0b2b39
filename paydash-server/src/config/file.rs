//! TOML file configuration structures.
//!
//! These structs directly map to the `paydash-config.toml` file format.

use paydash_core::processors::SettlementPolicy;
use paydash_sdk::objects::BASE_SEPOLIA_CHAIN_ID;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub issuer: IssuerConfig,
    pub wallet: WalletConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

/// Card-issuance API section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuerConfig {
    pub base_url: Url,
    pub api_key: String,
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    /// Spend limit of new cards, in cents.
    #[serde(default = "default_card_limit_cents")]
    pub card_limit_cents: u64,
}

fn default_chain_id() -> u64 {
    BASE_SEPOLIA_CHAIN_ID
}

fn default_card_limit_cents() -> u64 {
    100_000
}

/// Wallet API section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    pub base_url: Url,
    pub api_key: String,
    /// The contractor wallet address.
    pub address: String,
    #[serde(default = "default_chain")]
    pub chain: String,
    #[serde(default = "default_token")]
    pub token: String,
    #[serde(default)]
    pub owner_email: Option<String>,
}

fn default_chain() -> String {
    "base-sepolia".to_owned()
}

fn default_token() -> String {
    "usdc".to_owned()
}

/// Dashboard behaviour, reloaded on SIGHUP.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub treasury_address: Option<String>,
    #[serde(default)]
    pub payroll_backend_url: Option<Url>,
    #[serde(default)]
    pub settlement_policy: SettlementPolicy,
    #[serde(default)]
    pub bank_label: Option<String>,
    #[serde(default)]
    pub employer_label: Option<String>,
}
