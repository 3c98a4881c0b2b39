//! Configuration types for PayDash.
//!
//! These types represent the validated runtime configuration used by the
//! server and the dashboard runtime. The actual config loading/parsing is
//! handled by the server crate.

mod config_store;
mod dashboard;
mod issuer;
mod server;
mod wallet;

pub use config_store::ConfigStore;
pub use dashboard::DashboardConfig;
pub use issuer::IssuerConfig;
pub use server::ServerConfig;
pub use wallet::WalletConfig;
