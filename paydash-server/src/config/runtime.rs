//! Runtime configuration re-exports.
//!
//! The validated config types are defined in `paydash-core::config`.

pub use paydash_core::config::{DashboardConfig, IssuerConfig, ServerConfig, WalletConfig};
