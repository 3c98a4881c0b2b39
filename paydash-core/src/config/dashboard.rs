//! Dashboard behaviour configuration.
//!
//! This is the only section that is hot-reloaded on SIGHUP; the flows read
//! it through a [`ConfigStore`](super::ConfigStore) on every invocation.

use crate::processors::transaction_watcher::SettlementPolicy;
use url::Url;

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Treasury wallet that receives offramped USDC.
    pub treasury_address: Option<String>,
    /// Payroll backend asked to fund the wallet on claim.
    pub payroll_backend_url: Option<Url>,
    /// What a transaction watcher reports when it times out.
    pub settlement_policy: SettlementPolicy,
    /// Label of the mock bank account offramps are paid into.
    pub bank_label: String,
    /// Label of the payroll source shown for incoming transfers.
    pub employer_label: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            treasury_address: None,
            payroll_backend_url: None,
            settlement_policy: SettlementPolicy::default(),
            bank_label: "NovaBank · Ending 9820".to_owned(),
            employer_label: "GlobalTech - Contract".to_owned(),
        }
    }
}
