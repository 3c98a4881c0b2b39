//! Application state shared across all request handlers.

use paydash_core::flows::Dashboard;
use paydash_core::issuing::IssuerProcessor;
use std::sync::Arc;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Issuer operations behind the proxy routes.
    pub issuing: Arc<IssuerProcessor>,
    /// The dashboard runtime driven by the dashboard routes.
    pub dashboard: Arc<Dashboard>,
    /// Chain used when a contracts request does not name one.
    pub chain_id: u64,
}

impl AppState {
    pub fn new(issuing: Arc<IssuerProcessor>, dashboard: Arc<Dashboard>, chain_id: u64) -> Self {
        Self {
            issuing,
            dashboard,
            chain_id,
        }
    }
}
