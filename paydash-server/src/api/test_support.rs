//! In-process router harness for handler tests.

use crate::server::build_router;
use crate::state::AppState;
use axum::{
    Router,
    body::Body,
    http::{Request, header},
    response::Response,
};
use paydash_core::config::{ConfigStore, DashboardConfig};
use paydash_core::flows::{Dashboard, DashboardDeps};
use paydash_core::issuing::IssuerProcessor;
use paydash_core::processors::BalancePollerConfig;
use paydash_core::store::MemoryStore;
use paydash_core::testing::{FakeIssuer, FakeWallet};
use paydash_sdk::objects::BASE_SEPOLIA_CHAIN_ID;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::watch;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub wallet: Arc<FakeWallet>,
    pub issuer: Arc<FakeIssuer>,
    pub dashboard: Arc<Dashboard>,
    _shutdown_tx: watch::Sender<bool>,
}

impl TestApp {
    /// An app whose treasury is `0xTreasury`.
    pub fn new(wallet: FakeWallet, issuer: FakeIssuer) -> Self {
        Self::with_config(
            wallet,
            issuer,
            DashboardConfig {
                treasury_address: Some("0xTreasury".to_owned()),
                ..DashboardConfig::default()
            },
        )
    }

    pub fn with_config(wallet: FakeWallet, issuer: FakeIssuer, config: DashboardConfig) -> Self {
        let wallet = Arc::new(wallet);
        let issuer = Arc::new(issuer);
        let issuing = Arc::new(IssuerProcessor::new(
            issuer.clone(),
            Arc::new(MemoryStore::new()),
        ));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let dashboard = Arc::new(Dashboard::start(
            DashboardDeps {
                wallet: wallet.clone(),
                issuing: issuing.clone(),
                config: ConfigStore::new(config),
                chain_id: BASE_SEPOLIA_CHAIN_ID,
                owner_email: Some("owner@example.com".to_owned()),
                http: reqwest::Client::new(),
            },
            BalancePollerConfig::default(),
            shutdown_rx,
        ));

        let router = build_router(AppState::new(
            issuing,
            dashboard.clone(),
            BASE_SEPOLIA_CHAIN_ID,
        ));

        Self {
            router,
            wallet,
            issuer,
            dashboard,
            _shutdown_tx: shutdown_tx,
        }
    }

    pub async fn get(&self, uri: &str) -> Response {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn post(&self, uri: &str, body: Value) -> Response {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn post_empty(&self, uri: &str) -> Response {
        let request = Request::post(uri).body(Body::empty()).unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
