//! Dashboard API handlers.
//!
//! Every action runs against the single [`Dashboard`] runtime held in
//! [`AppState`]; progress after the response (transfer settlement, card
//! balance polling) is observable through `GET /` or the WebSocket.
//!
//! # Endpoints
//!
//! - `GET  /`          – current dashboard snapshot
//! - `POST /claim`     – claim payroll
//! - `POST /offramp`   – send USDC to the treasury, credited to the bank
//! - `POST /card`      – create the virtual card
//! - `POST /card/fund` – send USDC to the card's deposit address
//! - `GET  /activity`  – labelled activity feed
//! - `GET  /ws`        – snapshot and event stream
//!
//! [`Dashboard`]: paydash_core::flows::Dashboard

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use paydash_core::flows::FlowError;
use paydash_core::issuing::IssuingError;
use paydash_sdk::objects::ErrorBody;

use crate::state::AppState;

mod actions;
mod activity;
mod ws;

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_snapshot))
        .route("/claim", post(actions::claim))
        .route("/offramp", post(actions::offramp))
        .route("/card", post(actions::create_card))
        .route("/card/fund", post(actions::fund_card))
        .route("/activity", get(activity::get_activity))
        .route("/ws", get(ws::dashboard_ws))
}

/// `GET /` — the current dashboard snapshot.
async fn get_snapshot(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.dashboard.state().snapshot())
}

// ---------------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------------

/// A failed dashboard action.
#[derive(Debug)]
struct DashboardApiError(FlowError);

impl From<FlowError> for DashboardApiError {
    fn from(e: FlowError) -> Self {
        DashboardApiError(e)
    }
}

impl IntoResponse for DashboardApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            FlowError::InvalidAmount
            | FlowError::TreasuryNotConfigured
            | FlowError::NoDepositAddress
            | FlowError::Issuing(IssuingError::Validation(_)) => StatusCode::BAD_REQUEST,
            FlowError::Busy(_) => StatusCode::CONFLICT,
            FlowError::Wallet(_)
            | FlowError::Issuing(_)
            | FlowError::PollerStopped => {
                tracing::error!(error = %self.0, "Dashboard action failed");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody::new("internal server error")),
                )
                    .into_response();
            }
        };
        (status, Json(ErrorBody::new(self.0.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{TestApp, read_json};
    use axum::http::StatusCode;
    use paydash_core::config::DashboardConfig;
    use paydash_core::testing::{FakeIssuer, FakeWallet, activity_event, usdc_balance};
    use paydash_sdk::objects::ActivityFeed;
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_formats_wallet_balance() {
        let wallet = FakeWallet::new("0xWallet");
        wallet.balances.set_fallback(Ok(usdc_balance(Decimal::new(12345, 3))));
        let app = TestApp::new(wallet, FakeIssuer::new());

        // Let the poller take its baseline reading.
        tokio::time::sleep(Duration::from_millis(10)).await;

        let response = app.get("/api/v1/dashboard").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["wallet_address"], "0xWallet");
        assert_eq!(body["wallet_balance"], "12.35");
        assert_eq!(body["offramp_status"], "idle");
    }

    #[tokio::test(start_paused = true)]
    async fn test_offramp_accepted_and_credited() {
        let wallet = FakeWallet::new("0xWallet");
        wallet.activity.set_fallback(Ok(ActivityFeed {
            events: vec![activity_event("0xfeed", "0xTreasury", "12.5", 0)],
        }));
        let app = TestApp::new(wallet, FakeIssuer::new());

        let response = app
            .post("/api/v1/dashboard/offramp", json!({"amount": "12.5"}))
            .await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let body = read_json(response).await;
        assert_eq!(body["transaction_hash"], "0xfeed");
        assert_eq!(body["status"], "processing");
        assert_eq!(
            app.wallet.sent(),
            vec![("0xTreasury".to_owned(), Decimal::new(125, 1))]
        );

        tokio::time::sleep(Duration::from_millis(10)).await;
        let snapshot = app.dashboard.state().snapshot();
        assert_eq!(snapshot.bank_balance, "12.50");
    }

    #[tokio::test(start_paused = true)]
    async fn test_offramp_rejects_non_positive_amount() {
        let app = TestApp::new(FakeWallet::new("0xWallet"), FakeIssuer::new());

        let response = app
            .post("/api/v1/dashboard/offramp", json!({"amount": "0"}))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(app.wallet.sent().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_offramp_without_treasury_is_400() {
        let app = TestApp::with_config(
            FakeWallet::new("0xWallet"),
            FakeIssuer::new(),
            DashboardConfig::default(),
        );

        let response = app
            .post("/api/v1/dashboard/offramp", json!({"amount": "5"}))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            read_json(response).await,
            json!({"error": "treasury address is not configured"})
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_offramp_wallet_failure_is_500() {
        let wallet = FakeWallet::new("0xWallet");
        wallet.send.set_fallback(Err(reqwest::StatusCode::BAD_GATEWAY));
        let app = TestApp::new(wallet, FakeIssuer::new());

        let response = app
            .post("/api/v1/dashboard/offramp", json!({"amount": "5"}))
            .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            app.dashboard.state().snapshot().offramp_status,
            paydash_sdk::objects::TransferStatus::Error
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_fund_card_without_deposit_address_is_400() {
        let app = TestApp::new(FakeWallet::new("0xWallet"), FakeIssuer::new());

        let response = app
            .post("/api/v1/dashboard/card/fund", json!({"amount": "10"}))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            read_json(response).await,
            json!({"error": "Please enter a valid amount and ensure deposit address is available"})
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_claim_returns_snapshot() {
        let app = TestApp::new(FakeWallet::new("0xWallet"), FakeIssuer::new());

        let response = app.post_empty("/api/v1/dashboard/claim").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["claiming"], false);
        assert_eq!(body["claim_succeeded"], true);
    }
}
