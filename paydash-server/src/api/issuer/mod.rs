//! Card-issuer proxy handlers.
//!
//! Each route validates its identifying parameters, forwards a single call
//! to the issuer (the contracts read is retried) and answers with the
//! issuer's data. Failures other than validation are logged and surface as
//! a generic 500.
//!
//! # Endpoints
//!
//! - `POST /users`                   – create or reuse the issuer user of a wallet
//! - `GET  /users/{user_id}/balances`  – credit balances, passthrough
//! - `GET  /users/{user_id}/contracts` – the user's contract on `chainId`
//! - `POST /users/{user_id}/contracts` – deploy the contract (409 counts as success)
//! - `POST /users/{user_id}/cards`     – issue a virtual card
//! - `GET  /users/{user_id}/cards`     – list the user's cards

use axum::{
    Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use paydash_core::issuing::IssuingError;
use paydash_sdk::objects::ErrorBody;

use crate::state::AppState;

mod balances;
mod cards;
mod contracts;
mod users;

/// Build the issuer proxy router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", post(users::register_user))
        .route("/users/{user_id}/balances", get(balances::get_balances))
        .route(
            "/users/{user_id}/contracts",
            get(contracts::get_contract).post(contracts::create_contract),
        )
        .route(
            "/users/{user_id}/cards",
            get(cards::list_cards).post(cards::create_card),
        )
}

// ---------------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------------

/// Errors returned by the issuer proxy handlers.
#[derive(Debug)]
enum IssuerApiError {
    /// The operation failed; `failure` is the message shown to the caller
    /// when the cause is not a validation error.
    Issuing {
        source: IssuingError,
        failure: &'static str,
    },
    /// The issuer has nothing for the request.
    NotFound(&'static str),
}

impl IssuerApiError {
    fn failed(failure: &'static str) -> impl FnOnce(IssuingError) -> Self {
        move |source| IssuerApiError::Issuing { source, failure }
    }
}

impl IntoResponse for IssuerApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            IssuerApiError::Issuing {
                source: IssuingError::Validation(message),
                ..
            } => (StatusCode::BAD_REQUEST, Json(ErrorBody::new(message))).into_response(),
            IssuerApiError::Issuing { source, failure } => {
                tracing::error!(error = %source, "{failure}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody::new(failure)),
                )
                    .into_response()
            }
            IssuerApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(ErrorBody::new(message))).into_response()
            }
        }
    }
}
