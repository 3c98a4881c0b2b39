use axum::{Json, extract::State, response::IntoResponse};
use kanau::processor::Processor;
use paydash_core::issuing::EnsureUser;
use paydash_sdk::objects::RegisterUserRequest;

use super::IssuerApiError;
use crate::state::AppState;

/// `POST /users` — create or reuse the issuer user of a wallet.
///
/// A wallet seen before is answered from the stored mapping. Otherwise the
/// issuer's user list is searched by wallet address, and only when that
/// finds nothing is a new (sandbox auto-approved) application started.
pub(super) async fn register_user(
    State(state): State<AppState>,
    Json(body): Json<RegisterUserRequest>,
) -> Result<impl IntoResponse, IssuerApiError> {
    let user = state
        .issuing
        .process(EnsureUser {
            wallet_address: body.wallet_address.unwrap_or_default(),
            email: body.email,
        })
        .await
        .map_err(IssuerApiError::failed("Failed to start Rain application"))?;

    Ok(Json(user))
}
