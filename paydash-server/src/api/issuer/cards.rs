use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use kanau::processor::Processor;
use paydash_core::issuing::{IssueCard, ListCards};
use paydash_sdk::objects::CreateCardBody;

use super::IssuerApiError;
use crate::state::AppState;

/// `POST /users/{user_id}/cards` — issue a virtual card.
pub(super) async fn create_card(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<CreateCardBody>,
) -> Result<impl IntoResponse, IssuerApiError> {
    let card = state
        .issuing
        .process(IssueCard {
            user_id,
            display_name: body.wallet_email,
        })
        .await
        .map_err(IssuerApiError::failed("Failed to create card"))?;

    Ok((StatusCode::CREATED, Json(card)))
}

/// `GET /users/{user_id}/cards`
pub(super) async fn list_cards(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, IssuerApiError> {
    let cards = state
        .issuing
        .process(ListCards { user_id })
        .await
        .map_err(IssuerApiError::failed("Failed to fetch cards"))?;

    Ok(Json(cards))
}
