//! Request and response types of the issuer proxy routes.
//!
//! Identifying fields are optional on the request side so that a missing
//! value can be answered with a 400 and a readable message instead of a
//! deserialization rejection.

use serde::{Deserialize, Serialize};

/// `POST /users` request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    #[serde(default)]
    pub wallet_address: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// `POST /users` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    #[serde(rename = "rainUserId")]
    pub issuer_user_id: String,
    pub application_status: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// `POST /users/{id}/contracts` request body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContractBody {
    #[serde(default)]
    pub chain_id: Option<u64>,
}

/// `POST /users/{id}/contracts` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCreated {
    pub success: bool,
    pub message: String,
}

/// `GET /users/{id}/contracts` query string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractsQuery {
    #[serde(default)]
    pub chain_id: Option<u64>,
}

/// `POST /users/{id}/cards` request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardBody {
    #[serde(default)]
    pub wallet_email: Option<String>,
}

/// JSON error body returned by every route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
