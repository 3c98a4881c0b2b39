//! Key-value persistence for the small amount of state the dashboard keeps.
//!
//! Two things are stored:
//!
//! - the wallet address → issuer user id mapping ([`USER_IDS`] namespace),
//!   so repeated registrations reuse the same issuer user;
//! - the last four digits of the card ([`DISPLAY`] namespace, key
//!   [`CARD_LAST4`]), used as a display fallback only.
//!
//! Callers receive an `Arc<dyn KeyValueStore>` so the backend is chosen once
//! at startup.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{GetKvEntry, KvEntry, PgStore, UpsertKvEntry};

use async_trait::async_trait;
use thiserror::Error;

/// Namespace of the wallet address → issuer user id mapping.
pub const USER_IDS: &str = "issuer_user_ids";
/// Namespace of values that only feed the UI.
pub const DISPLAY: &str = "display";
/// Key of the cached card last-4 in [`DISPLAY`].
pub const CARD_LAST4: &str = "card_last4";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, StoreError>;

    /// Insert or overwrite.
    async fn put(&self, namespace: &str, key: &str, value: &str) -> Result<(), StoreError>;
}
