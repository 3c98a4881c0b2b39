//! HTTP API handlers.
//!
//! - [`issuer`]: thin proxy over the card-issuance API
//! - [`dashboard`]: the contractor dashboard actions and its state stream

pub mod dashboard;
pub mod issuer;

#[cfg(test)]
pub(crate) mod test_support;
