#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]
#![forbid(unsafe_code)]

pub mod config;
pub mod events;
pub mod flows;
pub mod framework;
pub mod issuer;
pub mod issuing;
pub mod processors;
pub mod state;
pub mod store;
pub mod utils;
pub mod wallet;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
