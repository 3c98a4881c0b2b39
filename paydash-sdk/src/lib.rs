//! Wire types and HTTP clients shared by the PayDash crates.
//!
//! [`objects`] holds every JSON shape that crosses a process boundary: the
//! wallet API, the card-issuance API, and the dashboard's own HTTP surface.
//! The typed clients live in [`client`] behind the `client` feature.

#![forbid(unsafe_code)]

#[cfg(feature = "client")]
pub mod client;
pub mod objects;
