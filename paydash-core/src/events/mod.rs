//! Signals exchanged between the dashboard components.
//!
//! Two kinds of channels exist:
//!
//! - The [`EventBus`], a broadcast channel of [`DashboardEvent`]s. Any
//!   component may publish and every subscriber sees every event. This is
//!   where `OfframpSucceeded` and `DepositAddressDiscovered` travel.
//! - Point-to-point command channels (`mpsc`) with a single consumer, such
//!   as [`BalanceCommand`] which only the balance poller reads.

pub mod bus;
pub mod channels;

pub use bus::EventBus;
pub use channels::{
    BalanceCommand, BalanceCommandReceiver, BalanceCommandSender, DEFAULT_CHANNEL_BUFFER,
    balance_command_channel,
};
pub use paydash_sdk::objects::DashboardEvent;
