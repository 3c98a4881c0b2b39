//! Command channel factories.

use tokio::sync::mpsc;

/// Buffer size for command channels.
pub const DEFAULT_CHANNEL_BUFFER: usize = 256;

/// Commands accepted by the payroll balance poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceCommand {
    /// A salary claim was submitted; poll aggressively until funds land.
    ClaimStarted,
    /// Poll once, right now.
    Refresh,
}

pub type BalanceCommandSender = mpsc::Sender<BalanceCommand>;
pub type BalanceCommandReceiver = mpsc::Receiver<BalanceCommand>;

/// Create the command channel of the balance poller.
pub fn balance_command_channel() -> (BalanceCommandSender, BalanceCommandReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}
