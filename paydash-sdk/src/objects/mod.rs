pub mod dashboard;
pub mod issuer;
pub mod proxy;
pub mod wallet;

pub use dashboard::{
    ActivityDirection, ActivityEntry, AmountRequest, CardBalance, CardStatus, DashboardEvent,
    DashboardSnapshot, TransferAccepted, TransferStatus, WsServerMessage,
};
pub use issuer::{
    ApplicantAddress, ApplicationRequest, Card, CardLimit, CreateCardRequest,
    CreateContractRequest, IssuerUser, UserApplication, UserContract, UserCreditBalances,
};
pub use proxy::{
    ContractCreated, ContractsQuery, CreateCardBody, CreateContractBody, ErrorBody,
    RegisterUserRequest, RegisteredUser,
};
pub use wallet::{
    ActivityEvent, ActivityFeed, TokenAmount, TokenBalance, TransferReceipt, TransferRequest,
    WalletBalances,
};

/// Chain id of Base Sepolia, the network the card contracts live on.
pub const BASE_SEPOLIA_CHAIN_ID: u64 = 84532;
