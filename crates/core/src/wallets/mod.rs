//! Wallet ledger module - balances, transactions, service, and traits.

mod wallets_errors;
mod wallets_model;
mod wallets_service;
mod wallets_traits;


pub use wallets_errors::LedgerError;
pub use wallets_model::{
    generate_reference, BalanceDelta, NewTransactionEntry, PaymentMethod, Transaction,
    TransactionStatus, TransactionType, Wallet, WalletDisplay,
};
pub use wallets_service::WalletService;
pub use wallets_traits::{WalletRepositoryTrait, WalletServiceTrait};
