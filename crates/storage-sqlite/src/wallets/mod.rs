mod model;
mod repository;

pub use model::{TransactionDB, WalletDB};
pub use repository::WalletRepository;
