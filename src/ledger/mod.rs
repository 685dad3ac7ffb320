//! Reward Ledger Module
//!
//! Aggregate balances and the transaction history.
//!
//! ## Module Structure
//!
//! - `stats`: The aggregate balances
//! - `transaction`: History entries
//! - `ledger`: The ledger store and its settlement rule

pub mod stats;
pub mod transaction;
#[allow(clippy::module_inception)]
pub mod ledger;

pub use ledger::{LedgerError, LedgerStore, RewardLedger, SettlementReceipt, DEFAULT_MIN_WITHDRAWAL};
pub use stats::UserStats;
pub use transaction::{Transaction, TransactionKind, TransactionStatus, WithdrawalProvider};
