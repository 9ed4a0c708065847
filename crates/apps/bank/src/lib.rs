//! Crypto bank app: balance, transaction history, period filters and totals.
//!
//! The ledger is pure state. Balances and transactions are injected by the caller, typically
//! [`demo_transactions`] together with [`DEMO_BALANCE`].

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod demo;
mod ledger;

pub use demo::{demo_ledger, demo_transactions, DEMO_BALANCE};
pub use ledger::{
    BankError, Ledger, Period, Transaction, TransactionIcon, TransactionKind, TransactionStatus,
    USD_PER_CREDIT,
};
