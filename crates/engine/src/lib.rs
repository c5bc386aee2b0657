//! Ledger mutation engine.
//!
//! Transaction create/update/delete mutate the transaction record and exactly
//! one balance-bearing record (account, credit card, or investment valuation)
//! inside a single database transaction. Statistics are read-only
//! aggregations over a date range.
//!
//! Balance-bearing rows carry no version column: two units touching the same
//! account commit last-write-wins. [`Engine::recompute_balances`] replays the
//! ledger to restore the denormalized values.

pub use accounts::Account;
pub use attachments::Attachment;
pub use categories::Category;
pub use commands::{CreateTransactionCmd, UpdateTransactionCmd};
pub use credit_cards::CreditCard;
pub use error::EngineError;
pub use investments::{Investment, Performance};
pub use ops::{
    CategoryBreakdown, DailyPoint, Engine, EngineBuilder, StatsOverview, StatsPeriod,
    TransactionListFilter, TransactionPage, TransactionStats,
};
pub use transactions::{Transaction, TransactionKind};

mod accounts;
mod attachments;
mod categories;
mod commands;
mod credit_cards;
mod error;
mod investments;
mod ops;
mod transactions;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
