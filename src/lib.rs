//! Ledger transaction settlement engine.
//!
//! Models monetary movements as typed, stateful [`TransactionRecord`]s and
//! settles them against a balance store exactly once. The three moving
//! parts are the [`TransactionBuilder`] (drafting records), the
//! [`SettlementEngine`] (the one-shot `Waiting -> Finished | Failed`
//! transition) and the [`FeeGenerator`] (derived fee transactions computed
//! from a parent's settled amount).
//!
//! Balances and durable records live behind the [`BalanceStore`] and
//! [`TransactionRepository`] traits; in-memory implementations are
//! provided for embedding and tests.
//!
//! ```
//! use std::sync::Arc;
//!
//! use ledger_settlement::{
//!     BalanceStore, EntityKind, EntityRef, InMemoryBalanceStore, InMemoryRepository,
//!     Monetary, SettlementEngine, TransactionAction, TransactionBuilder,
//!     TransactionRepository, TransactionStatus,
//! };
//!
//! let balances = Arc::new(InMemoryBalanceStore::new());
//! let repository = Arc::new(InMemoryRepository::new());
//! let engine = SettlementEngine::new(balances.clone(), repository.clone());
//!
//! balances.credit(7, 840, Monetary::from_minor_units(10_000)).unwrap();
//!
//! let record = TransactionBuilder::new(
//!     EntityRef::new(EntityKind::Payment, 1),
//!     Monetary::from_minor_units(5_000),
//! )
//! .user(7)
//! .currency(840)
//! .action(TransactionAction::Take)
//! .status(TransactionStatus::Waiting)
//! .build()
//! .unwrap();
//!
//! let transaction_id = repository.save(record).unwrap();
//! let settled = engine.settle(transaction_id).unwrap();
//!
//! assert_eq!(settled.status, TransactionStatus::Finished);
//! assert_eq!(balances.balance_of(7, 840), Monetary::from_minor_units(5_000));
//! ```

pub mod engine;
pub mod models;
pub mod storage;
pub mod types;

pub use engine::{FeeGenerator, SettlementEngine};
pub use models::errors::TransactionError;
pub use models::{
    EntityKind, EntityRef, TransactionAction, TransactionBuilder, TransactionRecord,
    TransactionStatus, TransactionType,
};
pub use storage::{BalanceStore, InMemoryBalanceStore, InMemoryRepository, TransactionRepository};
pub use types::{percent_of, Clock, Monetary, Percent, SystemClock};
