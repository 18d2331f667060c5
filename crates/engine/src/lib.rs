//! Ledger engine.
//!
//! Reads the transaction history of an account, resolving each counterparty
//! through its participant, and hides transactions from one side of the
//! ledger without touching the other.

pub use error::EngineError;
pub use ops::{Engine, EngineBuilder, Identity, ResolvedParticipant, ResolvedTransaction};
pub use participants::{Participant, ParticipantKind, ParticipantRef};
pub use transactions::{Direction, Side, Transaction, TransactionKind};

pub mod accounts;
mod error;
pub mod internal_accounts;
mod ops;
pub mod participants;
pub mod profiles;
pub mod transactions;
pub mod wallets;

type ResultEngine<T> = Result<T, EngineError>;
