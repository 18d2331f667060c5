use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Transfer,
        TopUp,
        Payment,
        Withdrawal,
    }

    /// Money leaving (`debit`) or reaching (`credit`) the requesting account.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Direction {
        Debit,
        Credit,
    }

    /// `wallet` for another user, `internal` for the system or a merchant.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CounterpartyKind {
        Wallet,
        Internal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HistoryEntry {
        pub id: Uuid,
        pub kind: TransactionKind,
        pub total: i64,
        pub direction: Direction,
        pub counterparty_kind: CounterpartyKind,
        pub counterparty_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub counterparty_avatar: Option<String>,
        /// Never present for internal counterparties.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub counterparty_phone: Option<String>,
        /// RFC3339 timestamp, UTC.
        pub created_at: DateTime<Utc>,
    }

    /// Response of `GET /users/transactions`.
    ///
    /// Entries are grouped by day, newest day first, newest first within a day.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct HistoryResponse {
        pub account_id: Uuid,
        pub transactions: Vec<HistoryEntry>,
    }
}
