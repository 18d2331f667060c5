//! Transaction history API endpoints

use api_types::transaction::{
    CounterpartyKind, Direction, HistoryEntry, HistoryResponse, TransactionKind as ApiKind,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::AuthenticatedAccount, server::ServerState};

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Transfer => ApiKind::Transfer,
        engine::TransactionKind::TopUp => ApiKind::TopUp,
        engine::TransactionKind::Payment => ApiKind::Payment,
        engine::TransactionKind::Withdrawal => ApiKind::Withdrawal,
    }
}

fn map_direction(direction: engine::Direction) -> Direction {
    match direction {
        engine::Direction::Debit => Direction::Debit,
        engine::Direction::Credit => Direction::Credit,
    }
}

fn map_counterparty_kind(kind: engine::ParticipantKind) -> CounterpartyKind {
    match kind {
        engine::ParticipantKind::Wallet => CounterpartyKind::Wallet,
        engine::ParticipantKind::Internal => CounterpartyKind::Internal,
    }
}

/// History of the calling account.
pub async fn history(
    Extension(AuthenticatedAccount(account_id)): Extension<AuthenticatedAccount>,
    State(state): State<ServerState>,
) -> Result<Json<HistoryResponse>, ServerError> {
    tracing::debug!(%account_id, "history requested");
    let items = state.engine.history(account_id).await?;

    let transactions = items
        .into_iter()
        .map(|item| HistoryEntry {
            id: item.id,
            kind: map_kind(item.kind),
            total: item.total,
            direction: map_direction(item.direction),
            counterparty_kind: map_counterparty_kind(item.counterparty_kind),
            counterparty_name: item.counterparty.name,
            counterparty_avatar: item.counterparty.avatar,
            counterparty_phone: item.counterparty.phone,
            created_at: item.created_at,
        })
        .collect();

    Ok(Json(HistoryResponse {
        account_id,
        transactions,
    }))
}

/// Remove a transaction from the calling account's history.
pub async fn soft_delete(
    Extension(AuthenticatedAccount(account_id)): Extension<AuthenticatedAccount>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    tracing::debug!(%account_id, transaction_id = %id, "soft delete requested");
    state
        .engine
        .soft_delete_transaction(account_id, id, Utc::now())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
