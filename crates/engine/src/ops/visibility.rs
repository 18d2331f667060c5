use chrono::{DateTime, Utc};
use sea_orm::{
    Condition, QueryFilter, TransactionTrait,
    prelude::*,
    sea_query::{Expr, Func, SimpleExpr},
};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, transactions};

use super::{Engine, with_tx};

/// `CASE WHEN <side> = participant THEN COALESCE(<deleted>, at) ELSE <deleted> END`
///
/// Only the column of the side the participant occupies is touched, and a
/// timestamp already set is kept.
fn hide_for_side(
    side: transactions::Column,
    deleted: transactions::Column,
    participant_id: &str,
    at: DateTime<Utc>,
) -> SimpleExpr {
    Expr::case(
        side.eq(participant_id),
        Func::coalesce([Expr::col(deleted).into(), Expr::val(at).into()]),
    )
    .finally(Expr::col(deleted))
    .into()
}

impl Engine {
    /// Hides a transaction from the caller's own history (soft delete).
    ///
    /// Sets `deleted_for_sender_at` or `deleted_for_receiver_at`, whichever
    /// matches the caller's participant, in one conditional update. Calling it
    /// again is a no-op. The other party's view is never affected.
    ///
    /// Fails with `KeyNotFound` if the transaction does not exist and with
    /// `Forbidden` if the caller is on neither side.
    pub async fn soft_delete_transaction(
        &self,
        caller_account_id: Uuid,
        transaction_id: Uuid,
        deleted_at: DateTime<Utc>,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let rows_affected = match self.account_participant(&db_tx, caller_account_id).await? {
                Some(caller) => {
                    let caller = caller.to_string();
                    transactions::Entity::update_many()
                        .col_expr(
                            transactions::Column::DeletedForSenderAt,
                            hide_for_side(
                                transactions::Column::SenderParticipantId,
                                transactions::Column::DeletedForSenderAt,
                                &caller,
                                deleted_at,
                            ),
                        )
                        .col_expr(
                            transactions::Column::DeletedForReceiverAt,
                            hide_for_side(
                                transactions::Column::ReceiverParticipantId,
                                transactions::Column::DeletedForReceiverAt,
                                &caller,
                                deleted_at,
                            ),
                        )
                        .filter(transactions::Column::Id.eq(transaction_id.to_string()))
                        .filter(
                            Condition::any()
                                .add(transactions::Column::SenderParticipantId.eq(caller.clone()))
                                .add(transactions::Column::ReceiverParticipantId.eq(caller)),
                        )
                        .exec(&db_tx)
                        .await?
                        .rows_affected
                }
                None => 0,
            };

            if rows_affected == 0 {
                // Nothing matched: tell "no such transaction" from "not yours".
                self.require_transaction(&db_tx, transaction_id).await?;
                tracing::warn!(
                    %caller_account_id,
                    %transaction_id,
                    "soft delete refused: caller is not a participant"
                );
                Err(EngineError::Forbidden(
                    "transaction does not belong to the caller".to_string(),
                ))
            } else {
                tracing::info!(%caller_account_id, %transaction_id, "transaction hidden");
                Ok(())
            }
        })
    }
}
