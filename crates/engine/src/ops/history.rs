//! Transaction history of an account, seen from that account.

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Direction, EngineError, ParticipantKind, ResultEngine, Transaction, TransactionKind,
    transactions,
};

use super::{Engine, Identity, with_tx};

/// A transaction as shown to one of its participants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTransaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub total: i64,
    pub direction: Direction,
    pub counterparty_kind: ParticipantKind,
    pub counterparty: Identity,
    pub created_at: DateTime<Utc>,
}

/// Newest calendar day first, then newest first inside a day.
///
/// Days are cut at midnight of `day_boundary`; the id only breaks exact ties.
fn sort_by_day(txs: &mut [Transaction], day_boundary: FixedOffset) {
    let day = |tx: &Transaction| tx.created_at.with_timezone(&day_boundary).date_naive();
    txs.sort_by(|a, b| {
        day(b)
            .cmp(&day(a))
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| b.id.cmp(&a.id))
    });
}

impl Engine {
    /// Lists the transactions the account took part in and did not delete
    /// from its own view.
    ///
    /// Each item carries the direction relative to the account and the
    /// resolved identity of the other side. An account without a wallet
    /// participant has an empty history.
    pub async fn history(
        &self,
        viewer_account_id: Uuid,
    ) -> ResultEngine<Vec<ResolvedTransaction>> {
        with_tx!(self, |db_tx| {
            match self.account_participant(&db_tx, viewer_account_id).await? {
                None => {
                    tracing::debug!(%viewer_account_id, "account has no wallet participant");
                    Ok(Vec::new())
                }
                Some(viewer) => {
                    let viewer_id = viewer.to_string();
                    let models = transactions::Entity::find()
                        .filter(
                            Condition::any()
                                .add(
                                    Condition::all()
                                        .add(
                                            transactions::Column::SenderParticipantId
                                                .eq(viewer_id.clone()),
                                        )
                                        .add(transactions::Column::DeletedForSenderAt.is_null()),
                                )
                                .add(
                                    Condition::all()
                                        .add(
                                            transactions::Column::ReceiverParticipantId
                                                .eq(viewer_id),
                                        )
                                        .add(transactions::Column::DeletedForReceiverAt.is_null()),
                                ),
                        )
                        .order_by_desc(transactions::Column::CreatedAt)
                        .order_by_desc(transactions::Column::Id)
                        .all(&db_tx)
                        .await?;

                    let mut txs = models
                        .into_iter()
                        .map(Transaction::try_from)
                        .collect::<ResultEngine<Vec<_>>>()?;
                    sort_by_day(&mut txs, self.day_boundary);

                    let mut sides = Vec::with_capacity(txs.len());
                    for tx in &txs {
                        let side = tx
                            .side_of(viewer)
                            .filter(|side| tx.is_visible_to(*side))
                            .ok_or_else(|| {
                                EngineError::IntegrityViolation(format!(
                                    "transaction {} is not visible to the viewer",
                                    tx.id
                                ))
                            })?;
                        sides.push(side);
                    }

                    let counterparty_ids: Vec<Uuid> = txs
                        .iter()
                        .zip(&sides)
                        .map(|(tx, side)| tx.counterparty(*side))
                        .collect();
                    let resolved = self
                        .resolve_participants_in(&db_tx, &counterparty_ids)
                        .await?;

                    let mut out = Vec::with_capacity(txs.len());
                    for ((tx, side), counterparty_id) in
                        txs.into_iter().zip(sides).zip(counterparty_ids)
                    {
                        let counterparty = resolved.get(&counterparty_id).ok_or_else(|| {
                            EngineError::IntegrityViolation(format!(
                                "counterparty {counterparty_id} not resolved"
                            ))
                        })?;
                        out.push(ResolvedTransaction {
                            id: tx.id,
                            kind: tx.kind,
                            total: tx.total,
                            direction: side.direction(),
                            counterparty_kind: counterparty.kind,
                            counterparty: counterparty.identity.clone(),
                            created_at: tx.created_at,
                        });
                    }

                    tracing::debug!(%viewer_account_id, items = out.len(), "history resolved");
                    Ok(out)
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn tx_at(created_at: DateTime<Utc>) -> Transaction {
        Transaction::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            TransactionKind::Transfer,
            100,
            created_at,
        )
        .unwrap()
    }

    #[test]
    fn later_day_comes_first_across_midnight() {
        let before = tx_at(Utc.with_ymd_and_hms(2024, 1, 2, 23, 59, 0).unwrap());
        let after = tx_at(Utc.with_ymd_and_hms(2024, 1, 3, 0, 1, 0).unwrap());
        let mut txs = vec![before.clone(), after.clone()];

        sort_by_day(&mut txs, FixedOffset::east_opt(0).unwrap());

        assert_eq!(txs[0].id, after.id);
        assert_eq!(txs[1].id, before.id);
    }

    #[test]
    fn same_day_is_ordered_by_timestamp() {
        let morning = tx_at(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap());
        let evening = tx_at(Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap());
        let yesterday = tx_at(Utc.with_ymd_and_hms(2024, 4, 30, 23, 0, 0).unwrap());
        let mut txs = vec![morning.clone(), yesterday.clone(), evening.clone()];

        sort_by_day(&mut txs, FixedOffset::east_opt(0).unwrap());

        let ids: Vec<Uuid> = txs.iter().map(|tx| tx.id).collect();
        assert_eq!(ids, vec![evening.id, morning.id, yesterday.id]);
    }

    #[test]
    fn day_boundary_offset_moves_midnight() {
        // 23:30 UTC on the 1st is already the 2nd at UTC+1.
        let late = tx_at(Utc.with_ymd_and_hms(2024, 5, 1, 23, 30, 0).unwrap());
        let early = tx_at(Utc.with_ymd_and_hms(2024, 5, 2, 0, 10, 0).unwrap());
        let mut txs = vec![early.clone(), late.clone()];

        sort_by_day(&mut txs, FixedOffset::east_opt(3600).unwrap());

        assert_eq!(txs[0].id, early.id);
        assert_eq!(txs[1].id, late.id);
    }
}
