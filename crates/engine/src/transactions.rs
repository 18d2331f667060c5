//! Transaction primitives.
//!
//! A `Transaction` moves `total` from a sender participant to a receiver
//! participant. Once written, only the two per-side deletion timestamps
//! change.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, participants::parse_stored_id};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Transfer,
    TopUp,
    Payment,
    Withdrawal,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transfer => "transfer",
            Self::TopUp => "top_up",
            Self::Payment => "payment",
            Self::Withdrawal => "withdrawal",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "transfer" => Ok(Self::Transfer),
            "top_up" => Ok(Self::TopUp),
            "payment" => Ok(Self::Payment),
            "withdrawal" => Ok(Self::Withdrawal),
            other => Err(EngineError::IntegrityViolation(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

/// Money leaving (`Debit`) or reaching (`Credit`) the viewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Debit,
    Credit,
}

/// The side a participant occupies in a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Sender,
    Receiver,
}

impl Side {
    pub fn direction(self) -> Direction {
        match self {
            Self::Sender => Direction::Debit,
            Self::Receiver => Direction::Credit,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub sender_participant_id: Uuid,
    pub receiver_participant_id: Uuid,
    pub kind: TransactionKind,
    pub total: i64,
    pub created_at: DateTime<Utc>,
    pub deleted_for_sender_at: Option<DateTime<Utc>>,
    pub deleted_for_receiver_at: Option<DateTime<Utc>>,
}

impl Transaction {
    pub fn new(
        sender_participant_id: Uuid,
        receiver_participant_id: Uuid,
        kind: TransactionKind,
        total: i64,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if total <= 0 {
            return Err(EngineError::InvalidAmount("total must be > 0".to_string()));
        }
        if sender_participant_id == receiver_participant_id {
            return Err(EngineError::InvalidAmount(
                "sender and receiver must differ".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            sender_participant_id,
            receiver_participant_id,
            kind,
            total,
            created_at,
            deleted_for_sender_at: None,
            deleted_for_receiver_at: None,
        })
    }

    /// Which side `participant_id` is on, if any.
    pub fn side_of(&self, participant_id: Uuid) -> Option<Side> {
        if self.sender_participant_id == participant_id {
            Some(Side::Sender)
        } else if self.receiver_participant_id == participant_id {
            Some(Side::Receiver)
        } else {
            None
        }
    }

    /// The participant on the other side of `side`.
    pub fn counterparty(&self, side: Side) -> Uuid {
        match side {
            Side::Sender => self.receiver_participant_id,
            Side::Receiver => self.sender_participant_id,
        }
    }

    pub fn is_visible_to(&self, side: Side) -> bool {
        match side {
            Side::Sender => self.deleted_for_sender_at.is_none(),
            Side::Receiver => self.deleted_for_receiver_at.is_none(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub sender_participant_id: String,
    pub receiver_participant_id: String,
    pub kind: String,
    pub total: i64,
    pub created_at: DateTimeUtc,
    pub deleted_for_sender_at: Option<DateTimeUtc>,
    pub deleted_for_receiver_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::participants::Entity",
        from = "Column::SenderParticipantId",
        to = "super::participants::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Sender,
    #[sea_orm(
        belongs_to = "super::participants::Entity",
        from = "Column::ReceiverParticipantId",
        to = "super::participants::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Receiver,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            sender_participant_id: ActiveValue::Set(tx.sender_participant_id.to_string()),
            receiver_participant_id: ActiveValue::Set(tx.receiver_participant_id.to_string()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            total: ActiveValue::Set(tx.total),
            created_at: ActiveValue::Set(tx.created_at),
            deleted_for_sender_at: ActiveValue::Set(tx.deleted_for_sender_at),
            deleted_for_receiver_at: ActiveValue::Set(tx.deleted_for_receiver_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_stored_id(&model.id, "transaction id")?,
            sender_participant_id: parse_stored_id(&model.sender_participant_id, "sender")?,
            receiver_participant_id: parse_stored_id(&model.receiver_participant_id, "receiver")?,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            total: model.total,
            created_at: model.created_at,
            deleted_for_sender_at: model.deleted_for_sender_at,
            deleted_for_receiver_at: model.deleted_for_receiver_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn rejects_non_positive_total() {
        let err = Transaction::new(Uuid::new_v4(), Uuid::new_v4(), TransactionKind::Payment, 0, at())
            .unwrap_err();
        assert_eq!(err, EngineError::InvalidAmount("total must be > 0".to_string()));
    }

    #[test]
    fn rejects_same_participant_on_both_sides() {
        let id = Uuid::new_v4();
        let err = Transaction::new(id, id, TransactionKind::Transfer, 100, at()).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidAmount("sender and receiver must differ".to_string())
        );
    }

    #[test]
    fn direction_and_counterparty_follow_the_side() {
        let (sender, receiver) = (Uuid::new_v4(), Uuid::new_v4());
        let tx = Transaction::new(sender, receiver, TransactionKind::Transfer, 500, at()).unwrap();

        let side = tx.side_of(sender).unwrap();
        assert_eq!(side.direction(), Direction::Debit);
        assert_eq!(tx.counterparty(side), receiver);

        let side = tx.side_of(receiver).unwrap();
        assert_eq!(side.direction(), Direction::Credit);
        assert_eq!(tx.counterparty(side), sender);

        assert_eq!(tx.side_of(Uuid::new_v4()), None);
    }

    #[test]
    fn visibility_is_per_side() {
        let mut tx =
            Transaction::new(Uuid::new_v4(), Uuid::new_v4(), TransactionKind::Payment, 1, at())
                .unwrap();
        tx.deleted_for_sender_at = Some(at());

        assert!(!tx.is_visible_to(Side::Sender));
        assert!(tx.is_visible_to(Side::Receiver));
    }
}
