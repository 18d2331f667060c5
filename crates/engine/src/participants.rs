//! Transaction participants.
//!
//! A [`Participant`] is the indirection the ledger uses for both sides of a
//! [`Transaction`](crate::Transaction): it points either to a wallet (a user)
//! or to an internal account (the system, a merchant). The pair
//! `(kind, ref_id)` is fixed at creation and never rewritten.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantKind {
    Wallet,
    Internal,
}

impl ParticipantKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wallet => "wallet",
            Self::Internal => "internal",
        }
    }
}

impl TryFrom<&str> for ParticipantKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "wallet" => Ok(Self::Wallet),
            "internal" => Ok(Self::Internal),
            other => Err(EngineError::IntegrityViolation(format!(
                "invalid participant kind: {other}"
            ))),
        }
    }
}

/// What a participant stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParticipantRef {
    Wallet { wallet_id: Uuid },
    Internal { internal_account_id: Uuid },
}

impl ParticipantRef {
    pub fn kind(&self) -> ParticipantKind {
        match self {
            Self::Wallet { .. } => ParticipantKind::Wallet,
            Self::Internal { .. } => ParticipantKind::Internal,
        }
    }

    /// Id of the wallet or internal account behind the reference.
    pub fn ref_id(&self) -> Uuid {
        match *self {
            Self::Wallet { wallet_id } => wallet_id,
            Self::Internal {
                internal_account_id,
            } => internal_account_id,
        }
    }

    fn from_parts(kind: ParticipantKind, ref_id: Uuid) -> Self {
        match kind {
            ParticipantKind::Wallet => Self::Wallet { wallet_id: ref_id },
            ParticipantKind::Internal => Self::Internal {
                internal_account_id: ref_id,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    pub target: ParticipantRef,
}

impl Participant {
    pub fn new(target: ParticipantRef) -> Self {
        Self {
            id: Uuid::new_v4(),
            target,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "participants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    pub ref_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Participant> for ActiveModel {
    fn from(value: &Participant) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            kind: ActiveValue::Set(value.target.kind().as_str().to_string()),
            ref_id: ActiveValue::Set(value.target.ref_id().to_string()),
        }
    }
}

impl TryFrom<Model> for Participant {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let kind = ParticipantKind::try_from(model.kind.as_str())?;
        Ok(Self {
            id: parse_stored_id(&model.id, "participant id")?,
            target: ParticipantRef::from_parts(kind, parse_stored_id(&model.ref_id, "ref_id")?),
        })
    }
}

/// Ids are written by the engine, so a malformed one means a corrupted row.
pub(crate) fn parse_stored_id(raw: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|_| EngineError::IntegrityViolation(format!("invalid {label}: {raw}")))
}
