//! Participant resolution.
//!
//! Turns participant ids into the name, avatar and phone to show for them.
//! Lookups are batched: one query for the participant rows and one query per
//! participant kind, whatever the number of ids.

use std::collections::{BTreeSet, HashMap};

use sea_orm::{DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, Participant, ParticipantKind, ParticipantRef, ResultEngine, internal_accounts,
    participants, participants::parse_stored_id, profiles, wallets,
};

use super::{Engine, with_tx};

/// How a participant is shown to the other side of a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub avatar: Option<String>,
    /// Always `None` for internal accounts.
    pub phone: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedParticipant {
    pub participant_id: Uuid,
    pub kind: ParticipantKind,
    pub identity: Identity,
}

/// Loads identities for one participant kind, keyed by the referenced id.
///
/// Ids missing from the returned map do not address an existing row. A row
/// that exists but cannot be shown is an `IntegrityViolation`.
trait IdentitySource {
    const KIND: ParticipantKind;

    async fn load(
        db: &DatabaseTransaction,
        ref_ids: Vec<String>,
    ) -> ResultEngine<HashMap<Uuid, Identity>>;
}

struct WalletIdentities;

impl IdentitySource for WalletIdentities {
    const KIND: ParticipantKind = ParticipantKind::Wallet;

    async fn load(
        db: &DatabaseTransaction,
        ref_ids: Vec<String>,
    ) -> ResultEngine<HashMap<Uuid, Identity>> {
        let rows: Vec<(wallets::Model, Option<profiles::Model>)> = wallets::Entity::find()
            .filter(wallets::Column::Id.is_in(ref_ids))
            .find_also_related(profiles::Entity)
            .all(db)
            .await?;

        let mut out = HashMap::with_capacity(rows.len());
        for (wallet, profile) in rows {
            let Some(profile) = profile else {
                tracing::error!(wallet_id = %wallet.id, "wallet owner has no profile");
                return Err(EngineError::IntegrityViolation(format!(
                    "wallet {} has no owner profile",
                    wallet.id
                )));
            };
            out.insert(
                parse_stored_id(&wallet.id, "wallet id")?,
                Identity {
                    name: profile.full_name,
                    avatar: profile.avatar,
                    phone: Some(profile.phone),
                },
            );
        }
        Ok(out)
    }
}

struct InternalIdentities;

impl IdentitySource for InternalIdentities {
    const KIND: ParticipantKind = ParticipantKind::Internal;

    async fn load(
        db: &DatabaseTransaction,
        ref_ids: Vec<String>,
    ) -> ResultEngine<HashMap<Uuid, Identity>> {
        let rows = internal_accounts::Entity::find()
            .filter(internal_accounts::Column::Id.is_in(ref_ids))
            .all(db)
            .await?;

        rows.into_iter()
            .map(|account| {
                Ok((
                    parse_stored_id(&account.id, "internal account id")?,
                    Identity {
                        name: account.name,
                        avatar: account.avatar,
                        phone: None,
                    },
                ))
            })
            .collect()
    }
}

fn ref_ids_of(participants: &[Participant], kind: ParticipantKind) -> Vec<String> {
    participants
        .iter()
        .filter(|p| p.target.kind() == kind)
        .map(|p| p.target.ref_id().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

impl Engine {
    /// Resolves a single participant.
    pub async fn resolve_participant(
        &self,
        participant_id: Uuid,
    ) -> ResultEngine<ResolvedParticipant> {
        let mut resolved = self.resolve_participants(&[participant_id]).await?;
        resolved
            .remove(&participant_id)
            .ok_or_else(|| EngineError::KeyNotFound("participant not exists".to_string()))
    }

    /// Resolves a batch of participants.
    ///
    /// Fails with `KeyNotFound` if one of the ids is not a participant, and
    /// with `IntegrityViolation` if a participant points to a wallet or an
    /// internal account that does not exist, or to a wallet whose owner has
    /// no profile.
    pub async fn resolve_participants(
        &self,
        participant_ids: &[Uuid],
    ) -> ResultEngine<HashMap<Uuid, ResolvedParticipant>> {
        with_tx!(self, |db_tx| {
            self.resolve_participants_in(&db_tx, participant_ids).await
        })
    }

    pub(super) async fn resolve_participants_in(
        &self,
        db: &DatabaseTransaction,
        participant_ids: &[Uuid],
    ) -> ResultEngine<HashMap<Uuid, ResolvedParticipant>> {
        let wanted: BTreeSet<Uuid> = participant_ids.iter().copied().collect();
        if wanted.is_empty() {
            return Ok(HashMap::new());
        }

        let models = participants::Entity::find()
            .filter(participants::Column::Id.is_in(wanted.iter().map(Uuid::to_string)))
            .all(db)
            .await?;
        let participants = models
            .into_iter()
            .map(Participant::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        if participants.len() != wanted.len() {
            return Err(EngineError::KeyNotFound(
                "participant not exists".to_string(),
            ));
        }

        let wallet_ids = ref_ids_of(&participants, WalletIdentities::KIND);
        let wallets = if wallet_ids.is_empty() {
            HashMap::new()
        } else {
            WalletIdentities::load(db, wallet_ids).await?
        };
        let internal_ids = ref_ids_of(&participants, InternalIdentities::KIND);
        let internals = if internal_ids.is_empty() {
            HashMap::new()
        } else {
            InternalIdentities::load(db, internal_ids).await?
        };

        let mut out = HashMap::with_capacity(participants.len());
        for participant in participants {
            let identities = match participant.target {
                ParticipantRef::Wallet { .. } => &wallets,
                ParticipantRef::Internal { .. } => &internals,
            };
            let kind = participant.target.kind();
            let ref_id = participant.target.ref_id();
            let Some(identity) = identities.get(&ref_id) else {
                tracing::error!(
                    participant_id = %participant.id,
                    kind = kind.as_str(),
                    %ref_id,
                    "dangling participant reference"
                );
                return Err(EngineError::IntegrityViolation(format!(
                    "participant {} references missing {} {}",
                    participant.id,
                    kind.as_str(),
                    ref_id
                )));
            };
            out.insert(
                participant.id,
                ResolvedParticipant {
                    participant_id: participant.id,
                    kind,
                    identity: identity.clone(),
                },
            );
        }
        Ok(out)
    }
}
