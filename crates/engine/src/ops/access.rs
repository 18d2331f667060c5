use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*, sea_query::Query};
use uuid::Uuid;

use crate::{
    EngineError, ParticipantKind, ResultEngine, participants, participants::parse_stored_id,
    transactions, wallets,
};

use super::Engine;

impl Engine {
    /// Returns the participant standing for the wallet owned by `account_id`.
    ///
    /// An account without a wallet (or whose wallet never took part in the
    /// ledger) has no participant.
    pub(super) async fn account_participant(
        &self,
        db: &DatabaseTransaction,
        account_id: Uuid,
    ) -> ResultEngine<Option<Uuid>> {
        let owned_wallet = Query::select()
            .column((wallets::Entity, wallets::Column::Id))
            .from(wallets::Entity)
            .and_where(wallets::Column::AccountId.eq(account_id.to_string()))
            .to_owned();

        let model = participants::Entity::find()
            .filter(participants::Column::Kind.eq(ParticipantKind::Wallet.as_str()))
            .filter(participants::Column::RefId.in_subquery(owned_wallet))
            .one(db)
            .await?;

        model
            .map(|m| parse_stored_id(&m.id, "participant id"))
            .transpose()
    }

    /// Fails with `KeyNotFound` unless the transaction row exists.
    pub(super) async fn require_transaction(
        &self,
        db: &DatabaseTransaction,
        transaction_id: Uuid,
    ) -> ResultEngine<transactions::Model> {
        transactions::Entity::find_by_id(transaction_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))
    }
}
