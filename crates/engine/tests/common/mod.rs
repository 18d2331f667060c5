#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, Database, DatabaseConnection, EntityTrait};
use uuid::Uuid;

use engine::{
    Engine, Participant, ParticipantRef, Transaction, TransactionKind, accounts,
    internal_accounts, participants, profiles, transactions, wallets,
};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .unwrap()
}

/// A user account with profile, wallet and wallet participant.
pub struct Member {
    pub account_id: Uuid,
    pub wallet_id: Uuid,
    pub participant_id: Uuid,
}

pub async fn account_without_wallet(db: &DatabaseConnection, name: &str, phone: &str) -> Uuid {
    let account_id = Uuid::new_v4();
    accounts::ActiveModel {
        id: ActiveValue::Set(account_id.to_string()),
        password: ActiveValue::Set("$argon2id$placeholder".to_string()),
        created_at: ActiveValue::Set(Utc::now()),
    }
    .insert(db)
    .await
    .unwrap();
    profiles::ActiveModel {
        account_id: ActiveValue::Set(account_id.to_string()),
        full_name: ActiveValue::Set(name.to_string()),
        phone: ActiveValue::Set(phone.to_string()),
        avatar: ActiveValue::Set(Some(format!("{}.png", name.to_lowercase()))),
        verified: ActiveValue::Set(true),
    }
    .insert(db)
    .await
    .unwrap();
    account_id
}

pub async fn member(db: &DatabaseConnection, name: &str, phone: &str) -> Member {
    let account_id = account_without_wallet(db, name, phone).await;
    let wallet_id = Uuid::new_v4();
    wallets::ActiveModel {
        id: ActiveValue::Set(wallet_id.to_string()),
        account_id: ActiveValue::Set(account_id.to_string()),
        balance: ActiveValue::Set(10_000),
    }
    .insert(db)
    .await
    .unwrap();
    let participant = Participant::new(ParticipantRef::Wallet { wallet_id });
    participants::ActiveModel::from(&participant)
        .insert(db)
        .await
        .unwrap();

    Member {
        account_id,
        wallet_id,
        participant_id: participant.id,
    }
}

/// An internal account and its participant id.
pub async fn internal(db: &DatabaseConnection, name: &str) -> Uuid {
    let internal_account_id = Uuid::new_v4();
    internal_accounts::ActiveModel {
        id: ActiveValue::Set(internal_account_id.to_string()),
        name: ActiveValue::Set(name.to_string()),
        avatar: ActiveValue::Set(Some("system.png".to_string())),
    }
    .insert(db)
    .await
    .unwrap();
    let participant = Participant::new(ParticipantRef::Internal {
        internal_account_id,
    });
    participants::ActiveModel::from(&participant)
        .insert(db)
        .await
        .unwrap();
    participant.id
}

/// A participant whose reference points to nothing.
pub async fn dangling(db: &DatabaseConnection) -> Uuid {
    let participant = Participant::new(ParticipantRef::Internal {
        internal_account_id: Uuid::new_v4(),
    });
    participants::ActiveModel::from(&participant)
        .insert(db)
        .await
        .unwrap();
    participant.id
}

pub async fn record(
    db: &DatabaseConnection,
    sender: Uuid,
    receiver: Uuid,
    kind: TransactionKind,
    total: i64,
    created_at: DateTime<Utc>,
) -> Uuid {
    let tx = Transaction::new(sender, receiver, kind, total, created_at).unwrap();
    transactions::ActiveModel::from(&tx)
        .insert(db)
        .await
        .unwrap();
    tx.id
}

/// Removes the profile of an account, leaving its wallet in place.
pub async fn drop_profile(db: &DatabaseConnection, account_id: Uuid) {
    profiles::Entity::delete_by_id(account_id.to_string())
        .exec(db)
        .await
        .unwrap();
}
