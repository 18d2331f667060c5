mod common;

use chrono::Utc;
use engine::{Direction, EngineError, ParticipantKind, TransactionKind};
use uuid::Uuid;

use common::{at, engine_with_db, internal, member, record};

#[tokio::test]
async fn payment_to_internal_account_is_a_debit_without_phone() {
    let (engine, db) = engine_with_db().await;
    let alice = member(&db, "Alice", "+390000001").await;
    let shop = internal(&db, "Prospect Store").await;

    let tx_id = record(
        &db,
        alice.participant_id,
        shop,
        TransactionKind::Payment,
        500,
        at(2024, 5, 1, 10, 0),
    )
    .await;

    let history = engine.history(alice.account_id).await.unwrap();
    assert_eq!(history.len(), 1);

    let item = &history[0];
    assert_eq!(item.id, tx_id);
    assert_eq!(item.kind, TransactionKind::Payment);
    assert_eq!(item.total, 500);
    assert_eq!(item.direction, Direction::Debit);
    assert_eq!(item.counterparty_kind, ParticipantKind::Internal);
    assert_eq!(item.counterparty.name, "Prospect Store");
    assert_eq!(item.counterparty.avatar.as_deref(), Some("system.png"));
    assert_eq!(item.counterparty.phone, None);
    assert_eq!(item.created_at, at(2024, 5, 1, 10, 0));
}

#[tokio::test]
async fn transfer_between_wallets_has_opposite_directions() {
    let (engine, db) = engine_with_db().await;
    let alice = member(&db, "Alice", "+390000001").await;
    let bob = member(&db, "Bob", "+390000002").await;

    record(
        &db,
        alice.participant_id,
        bob.participant_id,
        TransactionKind::Transfer,
        1200,
        at(2024, 5, 1, 10, 0),
    )
    .await;

    let alice_view = engine.history(alice.account_id).await.unwrap();
    assert_eq!(alice_view.len(), 1);
    assert_eq!(alice_view[0].direction, Direction::Debit);
    assert_eq!(alice_view[0].counterparty_kind, ParticipantKind::Wallet);
    assert_eq!(alice_view[0].counterparty.name, "Bob");
    assert_eq!(alice_view[0].counterparty.phone.as_deref(), Some("+390000002"));
    assert_eq!(alice_view[0].counterparty.avatar.as_deref(), Some("bob.png"));

    let bob_view = engine.history(bob.account_id).await.unwrap();
    assert_eq!(bob_view.len(), 1);
    assert_eq!(bob_view[0].direction, Direction::Credit);
    assert_eq!(bob_view[0].counterparty.name, "Alice");
    assert_eq!(bob_view[0].counterparty.phone.as_deref(), Some("+390000001"));
}

#[tokio::test]
async fn top_up_from_internal_account_is_a_credit() {
    let (engine, db) = engine_with_db().await;
    let alice = member(&db, "Alice", "+390000001").await;
    let bank = internal(&db, "Top-up Gateway").await;

    record(
        &db,
        bank,
        alice.participant_id,
        TransactionKind::TopUp,
        10_000,
        at(2024, 5, 1, 9, 0),
    )
    .await;

    let history = engine.history(alice.account_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].direction, Direction::Credit);
    assert_eq!(history[0].counterparty_kind, ParticipantKind::Internal);
    assert_eq!(history[0].counterparty.phone, None);
}

#[tokio::test]
async fn history_only_lists_the_viewer_transactions() {
    let (engine, db) = engine_with_db().await;
    let alice = member(&db, "Alice", "+390000001").await;
    let bob = member(&db, "Bob", "+390000002").await;
    let carol = member(&db, "Carol", "+390000003").await;

    record(
        &db,
        bob.participant_id,
        carol.participant_id,
        TransactionKind::Transfer,
        300,
        at(2024, 5, 1, 10, 0),
    )
    .await;
    let mine = record(
        &db,
        carol.participant_id,
        alice.participant_id,
        TransactionKind::Transfer,
        700,
        at(2024, 5, 2, 10, 0),
    )
    .await;

    let history = engine.history(alice.account_id).await.unwrap();
    let ids: Vec<Uuid> = history.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![mine]);
}

#[tokio::test]
async fn history_is_grouped_by_day_newest_first() {
    let (engine, db) = engine_with_db().await;
    let alice = member(&db, "Alice", "+390000001").await;
    let bob = member(&db, "Bob", "+390000002").await;
    let shop = internal(&db, "Store").await;

    let late_on_second = record(
        &db,
        alice.participant_id,
        bob.participant_id,
        TransactionKind::Transfer,
        100,
        at(2024, 1, 2, 23, 59),
    )
    .await;
    let early_on_third = record(
        &db,
        bob.participant_id,
        alice.participant_id,
        TransactionKind::Transfer,
        200,
        at(2024, 1, 3, 0, 1),
    )
    .await;
    let morning_on_second = record(
        &db,
        alice.participant_id,
        shop,
        TransactionKind::Payment,
        300,
        at(2024, 1, 2, 8, 0),
    )
    .await;

    let history = engine.history(alice.account_id).await.unwrap();
    let ids: Vec<Uuid> = history.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![early_on_third, late_on_second, morning_on_second]);
}

#[tokio::test]
async fn account_without_wallet_has_empty_history() {
    let (engine, db) = engine_with_db().await;
    let lonely = common::account_without_wallet(&db, "Dave", "+390000004").await;

    assert!(engine.history(lonely).await.unwrap().is_empty());
    assert!(engine.history(Uuid::new_v4()).await.unwrap().is_empty());
}

#[tokio::test]
async fn dangling_counterparty_fails_the_history() {
    let (engine, db) = engine_with_db().await;
    let alice = member(&db, "Alice", "+390000001").await;
    let ghost = common::dangling(&db).await;

    record(
        &db,
        alice.participant_id,
        ghost,
        TransactionKind::Payment,
        50,
        Utc::now(),
    )
    .await;

    let err = engine.history(alice.account_id).await.unwrap_err();
    assert!(matches!(err, EngineError::IntegrityViolation(_)));
}

#[tokio::test]
async fn counterparty_without_profile_fails_the_history() {
    let (engine, db) = engine_with_db().await;
    let alice = member(&db, "Alice", "+390000001").await;
    let bob = member(&db, "Bob", "+390000002").await;

    record(
        &db,
        bob.participant_id,
        alice.participant_id,
        TransactionKind::Transfer,
        75,
        Utc::now(),
    )
    .await;
    common::drop_profile(&db, bob.account_id).await;

    let err = engine.history(alice.account_id).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::IntegrityViolation(format!("wallet {} has no owner profile", bob.wallet_id))
    );
}
