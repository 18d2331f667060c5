//! Initial schema migration.
//!
//! Creates the ledger schema:
//!
//! - `accounts`: credentials owned by the auth layer
//! - `profiles`: public identity of an account (1:1)
//! - `wallets`: balance of an account (at most one per account)
//! - `internal_accounts`: system and merchant counterparties
//! - `participants`: polymorphic reference to a wallet or an internal account
//! - `transactions`: ledger events between two participants, with per-side
//!   soft-delete timestamps

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    Password,
    CreatedAt,
}

#[derive(Iden)]
enum Profiles {
    Table,
    AccountId,
    FullName,
    Phone,
    Avatar,
    Verified,
}

#[derive(Iden)]
enum Wallets {
    Table,
    Id,
    AccountId,
    Balance,
}

#[derive(Iden)]
enum InternalAccounts {
    Table,
    Id,
    Name,
    Avatar,
}

#[derive(Iden)]
enum Participants {
    Table,
    Id,
    Kind,
    RefId,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    SenderParticipantId,
    ReceiverParticipantId,
    Kind,
    Total,
    CreatedAt,
    DeletedForSenderAt,
    DeletedForReceiverAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Accounts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accounts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Accounts::Password).string().not_null())
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Profiles
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profiles::AccountId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Profiles::FullName).string().not_null())
                    .col(ColumnDef::new(Profiles::Phone).string().not_null())
                    .col(ColumnDef::new(Profiles::Avatar).string())
                    .col(
                        ColumnDef::new(Profiles::Verified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-profiles-account_id")
                            .from(Profiles::Table, Profiles::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Wallets
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Wallets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Wallets::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Wallets::AccountId).string().not_null())
                    .col(
                        ColumnDef::new(Wallets::Balance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-wallets-account_id")
                            .from(Wallets::Table, Wallets::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-wallets-account_id-unique")
                    .table(Wallets::Table)
                    .col(Wallets::AccountId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Internal accounts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(InternalAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InternalAccounts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InternalAccounts::Name).string().not_null())
                    .col(ColumnDef::new(InternalAccounts::Avatar).string())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Participants
        // ───────────────────────────────────────────────────────────────────
        // `ref_id` points to `wallets` or `internal_accounts` depending on
        // `kind`, so it cannot carry a foreign key.
        manager
            .create_table(
                Table::create()
                    .table(Participants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Participants::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Participants::Kind)
                            .string()
                            .not_null()
                            .check(Expr::col(Participants::Kind).is_in(["wallet", "internal"])),
                    )
                    .col(ColumnDef::new(Participants::RefId).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-participants-kind-ref_id-unique")
                    .table(Participants::Table)
                    .col(Participants::Kind)
                    .col(Participants::RefId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Transactions::SenderParticipantId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::ReceiverParticipantId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::Total)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(Transactions::Total).gt(0)),
                    )
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::DeletedForSenderAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Transactions::DeletedForReceiverAt)
                            .timestamp_with_time_zone(),
                    )
                    .check(
                        Expr::col(Transactions::SenderParticipantId)
                            .ne(Expr::col(Transactions::ReceiverParticipantId)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-sender_participant_id")
                            .from(Transactions::Table, Transactions::SenderParticipantId)
                            .to(Participants::Table, Participants::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-receiver_participant_id")
                            .from(Transactions::Table, Transactions::ReceiverParticipantId)
                            .to(Participants::Table, Participants::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-sender_participant_id")
                    .table(Transactions::Table)
                    .col(Transactions::SenderParticipantId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-receiver_participant_id")
                    .table(Transactions::Table)
                    .col(Transactions::ReceiverParticipantId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Participants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InternalAccounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Wallets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        Ok(())
    }
}
