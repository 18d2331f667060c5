//! The module contains the `wallets` entity.
//!
//! A wallet holds the balance of exactly one account. It never appears in a
//! transaction directly: the ledger always references it through a
//! [`participant`](crate::participants).

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub account_id: String,
    pub balance: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Account,
    /// Wallet and profile share the owning account id.
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::AccountId",
        to = "super::profiles::Column::AccountId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    OwnerProfile,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OwnerProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
