//! Member entity - A working and consuming member of the economy.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Member database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "member")]
pub struct Model {
    /// Unique identifier for the member
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Login credentials backing this member
    #[sea_orm(unique)]
    pub user_id: Uuid,
    /// Display name
    pub name: String,
    /// The member's certificate account
    pub account: Uuid,
    /// When the member registered
    pub registered_on: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::Account",
        to = "super::account::Column::Id"
    )]
    Account,
    /// Employment associations of this member
    #[sea_orm(has_many = "super::job::Entity")]
    Jobs,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Jobs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
