//! Accountant entity - A user entitled to review filed plans.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Accountant database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accountant")]
pub struct Model {
    /// Unique identifier for the accountant
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Login credentials backing this accountant
    #[sea_orm(unique)]
    pub user_id: Uuid,
    /// Display name
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
