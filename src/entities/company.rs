//! Company entity - A producing company with its four typed accounts.
//!
//! Every company owns one account per sphere: `p_account` for fixed means of
//! production, `r_account` for raw materials, `a_account` for labour and
//! `prd_account` for finished product.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Company database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "company")]
pub struct Model {
    /// Unique identifier for the company
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Login credentials backing this company
    #[sea_orm(unique)]
    pub user_id: Uuid,
    /// Display name
    pub name: String,
    /// Account for fixed means of production
    pub p_account: Uuid,
    /// Account for raw materials
    pub r_account: Uuid,
    /// Account for labour
    pub a_account: Uuid,
    /// Account for finished product
    pub prd_account: Uuid,
    /// When the company registered
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
    /// Plans filed by this company
    #[sea_orm(has_many = "super::plan::Entity")]
    Plans,
    /// Employment associations of this company
    #[sea_orm(has_many = "super::job::Entity")]
    Jobs,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plans.def()
    }
}

impl Related<super::job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Jobs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
