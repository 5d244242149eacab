//! Company work invite entity - A pending employment invitation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Work invite database model
#[derive(Clone, Copy, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "company_work_invite")]
pub struct Model {
    /// Unique identifier for the invite
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The inviting company
    pub company: Uuid,
    /// The invited member
    pub member: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::Company",
        to = "super::company::Column::Id"
    )]
    Company,
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::Member",
        to = "super::member::Column::Id"
    )]
    Member,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
