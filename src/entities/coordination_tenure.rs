//! Coordination tenure entity.
//!
//! Records that a company coordinates a cooperation from `start_date` on.
//! The current coordinator is the tenure with the latest start date; older
//! tenures are kept as history.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Coordination tenure database model
#[derive(Clone, Copy, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "coordination_tenure")]
pub struct Model {
    /// Unique identifier for the tenure
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The coordinating company
    pub company: Uuid,
    /// The coordinated cooperation
    pub cooperation: Uuid,
    /// When this tenure began
    pub start_date: DateTimeUtc,
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
        belongs_to = "super::cooperation::Entity",
        from = "Column::Cooperation",
        to = "super::cooperation::Column::Id"
    )]
    Cooperation,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::cooperation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cooperation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
