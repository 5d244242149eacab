//! Plan/cooperation association entity.
//!
//! The plan is the primary key, so a plan belongs to at most one
//! cooperation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Plan/cooperation association database model
#[derive(Clone, Copy, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plan_cooperation")]
pub struct Model {
    /// The cooperating plan
    #[sea_orm(primary_key, auto_increment = false)]
    pub plan_id: Uuid,
    /// The cooperation the plan belongs to
    pub cooperation_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plan::Entity",
        from = "Column::PlanId",
        to = "super::plan::Column::Id"
    )]
    Plan,
    #[sea_orm(
        belongs_to = "super::cooperation::Entity",
        from = "Column::CooperationId",
        to = "super::cooperation::Column::Id"
    )]
    Cooperation,
}

impl Related<super::plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plan.def()
    }
}

impl Related<super::cooperation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cooperation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
