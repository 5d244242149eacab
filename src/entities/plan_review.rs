//! Plan review entity - Approval state of a filed plan.
//!
//! Exactly one review row exists per plan. `approval_date` and
//! `rejection_date` are mutually exclusive; both unset means the plan is
//! awaiting review.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Plan review database model
#[derive(Clone, Copy, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plan_review")]
pub struct Model {
    /// Unique identifier for the review
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The reviewed plan
    #[sea_orm(unique)]
    pub plan_id: Uuid,
    /// When the plan was approved; approval activates the plan
    pub approval_date: Option<DateTimeUtc>,
    /// When the plan was rejected
    pub rejection_date: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plan::Entity",
        from = "Column::PlanId",
        to = "super::plan::Column::Id"
    )]
    Plan,
}

impl Related<super::plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
