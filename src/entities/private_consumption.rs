//! Private consumption entity - A member's consumption of a plan's product.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Private consumption database model
#[derive(Clone, Copy, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "private_consumption")]
pub struct Model {
    /// Unique identifier for the consumption event
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The consumed plan
    pub plan_id: Uuid,
    /// The consumption transfer that paid for the units
    pub transfer_of_consumption: Uuid,
    /// The compensation transfer, present when the plan cooperates and its
    /// price differs from the cooperative price
    pub transfer_of_compensation: Option<Uuid>,
    /// Number of units consumed
    pub amount: i64,
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
        belongs_to = "super::transfer::Entity",
        from = "Column::TransferOfConsumption",
        to = "super::transfer::Column::Id"
    )]
    ConsumptionTransfer,
}

impl Related<super::plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
