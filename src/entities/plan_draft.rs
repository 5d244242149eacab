//! Plan draft entity - A production plan that has not been filed yet.
//!
//! Drafts are private to the planning company and carry the same payload as
//! a filed plan. Filing converts the draft into a `plan` row with an open
//! review and deletes the draft.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Plan draft database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plan_draft")]
pub struct Model {
    /// Unique identifier for the draft
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// When the draft was created
    pub creation_date: DateTimeUtc,
    /// The company drafting the plan
    pub planner: Uuid,
    /// Planned cost of fixed means of production
    pub costs_p: Decimal,
    /// Planned cost of raw materials
    pub costs_r: Decimal,
    /// Planned cost of labour
    pub costs_a: Decimal,
    /// Name of the product
    pub product_name: String,
    /// Unit the product is distributed in
    pub product_unit: String,
    /// Number of units to be produced
    pub amount: i64,
    /// Free-text description of the product
    pub description: String,
    /// Production period in days
    pub timeframe_days: i32,
    /// Whether the product is given away as a public service
    pub is_public_service: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::Planner",
        to = "super::company::Column::Id"
    )]
    Planner,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Planner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
