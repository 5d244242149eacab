//! Plan entity - A filed production plan.
//!
//! A plan's review state lives in the one-to-one `plan_review` row; its
//! cooperation membership lives in `plan_cooperation`. A plan is active from
//! its approval until `timeframe_days` have elapsed.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Plan database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plan")]
pub struct Model {
    /// Unique identifier for the plan
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// When the plan was filed
    pub creation_date: DateTimeUtc,
    /// The company that filed the plan
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
    /// Cooperation this plan has asked to join, cleared on accept/deny
    pub requested_cooperation: Option<Uuid>,
    /// Whether the planner has hidden this expired plan from their listings
    pub hidden_by_user: bool,
}

impl Model {
    /// Total planned production costs.
    #[must_use]
    pub fn total_cost(&self) -> Decimal {
        self.costs_p + self.costs_r + self.costs_a
    }

    /// The sales value the product account is debited with at approval.
    /// Public services give their product away, so nothing is expected back.
    #[must_use]
    pub fn expected_sales_value(&self) -> Decimal {
        if self.is_public_service {
            Decimal::ZERO
        } else {
            self.total_cost()
        }
    }

    /// Labour-time cost of a single unit, zero for a zero amount.
    #[must_use]
    pub fn cost_per_unit(&self) -> Decimal {
        if self.amount == 0 {
            Decimal::ZERO
        } else {
            self.total_cost() / Decimal::from(self.amount)
        }
    }

    /// The individual price of one unit: the cost per unit, or zero for
    /// public services.
    #[must_use]
    pub fn price_per_unit(&self) -> Decimal {
        if self.is_public_service {
            Decimal::ZERO
        } else {
            self.cost_per_unit()
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::Planner",
        to = "super::company::Column::Id"
    )]
    Planner,
    /// Each plan has exactly one review row
    #[sea_orm(has_one = "super::plan_review::Entity")]
    Review,
    #[sea_orm(has_one = "super::plan_cooperation::Entity")]
    Cooperation,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Planner.def()
    }
}

impl Related<super::plan_review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Review.def()
    }
}

impl Related<super::plan_cooperation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cooperation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
