//! Cooperation entity - A group of plans sharing one product and one price.
//!
//! A cooperation owns a ledger account that absorbs price-difference
//! compensations between its plans. Who coordinates it is recorded in
//! `coordination_tenure`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cooperation database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cooperation")]
pub struct Model {
    /// Unique identifier for the cooperation
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// When the cooperation was created
    pub creation_date: DateTimeUtc,
    /// Name, unique among cooperations
    pub name: String,
    /// Free-text definition of the shared product
    pub definition: String,
    /// The cooperation's compensation account
    pub account: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::plan_cooperation::Entity")]
    Plans,
    #[sea_orm(has_many = "super::coordination_tenure::Entity")]
    Tenures,
}

impl Related<super::plan_cooperation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plans.def()
    }
}

impl Related<super::coordination_tenure::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenures.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
