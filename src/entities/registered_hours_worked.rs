//! Registered hours worked entity.
//!
//! One row per registration, pointing at the two transfers it produced: the
//! work certificates paid to the worker and the public-sector contribution
//! withheld from them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Registered hours database model
#[derive(Clone, Copy, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "registered_hours_worked")]
pub struct Model {
    /// Unique identifier for the registration
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The company the hours were worked at
    pub company: Uuid,
    /// The worker who worked them
    pub member: Uuid,
    /// The work-certificates transfer (company labour account to worker)
    pub transfer_of_work_certificates: Uuid,
    /// The taxes transfer (worker to public sector fund)
    pub transfer_of_taxes: Uuid,
    /// When the hours were registered
    pub registered_on: DateTimeUtc,
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
