//! Cancelled hours worked entity.
//!
//! Cancelling a registration books two reversing transfers; this row links
//! them to the original entry. An entry can be cancelled at most once.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cancelled hours database model
#[derive(Clone, Copy, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cancelled_hours_worked")]
pub struct Model {
    /// Unique identifier for the cancellation
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The registration being reversed
    #[sea_orm(unique)]
    pub registered_entry: Uuid,
    /// Reversal of the work-certificates transfer
    pub transfer_of_work_certificates: Uuid,
    /// Reversal of the taxes transfer
    pub transfer_of_taxes: Uuid,
    /// When the entry was cancelled
    pub cancelled_on: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::registered_hours_worked::Entity",
        from = "Column::RegisteredEntry",
        to = "super::registered_hours_worked::Column::Id"
    )]
    RegisteredEntry,
}

impl Related<super::registered_hours_worked::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RegisteredEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
