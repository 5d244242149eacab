//! Coordination transfer request entity.
//!
//! A pending handover of coordination from the requesting tenure to a
//! candidate company. The request is closed implicitly once its tenure is no
//! longer the current one.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Coordination transfer request database model
#[derive(Clone, Copy, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "coordination_transfer_request")]
pub struct Model {
    /// Unique identifier for the request
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The tenure handing over coordination
    pub requesting_tenure: Uuid,
    /// The company asked to take over
    pub candidate: Uuid,
    /// When the handover was requested
    pub request_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::coordination_tenure::Entity",
        from = "Column::RequestingTenure",
        to = "super::coordination_tenure::Column::Id"
    )]
    RequestingTenure,
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::Candidate",
        to = "super::company::Column::Id"
    )]
    Candidate,
}

impl Related<super::coordination_tenure::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RequestingTenure.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
