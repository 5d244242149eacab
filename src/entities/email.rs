//! Email address entity.
//!
//! The address itself is the primary key. `confirmed_on` is set once the
//! owner has followed a confirmation link; an unconfirmed address is `None`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Email address database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "email")]
pub struct Model {
    /// The address, unique by construction
    #[sea_orm(primary_key, auto_increment = false)]
    pub address: String,
    /// When the address was confirmed, if ever
    pub confirmed_on: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One email address backs at most one set of login credentials
    #[sea_orm(has_many = "super::user::Entity")]
    Users,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
