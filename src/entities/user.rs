//! User entity - Login credentials shared across roles.
//!
//! A single user row may back a member, a company and an accountant at the
//! same time (same email address, same password hash). Role tables reference
//! this row through their unique `user_id` column.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Login credentials database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    /// Unique identifier for the credentials
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Email address used to log in, unique across all users
    #[sea_orm(unique)]
    pub email_address: String,
    /// Argon2 hash of the user's password
    pub password_hash: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each user refers to exactly one email address row
    #[sea_orm(
        belongs_to = "super::email::Entity",
        from = "Column::EmailAddress",
        to = "super::email::Column::Address"
    )]
    Email,
}

impl Related<super::email::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Email.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
