//! Social accounting entity - The accounting authority singleton.
//!
//! Holds the authority's own ledger account and the public sector fund
//! account (`account_psf`). Exactly one row is expected; it is seeded when
//! the database is initialized.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Social accounting database model
#[derive(Clone, Copy, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "social_accounting")]
pub struct Model {
    /// Unique identifier for the row
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The accounting authority's account
    pub account: Uuid,
    /// The public sector fund account, credited by taxes and debited when
    /// public-service plans are approved
    pub account_psf: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
