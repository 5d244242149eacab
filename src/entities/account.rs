//! Account entity - A bare ledger account.
//!
//! Accounts carry no stored balance. The balance of an account is always
//! derived from the `transfer` table: sum of credited values minus sum of
//! debited values.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ledger account database model
#[derive(Clone, Copy, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "account")]
pub struct Model {
    /// Unique identifier for the account
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
