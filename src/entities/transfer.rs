//! Transfer entity - The ledger record.
//!
//! Every movement of labour-time certificates is a transfer of `value` hours
//! from `debit_account` to `credit_account`. Rows are immutable once
//! written; corrections are expressed as further transfers in the opposite
//! direction. Account balances are derived by summing credits and debits.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What a transfer was booked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum TransferType {
    /// Means-of-production credit granted at plan approval
    #[sea_orm(string_value = "credit_p")]
    CreditP,
    /// Raw-materials credit granted at plan approval
    #[sea_orm(string_value = "credit_r")]
    CreditR,
    /// Labour credit granted at plan approval
    #[sea_orm(string_value = "credit_a")]
    CreditA,
    /// Means-of-production credit for a public-service plan, drawn on the
    /// public sector fund
    #[sea_orm(string_value = "credit_public_p")]
    CreditPublicP,
    /// Raw-materials credit for a public-service plan
    #[sea_orm(string_value = "credit_public_r")]
    CreditPublicR,
    /// Labour credit for a public-service plan
    #[sea_orm(string_value = "credit_public_a")]
    CreditPublicA,
    /// A member consuming a product
    #[sea_orm(string_value = "private_consumption")]
    PrivateConsumption,
    /// A company consuming fixed means of production
    #[sea_orm(string_value = "productive_consumption_p")]
    ProductiveConsumptionP,
    /// A company consuming raw materials
    #[sea_orm(string_value = "productive_consumption_r")]
    ProductiveConsumptionR,
    /// Price difference owed to the cooperation when the cooperative price
    /// exceeds the plan's individual price
    #[sea_orm(string_value = "compensation_for_coop")]
    CompensationForCoop,
    /// Price difference owed to the planning company when its individual
    /// price exceeds the cooperative price
    #[sea_orm(string_value = "compensation_for_company")]
    CompensationForCompany,
    /// Work certificates paid by a company to a worker
    #[sea_orm(string_value = "work_certificates")]
    WorkCertificates,
    /// The public-sector contribution withheld from paid work certificates
    #[sea_orm(string_value = "taxes")]
    Taxes,
}

/// Transfer database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transfer")]
pub struct Model {
    /// Unique identifier for the transfer
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// When the transfer was booked
    pub date: DateTimeUtc,
    /// The account the value is taken from
    pub debit_account: Uuid,
    /// The account the value is given to
    pub credit_account: Uuid,
    /// Amount in labour-time hours, non-negative
    pub value: Decimal,
    /// What the transfer was booked for
    pub transfer_type: TransferType,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::DebitAccount",
        to = "super::account::Column::Id"
    )]
    DebitAccount,
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::CreditAccount",
        to = "super::account::Column::Id"
    )]
    CreditAccount,
}

impl ActiveModelBehavior for ActiveModel {}
