//! Ledger account business logic.
//!
//! Accounts store no balance of their own. A balance is always the sum of
//! values credited to the account minus the sum of values debited from it,
//! computed against the `transfer` table. This module provides account
//! creation, balance queries and per-account transfer history.

use crate::{
    entities::{Transfer, account, company, transfer},
    errors::Result,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

/// Creates a fresh, empty ledger account.
pub async fn create_account<C>(db: &C) -> Result<account::Model>
where
    C: ConnectionTrait,
{
    let account = account::ActiveModel {
        id: Set(Uuid::new_v4()),
    };
    account.insert(db).await.map_err(Into::into)
}

/// Computes the balance of an account: credited minus debited.
pub async fn account_balance<C>(db: &C, account_id: Uuid) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    let credited = sum_of_transfers(db, transfer::Column::CreditAccount, account_id).await?;
    let debited = sum_of_transfers(db, transfer::Column::DebitAccount, account_id).await?;
    Ok(credited - debited)
}

async fn sum_of_transfers<C>(
    db: &C,
    side: transfer::Column,
    account_id: Uuid,
) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    let total: Option<Option<Decimal>> = Transfer::find()
        .select_only()
        .column_as(transfer::Column::Value.sum(), "value_sum")
        .filter(side.eq(account_id))
        .into_tuple()
        .one(db)
        .await?;
    Ok(total.flatten().unwrap_or_default())
}

/// The balances of a company's four typed accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyAccountBalances {
    /// Balance of the fixed-means account
    pub means: Decimal,
    /// Balance of the raw-materials account
    pub raw_material: Decimal,
    /// Balance of the labour account
    pub work: Decimal,
    /// Balance of the product account
    pub product: Decimal,
}

/// Computes all four account balances of a company, `None` if the company
/// does not exist.
pub async fn company_account_balances<C>(
    db: &C,
    company_id: Uuid,
) -> Result<Option<CompanyAccountBalances>>
where
    C: ConnectionTrait,
{
    let Some(company) = company::Entity::find_by_id(company_id).one(db).await? else {
        return Ok(None);
    };
    Ok(Some(CompanyAccountBalances {
        means: account_balance(db, company.p_account).await?,
        raw_material: account_balance(db, company.r_account).await?,
        work: account_balance(db, company.a_account).await?,
        product: account_balance(db, company.prd_account).await?,
    }))
}

/// One transfer as seen from a particular account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountTransferRow {
    /// The underlying transfer
    pub transfer: transfer::Model,
    /// The other account involved
    pub counterparty: Uuid,
    /// Value from the account's perspective: positive when credited,
    /// negative when debited
    pub volume: Decimal,
}

/// Lists all transfers touching an account, newest first.
pub async fn account_history<C>(db: &C, account_id: Uuid) -> Result<Vec<AccountTransferRow>>
where
    C: ConnectionTrait,
{
    let transfers = Transfer::find()
        .filter(
            Condition::any()
                .add(transfer::Column::DebitAccount.eq(account_id))
                .add(transfer::Column::CreditAccount.eq(account_id)),
        )
        .order_by_desc(transfer::Column::Date)
        .all(db)
        .await?;

    Ok(transfers
        .into_iter()
        .map(|t| {
            let (counterparty, volume) = if t.credit_account == account_id {
                (t.debit_account, t.value)
            } else {
                (t.credit_account, -t.value)
            };
            AccountTransferRow {
                transfer: t,
                counterparty,
                volume,
            }
        })
        .collect())
}

/// Books a transfer of `value` hours from `debit_account` to
/// `credit_account`.
pub async fn create_transfer<C>(
    db: &C,
    date: chrono::DateTime<chrono::Utc>,
    debit_account: Uuid,
    credit_account: Uuid,
    value: Decimal,
    transfer_type: transfer::TransferType,
) -> Result<transfer::Model>
where
    C: ConnectionTrait,
{
    let row = transfer::ActiveModel {
        id: Set(Uuid::new_v4()),
        date: Set(date),
        debit_account: Set(debit_account),
        credit_account: Set(credit_account),
        value: Set(value),
        transfer_type: Set(transfer_type),
    };
    row.insert(db).await.map_err(Into::into)
}
