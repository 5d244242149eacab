//! Consumption business logic.
//!
//! Consuming a plan's product books a transfer of the cooperative price
//! times the consumed amount into the planner's product account: from the
//! member's account for private consumption, from the consumer company's
//! `p` or `r` account for productive consumption. When the consumed plan
//! cooperates and its individual price differs from the cooperative price,
//! a second transfer settles the difference with the cooperation's account.
//! Consumption event, consumption transfer and compensation transfer are
//! written atomically.

use crate::{
    core::{accounts, plans, prices},
    entities::{
        Company, Member, PlanCooperation, TransferType, private_consumption,
        productive_consumption,
    },
    errors::Result,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait,
};
use thiserror::Error;
use uuid::Uuid;

/// What a company consumes a product as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumptionType {
    /// Fixed means of production, paid from the `p` account
    MeansOfProduction,
    /// Raw materials, paid from the `r` account
    RawMaterials,
}

/// Request to register a member's private consumption.
#[derive(Debug, Clone, Copy)]
pub struct RegisterPrivateConsumptionRequest {
    /// The consuming member
    pub consumer: Uuid,
    /// The consumed plan
    pub plan: Uuid,
    /// Number of units consumed
    pub amount: i64,
}

/// Why a private consumption was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PrivateConsumptionRejection {
    #[error("the plan does not exist")]
    PlanNotFound,
    #[error("the plan is not active")]
    PlanInactive,
    #[error("the consuming member does not exist")]
    ConsumerDoesNotExist,
    #[error("the member's balance does not cover the price")]
    InsufficientBalance,
}

/// Outcome of a private consumption.
#[derive(Debug, Clone)]
pub struct RegisterPrivateConsumptionResponse {
    /// Why the consumption was rejected, if it was
    pub rejection_reason: Option<PrivateConsumptionRejection>,
}

impl RegisterPrivateConsumptionResponse {
    /// Whether the consumption was turned down.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        self.rejection_reason.is_some()
    }

    const fn rejected(reason: PrivateConsumptionRejection) -> Self {
        Self {
            rejection_reason: Some(reason),
        }
    }
}

/// Registers a member's consumption of a plan's product.
///
/// `allowed_overdraw` is how far the member's account may go below zero;
/// `None` disables the balance check.
pub async fn register_private_consumption(
    db: &DatabaseConnection,
    request: RegisterPrivateConsumptionRequest,
    allowed_overdraw: Option<Decimal>,
) -> Result<RegisterPrivateConsumptionResponse> {
    let Some(reviewed) = plans::find_plan(db, request.plan).await? else {
        return Ok(RegisterPrivateConsumptionResponse::rejected(
            PrivateConsumptionRejection::PlanNotFound,
        ));
    };
    if !reviewed.is_active_as_of(Utc::now()) {
        return Ok(RegisterPrivateConsumptionResponse::rejected(
            PrivateConsumptionRejection::PlanInactive,
        ));
    }
    let Some(consumer) = Member::find_by_id(request.consumer).one(db).await? else {
        return Ok(RegisterPrivateConsumptionResponse::rejected(
            PrivateConsumptionRejection::ConsumerDoesNotExist,
        ));
    };
    let Some(planner) = Company::find_by_id(reviewed.plan.planner).one(db).await? else {
        return Ok(RegisterPrivateConsumptionResponse::rejected(
            PrivateConsumptionRejection::PlanNotFound,
        ));
    };

    let coop_price_per_unit = prices::price_per_unit(db, &reviewed.plan).await?;
    let price = coop_price_per_unit * Decimal::from(request.amount);
    if !is_balance_sufficient(db, consumer.account, price, allowed_overdraw).await? {
        return Ok(RegisterPrivateConsumptionResponse::rejected(
            PrivateConsumptionRejection::InsufficientBalance,
        ));
    }

    let now = Utc::now();
    let txn = db.begin().await?;

    let consumption_transfer = accounts::create_transfer(
        &txn,
        now,
        consumer.account,
        planner.prd_account,
        price,
        TransferType::PrivateConsumption,
    )
    .await?;
    let compensation_transfer = compensation_transfer_if_cooperating(
        &txn,
        reviewed.plan.id,
        planner.prd_account,
        reviewed.plan.price_per_unit(),
        coop_price_per_unit,
        request.amount,
    )
    .await?;

    let event = private_consumption::ActiveModel {
        id: Set(Uuid::new_v4()),
        plan_id: Set(reviewed.plan.id),
        transfer_of_consumption: Set(consumption_transfer.id),
        transfer_of_compensation: Set(compensation_transfer),
        amount: Set(request.amount),
    };
    event.insert(&txn).await?;

    txn.commit().await?;
    Ok(RegisterPrivateConsumptionResponse {
        rejection_reason: None,
    })
}

/// Request to register a company's productive consumption.
#[derive(Debug, Clone, Copy)]
pub struct RegisterProductiveConsumptionRequest {
    /// The consuming company
    pub consumer: Uuid,
    /// The consumed plan
    pub plan: Uuid,
    /// Number of units consumed
    pub amount: i64,
    /// Whether the product is consumed as means of production or as raw
    /// materials
    pub consumption_type: ConsumptionType,
}

/// Why a productive consumption was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProductiveConsumptionRejection {
    #[error("the plan does not exist")]
    PlanNotFound,
    #[error("the plan was rejected by the accounting authority")]
    PlanIsRejected,
    #[error("the plan is not active")]
    PlanIsNotActive,
    #[error("public services cannot be consumed productively")]
    CannotConsumePublicService,
    #[error("a company cannot consume its own product")]
    ConsumerIsPlanner,
    #[error("the consuming company does not exist")]
    ConsumerNotFound,
}

/// Outcome of a productive consumption.
#[derive(Debug, Clone)]
pub struct RegisterProductiveConsumptionResponse {
    /// Why the consumption was rejected, if it was
    pub rejection_reason: Option<ProductiveConsumptionRejection>,
}

impl RegisterProductiveConsumptionResponse {
    /// Whether the consumption was turned down.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        self.rejection_reason.is_some()
    }

    const fn rejected(reason: ProductiveConsumptionRejection) -> Self {
        Self {
            rejection_reason: Some(reason),
        }
    }
}

/// Registers a company's consumption of another company's product as means
/// of production or raw materials.
pub async fn register_productive_consumption(
    db: &DatabaseConnection,
    request: RegisterProductiveConsumptionRequest,
) -> Result<RegisterProductiveConsumptionResponse> {
    let Some(reviewed) = plans::find_plan(db, request.plan).await? else {
        return Ok(RegisterProductiveConsumptionResponse::rejected(
            ProductiveConsumptionRejection::PlanNotFound,
        ));
    };
    if reviewed.is_rejected() {
        return Ok(RegisterProductiveConsumptionResponse::rejected(
            ProductiveConsumptionRejection::PlanIsRejected,
        ));
    }
    if !reviewed.is_active_as_of(Utc::now()) {
        return Ok(RegisterProductiveConsumptionResponse::rejected(
            ProductiveConsumptionRejection::PlanIsNotActive,
        ));
    }
    if reviewed.plan.is_public_service {
        return Ok(RegisterProductiveConsumptionResponse::rejected(
            ProductiveConsumptionRejection::CannotConsumePublicService,
        ));
    }
    if reviewed.plan.planner == request.consumer {
        return Ok(RegisterProductiveConsumptionResponse::rejected(
            ProductiveConsumptionRejection::ConsumerIsPlanner,
        ));
    }
    let Some(consumer) = Company::find_by_id(request.consumer).one(db).await? else {
        return Ok(RegisterProductiveConsumptionResponse::rejected(
            ProductiveConsumptionRejection::ConsumerNotFound,
        ));
    };
    let Some(planner) = Company::find_by_id(reviewed.plan.planner).one(db).await? else {
        return Ok(RegisterProductiveConsumptionResponse::rejected(
            ProductiveConsumptionRejection::PlanNotFound,
        ));
    };

    let coop_price_per_unit = prices::price_per_unit(db, &reviewed.plan).await?;
    let price = coop_price_per_unit * Decimal::from(request.amount);
    let (debit_account, transfer_type) = match request.consumption_type {
        ConsumptionType::MeansOfProduction => {
            (consumer.p_account, TransferType::ProductiveConsumptionP)
        }
        ConsumptionType::RawMaterials => {
            (consumer.r_account, TransferType::ProductiveConsumptionR)
        }
    };

    let now = Utc::now();
    let txn = db.begin().await?;

    let consumption_transfer = accounts::create_transfer(
        &txn,
        now,
        debit_account,
        planner.prd_account,
        price,
        transfer_type,
    )
    .await?;
    let compensation_transfer = compensation_transfer_if_cooperating(
        &txn,
        reviewed.plan.id,
        planner.prd_account,
        reviewed.plan.price_per_unit(),
        coop_price_per_unit,
        request.amount,
    )
    .await?;

    let event = productive_consumption::ActiveModel {
        id: Set(Uuid::new_v4()),
        plan_id: Set(reviewed.plan.id),
        transfer_of_consumption: Set(consumption_transfer.id),
        transfer_of_compensation: Set(compensation_transfer),
        amount: Set(request.amount),
    };
    event.insert(&txn).await?;

    txn.commit().await?;
    Ok(RegisterProductiveConsumptionResponse {
        rejection_reason: None,
    })
}

/// Settles the price difference between a plan and its cooperation for a
/// consumed amount.
///
/// Returns the compensation transfer's id, or `None` when the plan does not
/// cooperate or the prices are equal. A cooperative price above the plan's
/// own price leaves the surplus with the cooperation; a plan price above
/// the cooperative price refunds the planner from the cooperation account.
pub async fn compensation_transfer_if_cooperating<C>(
    db: &C,
    plan_id: Uuid,
    planner_product_account: Uuid,
    plan_price_per_unit: Decimal,
    coop_price_per_unit: Decimal,
    consumed_amount: i64,
) -> Result<Option<Uuid>>
where
    C: ConnectionTrait,
{
    let Some(membership) = PlanCooperation::find_by_id(plan_id).one(db).await? else {
        return Ok(None);
    };
    let Some(coop) = crate::entities::Cooperation::find_by_id(membership.cooperation_id)
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    let difference = coop_price_per_unit - plan_price_per_unit;
    if difference.is_zero() {
        return Ok(None);
    }
    let value = difference.abs() * Decimal::from(consumed_amount);
    let (debit_account, credit_account, transfer_type) = if difference > Decimal::ZERO {
        (
            planner_product_account,
            coop.account,
            TransferType::CompensationForCoop,
        )
    } else {
        (
            coop.account,
            planner_product_account,
            TransferType::CompensationForCompany,
        )
    };
    let transfer = accounts::create_transfer(
        db,
        Utc::now(),
        debit_account,
        credit_account,
        value,
        transfer_type,
    )
    .await?;
    Ok(Some(transfer.id))
}

async fn is_balance_sufficient<C>(
    db: &C,
    account: Uuid,
    price: Decimal,
    allowed_overdraw: Option<Decimal>,
) -> Result<bool>
where
    C: ConnectionTrait,
{
    if price <= Decimal::ZERO {
        return Ok(true);
    }
    let Some(allowed_overdraw) = allowed_overdraw else {
        return Ok(true);
    };
    let balance = accounts::account_balance(db, account).await?;
    Ok(price <= balance + allowed_overdraw)
}

/// Lists the private consumption events registered against a plan.
pub async fn private_consumptions_of_plan<C>(
    db: &C,
    plan_id: Uuid,
) -> Result<Vec<private_consumption::Model>>
where
    C: ConnectionTrait,
{
    use sea_orm::{ColumnTrait, QueryFilter};
    crate::entities::PrivateConsumption::find()
        .filter(private_consumption::Column::PlanId.eq(plan_id))
        .all(db)
        .await
        .map_err(Into::into)
}
