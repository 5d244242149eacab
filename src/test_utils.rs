//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test
//! databases and creating test records with sensible defaults. All helpers
//! go through the regular core operations where possible, so test fixtures
//! carry the same ledger state as production data.

use crate::{
    config::database::{create_tables, seed_social_accounting},
    core::{
        accounts, cooperation as cooperation_core, plans,
        plans::{FilePlanDraftRequest, PlanCosts},
        registration,
    },
    entities::{self, PlanReview, TransferType, job, plan_review},
    errors::{Error, Result},
};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};
use uuid::Uuid;

/// Creates an in-memory `SQLite` database with all tables initialized and
/// the social-accounting singleton seeded. This is the standard setup for
/// all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    create_tables(&db).await?;
    seed_social_accounting(&db).await?;
    Ok(db)
}

fn missing(what: &str) -> Error {
    Error::Config {
        message: format!("test fixture could not create {what}"),
    }
}

/// Registers a member with a unique email address.
pub async fn create_test_member(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::member::Model> {
    let response = registration::register_member(
        db,
        registration::RegisterMemberRequest {
            email: format!("{}@members.test", Uuid::new_v4()),
            name: name.to_string(),
            password: "test password".to_string(),
        },
    )
    .await?;
    let member_id = response.member_id.ok_or_else(|| missing("member"))?;
    entities::Member::find_by_id(member_id)
        .one(db)
        .await?
        .ok_or_else(|| missing("member"))
}

/// Registers a company with a unique email address.
pub async fn create_test_company(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::company::Model> {
    let response = registration::register_company(
        db,
        registration::RegisterCompanyRequest {
            email: format!("{}@companies.test", Uuid::new_v4()),
            name: name.to_string(),
            password: "test password".to_string(),
        },
    )
    .await?;
    let company_id = response.company_id.ok_or_else(|| missing("company"))?;
    entities::Company::find_by_id(company_id)
        .one(db)
        .await?
        .ok_or_else(|| missing("company"))
}

/// Puts a member directly into a company's workforce.
pub async fn employ_worker(
    db: &DatabaseConnection,
    company_id: Uuid,
    member_id: Uuid,
) -> Result<()> {
    let employment = job::ActiveModel {
        member_id: Set(member_id),
        company_id: Set(company_id),
    };
    employment.insert(db).await?;
    Ok(())
}

/// A draft request with sensible defaults: 30 labour hours over 10 days for
/// 10 units of a productive plan.
#[must_use]
pub fn default_draft_request(planner: Uuid) -> FilePlanDraftRequest {
    FilePlanDraftRequest {
        planner,
        costs: PlanCosts {
            labour: Decimal::from(30),
            resources: Decimal::ZERO,
            means: Decimal::ZERO,
        },
        product_name: "Test Product".to_string(),
        product_unit: "piece".to_string(),
        amount: 10,
        description: "A product for testing".to_string(),
        timeframe_days: 10,
        is_public_service: false,
    }
}

/// Files a default plan for the planner, leaving it unreviewed.
pub async fn file_test_plan(db: &DatabaseConnection, planner: Uuid) -> Result<Uuid> {
    let draft = plans::file_plan_draft(db, default_draft_request(planner))
        .await?
        .draft_id
        .ok_or_else(|| missing("draft"))?;
    plans::file_plan(db, draft, planner)
        .await?
        .plan_id
        .ok_or_else(|| missing("plan"))
}

/// Files and approves a plan with the given parameters, returning its id.
pub async fn create_approved_plan(
    db: &DatabaseConnection,
    planner: Uuid,
    costs: PlanCosts,
    amount: i64,
    timeframe_days: i32,
    is_public_service: bool,
) -> Result<Uuid> {
    let mut request = default_draft_request(planner);
    request.costs = costs;
    request.amount = amount;
    request.timeframe_days = timeframe_days;
    request.is_public_service = is_public_service;
    let draft = plans::file_plan_draft(db, request)
        .await?
        .draft_id
        .ok_or_else(|| missing("draft"))?;
    let plan = plans::file_plan(db, draft, planner)
        .await?
        .plan_id
        .ok_or_else(|| missing("plan"))?;
    let approval = plans::approve_plan(db, plan).await?;
    if !approval.is_approved() {
        return Err(missing("plan approval"));
    }
    Ok(plan)
}

/// Files and approves a default plan, returning its id.
pub async fn create_active_test_plan(db: &DatabaseConnection, planner: Uuid) -> Result<Uuid> {
    let request = default_draft_request(planner);
    create_approved_plan(
        db,
        planner,
        request.costs,
        request.amount,
        request.timeframe_days,
        request.is_public_service,
    )
    .await
}

/// Creates a cooperation with a unique name, coordinated by `coordinator`.
pub async fn create_test_cooperation(
    db: &DatabaseConnection,
    coordinator: Uuid,
) -> Result<entities::cooperation::Model> {
    let response = cooperation_core::create_cooperation(
        db,
        cooperation_core::CreateCooperationRequest {
            requester: coordinator,
            name: format!("Cooperation {}", Uuid::new_v4()),
            definition: "A cooperation for testing".to_string(),
        },
    )
    .await?;
    let cooperation_id = response.cooperation_id.ok_or_else(|| missing("cooperation"))?;
    entities::Cooperation::find_by_id(cooperation_id)
        .one(db)
        .await?
        .ok_or_else(|| missing("cooperation"))
}

/// Puts a plan directly into a cooperation, bypassing the request/accept
/// handshake.
pub async fn add_plan_to_cooperation(
    db: &DatabaseConnection,
    plan_id: Uuid,
    cooperation_id: Uuid,
) -> Result<()> {
    let membership = entities::plan_cooperation::ActiveModel {
        plan_id: Set(plan_id),
        cooperation_id: Set(cooperation_id),
    };
    membership.insert(db).await?;
    Ok(())
}

/// Moves a plan's approval date `days` into the past, e.g. to let it
/// expire.
pub async fn backdate_approval(db: &DatabaseConnection, plan_id: Uuid, days: i64) -> Result<()> {
    let review = PlanReview::find()
        .filter(plan_review::Column::PlanId.eq(plan_id))
        .one(db)
        .await?
        .ok_or_else(|| missing("plan review"))?;
    let mut row = review.into_active_model();
    row.approval_date = Set(Some(Utc::now() - Duration::days(days)));
    row.update(db).await?;
    Ok(())
}

/// Credits a member account with work certificates out of thin air.
pub async fn give_member_certificates(
    db: &DatabaseConnection,
    account: Uuid,
    amount: Decimal,
) -> Result<()> {
    let source = accounts::create_account(db).await?;
    accounts::create_transfer(
        db,
        Utc::now(),
        source.id,
        account,
        amount,
        TransferType::WorkCertificates,
    )
    .await?;
    Ok(())
}
