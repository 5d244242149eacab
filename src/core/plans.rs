//! Plan business logic - drafting, filing, review and plan queries.
//!
//! A plan starts as a private draft, is filed (which opens a review), and is
//! approved or rejected by an accountant. Approval activates the plan and
//! books the planned costs as credit: the planner's `p`, `r` and `a`
//! accounts are credited with the planned costs, debited against the
//! planner's product account for productive plans or against the public
//! sector fund for public services. A plan stays active until its timeframe
//! has elapsed.

use crate::{
    config::database::get_social_accounting,
    core::accounts,
    entities::{
        Plan, PlanDraft, PlanReview, TransferType, company, plan, plan_draft, plan_review,
    },
    errors::Result,
};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, Set, TransactionTrait,
};
use thiserror::Error;
use uuid::Uuid;

/// Planned production costs, one figure per company account sphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlanCosts {
    /// Cost of labour
    pub labour: Decimal,
    /// Cost of raw materials
    pub resources: Decimal,
    /// Cost of fixed means of production
    pub means: Decimal,
}

impl PlanCosts {
    /// Sum of all three cost spheres.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.labour + self.resources + self.means
    }
}

/// A plan joined with its review row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewedPlan {
    /// The plan itself
    pub plan: plan::Model,
    /// Its review state
    pub review: plan_review::Model,
}

impl ReviewedPlan {
    /// Whether the plan has been approved.
    #[must_use]
    pub const fn is_approved(&self) -> bool {
        self.review.approval_date.is_some() && self.review.rejection_date.is_none()
    }

    /// Whether the plan has been rejected.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        self.review.rejection_date.is_some() && self.review.approval_date.is_none()
    }

    /// When the plan stops being active, `None` while unapproved.
    #[must_use]
    pub fn expiration_date(&self) -> Option<DateTime<Utc>> {
        self.review
            .approval_date
            .map(|approved| approved + Duration::days(i64::from(self.plan.timeframe_days)))
    }

    /// Whether the plan is active at `timestamp`: approved, and the
    /// timeframe has not elapsed.
    #[must_use]
    pub fn is_active_as_of(&self, timestamp: DateTime<Utc>) -> bool {
        match self.review.approval_date {
            Some(approved) if self.is_approved() => {
                approved <= timestamp && !self.is_expired_as_of(timestamp)
            }
            _ => false,
        }
    }

    /// Whether the plan's timeframe has elapsed at `timestamp`.
    #[must_use]
    pub fn is_expired_as_of(&self, timestamp: DateTime<Utc>) -> bool {
        self.expiration_date()
            .is_some_and(|expiry| timestamp >= expiry)
    }
}

/// Loads a plan together with its review row.
pub async fn find_plan<C>(db: &C, plan_id: Uuid) -> Result<Option<ReviewedPlan>>
where
    C: ConnectionTrait,
{
    let result = Plan::find_by_id(plan_id)
        .find_also_related(PlanReview)
        .one(db)
        .await?;
    Ok(result.and_then(|(plan, review)| review.map(|review| ReviewedPlan { plan, review })))
}

/// Lists all plans active at `timestamp`.
pub async fn active_plans<C>(db: &C, timestamp: DateTime<Utc>) -> Result<Vec<ReviewedPlan>>
where
    C: ConnectionTrait,
{
    let rows = Plan::find().find_also_related(PlanReview).all(db).await?;
    Ok(rows
        .into_iter()
        .filter_map(|(plan, review)| review.map(|review| ReviewedPlan { plan, review }))
        .filter(|reviewed| reviewed.is_active_as_of(timestamp))
        .collect())
}

/// Request to create a new plan draft.
#[derive(Debug, Clone)]
pub struct FilePlanDraftRequest {
    /// The drafting company
    pub planner: Uuid,
    /// Planned production costs
    pub costs: PlanCosts,
    /// Name of the product
    pub product_name: String,
    /// Unit the product is distributed in
    pub product_unit: String,
    /// Number of units to be produced
    pub amount: i64,
    /// Free-text description of the product
    pub description: String,
    /// Production period in days
    pub timeframe_days: i32,
    /// Whether the product is given away as a public service
    pub is_public_service: bool,
}

/// Why a draft operation was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlanDraftRejection {
    #[error("the planning company does not exist")]
    PlannerNotFound,
    #[error("the draft does not exist")]
    DraftNotFound,
    #[error("only the planning company may touch its drafts")]
    RequesterIsNotPlanner,
    #[error("the planned amount must be at least one unit")]
    InvalidAmount,
    #[error("the timeframe must be at least one day")]
    InvalidTimeframe,
    #[error("planned costs must not be negative")]
    NegativeCosts,
}

/// Outcome of a draft operation.
#[derive(Debug, Clone)]
pub struct PlanDraftResponse {
    /// Why the operation was rejected, if it was
    pub rejection_reason: Option<PlanDraftRejection>,
    /// The draft acted on, on success
    pub draft_id: Option<Uuid>,
}

impl PlanDraftResponse {
    /// Whether the operation was turned down.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        self.rejection_reason.is_some()
    }

    const fn rejected(reason: PlanDraftRejection) -> Self {
        Self {
            rejection_reason: Some(reason),
            draft_id: None,
        }
    }
}

fn validate_draft_payload(request: &FilePlanDraftRequest) -> Option<PlanDraftRejection> {
    if request.amount < 1 {
        return Some(PlanDraftRejection::InvalidAmount);
    }
    if request.timeframe_days < 1 {
        return Some(PlanDraftRejection::InvalidTimeframe);
    }
    if request.costs.labour < Decimal::ZERO
        || request.costs.resources < Decimal::ZERO
        || request.costs.means < Decimal::ZERO
    {
        return Some(PlanDraftRejection::NegativeCosts);
    }
    None
}

/// Creates a new plan draft after validating its payload.
pub async fn file_plan_draft(
    db: &DatabaseConnection,
    request: FilePlanDraftRequest,
) -> Result<PlanDraftResponse> {
    if let Some(reason) = validate_draft_payload(&request) {
        return Ok(PlanDraftResponse::rejected(reason));
    }
    if company::Entity::find_by_id(request.planner).one(db).await?.is_none() {
        return Ok(PlanDraftResponse::rejected(
            PlanDraftRejection::PlannerNotFound,
        ));
    }

    let draft = plan_draft::ActiveModel {
        id: Set(Uuid::new_v4()),
        creation_date: Set(Utc::now()),
        planner: Set(request.planner),
        costs_p: Set(request.costs.means),
        costs_r: Set(request.costs.resources),
        costs_a: Set(request.costs.labour),
        product_name: Set(request.product_name),
        product_unit: Set(request.product_unit),
        amount: Set(request.amount),
        description: Set(request.description),
        timeframe_days: Set(request.timeframe_days),
        is_public_service: Set(request.is_public_service),
    };
    let draft = draft.insert(db).await?;

    Ok(PlanDraftResponse {
        rejection_reason: None,
        draft_id: Some(draft.id),
    })
}

/// Replaces the payload of an unfiled draft.
pub async fn edit_plan_draft(
    db: &DatabaseConnection,
    draft_id: Uuid,
    requester: Uuid,
    request: FilePlanDraftRequest,
) -> Result<PlanDraftResponse> {
    if let Some(reason) = validate_draft_payload(&request) {
        return Ok(PlanDraftResponse::rejected(reason));
    }
    let Some(draft) = PlanDraft::find_by_id(draft_id).one(db).await? else {
        return Ok(PlanDraftResponse::rejected(PlanDraftRejection::DraftNotFound));
    };
    if draft.planner != requester {
        return Ok(PlanDraftResponse::rejected(
            PlanDraftRejection::RequesterIsNotPlanner,
        ));
    }

    let mut row = draft.into_active_model();
    row.costs_p = Set(request.costs.means);
    row.costs_r = Set(request.costs.resources);
    row.costs_a = Set(request.costs.labour);
    row.product_name = Set(request.product_name);
    row.product_unit = Set(request.product_unit);
    row.amount = Set(request.amount);
    row.description = Set(request.description);
    row.timeframe_days = Set(request.timeframe_days);
    row.is_public_service = Set(request.is_public_service);
    let row = row.update(db).await?;

    Ok(PlanDraftResponse {
        rejection_reason: None,
        draft_id: Some(row.id),
    })
}

/// Deletes an unfiled draft.
pub async fn delete_plan_draft(
    db: &DatabaseConnection,
    draft_id: Uuid,
    requester: Uuid,
) -> Result<PlanDraftResponse> {
    let Some(draft) = PlanDraft::find_by_id(draft_id).one(db).await? else {
        return Ok(PlanDraftResponse::rejected(PlanDraftRejection::DraftNotFound));
    };
    if draft.planner != requester {
        return Ok(PlanDraftResponse::rejected(
            PlanDraftRejection::RequesterIsNotPlanner,
        ));
    }
    let draft_id = draft.id;
    PlanDraft::delete_by_id(draft_id).exec(db).await?;
    Ok(PlanDraftResponse {
        rejection_reason: None,
        draft_id: Some(draft_id),
    })
}

/// Outcome of filing a draft as a plan.
#[derive(Debug, Clone)]
pub struct FilePlanResponse {
    /// Why filing was rejected, if it was
    pub rejection_reason: Option<PlanDraftRejection>,
    /// The new plan's id on success
    pub plan_id: Option<Uuid>,
}

impl FilePlanResponse {
    /// Whether filing was turned down.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        self.rejection_reason.is_some()
    }
}

/// Files a draft with the accounting authority: converts it into a plan with
/// an open review and deletes the draft.
pub async fn file_plan(
    db: &DatabaseConnection,
    draft_id: Uuid,
    requester: Uuid,
) -> Result<FilePlanResponse> {
    let Some(draft) = PlanDraft::find_by_id(draft_id).one(db).await? else {
        return Ok(FilePlanResponse {
            rejection_reason: Some(PlanDraftRejection::DraftNotFound),
            plan_id: None,
        });
    };
    if draft.planner != requester {
        return Ok(FilePlanResponse {
            rejection_reason: Some(PlanDraftRejection::RequesterIsNotPlanner),
            plan_id: None,
        });
    }

    let txn = db.begin().await?;

    let plan_row = plan::ActiveModel {
        id: Set(Uuid::new_v4()),
        creation_date: Set(draft.creation_date),
        planner: Set(draft.planner),
        costs_p: Set(draft.costs_p),
        costs_r: Set(draft.costs_r),
        costs_a: Set(draft.costs_a),
        product_name: Set(draft.product_name.clone()),
        product_unit: Set(draft.product_unit.clone()),
        amount: Set(draft.amount),
        description: Set(draft.description.clone()),
        timeframe_days: Set(draft.timeframe_days),
        is_public_service: Set(draft.is_public_service),
        requested_cooperation: Set(None),
        hidden_by_user: Set(false),
    };
    let plan_row = plan_row.insert(&txn).await?;

    let review = plan_review::ActiveModel {
        id: Set(Uuid::new_v4()),
        plan_id: Set(plan_row.id),
        approval_date: Set(None),
        rejection_date: Set(None),
    };
    review.insert(&txn).await?;

    PlanDraft::delete_by_id(draft.id).exec(&txn).await?;

    txn.commit().await?;
    Ok(FilePlanResponse {
        rejection_reason: None,
        plan_id: Some(plan_row.id),
    })
}

/// Why a review decision was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReviewPlanRejection {
    #[error("the plan does not exist")]
    PlanNotFound,
    #[error("the plan has already been reviewed")]
    PlanAlreadyReviewed,
}

/// Outcome of a review decision.
#[derive(Debug, Clone)]
pub struct ReviewPlanResponse {
    /// Why the decision was rejected, if it was
    pub rejection_reason: Option<ReviewPlanRejection>,
}

impl ReviewPlanResponse {
    /// Whether the decision went through.
    #[must_use]
    pub const fn is_approved(&self) -> bool {
        self.rejection_reason.is_none()
    }

    /// Whether the decision was turned down.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        self.rejection_reason.is_some()
    }
}

/// Approves a plan. Approval activates the plan and books exactly three
/// credit transfers for the planned costs: the planner's `p`, `r` and `a`
/// accounts are credited, against the planner's product account for
/// productive plans or the public sector fund for public services.
pub async fn approve_plan(db: &DatabaseConnection, plan_id: Uuid) -> Result<ReviewPlanResponse> {
    let Some(reviewed) = find_plan(db, plan_id).await? else {
        return Ok(ReviewPlanResponse {
            rejection_reason: Some(ReviewPlanRejection::PlanNotFound),
        });
    };
    if reviewed.review.approval_date.is_some() || reviewed.review.rejection_date.is_some() {
        return Ok(ReviewPlanResponse {
            rejection_reason: Some(ReviewPlanRejection::PlanAlreadyReviewed),
        });
    }

    let Some(planner) = company::Entity::find_by_id(reviewed.plan.planner).one(db).await? else {
        return Ok(ReviewPlanResponse {
            rejection_reason: Some(ReviewPlanRejection::PlanNotFound),
        });
    };

    let now = Utc::now();
    let txn = db.begin().await?;

    let accounting = get_social_accounting(&txn).await?;
    let (debit_account, credit_types) = if reviewed.plan.is_public_service {
        (
            accounting.account_psf,
            [
                TransferType::CreditPublicP,
                TransferType::CreditPublicR,
                TransferType::CreditPublicA,
            ],
        )
    } else {
        (
            planner.prd_account,
            [
                TransferType::CreditP,
                TransferType::CreditR,
                TransferType::CreditA,
            ],
        )
    };

    let credits = [
        (planner.p_account, reviewed.plan.costs_p, credit_types[0]),
        (planner.r_account, reviewed.plan.costs_r, credit_types[1]),
        (planner.a_account, reviewed.plan.costs_a, credit_types[2]),
    ];
    for (credit_account, value, transfer_type) in credits {
        accounts::create_transfer(&txn, now, debit_account, credit_account, value, transfer_type)
            .await?;
    }

    let mut review = reviewed.review.into_active_model();
    review.approval_date = Set(Some(now));
    review.update(&txn).await?;

    txn.commit().await?;
    Ok(ReviewPlanResponse {
        rejection_reason: None,
    })
}

/// Rejects a plan. No transfers are booked.
pub async fn reject_plan(db: &DatabaseConnection, plan_id: Uuid) -> Result<ReviewPlanResponse> {
    let Some(reviewed) = find_plan(db, plan_id).await? else {
        return Ok(ReviewPlanResponse {
            rejection_reason: Some(ReviewPlanRejection::PlanNotFound),
        });
    };
    if reviewed.review.approval_date.is_some() || reviewed.review.rejection_date.is_some() {
        return Ok(ReviewPlanResponse {
            rejection_reason: Some(ReviewPlanRejection::PlanAlreadyReviewed),
        });
    }

    let mut review = reviewed.review.into_active_model();
    review.rejection_date = Set(Some(Utc::now()));
    review.update(db).await?;

    Ok(ReviewPlanResponse {
        rejection_reason: None,
    })
}

/// Why hiding a plan was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HidePlanRejection {
    #[error("the plan does not exist")]
    PlanNotFound,
    #[error("only the planning company may hide its plans")]
    RequesterIsNotPlanner,
    #[error("an active plan cannot be hidden")]
    PlanIsActive,
}

/// Outcome of hiding a plan.
#[derive(Debug, Clone)]
pub struct HidePlanResponse {
    /// Why hiding was rejected, if it was
    pub rejection_reason: Option<HidePlanRejection>,
}

impl HidePlanResponse {
    /// Whether hiding was turned down.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        self.rejection_reason.is_some()
    }
}

/// Hides an inactive plan from the planner's own listings.
pub async fn hide_plan(
    db: &DatabaseConnection,
    plan_id: Uuid,
    requester: Uuid,
) -> Result<HidePlanResponse> {
    let Some(reviewed) = find_plan(db, plan_id).await? else {
        return Ok(HidePlanResponse {
            rejection_reason: Some(HidePlanRejection::PlanNotFound),
        });
    };
    if reviewed.plan.planner != requester {
        return Ok(HidePlanResponse {
            rejection_reason: Some(HidePlanRejection::RequesterIsNotPlanner),
        });
    }
    if reviewed.is_active_as_of(Utc::now()) {
        return Ok(HidePlanResponse {
            rejection_reason: Some(HidePlanRejection::PlanIsActive),
        });
    }

    let mut row = reviewed.plan.into_active_model();
    row.hidden_by_user = Set(true);
    row.update(db).await?;

    Ok(HidePlanResponse {
        rejection_reason: None,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::accounts::{account_balance, company_account_balances};
    use crate::entities::{Transfer, transfer};
    use crate::test_utils::{
        backdate_approval, create_test_company, default_draft_request, file_test_plan,
        setup_test_db,
    };

    #[tokio::test]
    async fn test_draft_can_be_filed() -> Result<()> {
        let db = setup_test_db().await?;
        let planner = create_test_company(&db, "Planner").await?;
        let response = file_plan_draft(&db, default_draft_request(planner.id)).await?;
        assert!(!response.is_rejected());
        assert!(response.draft_id.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_draft_for_unknown_planner_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let response = file_plan_draft(&db, default_draft_request(Uuid::new_v4())).await?;
        assert_eq!(
            response.rejection_reason,
            Some(PlanDraftRejection::PlannerNotFound)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_draft_with_zero_timeframe_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let planner = create_test_company(&db, "Planner").await?;
        let mut request = default_draft_request(planner.id);
        request.timeframe_days = 0;
        let response = file_plan_draft(&db, request).await?;
        assert_eq!(
            response.rejection_reason,
            Some(PlanDraftRejection::InvalidTimeframe)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_draft_with_negative_costs_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let planner = create_test_company(&db, "Planner").await?;
        let mut request = default_draft_request(planner.id);
        request.costs.labour = Decimal::from(-1);
        let response = file_plan_draft(&db, request).await?;
        assert_eq!(
            response.rejection_reason,
            Some(PlanDraftRejection::NegativeCosts)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_only_planner_may_delete_draft() -> Result<()> {
        let db = setup_test_db().await?;
        let planner = create_test_company(&db, "Planner").await?;
        let other = create_test_company(&db, "Other").await?;
        let draft = file_plan_draft(&db, default_draft_request(planner.id))
            .await?
            .draft_id
            .unwrap();
        let response = delete_plan_draft(&db, draft, other.id).await?;
        assert_eq!(
            response.rejection_reason,
            Some(PlanDraftRejection::RequesterIsNotPlanner)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_editing_replaces_draft_payload() -> Result<()> {
        let db = setup_test_db().await?;
        let planner = create_test_company(&db, "Planner").await?;
        let draft = file_plan_draft(&db, default_draft_request(planner.id))
            .await?
            .draft_id
            .unwrap();
        let mut request = default_draft_request(planner.id);
        request.product_name = "Bread".to_string();
        request.amount = 500;
        let response = edit_plan_draft(&db, draft, planner.id, request).await?;
        assert!(!response.is_rejected());
        let stored = PlanDraft::find_by_id(draft).one(&db).await?.unwrap();
        assert_eq!(stored.product_name, "Bread");
        assert_eq!(stored.amount, 500);
        Ok(())
    }

    #[tokio::test]
    async fn test_filing_converts_draft_into_unreviewed_plan() -> Result<()> {
        let db = setup_test_db().await?;
        let planner = create_test_company(&db, "Planner").await?;
        let draft = file_plan_draft(&db, default_draft_request(planner.id))
            .await?
            .draft_id
            .unwrap();
        let response = file_plan(&db, draft, planner.id).await?;
        assert!(!response.is_rejected());

        let reviewed = find_plan(&db, response.plan_id.unwrap()).await?.unwrap();
        assert!(!reviewed.is_approved());
        assert!(!reviewed.is_rejected());
        assert!(PlanDraft::find_by_id(draft).one(&db).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_approval_activates_the_plan() -> Result<()> {
        let db = setup_test_db().await?;
        let planner = create_test_company(&db, "Planner").await?;
        let plan_id = file_test_plan(&db, planner.id).await?;

        let response = approve_plan(&db, plan_id).await?;
        assert!(response.is_approved());

        let reviewed = find_plan(&db, plan_id).await?.unwrap();
        assert!(reviewed.is_approved());
        assert!(reviewed.is_active_as_of(Utc::now()));
        Ok(())
    }

    #[tokio::test]
    async fn test_plan_cannot_be_approved_twice() -> Result<()> {
        let db = setup_test_db().await?;
        let planner = create_test_company(&db, "Planner").await?;
        let plan_id = file_test_plan(&db, planner.id).await?;
        approve_plan(&db, plan_id).await?;
        let second = approve_plan(&db, plan_id).await?;
        assert_eq!(
            second.rejection_reason,
            Some(ReviewPlanRejection::PlanAlreadyReviewed)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_plan_cannot_be_approved() -> Result<()> {
        let db = setup_test_db().await?;
        let planner = create_test_company(&db, "Planner").await?;
        let plan_id = file_test_plan(&db, planner.id).await?;
        reject_plan(&db, plan_id).await?;
        let response = approve_plan(&db, plan_id).await?;
        assert_eq!(
            response.rejection_reason,
            Some(ReviewPlanRejection::PlanAlreadyReviewed)
        );
        let reviewed = find_plan(&db, plan_id).await?.unwrap();
        assert!(reviewed.is_rejected());
        Ok(())
    }

    #[tokio::test]
    async fn test_approval_credits_all_three_cost_accounts() -> Result<()> {
        let db = setup_test_db().await?;
        let planner = create_test_company(&db, "Planner").await?;
        let mut request = default_draft_request(planner.id);
        request.costs = PlanCosts {
            labour: Decimal::from(1),
            resources: Decimal::from(2),
            means: Decimal::from(3),
        };
        let draft = file_plan_draft(&db, request).await?.draft_id.unwrap();
        let plan_id = file_plan(&db, draft, planner.id).await?.plan_id.unwrap();
        approve_plan(&db, plan_id).await?;

        let balances = company_account_balances(&db, planner.id).await?.unwrap();
        assert_eq!(balances.work, Decimal::from(1));
        assert_eq!(balances.raw_material, Decimal::from(2));
        assert_eq!(balances.means, Decimal::from(3));
        assert_eq!(balances.product, Decimal::from(-6));
        Ok(())
    }

    #[tokio::test]
    async fn test_approval_books_exactly_three_transfers() -> Result<()> {
        let db = setup_test_db().await?;
        let planner = create_test_company(&db, "Planner").await?;
        let plan_id = file_test_plan(&db, planner.id).await?;
        approve_plan(&db, plan_id).await?;
        assert_eq!(Transfer::find().all(&db).await?.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_public_service_approval_draws_on_public_sector_fund() -> Result<()> {
        let db = setup_test_db().await?;
        let planner = create_test_company(&db, "Planner").await?;
        let mut request = default_draft_request(planner.id);
        request.is_public_service = true;
        request.costs = PlanCosts {
            labour: Decimal::from(5),
            resources: Decimal::from(3),
            means: Decimal::from(2),
        };
        let draft = file_plan_draft(&db, request).await?.draft_id.unwrap();
        let plan_id = file_plan(&db, draft, planner.id).await?.plan_id.unwrap();
        approve_plan(&db, plan_id).await?;

        let accounting = get_social_accounting(&db).await?;
        assert_eq!(
            account_balance(&db, accounting.account_psf).await?,
            Decimal::from(-10)
        );

        let types: Vec<_> = Transfer::find()
            .all(&db)
            .await?
            .into_iter()
            .map(|t| t.transfer_type)
            .collect();
        assert!(types.contains(&TransferType::CreditPublicP));
        assert!(types.contains(&TransferType::CreditPublicR));
        assert!(types.contains(&TransferType::CreditPublicA));

        let balances = company_account_balances(&db, planner.id).await?.unwrap();
        assert_eq!(balances.product, Decimal::ZERO);
        Ok(())
    }

    #[tokio::test]
    async fn test_zero_cost_transfers_are_still_booked() -> Result<()> {
        let db = setup_test_db().await?;
        let planner = create_test_company(&db, "Planner").await?;
        let mut request = default_draft_request(planner.id);
        request.costs = PlanCosts {
            labour: Decimal::from(7),
            resources: Decimal::ZERO,
            means: Decimal::ZERO,
        };
        let draft = file_plan_draft(&db, request).await?.draft_id.unwrap();
        let plan_id = file_plan(&db, draft, planner.id).await?.plan_id.unwrap();
        approve_plan(&db, plan_id).await?;

        let zero_transfers = Transfer::find()
            .filter(transfer::Column::Value.eq(Decimal::ZERO))
            .all(&db)
            .await?;
        assert_eq!(zero_transfers.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_plan_expires_after_its_timeframe() -> Result<()> {
        let db = setup_test_db().await?;
        let planner = create_test_company(&db, "Planner").await?;
        let plan_id = file_test_plan(&db, planner.id).await?;
        approve_plan(&db, plan_id).await?;
        backdate_approval(&db, plan_id, 11).await?;

        let reviewed = find_plan(&db, plan_id).await?.unwrap();
        assert!(reviewed.is_expired_as_of(Utc::now()));
        assert!(!reviewed.is_active_as_of(Utc::now()));
        Ok(())
    }

    #[tokio::test]
    async fn test_active_plan_cannot_be_hidden() -> Result<()> {
        let db = setup_test_db().await?;
        let planner = create_test_company(&db, "Planner").await?;
        let plan_id = file_test_plan(&db, planner.id).await?;
        approve_plan(&db, plan_id).await?;
        let response = hide_plan(&db, plan_id, planner.id).await?;
        assert_eq!(
            response.rejection_reason,
            Some(HidePlanRejection::PlanIsActive)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_expired_plan_can_be_hidden_by_planner_only() -> Result<()> {
        let db = setup_test_db().await?;
        let planner = create_test_company(&db, "Planner").await?;
        let other = create_test_company(&db, "Other").await?;
        let plan_id = file_test_plan(&db, planner.id).await?;
        approve_plan(&db, plan_id).await?;
        backdate_approval(&db, plan_id, 30).await?;

        let denied = hide_plan(&db, plan_id, other.id).await?;
        assert_eq!(
            denied.rejection_reason,
            Some(HidePlanRejection::RequesterIsNotPlanner)
        );

        let allowed = hide_plan(&db, plan_id, planner.id).await?;
        assert!(!allowed.is_rejected());
        let reviewed = find_plan(&db, plan_id).await?.unwrap();
        assert!(reviewed.plan.hidden_by_user);
        Ok(())
    }

    #[tokio::test]
    async fn test_active_plans_lists_only_active_ones() -> Result<()> {
        let db = setup_test_db().await?;
        let planner = create_test_company(&db, "Planner").await?;
        let active = file_test_plan(&db, planner.id).await?;
        approve_plan(&db, active).await?;
        let _unapproved = file_test_plan(&db, planner.id).await?;
        let expired = file_test_plan(&db, planner.id).await?;
        approve_plan(&db, expired).await?;
        backdate_approval(&db, expired, 30).await?;

        let listed = active_plans(&db, Utc::now()).await?;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].plan.id, active);
        Ok(())
    }
}
