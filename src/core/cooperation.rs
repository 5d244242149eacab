//! Cooperation lifecycle business logic.
//!
//! Plans join a cooperation in two steps: the planner requests membership,
//! and the cooperation's coordinator accepts or denies the request. The
//! planner may withdraw a pending request. A cooperating plan leaves again
//! through `end_cooperation`, available to the planner and the coordinator
//! alike. Public services can never cooperate.

use crate::{
    core::{accounts, coordination, plans},
    entities::{
        Company, Cooperation, PlanCooperation, cooperation, plan_cooperation,
    },
    errors::Result,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set, TransactionTrait,
};
use thiserror::Error;
use uuid::Uuid;

/// Request to create a new cooperation.
#[derive(Debug, Clone)]
pub struct CreateCooperationRequest {
    /// The founding company, becoming the first coordinator
    pub requester: Uuid,
    /// Name of the cooperation, unique
    pub name: String,
    /// Free-text definition of the shared product
    pub definition: String,
}

/// Why creating a cooperation was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CreateCooperationRejection {
    #[error("the founding company does not exist")]
    CoordinatorNotFound,
    #[error("a cooperation with this name already exists")]
    CooperationWithNameExists,
}

/// Outcome of creating a cooperation.
#[derive(Debug, Clone)]
pub struct CreateCooperationResponse {
    /// Why the creation was rejected, if it was
    pub rejection_reason: Option<CreateCooperationRejection>,
    /// The new cooperation's id on success
    pub cooperation_id: Option<Uuid>,
}

impl CreateCooperationResponse {
    /// Whether the creation was turned down.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        self.rejection_reason.is_some()
    }

    const fn rejected(reason: CreateCooperationRejection) -> Self {
        Self {
            rejection_reason: Some(reason),
            cooperation_id: None,
        }
    }
}

/// Creates a cooperation with its compensation account and the founder's
/// coordination tenure.
pub async fn create_cooperation(
    db: &DatabaseConnection,
    request: CreateCooperationRequest,
) -> Result<CreateCooperationResponse> {
    if Company::find_by_id(request.requester).one(db).await?.is_none() {
        return Ok(CreateCooperationResponse::rejected(
            CreateCooperationRejection::CoordinatorNotFound,
        ));
    }
    let name_taken = Cooperation::find()
        .filter(cooperation::Column::Name.eq(request.name.clone()))
        .one(db)
        .await?
        .is_some();
    if name_taken {
        return Ok(CreateCooperationResponse::rejected(
            CreateCooperationRejection::CooperationWithNameExists,
        ));
    }

    let txn = db.begin().await?;

    let account = accounts::create_account(&txn).await?;
    let row = cooperation::ActiveModel {
        id: Set(Uuid::new_v4()),
        creation_date: Set(Utc::now()),
        name: Set(request.name),
        definition: Set(request.definition),
        account: Set(account.id),
    };
    let row = row.insert(&txn).await?;
    coordination::start_tenure(&txn, request.requester, row.id).await?;

    txn.commit().await?;
    Ok(CreateCooperationResponse {
        rejection_reason: None,
        cooperation_id: Some(row.id),
    })
}

/// Request for a plan to join a cooperation.
#[derive(Debug, Clone, Copy)]
pub struct RequestCooperationRequest {
    /// The company making the request
    pub requester: Uuid,
    /// The plan that wants to join
    pub plan: Uuid,
    /// The cooperation it wants to join
    pub cooperation: Uuid,
}

/// Why a cooperation request was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RequestCooperationRejection {
    #[error("the plan does not exist")]
    PlanNotFound,
    #[error("the cooperation does not exist")]
    CooperationNotFound,
    #[error("the plan already belongs to a cooperation")]
    PlanHasCooperation,
    #[error("the plan is already requesting a cooperation")]
    PlanIsAlreadyRequestingCooperation,
    #[error("public services cannot cooperate")]
    PlanIsPublicService,
    #[error("only the planning company may request cooperation")]
    RequesterIsNotPlanner,
}

/// Outcome of a cooperation request.
#[derive(Debug, Clone)]
pub struct RequestCooperationResponse {
    /// Why the request was rejected, if it was
    pub rejection_reason: Option<RequestCooperationRejection>,
}

impl RequestCooperationResponse {
    /// Whether the request was turned down.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        self.rejection_reason.is_some()
    }

    const fn rejected(reason: RequestCooperationRejection) -> Self {
        Self {
            rejection_reason: Some(reason),
        }
    }
}

/// Asks a cooperation to take the plan in.
pub async fn request_cooperation(
    db: &DatabaseConnection,
    request: RequestCooperationRequest,
) -> Result<RequestCooperationResponse> {
    let Some(reviewed) = plans::find_plan(db, request.plan).await? else {
        return Ok(RequestCooperationResponse::rejected(
            RequestCooperationRejection::PlanNotFound,
        ));
    };
    if Cooperation::find_by_id(request.cooperation).one(db).await?.is_none() {
        return Ok(RequestCooperationResponse::rejected(
            RequestCooperationRejection::CooperationNotFound,
        ));
    }
    if reviewed.plan.requested_cooperation.is_some() {
        return Ok(RequestCooperationResponse::rejected(
            RequestCooperationRejection::PlanIsAlreadyRequestingCooperation,
        ));
    }
    if PlanCooperation::find_by_id(request.plan).one(db).await?.is_some() {
        return Ok(RequestCooperationResponse::rejected(
            RequestCooperationRejection::PlanHasCooperation,
        ));
    }
    if reviewed.plan.is_public_service {
        return Ok(RequestCooperationResponse::rejected(
            RequestCooperationRejection::PlanIsPublicService,
        ));
    }
    if reviewed.plan.planner != request.requester {
        return Ok(RequestCooperationResponse::rejected(
            RequestCooperationRejection::RequesterIsNotPlanner,
        ));
    }

    let mut row = reviewed.plan.into_active_model();
    row.requested_cooperation = Set(Some(request.cooperation));
    row.update(db).await?;

    Ok(RequestCooperationResponse {
        rejection_reason: None,
    })
}

/// Request naming a plan and a cooperation, used to accept or deny a
/// pending cooperation request and to end an existing cooperation.
#[derive(Debug, Clone, Copy)]
pub struct PlanCooperationRequest {
    /// The company deciding on the request
    pub requester: Uuid,
    /// The plan asking to join
    pub plan: Uuid,
    /// The cooperation it asked to join
    pub cooperation: Uuid,
}

/// Why accepting a cooperation request was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AcceptCooperationRejection {
    #[error("the plan does not exist")]
    PlanNotFound,
    #[error("the cooperation does not exist")]
    CooperationNotFound,
    #[error("the plan is not active")]
    PlanInactive,
    #[error("the plan already belongs to a cooperation")]
    PlanHasCooperation,
    #[error("public services cannot cooperate")]
    PlanIsPublicService,
    #[error("the plan did not request this cooperation")]
    CooperationWasNotRequested,
    #[error("only the coordinator may accept cooperation requests")]
    RequesterIsNotCoordinator,
}

/// Outcome of accepting a cooperation request.
#[derive(Debug, Clone)]
pub struct AcceptCooperationResponse {
    /// Why the acceptance was rejected, if it was
    pub rejection_reason: Option<AcceptCooperationRejection>,
}

impl AcceptCooperationResponse {
    /// Whether the acceptance was turned down.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        self.rejection_reason.is_some()
    }

    const fn rejected(reason: AcceptCooperationRejection) -> Self {
        Self {
            rejection_reason: Some(reason),
        }
    }
}

/// Accepts a pending cooperation request, adding the plan to the
/// cooperation and clearing the request.
pub async fn accept_cooperation(
    db: &DatabaseConnection,
    request: PlanCooperationRequest,
) -> Result<AcceptCooperationResponse> {
    let Some(reviewed) = plans::find_plan(db, request.plan).await? else {
        return Ok(AcceptCooperationResponse::rejected(
            AcceptCooperationRejection::PlanNotFound,
        ));
    };
    if Cooperation::find_by_id(request.cooperation).one(db).await?.is_none() {
        return Ok(AcceptCooperationResponse::rejected(
            AcceptCooperationRejection::CooperationNotFound,
        ));
    }
    if !reviewed.is_active_as_of(Utc::now()) {
        return Ok(AcceptCooperationResponse::rejected(
            AcceptCooperationRejection::PlanInactive,
        ));
    }
    if PlanCooperation::find_by_id(request.plan).one(db).await?.is_some() {
        return Ok(AcceptCooperationResponse::rejected(
            AcceptCooperationRejection::PlanHasCooperation,
        ));
    }
    if reviewed.plan.is_public_service {
        return Ok(AcceptCooperationResponse::rejected(
            AcceptCooperationRejection::PlanIsPublicService,
        ));
    }
    if reviewed.plan.requested_cooperation != Some(request.cooperation) {
        return Ok(AcceptCooperationResponse::rejected(
            AcceptCooperationRejection::CooperationWasNotRequested,
        ));
    }
    let coordinator = coordination::current_coordinator(db, request.cooperation).await?;
    if coordinator != Some(request.requester) {
        return Ok(AcceptCooperationResponse::rejected(
            AcceptCooperationRejection::RequesterIsNotCoordinator,
        ));
    }

    let txn = db.begin().await?;
    let membership = plan_cooperation::ActiveModel {
        plan_id: Set(request.plan),
        cooperation_id: Set(request.cooperation),
    };
    membership.insert(&txn).await?;
    let mut row = reviewed.plan.into_active_model();
    row.requested_cooperation = Set(None);
    row.update(&txn).await?;
    txn.commit().await?;

    Ok(AcceptCooperationResponse {
        rejection_reason: None,
    })
}

/// Why denying a cooperation request was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DenyCooperationRejection {
    #[error("the plan does not exist")]
    PlanNotFound,
    #[error("the cooperation does not exist")]
    CooperationNotFound,
    #[error("the plan did not request this cooperation")]
    CooperationWasNotRequested,
    #[error("only the coordinator may deny cooperation requests")]
    RequesterIsNotCoordinator,
}

/// Outcome of denying a cooperation request.
#[derive(Debug, Clone)]
pub struct DenyCooperationResponse {
    /// Why the denial was rejected, if it was
    pub rejection_reason: Option<DenyCooperationRejection>,
}

impl DenyCooperationResponse {
    /// Whether the denial was turned down.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        self.rejection_reason.is_some()
    }

    const fn rejected(reason: DenyCooperationRejection) -> Self {
        Self {
            rejection_reason: Some(reason),
        }
    }
}

/// Denies a pending cooperation request, clearing it from the plan.
pub async fn deny_cooperation(
    db: &DatabaseConnection,
    request: PlanCooperationRequest,
) -> Result<DenyCooperationResponse> {
    let Some(reviewed) = plans::find_plan(db, request.plan).await? else {
        return Ok(DenyCooperationResponse::rejected(
            DenyCooperationRejection::PlanNotFound,
        ));
    };
    if Cooperation::find_by_id(request.cooperation).one(db).await?.is_none() {
        return Ok(DenyCooperationResponse::rejected(
            DenyCooperationRejection::CooperationNotFound,
        ));
    }
    if reviewed.plan.requested_cooperation != Some(request.cooperation) {
        return Ok(DenyCooperationResponse::rejected(
            DenyCooperationRejection::CooperationWasNotRequested,
        ));
    }
    let coordinator = coordination::current_coordinator(db, request.cooperation).await?;
    if coordinator != Some(request.requester) {
        return Ok(DenyCooperationResponse::rejected(
            DenyCooperationRejection::RequesterIsNotCoordinator,
        ));
    }

    let mut row = reviewed.plan.into_active_model();
    row.requested_cooperation = Set(None);
    row.update(db).await?;

    Ok(DenyCooperationResponse {
        rejection_reason: None,
    })
}

/// Why withdrawing a cooperation request was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CancelCooperationRequestRejection {
    #[error("the plan does not exist")]
    PlanNotFound,
    #[error("the plan has no pending cooperation request")]
    NoPendingRequest,
    #[error("only the planning company may withdraw the request")]
    RequesterIsNotPlanner,
}

/// Outcome of withdrawing a cooperation request.
#[derive(Debug, Clone)]
pub struct CancelCooperationRequestResponse {
    /// Why the withdrawal was rejected, if it was
    pub rejection_reason: Option<CancelCooperationRequestRejection>,
}

impl CancelCooperationRequestResponse {
    /// Whether the withdrawal was turned down.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        self.rejection_reason.is_some()
    }

    const fn rejected(reason: CancelCooperationRequestRejection) -> Self {
        Self {
            rejection_reason: Some(reason),
        }
    }
}

/// Withdraws the plan's own pending cooperation request.
pub async fn cancel_cooperation_request(
    db: &DatabaseConnection,
    plan: Uuid,
    requester: Uuid,
) -> Result<CancelCooperationRequestResponse> {
    let Some(reviewed) = plans::find_plan(db, plan).await? else {
        return Ok(CancelCooperationRequestResponse::rejected(
            CancelCooperationRequestRejection::PlanNotFound,
        ));
    };
    if reviewed.plan.requested_cooperation.is_none() {
        return Ok(CancelCooperationRequestResponse::rejected(
            CancelCooperationRequestRejection::NoPendingRequest,
        ));
    }
    if reviewed.plan.planner != requester {
        return Ok(CancelCooperationRequestResponse::rejected(
            CancelCooperationRequestRejection::RequesterIsNotPlanner,
        ));
    }

    let mut row = reviewed.plan.into_active_model();
    row.requested_cooperation = Set(None);
    row.update(db).await?;

    Ok(CancelCooperationRequestResponse {
        rejection_reason: None,
    })
}

/// Why ending a cooperation was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EndCooperationRejection {
    #[error("the plan does not exist")]
    PlanNotFound,
    #[error("the cooperation does not exist")]
    CooperationNotFound,
    #[error("the plan does not belong to this cooperation")]
    PlanHasNoCooperation,
    #[error("only the planner or the coordinator may end the cooperation")]
    RequesterIsNotAuthorized,
}

/// Outcome of ending a cooperation.
#[derive(Debug, Clone)]
pub struct EndCooperationResponse {
    /// Why the ending was rejected, if it was
    pub rejection_reason: Option<EndCooperationRejection>,
}

impl EndCooperationResponse {
    /// Whether the ending was turned down.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        self.rejection_reason.is_some()
    }

    const fn rejected(reason: EndCooperationRejection) -> Self {
        Self {
            rejection_reason: Some(reason),
        }
    }
}

/// Takes a plan out of its cooperation. Available to the planning company
/// and to the cooperation's coordinator.
pub async fn end_cooperation(
    db: &DatabaseConnection,
    request: PlanCooperationRequest,
) -> Result<EndCooperationResponse> {
    let Some(reviewed) = plans::find_plan(db, request.plan).await? else {
        return Ok(EndCooperationResponse::rejected(
            EndCooperationRejection::PlanNotFound,
        ));
    };
    if Cooperation::find_by_id(request.cooperation).one(db).await?.is_none() {
        return Ok(EndCooperationResponse::rejected(
            EndCooperationRejection::CooperationNotFound,
        ));
    }
    let membership = PlanCooperation::find_by_id(request.plan).one(db).await?;
    let Some(membership) = membership.filter(|m| m.cooperation_id == request.cooperation) else {
        return Ok(EndCooperationResponse::rejected(
            EndCooperationRejection::PlanHasNoCooperation,
        ));
    };
    let coordinator = coordination::current_coordinator(db, request.cooperation).await?;
    let is_planner = reviewed.plan.planner == request.requester;
    let is_coordinator = coordinator == Some(request.requester);
    if !is_planner && !is_coordinator {
        return Ok(EndCooperationResponse::rejected(
            EndCooperationRejection::RequesterIsNotAuthorized,
        ));
    }

    PlanCooperation::delete_by_id(membership.plan_id).exec(db).await?;

    Ok(EndCooperationResponse {
        rejection_reason: None,
    })
}

/// Lists the plans belonging to a cooperation.
pub async fn plans_of_cooperation<C>(
    db: &C,
    cooperation_id: Uuid,
) -> Result<Vec<plan_cooperation::Model>>
where
    C: sea_orm::ConnectionTrait,
{
    PlanCooperation::find()
        .filter(plan_cooperation::Column::CooperationId.eq(cooperation_id))
        .all(db)
        .await
        .map_err(Into::into)
}
