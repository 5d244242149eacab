//! Coordination tenure business logic.
//!
//! Each cooperation is coordinated by exactly one company at a time. The
//! current coordinator is the tenure with the latest start date. A
//! coordinator can offer the role to another company through a coordination
//! transfer request; the candidate accepting creates a new tenure, which
//! implicitly closes the request.

use crate::{
    entities::{
        Company, CoordinationTenure, CoordinationTransferRequest, coordination_tenure,
        coordination_transfer_request,
    },
    errors::Result,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use thiserror::Error;
use uuid::Uuid;

/// Starts a coordination tenure for a company over a cooperation.
pub async fn start_tenure<C>(
    db: &C,
    company: Uuid,
    cooperation: Uuid,
) -> Result<coordination_tenure::Model>
where
    C: ConnectionTrait,
{
    let tenure = coordination_tenure::ActiveModel {
        id: Set(Uuid::new_v4()),
        company: Set(company),
        cooperation: Set(cooperation),
        start_date: Set(Utc::now()),
    };
    tenure.insert(db).await.map_err(Into::into)
}

/// The current coordination tenure of a cooperation, `None` for an unknown
/// cooperation.
pub async fn current_tenure<C>(
    db: &C,
    cooperation: Uuid,
) -> Result<Option<coordination_tenure::Model>>
where
    C: ConnectionTrait,
{
    CoordinationTenure::find()
        .filter(coordination_tenure::Column::Cooperation.eq(cooperation))
        .order_by_desc(coordination_tenure::Column::StartDate)
        .one(db)
        .await
        .map_err(Into::into)
}

/// The company currently coordinating a cooperation.
pub async fn current_coordinator<C>(db: &C, cooperation: Uuid) -> Result<Option<Uuid>>
where
    C: ConnectionTrait,
{
    Ok(current_tenure(db, cooperation).await?.map(|t| t.company))
}

/// All tenures of a cooperation, newest first.
pub async fn tenure_history<C>(
    db: &C,
    cooperation: Uuid,
) -> Result<Vec<coordination_tenure::Model>>
where
    C: ConnectionTrait,
{
    CoordinationTenure::find()
        .filter(coordination_tenure::Column::Cooperation.eq(cooperation))
        .order_by_desc(coordination_tenure::Column::StartDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Request to hand coordination over to another company.
#[derive(Debug, Clone, Copy)]
pub struct RequestCoordinationTransferRequest {
    /// The company asking for the handover
    pub requester: Uuid,
    /// The cooperation whose coordination is handed over
    pub cooperation: Uuid,
    /// The company asked to take over
    pub candidate: Uuid,
}

/// Why a coordination transfer request was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RequestCoordinationTransferRejection {
    #[error("the cooperation does not exist")]
    CooperationNotFound,
    #[error("only the current coordinator may request a handover")]
    RequesterIsNotCoordinator,
    #[error("the candidate already coordinates the cooperation")]
    CandidateIsCurrentCoordinator,
    #[error("the candidate is not a company")]
    CandidateIsNotACompany,
    #[error("the current tenure already has a pending transfer request")]
    TenureHasPendingTransferRequest,
}

/// Outcome of requesting a coordination transfer.
#[derive(Debug, Clone)]
pub struct RequestCoordinationTransferResponse {
    /// Why the request was rejected, if it was
    pub rejection_reason: Option<RequestCoordinationTransferRejection>,
    /// The new transfer request's id on success
    pub transfer_request: Option<Uuid>,
}

impl RequestCoordinationTransferResponse {
    /// Whether the request was turned down.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        self.rejection_reason.is_some()
    }

    const fn rejected(reason: RequestCoordinationTransferRejection) -> Self {
        Self {
            rejection_reason: Some(reason),
            transfer_request: None,
        }
    }
}

/// Offers the coordination of a cooperation to a candidate company.
pub async fn request_coordination_transfer(
    db: &DatabaseConnection,
    request: RequestCoordinationTransferRequest,
) -> Result<RequestCoordinationTransferResponse> {
    let Some(tenure) = current_tenure(db, request.cooperation).await? else {
        return Ok(RequestCoordinationTransferResponse::rejected(
            RequestCoordinationTransferRejection::CooperationNotFound,
        ));
    };
    if tenure.company != request.requester {
        return Ok(RequestCoordinationTransferResponse::rejected(
            RequestCoordinationTransferRejection::RequesterIsNotCoordinator,
        ));
    }
    if request.candidate == tenure.company {
        return Ok(RequestCoordinationTransferResponse::rejected(
            RequestCoordinationTransferRejection::CandidateIsCurrentCoordinator,
        ));
    }
    if Company::find_by_id(request.candidate).one(db).await?.is_none() {
        return Ok(RequestCoordinationTransferResponse::rejected(
            RequestCoordinationTransferRejection::CandidateIsNotACompany,
        ));
    }
    let pending = CoordinationTransferRequest::find()
        .filter(coordination_transfer_request::Column::RequestingTenure.eq(tenure.id))
        .one(db)
        .await?;
    if pending.is_some() {
        return Ok(RequestCoordinationTransferResponse::rejected(
            RequestCoordinationTransferRejection::TenureHasPendingTransferRequest,
        ));
    }

    let row = coordination_transfer_request::ActiveModel {
        id: Set(Uuid::new_v4()),
        requesting_tenure: Set(tenure.id),
        candidate: Set(request.candidate),
        request_date: Set(Utc::now()),
    };
    let row = row.insert(db).await?;

    Ok(RequestCoordinationTransferResponse {
        rejection_reason: None,
        transfer_request: Some(row.id),
    })
}

/// Request to accept a pending coordination transfer.
#[derive(Debug, Clone, Copy)]
pub struct AcceptCoordinationTransferRequest {
    /// The transfer request being accepted
    pub transfer_request: Uuid,
    /// The company accepting it
    pub accepting_company: Uuid,
}

/// Why accepting a coordination transfer was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AcceptCoordinationTransferRejection {
    #[error("the transfer request does not exist")]
    TransferRequestNotFound,
    #[error("the transfer request is closed")]
    TransferRequestClosed,
    #[error("only the candidate may accept the transfer request")]
    AcceptingCompanyIsNotCandidate,
}

/// Outcome of accepting a coordination transfer.
#[derive(Debug, Clone)]
pub struct AcceptCoordinationTransferResponse {
    /// Why the acceptance was rejected, if it was
    pub rejection_reason: Option<AcceptCoordinationTransferRejection>,
    /// The cooperation now coordinated by the acceptor, on success
    pub cooperation: Option<Uuid>,
}

impl AcceptCoordinationTransferResponse {
    /// Whether the acceptance was turned down.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        self.rejection_reason.is_some()
    }

    const fn rejected(reason: AcceptCoordinationTransferRejection) -> Self {
        Self {
            rejection_reason: Some(reason),
            cooperation: None,
        }
    }
}

/// Accepts a pending coordination transfer, starting a new tenure for the
/// candidate.
pub async fn accept_coordination_transfer(
    db: &DatabaseConnection,
    request: AcceptCoordinationTransferRequest,
) -> Result<AcceptCoordinationTransferResponse> {
    let Some(transfer_request) = CoordinationTransferRequest::find_by_id(request.transfer_request)
        .one(db)
        .await?
    else {
        return Ok(AcceptCoordinationTransferResponse::rejected(
            AcceptCoordinationTransferRejection::TransferRequestNotFound,
        ));
    };
    let Some(requesting_tenure) = CoordinationTenure::find_by_id(transfer_request.requesting_tenure)
        .one(db)
        .await?
    else {
        return Ok(AcceptCoordinationTransferResponse::rejected(
            AcceptCoordinationTransferRejection::TransferRequestNotFound,
        ));
    };
    // A request is only open while its tenure still coordinates.
    let current = current_tenure(db, requesting_tenure.cooperation).await?;
    if current.as_ref().map(|t| t.id) != Some(requesting_tenure.id) {
        return Ok(AcceptCoordinationTransferResponse::rejected(
            AcceptCoordinationTransferRejection::TransferRequestClosed,
        ));
    }
    if transfer_request.candidate != request.accepting_company {
        return Ok(AcceptCoordinationTransferResponse::rejected(
            AcceptCoordinationTransferRejection::AcceptingCompanyIsNotCandidate,
        ));
    }

    start_tenure(db, transfer_request.candidate, requesting_tenure.cooperation).await?;

    Ok(AcceptCoordinationTransferResponse {
        rejection_reason: None,
        cooperation: Some(requesting_tenure.cooperation),
    })
}
