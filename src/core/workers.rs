//! Work invitation and employment business logic.
//!
//! Companies invite members to work for them; a member answers the invite,
//! which either creates the employment association or simply removes the
//! invitation. Companies can end an employment again.

use crate::{
    entities::{
        Company, CompanyWorkInvite, Job, Member, company_work_invite, job, member,
    },
    errors::Result,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, Set, TransactionTrait,
};
use thiserror::Error;
use uuid::Uuid;

/// Request to invite a member to work at a company.
#[derive(Debug, Clone, Copy)]
pub struct InviteWorkerRequest {
    /// The inviting company
    pub company: Uuid,
    /// The member to invite
    pub worker: Uuid,
}

/// Why a work invitation was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InviteWorkerRejection {
    #[error("the inviting company does not exist")]
    CompanyNotFound,
    #[error("the invited member does not exist")]
    WorkerNotFound,
    #[error("the member already works for the company")]
    WorkerAlreadyWorksForCompany,
    #[error("an invitation for this member is already pending")]
    InvitationAlreadyIssued,
}

/// Outcome of inviting a worker.
#[derive(Debug, Clone)]
pub struct InviteWorkerResponse {
    /// Why the invitation was rejected, if it was
    pub rejection_reason: Option<InviteWorkerRejection>,
    /// The new invite's id on success
    pub invite_id: Option<Uuid>,
}

impl InviteWorkerResponse {
    /// Whether the invitation was turned down.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        self.rejection_reason.is_some()
    }

    const fn rejected(reason: InviteWorkerRejection) -> Self {
        Self {
            rejection_reason: Some(reason),
            invite_id: None,
        }
    }
}

/// Invites a member to work at a company.
pub async fn invite_worker(
    db: &DatabaseConnection,
    request: InviteWorkerRequest,
) -> Result<InviteWorkerResponse> {
    if Company::find_by_id(request.company).one(db).await?.is_none() {
        return Ok(InviteWorkerResponse::rejected(
            InviteWorkerRejection::CompanyNotFound,
        ));
    }
    if Member::find_by_id(request.worker).one(db).await?.is_none() {
        return Ok(InviteWorkerResponse::rejected(
            InviteWorkerRejection::WorkerNotFound,
        ));
    }
    if find_job(db, request.company, request.worker).await?.is_some() {
        return Ok(InviteWorkerResponse::rejected(
            InviteWorkerRejection::WorkerAlreadyWorksForCompany,
        ));
    }
    let pending = CompanyWorkInvite::find()
        .filter(company_work_invite::Column::Company.eq(request.company))
        .filter(company_work_invite::Column::Member.eq(request.worker))
        .one(db)
        .await?;
    if pending.is_some() {
        return Ok(InviteWorkerResponse::rejected(
            InviteWorkerRejection::InvitationAlreadyIssued,
        ));
    }

    let invite = company_work_invite::ActiveModel {
        id: Set(Uuid::new_v4()),
        company: Set(request.company),
        member: Set(request.worker),
    };
    let invite = invite.insert(db).await?;

    Ok(InviteWorkerResponse {
        rejection_reason: None,
        invite_id: Some(invite.id),
    })
}

/// Request to answer a pending work invitation.
#[derive(Debug, Clone, Copy)]
pub struct AnswerWorkInviteRequest {
    /// The invite being answered
    pub invite: Uuid,
    /// The answering member
    pub member: Uuid,
    /// Whether the member accepts the invitation
    pub is_accepted: bool,
}

/// Why answering an invitation was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AnswerWorkInviteRejection {
    #[error("the invitation does not exist")]
    InviteNotFound,
    #[error("the invitation was issued to a different member")]
    MemberWasNotInvited,
}

/// Outcome of answering an invitation.
#[derive(Debug, Clone)]
pub struct AnswerWorkInviteResponse {
    /// Why the answer was rejected, if it was
    pub rejection_reason: Option<AnswerWorkInviteRejection>,
    /// The inviting company, on success
    pub company_id: Option<Uuid>,
}

impl AnswerWorkInviteResponse {
    /// Whether the answer was turned down.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        self.rejection_reason.is_some()
    }
}

/// Answers a pending work invitation. Accepting creates the employment;
/// either way the invitation is removed.
pub async fn answer_work_invite(
    db: &DatabaseConnection,
    request: AnswerWorkInviteRequest,
) -> Result<AnswerWorkInviteResponse> {
    let Some(invite) = CompanyWorkInvite::find_by_id(request.invite).one(db).await? else {
        return Ok(AnswerWorkInviteResponse {
            rejection_reason: Some(AnswerWorkInviteRejection::InviteNotFound),
            company_id: None,
        });
    };
    if invite.member != request.member {
        return Ok(AnswerWorkInviteResponse {
            rejection_reason: Some(AnswerWorkInviteRejection::MemberWasNotInvited),
            company_id: None,
        });
    }

    let txn = db.begin().await?;
    let company_id = invite.company;
    if request.is_accepted {
        let employment = job::ActiveModel {
            member_id: Set(invite.member),
            company_id: Set(invite.company),
        };
        employment.insert(&txn).await?;
    }
    invite.delete(&txn).await?;
    txn.commit().await?;

    Ok(AnswerWorkInviteResponse {
        rejection_reason: None,
        company_id: Some(company_id),
    })
}

/// Request to end an employment.
#[derive(Debug, Clone, Copy)]
pub struct RemoveWorkerRequest {
    /// The employing company
    pub company: Uuid,
    /// The worker being removed
    pub worker: Uuid,
}

/// Why removing a worker was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RemoveWorkerRejection {
    #[error("the company does not exist")]
    CompanyNotFound,
    #[error("the worker does not exist")]
    WorkerNotFound,
    #[error("the member does not work for the company")]
    NotWorkplaceOfWorker,
}

/// Outcome of removing a worker.
#[derive(Debug, Clone)]
pub struct RemoveWorkerResponse {
    /// Why the removal was rejected, if it was
    pub rejection_reason: Option<RemoveWorkerRejection>,
}

impl RemoveWorkerResponse {
    /// Whether the removal was turned down.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        self.rejection_reason.is_some()
    }

    const fn rejected(reason: RemoveWorkerRejection) -> Self {
        Self {
            rejection_reason: Some(reason),
        }
    }
}

/// Ends an employment.
pub async fn remove_worker(
    db: &DatabaseConnection,
    request: RemoveWorkerRequest,
) -> Result<RemoveWorkerResponse> {
    if Company::find_by_id(request.company).one(db).await?.is_none() {
        return Ok(RemoveWorkerResponse::rejected(
            RemoveWorkerRejection::CompanyNotFound,
        ));
    }
    if Member::find_by_id(request.worker).one(db).await?.is_none() {
        return Ok(RemoveWorkerResponse::rejected(
            RemoveWorkerRejection::WorkerNotFound,
        ));
    }
    let Some(employment) = find_job(db, request.company, request.worker).await? else {
        return Ok(RemoveWorkerResponse::rejected(
            RemoveWorkerRejection::NotWorkplaceOfWorker,
        ));
    };
    employment.delete(db).await?;
    Ok(RemoveWorkerResponse {
        rejection_reason: None,
    })
}

/// Lists the members working at a company.
pub async fn list_workers<C>(db: &C, company_id: Uuid) -> Result<Vec<member::Model>>
where
    C: ConnectionTrait,
{
    let employments = Job::find()
        .filter(job::Column::CompanyId.eq(company_id))
        .all(db)
        .await?;
    let member_ids: Vec<_> = employments.into_iter().map(|j| j.member_id).collect();
    Member::find()
        .filter(member::Column::Id.is_in(member_ids))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists the pending work invitations of a member.
pub async fn pending_invites_of_member<C>(
    db: &C,
    member_id: Uuid,
) -> Result<Vec<company_work_invite::Model>>
where
    C: ConnectionTrait,
{
    CompanyWorkInvite::find()
        .filter(company_work_invite::Column::Member.eq(member_id))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Whether a member works at a company.
pub async fn find_job<C>(db: &C, company_id: Uuid, member_id: Uuid) -> Result<Option<job::Model>>
where
    C: ConnectionTrait,
{
    Job::find()
        .filter(job::Column::CompanyId.eq(company_id))
        .filter(job::Column::MemberId.eq(member_id))
        .one(db)
        .await
        .map_err(Into::into)
}
