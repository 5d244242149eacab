//! Hours-worked business logic.
//!
//! Registering worked hours books two transfers atomically: the work
//! certificates flow from the company's labour account to the worker, and
//! the public-sector contribution is withheld from the worker in the same
//! breath. The withheld fraction is `1 - fic`, with `fic` the payout factor
//! at registration time. Cancelling a registration books the two mirror
//! transfers and records the cancellation; an entry can be cancelled only
//! once.

use crate::{
    config::database::get_social_accounting,
    core::{accounts, payout, workers},
    entities::{
        CancelledHoursWorked, Company, Member, RegisteredHoursWorked, Transfer, TransferType,
        cancelled_hours_worked, registered_hours_worked,
    },
    errors::Result,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use thiserror::Error;
use uuid::Uuid;

/// Request to register hours a member worked at a company.
#[derive(Debug, Clone, Copy)]
pub struct RegisterHoursWorkedRequest {
    /// The company the hours were worked at
    pub company: Uuid,
    /// The worker who worked them
    pub worker: Uuid,
    /// Hours worked, must be positive
    pub hours_worked: Decimal,
}

/// Why registering hours was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegisterHoursWorkedRejection {
    #[error("hours worked must be positive")]
    HoursWorkedMustBePositive,
    #[error("the member does not work at the company")]
    WorkerNotAtCompany,
}

/// Outcome of registering hours.
#[derive(Debug, Clone)]
pub struct RegisterHoursWorkedResponse {
    /// Why the registration was rejected, if it was
    pub rejection_reason: Option<RegisterHoursWorkedRejection>,
    /// The registration's id on success
    pub registration_id: Option<Uuid>,
}

impl RegisterHoursWorkedResponse {
    /// Whether the registration was turned down.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        self.rejection_reason.is_some()
    }

    const fn rejected(reason: RegisterHoursWorkedRejection) -> Self {
        Self {
            rejection_reason: Some(reason),
            registration_id: None,
        }
    }
}

/// Registers worked hours: pays work certificates to the worker and
/// withholds the public-sector contribution.
pub async fn register_hours_worked(
    db: &DatabaseConnection,
    request: RegisterHoursWorkedRequest,
) -> Result<RegisterHoursWorkedResponse> {
    if request.hours_worked <= Decimal::ZERO {
        return Ok(RegisterHoursWorkedResponse::rejected(
            RegisterHoursWorkedRejection::HoursWorkedMustBePositive,
        ));
    }
    if workers::find_job(db, request.company, request.worker).await?.is_none() {
        return Ok(RegisterHoursWorkedResponse::rejected(
            RegisterHoursWorkedRejection::WorkerNotAtCompany,
        ));
    }
    let (Some(company), Some(worker)) = (
        Company::find_by_id(request.company).one(db).await?,
        Member::find_by_id(request.worker).one(db).await?,
    ) else {
        return Ok(RegisterHoursWorkedResponse::rejected(
            RegisterHoursWorkedRejection::WorkerNotAtCompany,
        ));
    };

    let now = Utc::now();
    let fic = payout::calculate_payout_factor(db, now).await?;

    let txn = db.begin().await?;
    let accounting = get_social_accounting(&txn).await?;

    let certificates = accounts::create_transfer(
        &txn,
        now,
        company.a_account,
        worker.account,
        request.hours_worked,
        TransferType::WorkCertificates,
    )
    .await?;
    let taxes = accounts::create_transfer(
        &txn,
        now,
        worker.account,
        accounting.account_psf,
        request.hours_worked * (Decimal::ONE - fic),
        TransferType::Taxes,
    )
    .await?;

    let registration = registered_hours_worked::ActiveModel {
        id: Set(Uuid::new_v4()),
        company: Set(company.id),
        member: Set(worker.id),
        transfer_of_work_certificates: Set(certificates.id),
        transfer_of_taxes: Set(taxes.id),
        registered_on: Set(now),
    };
    let registration = registration.insert(&txn).await?;

    txn.commit().await?;
    Ok(RegisterHoursWorkedResponse {
        rejection_reason: None,
        registration_id: Some(registration.id),
    })
}

/// Request to cancel a previous registration of worked hours.
#[derive(Debug, Clone, Copy)]
pub struct CancelHoursWorkedRequest {
    /// The company that registered the hours
    pub company: Uuid,
    /// The registration to cancel
    pub registration: Uuid,
}

/// Why a cancellation was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CancelHoursWorkedRejection {
    #[error("the registration does not exist")]
    RegistrationNotFound,
    #[error("only the registering company may cancel the entry")]
    RequesterIsNotRegisteringCompany,
    #[error("the registration has already been cancelled")]
    RegistrationAlreadyCancelled,
}

/// Outcome of a cancellation.
#[derive(Debug, Clone)]
pub struct CancelHoursWorkedResponse {
    /// Why the cancellation was rejected, if it was
    pub rejection_reason: Option<CancelHoursWorkedRejection>,
}

impl CancelHoursWorkedResponse {
    /// Whether the cancellation was turned down.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        self.rejection_reason.is_some()
    }

    const fn rejected(reason: CancelHoursWorkedRejection) -> Self {
        Self {
            rejection_reason: Some(reason),
        }
    }
}

/// Cancels a registration by booking the two mirror transfers.
pub async fn cancel_hours_worked(
    db: &DatabaseConnection,
    request: CancelHoursWorkedRequest,
) -> Result<CancelHoursWorkedResponse> {
    let Some(registration) = RegisteredHoursWorked::find_by_id(request.registration)
        .one(db)
        .await?
    else {
        return Ok(CancelHoursWorkedResponse::rejected(
            CancelHoursWorkedRejection::RegistrationNotFound,
        ));
    };
    if registration.company != request.company {
        return Ok(CancelHoursWorkedResponse::rejected(
            CancelHoursWorkedRejection::RequesterIsNotRegisteringCompany,
        ));
    }
    let already_cancelled = CancelledHoursWorked::find()
        .filter(cancelled_hours_worked::Column::RegisteredEntry.eq(registration.id))
        .one(db)
        .await?
        .is_some();
    if already_cancelled {
        return Ok(CancelHoursWorkedResponse::rejected(
            CancelHoursWorkedRejection::RegistrationAlreadyCancelled,
        ));
    }

    let (Some(certificates), Some(taxes)) = (
        Transfer::find_by_id(registration.transfer_of_work_certificates)
            .one(db)
            .await?,
        Transfer::find_by_id(registration.transfer_of_taxes).one(db).await?,
    ) else {
        return Ok(CancelHoursWorkedResponse::rejected(
            CancelHoursWorkedRejection::RegistrationNotFound,
        ));
    };

    let now = Utc::now();
    let txn = db.begin().await?;

    let certificates_reversal = accounts::create_transfer(
        &txn,
        now,
        certificates.credit_account,
        certificates.debit_account,
        certificates.value,
        TransferType::WorkCertificates,
    )
    .await?;
    let taxes_reversal = accounts::create_transfer(
        &txn,
        now,
        taxes.credit_account,
        taxes.debit_account,
        taxes.value,
        TransferType::Taxes,
    )
    .await?;

    let cancellation = cancelled_hours_worked::ActiveModel {
        id: Set(Uuid::new_v4()),
        registered_entry: Set(registration.id),
        transfer_of_work_certificates: Set(certificates_reversal.id),
        transfer_of_taxes: Set(taxes_reversal.id),
        cancelled_on: Set(now),
    };
    cancellation.insert(&txn).await?;

    txn.commit().await?;
    Ok(CancelHoursWorkedResponse {
        rejection_reason: None,
    })
}

/// Lists the hour registrations of a company, including cancelled ones.
pub async fn registered_hours_of_company<C>(
    db: &C,
    company_id: Uuid,
) -> Result<Vec<registered_hours_worked::Model>>
where
    C: sea_orm::ConnectionTrait,
{
    RegisteredHoursWorked::find()
        .filter(registered_hours_worked::Column::Company.eq(company_id))
        .all(db)
        .await
        .map_err(Into::into)
}
