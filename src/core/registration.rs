//! Registration business logic for members, companies and accountants.
//!
//! One login (email plus password) may back several roles at once: the same
//! user row can stand behind a member, a company and an accountant. Each
//! registration therefore first looks for existing credentials under the
//! requested email and either reuses them (when the password matches) or
//! creates fresh ones. Accountant registration additionally requires an
//! invitation token issued for exactly the registered email address.

use crate::{
    core::accounts,
    entities::{
        Accountant, Company, Member, User, accountant, company, email, member, user,
    },
    errors::Result,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use thiserror::Error;
use uuid::Uuid;

/// Request to register a new member.
#[derive(Debug, Clone)]
pub struct RegisterMemberRequest {
    /// Login email address
    pub email: String,
    /// Display name
    pub name: String,
    /// Plain-text password, hashed before storage
    pub password: String,
}

/// Why a member registration was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegisterMemberRejection {
    #[error("a member with this email address already exists")]
    MemberAlreadyExists,
    #[error("a company with this email address exists under a different password")]
    CompanyWithDifferentPasswordExists,
}

/// Outcome of a member registration.
#[derive(Debug, Clone)]
pub struct RegisterMemberResponse {
    /// Why the registration was rejected, if it was
    pub rejection_reason: Option<RegisterMemberRejection>,
    /// The new member's id on success
    pub member_id: Option<Uuid>,
}

impl RegisterMemberResponse {
    /// Whether the registration was turned down.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        self.rejection_reason.is_some()
    }

    const fn rejected(reason: RegisterMemberRejection) -> Self {
        Self {
            rejection_reason: Some(reason),
            member_id: None,
        }
    }
}

/// Registers a member, reusing existing credentials when the email already
/// backs a company with the same password.
pub async fn register_member(
    db: &sea_orm::DatabaseConnection,
    request: RegisterMemberRequest,
) -> Result<RegisterMemberResponse> {
    let txn = db.begin().await?;

    let credentials = match find_user_by_email(&txn, &request.email).await? {
        Some(existing) => {
            let member_exists = Member::find()
                .filter(member::Column::UserId.eq(existing.id))
                .one(&txn)
                .await?
                .is_some();
            if member_exists {
                return Ok(RegisterMemberResponse::rejected(
                    RegisterMemberRejection::MemberAlreadyExists,
                ));
            }
            if !bcrypt::verify(&request.password, &existing.password_hash)? {
                return Ok(RegisterMemberResponse::rejected(
                    RegisterMemberRejection::CompanyWithDifferentPasswordExists,
                ));
            }
            existing
        }
        None => create_credentials(&txn, &request.email, &request.password).await?,
    };

    let account = accounts::create_account(&txn).await?;
    let row = member::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(credentials.id),
        name: Set(request.name),
        account: Set(account.id),
        registered_on: Set(Utc::now()),
    };
    let row = row.insert(&txn).await?;

    txn.commit().await?;
    Ok(RegisterMemberResponse {
        rejection_reason: None,
        member_id: Some(row.id),
    })
}

/// Request to register a new company.
#[derive(Debug, Clone)]
pub struct RegisterCompanyRequest {
    /// Login email address
    pub email: String,
    /// Display name
    pub name: String,
    /// Plain-text password, hashed before storage
    pub password: String,
}

/// Why a company registration was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegisterCompanyRejection {
    #[error("a company with this email address already exists")]
    CompanyAlreadyExists,
    #[error("the password does not match the existing credentials for this email address")]
    UserPasswordIsInvalid,
}

/// Outcome of a company registration.
#[derive(Debug, Clone)]
pub struct RegisterCompanyResponse {
    /// Why the registration was rejected, if it was
    pub rejection_reason: Option<RegisterCompanyRejection>,
    /// The new company's id on success
    pub company_id: Option<Uuid>,
}

impl RegisterCompanyResponse {
    /// Whether the registration was turned down.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        self.rejection_reason.is_some()
    }

    const fn rejected(reason: RegisterCompanyRejection) -> Self {
        Self {
            rejection_reason: Some(reason),
            company_id: None,
        }
    }
}

/// Registers a company with its four typed accounts.
pub async fn register_company(
    db: &sea_orm::DatabaseConnection,
    request: RegisterCompanyRequest,
) -> Result<RegisterCompanyResponse> {
    let txn = db.begin().await?;

    let credentials = match find_user_by_email(&txn, &request.email).await? {
        Some(existing) => {
            let company_exists = Company::find()
                .filter(company::Column::UserId.eq(existing.id))
                .one(&txn)
                .await?
                .is_some();
            if company_exists {
                return Ok(RegisterCompanyResponse::rejected(
                    RegisterCompanyRejection::CompanyAlreadyExists,
                ));
            }
            if !bcrypt::verify(&request.password, &existing.password_hash)? {
                return Ok(RegisterCompanyResponse::rejected(
                    RegisterCompanyRejection::UserPasswordIsInvalid,
                ));
            }
            existing
        }
        None => create_credentials(&txn, &request.email, &request.password).await?,
    };

    let p_account = accounts::create_account(&txn).await?;
    let r_account = accounts::create_account(&txn).await?;
    let a_account = accounts::create_account(&txn).await?;
    let prd_account = accounts::create_account(&txn).await?;

    let row = company::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(credentials.id),
        name: Set(request.name),
        p_account: Set(p_account.id),
        r_account: Set(r_account.id),
        a_account: Set(a_account.id),
        prd_account: Set(prd_account.id),
        registered_on: Set(Utc::now()),
    };
    let row = row.insert(&txn).await?;

    txn.commit().await?;
    Ok(RegisterCompanyResponse {
        rejection_reason: None,
        company_id: Some(row.id),
    })
}

/// Request to register a new accountant.
#[derive(Debug, Clone)]
pub struct RegisterAccountantRequest {
    /// The invitation token received by mail
    pub token: String,
    /// Login email address, must match the invited address
    pub email: String,
    /// Display name
    pub name: String,
    /// Plain-text password, hashed before storage
    pub password: String,
}

/// Why an accountant registration was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegisterAccountantRejection {
    #[error("the invitation token is not valid for this email address")]
    InvalidToken,
    #[error("an accountant with this email address already exists")]
    AccountantAlreadyExists,
    #[error("the password does not match the existing credentials for this email address")]
    UserPasswordIsInvalid,
}

/// Outcome of an accountant registration.
#[derive(Debug, Clone)]
pub struct RegisterAccountantResponse {
    /// Why the registration was rejected, if it was
    pub rejection_reason: Option<RegisterAccountantRejection>,
    /// The new accountant's id on success
    pub accountant_id: Option<Uuid>,
}

impl RegisterAccountantResponse {
    /// Whether the registration was turned down.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        self.rejection_reason.is_some()
    }

    const fn rejected(reason: RegisterAccountantRejection) -> Self {
        Self {
            rejection_reason: Some(reason),
            accountant_id: None,
        }
    }
}

/// Issues an invitation token for an email address.
///
/// The token simply encodes the invited address; registration checks that
/// the token decodes back to the email being registered. Sending the token
/// out is the mail layer's concern.
#[must_use]
pub fn issue_invitation_token(email: &str) -> String {
    // Hex-encode so the token survives being pasted into a URL.
    email.bytes().fold(String::new(), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}

fn decode_invitation_token(token: &str) -> Option<String> {
    if token.len() % 2 != 0 {
        return None;
    }
    let bytes: Option<Vec<u8>> = (0..token.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&token[i..i + 2], 16).ok())
        .collect();
    String::from_utf8(bytes?).ok()
}

/// Registers an accountant against a valid invitation token. An email that
/// already backs a member or company may register as accountant too, given
/// the matching password.
pub async fn register_accountant(
    db: &sea_orm::DatabaseConnection,
    request: RegisterAccountantRequest,
) -> Result<RegisterAccountantResponse> {
    if decode_invitation_token(&request.token).as_deref() != Some(request.email.as_str()) {
        return Ok(RegisterAccountantResponse::rejected(
            RegisterAccountantRejection::InvalidToken,
        ));
    }

    let txn = db.begin().await?;

    let credentials = match find_user_by_email(&txn, &request.email).await? {
        Some(existing) => {
            let accountant_exists = Accountant::find()
                .filter(accountant::Column::UserId.eq(existing.id))
                .one(&txn)
                .await?
                .is_some();
            if accountant_exists {
                return Ok(RegisterAccountantResponse::rejected(
                    RegisterAccountantRejection::AccountantAlreadyExists,
                ));
            }
            if !bcrypt::verify(&request.password, &existing.password_hash)? {
                return Ok(RegisterAccountantResponse::rejected(
                    RegisterAccountantRejection::UserPasswordIsInvalid,
                ));
            }
            existing
        }
        None => create_credentials(&txn, &request.email, &request.password).await?,
    };

    let row = accountant::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(credentials.id),
        name: Set(request.name),
    };
    let row = row.insert(&txn).await?;

    txn.commit().await?;
    Ok(RegisterAccountantResponse {
        rejection_reason: None,
        accountant_id: Some(row.id),
    })
}

async fn find_user_by_email<C>(db: &C, address: &str) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .filter(user::Column::EmailAddress.eq(address))
        .one(db)
        .await
        .map_err(Into::into)
}

async fn create_credentials<C>(db: &C, address: &str, password: &str) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    let email_row = email::ActiveModel {
        address: Set(address.to_string()),
        confirmed_on: Set(None),
    };
    email_row.insert(db).await?;

    let user_row = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        email_address: Set(address.to_string()),
        password_hash: Set(bcrypt::hash(password, bcrypt::DEFAULT_COST)?),
    };
    user_row.insert(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::Email;
    use crate::test_utils::setup_test_db;

    fn member_request(email: &str) -> RegisterMemberRequest {
        RegisterMemberRequest {
            email: email.to_string(),
            name: "Test Member".to_string(),
            password: "secret".to_string(),
        }
    }

    fn company_request(email: &str) -> RegisterCompanyRequest {
        RegisterCompanyRequest {
            email: email.to_string(),
            name: "Test Company".to_string(),
            password: "secret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_member_can_register() -> Result<()> {
        let db = setup_test_db().await?;
        let response = register_member(&db, member_request("worker@test.test")).await?;
        assert!(!response.is_rejected());
        assert!(response.member_id.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_member_registration_creates_email_and_account() -> Result<()> {
        let db = setup_test_db().await?;
        let response = register_member(&db, member_request("worker@test.test")).await?;
        let member = Member::find_by_id(response.member_id.unwrap())
            .one(&db)
            .await?
            .unwrap();
        assert!(
            Email::find_by_id("worker@test.test".to_string())
                .one(&db)
                .await?
                .is_some()
        );
        assert_eq!(
            crate::core::accounts::account_balance(&db, member.account).await?,
            rust_decimal::Decimal::ZERO
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_member_email_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        register_member(&db, member_request("worker@test.test")).await?;
        let response = register_member(&db, member_request("worker@test.test")).await?;
        assert_eq!(
            response.rejection_reason,
            Some(RegisterMemberRejection::MemberAlreadyExists)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_member_can_reuse_company_credentials_with_same_password() -> Result<()> {
        let db = setup_test_db().await?;
        register_company(&db, company_request("dual@test.test")).await?;
        let response = register_member(&db, member_request("dual@test.test")).await?;
        assert!(!response.is_rejected());
        Ok(())
    }

    #[tokio::test]
    async fn test_member_with_wrong_password_for_company_email_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        register_company(&db, company_request("dual@test.test")).await?;
        let mut request = member_request("dual@test.test");
        request.password = "different".to_string();
        let response = register_member(&db, request).await?;
        assert_eq!(
            response.rejection_reason,
            Some(RegisterMemberRejection::CompanyWithDifferentPasswordExists)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_company_registration_creates_four_accounts() -> Result<()> {
        let db = setup_test_db().await?;
        let response = register_company(&db, company_request("producer@test.test")).await?;
        assert!(!response.is_rejected());
        let company = Company::find_by_id(response.company_id.unwrap())
            .one(&db)
            .await?
            .unwrap();
        let accounts = [
            company.p_account,
            company.r_account,
            company.a_account,
            company.prd_account,
        ];
        for pair in accounts.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_company_email_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        register_company(&db, company_request("producer@test.test")).await?;
        let response = register_company(&db, company_request("producer@test.test")).await?;
        assert_eq!(
            response.rejection_reason,
            Some(RegisterCompanyRejection::CompanyAlreadyExists)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_invited_accountant_can_register() -> Result<()> {
        let db = setup_test_db().await?;
        let token = issue_invitation_token("auditor@test.test");
        let response = register_accountant(
            &db,
            RegisterAccountantRequest {
                token,
                email: "auditor@test.test".to_string(),
                name: "Auditor".to_string(),
                password: "secret".to_string(),
            },
        )
        .await?;
        assert!(!response.is_rejected());
        assert!(response.accountant_id.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_accountant_with_token_for_other_email_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let token = issue_invitation_token("other@test.test");
        let response = register_accountant(
            &db,
            RegisterAccountantRequest {
                token,
                email: "auditor@test.test".to_string(),
                name: "Auditor".to_string(),
                password: "secret".to_string(),
            },
        )
        .await?;
        assert_eq!(
            response.rejection_reason,
            Some(RegisterAccountantRejection::InvalidToken)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_accountant_can_register_with_email_of_member() -> Result<()> {
        let db = setup_test_db().await?;
        register_member(&db, member_request("dual@test.test")).await?;
        let response = register_accountant(
            &db,
            RegisterAccountantRequest {
                token: issue_invitation_token("dual@test.test"),
                email: "dual@test.test".to_string(),
                name: "Auditor".to_string(),
                password: "secret".to_string(),
            },
        )
        .await?;
        assert!(!response.is_rejected());
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_accountant_email_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let request = RegisterAccountantRequest {
            token: issue_invitation_token("auditor@test.test"),
            email: "auditor@test.test".to_string(),
            name: "Auditor".to_string(),
            password: "secret".to_string(),
        };
        register_accountant(&db, request.clone()).await?;
        let response = register_accountant(&db, request).await?;
        assert_eq!(
            response.rejection_reason,
            Some(RegisterAccountantRejection::AccountantAlreadyExists)
        );
        Ok(())
    }

    #[test]
    fn test_invitation_token_roundtrip() {
        let token = issue_invitation_token("auditor@test.test");
        assert_eq!(
            decode_invitation_token(&token).as_deref(),
            Some("auditor@test.test")
        );
        assert!(decode_invitation_token("not-hex").is_none());
    }
}
