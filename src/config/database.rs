//! Database configuration module.
//!
//! Handles `SQLite` database connection, table creation and seeding using
//! `SeaORM`. Tables are generated from the entity definitions via
//! `Schema::create_table_from_entity`, so the database schema always matches
//! the Rust struct definitions without manual SQL. Seeding creates the
//! social-accounting singleton with its two ledger accounts.

use crate::entities::{
    Account, Accountant, CancelledHoursWorked, Company, CompanyWorkInvite, Cooperation,
    CoordinationTenure, CoordinationTransferRequest, Email, Job, Member, Plan, PlanCooperation,
    PlanDraft, PlanReview, PrivateConsumption, ProductiveConsumption, RegisteredHoursWorked,
    SocialAccounting, Transfer, User, account, social_accounting,
};
use crate::errors::Result;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema, Set,
    TransactionTrait,
};
use uuid::Uuid;

/// Gets the database URL from the environment or returns the default local
/// `SQLite` path.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/arbeitszeit.sqlite".to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`,
/// falling back to a local `SQLite` file.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all database tables from the entity definitions.
///
/// Safe to call on an existing database; statements carry `IF NOT EXISTS`.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statements = vec![
        schema.create_table_from_entity(Account),
        schema.create_table_from_entity(Email),
        schema.create_table_from_entity(User),
        schema.create_table_from_entity(Member),
        schema.create_table_from_entity(Company),
        schema.create_table_from_entity(Accountant),
        schema.create_table_from_entity(Job),
        schema.create_table_from_entity(SocialAccounting),
        schema.create_table_from_entity(PlanDraft),
        schema.create_table_from_entity(Plan),
        schema.create_table_from_entity(PlanReview),
        schema.create_table_from_entity(Cooperation),
        schema.create_table_from_entity(PlanCooperation),
        schema.create_table_from_entity(CoordinationTenure),
        schema.create_table_from_entity(CoordinationTransferRequest),
        schema.create_table_from_entity(Transfer),
        schema.create_table_from_entity(CompanyWorkInvite),
        schema.create_table_from_entity(PrivateConsumption),
        schema.create_table_from_entity(ProductiveConsumption),
        schema.create_table_from_entity(RegisteredHoursWorked),
        schema.create_table_from_entity(CancelledHoursWorked),
    ];

    for statement in &mut statements {
        statement.if_not_exists();
        db.execute(builder.build(&*statement)).await?;
    }

    Ok(())
}

/// Ensures the social-accounting singleton exists, creating it together with
/// its authority account and public sector fund account on first run.
pub async fn seed_social_accounting(db: &DatabaseConnection) -> Result<social_accounting::Model> {
    if let Some(existing) = SocialAccounting::find().one(db).await? {
        return Ok(existing);
    }

    let txn = db.begin().await?;

    let authority_account = account::ActiveModel {
        id: Set(Uuid::new_v4()),
    };
    let authority_account = authority_account.insert(&txn).await?;

    let psf_account = account::ActiveModel {
        id: Set(Uuid::new_v4()),
    };
    let psf_account = psf_account.insert(&txn).await?;

    let row = social_accounting::ActiveModel {
        id: Set(Uuid::new_v4()),
        account: Set(authority_account.id),
        account_psf: Set(psf_account.id),
    };
    let row = row.insert(&txn).await?;

    txn.commit().await?;
    Ok(row)
}

/// Looks up the social-accounting singleton, failing if the database was
/// never seeded.
pub async fn get_social_accounting<C>(db: &C) -> Result<social_accounting::Model>
where
    C: ConnectionTrait,
{
    SocialAccounting::find()
        .one(db)
        .await?
        .ok_or(crate::errors::Error::MissingSocialAccounting)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::QuerySelect;

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Tables exist once they can be queried
        let _ = Account::find().limit(1).all(&db).await?;
        let _ = Plan::find().limit(1).all(&db).await?;
        let _ = Transfer::find().limit(1).all(&db).await?;
        let _ = Cooperation::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_social_accounting_creates_two_accounts() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        let accounting = seed_social_accounting(&db).await?;
        assert_ne!(accounting.account, accounting.account_psf);

        let accounts = Account::find().all(&db).await?;
        assert_eq!(accounts.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_social_accounting_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        let first = seed_social_accounting(&db).await?;
        let second = seed_social_accounting(&db).await?;
        assert_eq!(first, second);
        assert_eq!(SocialAccounting::find().all(&db).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_social_accounting_fails_on_unseeded_database() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        let result = get_social_accounting(&db).await;
        assert!(matches!(
            result,
            Err(crate::errors::Error::MissingSocialAccounting)
        ));

        Ok(())
    }
}
