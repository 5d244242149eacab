//! Payout factor and public sector fund.
//!
//! Public services consume means and raw materials without selling anything
//! back, so their costs are carried by everyone: a fraction of every paid
//! work certificate is withheld for the public sector fund. The payout
//! factor (the fraction a worker keeps) is derived from the plans active at
//! the reference time:
//!
//! `fic = (A - (Po + Ro)) / (A + Ao)`
//!
//! where `A` is productive labour per day and `Ao`, `Po`, `Ro` are the
//! public-service labour, means and resource costs per day.

use crate::{
    config::database::get_social_accounting,
    core::{accounts, plans},
    errors::Result,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::ConnectionTrait;

/// Calculates the payout factor from the plans active at `timestamp`.
///
/// With no active plans the factor is one: every worked hour is paid out in
/// full. The factor drops below one as public services consume means and
/// raw materials, and can go negative when they consume more than
/// productive labour provides.
pub async fn calculate_payout_factor<C>(db: &C, timestamp: DateTime<Utc>) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    let active = plans::active_plans(db, timestamp).await?;
    if active.is_empty() {
        return Ok(Decimal::ONE);
    }

    let mut productive_labour_per_day = Decimal::ZERO;
    let mut public_labour_per_day = Decimal::ZERO;
    let mut public_means_per_day = Decimal::ZERO;
    let mut public_resources_per_day = Decimal::ZERO;

    for reviewed in &active {
        let plan = &reviewed.plan;
        let timeframe = Decimal::from(plan.timeframe_days);
        if timeframe.is_zero() {
            continue;
        }
        if plan.is_public_service {
            public_labour_per_day += plan.costs_a / timeframe;
            public_means_per_day += plan.costs_p / timeframe;
            public_resources_per_day += plan.costs_r / timeframe;
        } else {
            productive_labour_per_day += plan.costs_a / timeframe;
        }
    }

    let numerator = productive_labour_per_day - (public_means_per_day + public_resources_per_day);
    let mut denominator = productive_labour_per_day + public_labour_per_day;
    if denominator.is_zero() {
        denominator = Decimal::ONE;
    }
    Ok(numerator / denominator)
}

/// The current balance of the public sector fund account.
pub async fn psf_balance<C>(db: &C) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    let accounting = get_social_accounting(db).await?;
    accounts::account_balance(db, accounting.account_psf).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::plans::PlanCosts;
    use crate::test_utils::{create_approved_plan, create_test_company, setup_test_db};

    fn costs(labour: i64, resources: i64, means: i64) -> PlanCosts {
        PlanCosts {
            labour: Decimal::from(labour),
            resources: Decimal::from(resources),
            means: Decimal::from(means),
        }
    }

    #[tokio::test]
    async fn test_payout_factor_is_one_without_plans() -> Result<()> {
        let db = setup_test_db().await?;
        assert_eq!(
            calculate_payout_factor(&db, Utc::now()).await?,
            Decimal::ONE
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_payout_factor_is_zero_for_labour_only_public_plan() -> Result<()> {
        let db = setup_test_db().await?;
        let planner = create_test_company(&db, "Planner").await?;
        create_approved_plan(&db, planner.id, costs(10, 0, 0), 10, 10, true).await?;
        assert_eq!(
            calculate_payout_factor(&db, Utc::now()).await?,
            Decimal::ZERO
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_payout_factor_is_negative_when_public_p_and_r_dominate() -> Result<()> {
        let db = setup_test_db().await?;
        let planner = create_test_company(&db, "Planner").await?;
        create_approved_plan(&db, planner.id, costs(10, 10, 10), 10, 10, true).await?;
        assert!(calculate_payout_factor(&db, Utc::now()).await? < Decimal::ZERO);
        Ok(())
    }

    #[tokio::test]
    async fn test_payout_factor_is_zero_when_productive_labour_equals_public_p_plus_r() -> Result<()>
    {
        let db = setup_test_db().await?;
        let planner = create_test_company(&db, "Planner").await?;
        create_approved_plan(&db, planner.id, costs(10, 10, 10), 10, 10, true).await?;
        create_approved_plan(&db, planner.id, costs(20, 0, 0), 10, 10, false).await?;
        assert_eq!(
            calculate_payout_factor(&db, Utc::now()).await?,
            Decimal::ZERO
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_payout_factor_is_positive_when_productive_labour_dominates() -> Result<()> {
        let db = setup_test_db().await?;
        let planner = create_test_company(&db, "Planner").await?;
        create_approved_plan(&db, planner.id, costs(10, 10, 10), 10, 10, true).await?;
        create_approved_plan(&db, planner.id, costs(21, 0, 0), 10, 10, false).await?;
        assert!(calculate_payout_factor(&db, Utc::now()).await? > Decimal::ZERO);
        Ok(())
    }

    #[tokio::test]
    async fn test_exact_payout_factor_value() -> Result<()> {
        let db = setup_test_db().await?;
        let planner = create_test_company(&db, "Planner").await?;
        // A = 10, Ao = 10, Po = 10, Ro = 10, equal timeframes:
        // (10 - 20) / (10 + 10) = -0.5
        create_approved_plan(&db, planner.id, costs(10, 10, 10), 10, 10, true).await?;
        create_approved_plan(&db, planner.id, costs(10, 10, 10), 10, 10, false).await?;
        assert_eq!(
            calculate_payout_factor(&db, Utc::now()).await?,
            Decimal::new(-5, 1)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_psf_balance_is_zero_on_fresh_database() -> Result<()> {
        let db = setup_test_db().await?;
        assert_eq!(psf_balance(&db).await?, Decimal::ZERO);
        Ok(())
    }

    #[tokio::test]
    async fn test_psf_balance_goes_negative_when_public_plan_is_approved() -> Result<()> {
        let db = setup_test_db().await?;
        let planner = create_test_company(&db, "Planner").await?;
        create_approved_plan(&db, planner.id, costs(10, 5, 5), 10, 10, true).await?;
        assert_eq!(psf_balance(&db).await?, Decimal::from(-20));
        Ok(())
    }
}
