//! Economy-wide statistics.
//!
//! Aggregates the registered population and the plans active at a reference
//! time into one read model.

use crate::{
    core::plans::{self, PlanCosts},
    entities::{Company, Cooperation, Member},
    errors::Result,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait};

/// A snapshot of the economy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statistics {
    /// Number of registered members
    pub registered_members: u64,
    /// Number of registered companies
    pub registered_companies: u64,
    /// Number of cooperations
    pub cooperations: u64,
    /// Number of plans active at the reference time
    pub active_plans: u64,
    /// Mean timeframe of the active plans in days, zero without plans
    pub average_timeframe_days: Decimal,
    /// Summed planned costs of the active plans
    pub planned_costs: PlanCosts,
}

/// Collects the statistics snapshot as of `timestamp`.
pub async fn get_statistics<C>(db: &C, timestamp: DateTime<Utc>) -> Result<Statistics>
where
    C: ConnectionTrait,
{
    let registered_members = Member::find().count(db).await?;
    let registered_companies = Company::find().count(db).await?;
    let cooperations = Cooperation::find().count(db).await?;

    let active = plans::active_plans(db, timestamp).await?;
    let active_plans = active.len() as u64;
    let mut timeframe_sum = Decimal::ZERO;
    let mut planned_costs = PlanCosts::default();
    for reviewed in &active {
        timeframe_sum += Decimal::from(reviewed.plan.timeframe_days);
        planned_costs.labour += reviewed.plan.costs_a;
        planned_costs.resources += reviewed.plan.costs_r;
        planned_costs.means += reviewed.plan.costs_p;
    }
    let average_timeframe_days = if active.is_empty() {
        Decimal::ZERO
    } else {
        timeframe_sum / Decimal::from(active_plans)
    };

    Ok(Statistics {
        registered_members,
        registered_companies,
        cooperations,
        active_plans,
        average_timeframe_days,
        planned_costs,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{
        backdate_approval, create_approved_plan, create_test_company, create_test_cooperation,
        create_test_member, setup_test_db,
    };

    #[tokio::test]
    async fn test_empty_economy_has_all_zero_statistics() -> Result<()> {
        let db = setup_test_db().await?;
        let stats = get_statistics(&db, Utc::now()).await?;
        assert_eq!(stats.registered_members, 0);
        assert_eq!(stats.registered_companies, 0);
        assert_eq!(stats.cooperations, 0);
        assert_eq!(stats.active_plans, 0);
        assert_eq!(stats.average_timeframe_days, Decimal::ZERO);
        assert_eq!(stats.planned_costs.total(), Decimal::ZERO);
        Ok(())
    }

    #[tokio::test]
    async fn test_population_is_counted() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_member(&db, "Worker").await?;
        create_test_member(&db, "Other Worker").await?;
        let company = create_test_company(&db, "Company").await?;
        create_test_cooperation(&db, company.id).await?;

        let stats = get_statistics(&db, Utc::now()).await?;
        assert_eq!(stats.registered_members, 2);
        assert_eq!(stats.registered_companies, 1);
        assert_eq!(stats.cooperations, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_only_active_plans_enter_the_aggregates() -> Result<()> {
        let db = setup_test_db().await?;
        let company = create_test_company(&db, "Company").await?;
        let costs = PlanCosts {
            labour: Decimal::from(6),
            resources: Decimal::from(3),
            means: Decimal::from(1),
        };
        create_approved_plan(&db, company.id, costs, 10, 10, false).await?;
        create_approved_plan(&db, company.id, costs, 10, 30, false).await?;
        let expired = create_approved_plan(&db, company.id, costs, 10, 10, false).await?;
        backdate_approval(&db, expired, 30).await?;

        let stats = get_statistics(&db, Utc::now()).await?;
        assert_eq!(stats.active_plans, 2);
        assert_eq!(stats.average_timeframe_days, Decimal::from(20));
        assert_eq!(stats.planned_costs.labour, Decimal::from(12));
        assert_eq!(stats.planned_costs.resources, Decimal::from(6));
        assert_eq!(stats.planned_costs.means, Decimal::from(2));
        Ok(())
    }
}
