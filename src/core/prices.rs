//! Price calculation.
//!
//! The individual price of a unit is the plan's cost per unit (zero for
//! public services). Plans inside a cooperation share one cooperative price:
//! the daily costs of all cooperating plans divided by the daily output of
//! all cooperating plans, which weights each plan by its timeframe.

use crate::{
    entities::{Plan, PlanCooperation, plan, plan_cooperation},
    errors::Result,
};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

/// The price a consumer pays per unit of a plan's product, taking the
/// plan's cooperation into account.
pub async fn price_per_unit<C>(db: &C, subject: &plan::Model) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    let Some(membership) = PlanCooperation::find_by_id(subject.id).one(db).await? else {
        return Ok(subject.price_per_unit());
    };
    let memberships = PlanCooperation::find()
        .filter(plan_cooperation::Column::CooperationId.eq(membership.cooperation_id))
        .all(db)
        .await?;
    let plan_ids: Vec<_> = memberships.into_iter().map(|row| row.plan_id).collect();
    let plans = Plan::find()
        .filter(plan::Column::Id.is_in(plan_ids))
        .all(db)
        .await?;
    Ok(cooperative_price(&plans))
}

/// The shared price per unit for a set of cooperating plans: total costs per
/// day over total units per day.
#[must_use]
pub fn cooperative_price(plans: &[plan::Model]) -> Decimal {
    let mut costs_per_day = Decimal::ZERO;
    let mut units_per_day = Decimal::ZERO;
    for plan in plans {
        let timeframe = Decimal::from(plan.timeframe_days);
        if timeframe.is_zero() {
            continue;
        }
        costs_per_day += plan.total_cost() / timeframe;
        units_per_day += Decimal::from(plan.amount) / timeframe;
    }
    if units_per_day.is_zero() {
        Decimal::ZERO
    } else {
        costs_per_day / units_per_day
    }
}
