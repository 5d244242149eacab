//! Expired-plan maintenance.
//!
//! A plan whose timeframe has elapsed stops being active on its own; what
//! does not happen on its own is the cleanup of its cooperation state. The
//! periodic sweep detaches expired plans from their cooperations and clears
//! pending cooperation requests, so expired plans neither shape cooperative
//! prices nor linger in coordinators' inboxes. The sweep is idempotent and
//! meant to run at least once a day, preferably every hour.

use crate::{
    entities::{Plan, PlanCooperation, PlanReview},
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set, TransactionTrait,
};
use uuid::Uuid;

/// What the sweep did to a single expired plan.
#[derive(Debug, Clone)]
pub struct ExpiredPlanResult {
    /// The expired plan
    pub plan_id: Uuid,
    /// Name of the plan's product, for log output
    pub product_name: String,
    /// Whether the plan was detached from a cooperation
    pub left_cooperation: bool,
    /// Whether a pending cooperation request was cleared
    pub cleared_request: bool,
}

/// Result of one expired-plan sweep.
#[derive(Debug, Clone)]
pub struct PlanExpirySweep {
    /// Per-plan details of everything the sweep touched
    pub processed: Vec<ExpiredPlanResult>,
    /// Number of plans the sweep touched
    pub plans_processed: usize,
    /// How many plans were detached from a cooperation
    pub cooperations_ended: usize,
    /// How many pending cooperation requests were cleared
    pub requests_cleared: usize,
    /// The reference time of the sweep
    pub sweep_time: DateTime<Utc>,
}

/// Sweeps all expired plans, detaching them from cooperations and clearing
/// pending cooperation requests. Plans that need no cleanup are skipped, so
/// running the sweep twice is harmless.
pub async fn update_expired_plans(
    db: &DatabaseConnection,
    now: DateTime<Utc>,
) -> Result<PlanExpirySweep> {
    let txn = db.begin().await?;

    let rows = Plan::find().find_also_related(PlanReview).all(&txn).await?;
    let mut processed = Vec::new();
    let mut cooperations_ended = 0;
    let mut requests_cleared = 0;

    for (plan, review) in rows {
        let Some(review) = review else { continue };
        let reviewed = crate::core::plans::ReviewedPlan { plan, review };
        if !reviewed.is_expired_as_of(now) {
            continue;
        }
        let plan = reviewed.plan;

        let membership = PlanCooperation::find_by_id(plan.id).one(&txn).await?;
        let left_cooperation = membership.is_some();
        if let Some(membership) = membership {
            PlanCooperation::delete_by_id(membership.plan_id).exec(&txn).await?;
            cooperations_ended += 1;
        }

        let cleared_request = plan.requested_cooperation.is_some();
        let plan_id = plan.id;
        let product_name = plan.product_name.clone();
        if cleared_request {
            let mut row = plan.into_active_model();
            row.requested_cooperation = Set(None);
            row.update(&txn).await?;
            requests_cleared += 1;
        }

        if left_cooperation || cleared_request {
            processed.push(ExpiredPlanResult {
                plan_id,
                product_name,
                left_cooperation,
                cleared_request,
            });
        }
    }

    txn.commit().await?;

    Ok(PlanExpirySweep {
        plans_processed: processed.len(),
        cooperations_ended,
        requests_cleared,
        processed,
        sweep_time: now,
    })
}

/// Formats a sweep result into a log-friendly summary.
#[must_use]
pub fn format_sweep_summary(sweep: &PlanExpirySweep) -> String {
    use std::fmt::Write;

    let mut summary = format!(
        "Expired-plan sweep - {} plans cleaned up ({} cooperations ended, {} requests cleared)\n",
        sweep.plans_processed, sweep.cooperations_ended, sweep.requests_cleared
    );
    for result in &sweep.processed {
        let _ = writeln!(
            summary,
            "  {} ({}) - cooperation ended: {} | request cleared: {}",
            result.product_name, result.plan_id, result.left_cooperation, result.cleared_request
        );
    }
    summary
}
