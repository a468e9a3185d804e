//! "Money left on the table" estimate.
//!
//! Each step rounds to the nearest whole unit (half away from zero) before
//! feeding the next, so intermediate values never carry fractions.

use serde::Serialize;
use tracing::debug;

use crate::answers::{PracticeArea, QuizAnswers};

/// Cost-per-lead used when no practice area is known.
pub const DEFAULT_COST_PER_LEAD: f64 = 25.0;

/// Share of current revenue shown as opportunity when the potential is not above it.
const CURRENT_REVENUE_FLOOR: f64 = 0.2;
/// Share of the potential shown as opportunity when the potential is not above current revenue.
const POTENTIAL_REVENUE_FLOOR: f64 = 0.3;

/// Metrics derived from a completed quiz.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedResults {
    pub cost_per_lead: f64,
    pub estimated_leads: u64,
    pub estimated_new_contracts: u64,
    pub potential_monthly_revenue: u64,
    pub missed_revenue: u64,
}

/// Cost-per-lead for an area, falling back to [`DEFAULT_COST_PER_LEAD`].
pub fn cost_per_lead(area: Option<PracticeArea>) -> f64 {
    area.map_or(DEFAULT_COST_PER_LEAD, |a| a.cost_per_lead())
}

/// Compute the derived metrics for a set of answers.
pub fn compute_results(answers: &QuizAnswers) -> DerivedResults {
    let results = estimate(
        cost_per_lead(answers.practice_area),
        answers.monthly_ad_spend,
        answers.conversion_fraction(),
        answers.average_contract_value,
        answers.current_revenue(),
    );
    debug!(
        area = answers.practice_area.map_or("", |a| a.label()),
        leads = results.estimated_leads,
        contracts = results.estimated_new_contracts,
        missed = results.missed_revenue,
        "computed results"
    );
    results
}

/// Raw arithmetic behind [`compute_results`], over plain numbers.
pub fn estimate(
    cost_per_lead: f64,
    monthly_ad_spend: u64,
    conversion_rate: f64,
    average_contract_value: u64,
    current: u64,
) -> DerivedResults {
    let estimated_leads = round_to_unit(monthly_ad_spend as f64 / cost_per_lead);
    let estimated_new_contracts = round_to_unit(estimated_leads as f64 * conversion_rate);
    let potential_monthly_revenue = estimated_new_contracts.saturating_mul(average_contract_value);

    let missed_revenue = if potential_monthly_revenue > current {
        potential_monthly_revenue - current
    } else {
        round_to_unit(f64::max(
            current as f64 * CURRENT_REVENUE_FLOOR,
            potential_monthly_revenue as f64 * POTENTIAL_REVENUE_FLOOR,
        ))
    };

    DerivedResults {
        cost_per_lead,
        estimated_leads,
        estimated_new_contracts,
        potential_monthly_revenue,
        missed_revenue,
    }
}

/// Round half away from zero, clamping negatives and NaN to zero.
fn round_to_unit(value: f64) -> u64 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    // `as` saturates at u64::MAX for out-of-range floats.
    value.round() as u64
}
