//! Model output cleanup and parsing
//!
//! Models wrap JSON in markdown fences and echo the sentinel despite being
//! told not to. Cleanup is purely textual; the parsed value is never reshaped.

use serde_json::Value;

use crate::gemini::END_OF_PLAN;
use crate::models::{TripPlan, TripRequest};
use crate::{Result, TravelPlannerError};

const FENCE_MARKERS: [&str; 2] = ["```json", "```"];

/// Amount two budget figures may differ by before a plan is flagged
const BUDGET_TOLERANCE: f64 = 0.01;

/// Strip code fences and the sentinel, then trim
#[must_use]
pub fn clean_model_output(raw: &str) -> String {
    let mut cleaned = raw.to_string();
    for marker in FENCE_MARKERS {
        cleaned = cleaned.replace(marker, "");
    }
    cleaned.replace(END_OF_PLAN, "").trim().to_string()
}

/// Clean raw model text and parse it as JSON
pub fn parse_plan(raw: &str) -> Result<Value> {
    let cleaned = clean_model_output(raw);
    serde_json::from_str(&cleaned)
        .map_err(|e| TravelPlannerError::invalid_model_output(cleaned, e.to_string()))
}

/// Describe how a parsed plan departs from what was asked for.
///
/// An empty list means the plan has the requested shape and its budget adds up.
#[must_use]
pub fn review_plan(plan: &Value, request: &TripRequest) -> Vec<String> {
    let typed: TripPlan = match serde_json::from_value(plan.clone()) {
        Ok(typed) => typed,
        Err(e) => return vec![format!("plan does not match the requested structure: {e}")],
    };

    let mut issues = Vec::new();
    let estimate = &typed.budget_estimate;

    let sum = estimate.breakdown_sum();
    if (sum - estimate.total).abs() > BUDGET_TOLERANCE {
        issues.push(format!(
            "budget breakdown sums to {sum} but total is {}",
            estimate.total
        ));
    }

    if let Some(requested) = request.budget_amount() {
        if (requested - estimate.total).abs() > BUDGET_TOLERANCE {
            issues.push(format!(
                "budget total {} differs from requested {requested}",
                estimate.total
            ));
        }
    }

    if typed.daily_plan.len() != typed.days as usize {
        issues.push(format!(
            "{} daily entries for a {}-day plan",
            typed.daily_plan.len(),
            typed.days
        ));
    }

    issues
}
