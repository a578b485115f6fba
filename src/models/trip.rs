//! Trip request and plan models

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::TravelPlannerError;

/// Raw `/api/plan-trip` body; every field is optional until validated
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripRequestBody {
    pub destination: Option<String>,
    pub days: Option<Value>,
    pub budget: Option<Value>,
}

/// A validated trip request.
///
/// `days` and `budget` keep whatever JSON scalar the client sent; they only
/// ever end up in prompt text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRequest {
    pub destination: String,
    pub days: Value,
    pub budget: Value,
}

impl TripRequest {
    pub fn new<S: Into<String>>(
        destination: S,
        days: impl Into<Value>,
        budget: impl Into<Value>,
    ) -> Self {
        Self {
            destination: destination.into(),
            days: days.into(),
            budget: budget.into(),
        }
    }

    /// Trip length as it appears in prompt text
    #[must_use]
    pub fn days_text(&self) -> String {
        render_scalar(&self.days)
    }

    /// Budget as it appears in prompt text
    #[must_use]
    pub fn budget_text(&self) -> String {
        render_scalar(&self.budget)
    }

    /// Numeric budget, when the client sent something that reads as a number
    #[must_use]
    pub fn budget_amount(&self) -> Option<f64> {
        match &self.budget {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl TryFrom<TripRequestBody> for TripRequest {
    type Error = TravelPlannerError;

    fn try_from(body: TripRequestBody) -> Result<Self, Self::Error> {
        let destination = body
            .destination
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| TravelPlannerError::missing_parameter("destination"))?;
        let days = body
            .days
            .filter(is_present)
            .ok_or_else(|| TravelPlannerError::missing_parameter("days"))?;
        let budget = body
            .budget
            .filter(is_present)
            .ok_or_else(|| TravelPlannerError::missing_parameter("budget"))?;

        Ok(Self {
            destination,
            days,
            budget,
        })
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The plan shape the model is asked to produce.
///
/// Only used to review a parsed plan; callers always receive the model's JSON unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    pub destination: String,
    pub days: u32,
    pub daily_plan: Vec<DayPlan>,
    pub budget_estimate: BudgetEstimate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: u32,
    pub plan: DaySlots,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySlots {
    pub morning: String,
    pub afternoon: String,
    pub evening: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetEstimate {
    pub total: f64,
    pub breakdown: BTreeMap<String, f64>,
}

impl BudgetEstimate {
    #[must_use]
    pub fn breakdown_sum(&self) -> f64 {
        self.breakdown.values().sum()
    }
}
