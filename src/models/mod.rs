//! Data models for the travel planner
//!
//! - Trip: incoming trip requests and the plan shape requested from the model

pub mod trip;

pub use trip::{BudgetEstimate, DayPlan, DaySlots, TripPlan, TripRequest, TripRequestBody};
