//! `travel-planner` - AI trip planning backend
//!
//! Combines a static attraction catalog with a generative model to produce
//! day-by-day trip plans, and proxies current weather for a city.

pub mod api;
pub mod attractions;
pub mod config;
pub mod error;
pub mod gemini;
pub mod models;
pub mod planner;
pub mod telemetry;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use api::AppState;
pub use attractions::{AttractionCatalog, AttractionRecord, CityAttractions};
pub use config::TravelPlannerConfig;
pub use error::TravelPlannerError;
pub use gemini::{GeminiClient, Generation, GenerationSettings, TextGenerator, TokenUsage};
pub use models::{TripPlan, TripRequest};
pub use planner::{PlannedTrip, TripPlanner};
pub use weather::{OpenWeatherClient, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TravelPlannerError>;
