use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{error, warn};

use crate::{
    TravelPlannerError,
    attractions::AttractionRecord,
    models::{TripRequest, TripRequestBody},
    planner::{PlannedTrip, TripPlanner},
    weather::{self, WeatherProvider},
};

const DIAGNOSTIC_CITY: &str = "Chennai";

/// Shared, read-only handler state
#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<TripPlanner>,
    pub weather: Arc<dyn WeatherProvider>,
}

impl AppState {
    pub fn new(planner: Arc<TripPlanner>, weather: Arc<dyn WeatherProvider>) -> Self {
        Self { planner, weather }
    }
}

/// Failure of a request, rendered as `{"error": ..., "kind": ...}`
#[derive(Debug)]
pub enum ApiError {
    Planner(TravelPlannerError),
    InvalidBody(JsonRejection),
}

impl From<TravelPlannerError> for ApiError {
    fn from(err: TravelPlannerError) -> Self {
        Self::Planner(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, kind) = match self {
            ApiError::Planner(err) => {
                let status = err.status_code();
                if status.is_server_error() {
                    error!("Request failed: {}", err);
                } else {
                    warn!("Rejected request: {}", err);
                }
                (status, err.user_message(), err.kind())
            }
            ApiError::InvalidBody(rejection) => {
                warn!("Rejected request body: {}", rejection.body_text());
                if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    (
                        StatusCode::PAYLOAD_TOO_LARGE,
                        "Request body is too large".to_string(),
                        "payload_too_large",
                    )
                } else {
                    (
                        StatusCode::BAD_REQUEST,
                        format!("Invalid request body: {}", rejection.body_text()),
                        "invalid_request",
                    )
                }
            }
        };

        (status, Json(json!({ "error": message, "kind": kind }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub city: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct DiagnosticLookup {
    pub query: String,
    pub results: Vec<AttractionRecord>,
}

#[derive(Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
    pub attraction_cities: usize,
}

/// All routes, without transport layers
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/weather", get(get_weather))
        .route("/plan-trip", post(plan_trip));

    Router::new()
        .nest("/api", api)
        .route("/test-rag", get(test_rag))
        .route("/health", get(health))
        .with_state(state)
}

async fn get_weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<Value>, ApiError> {
    let report = weather::get_weather(state.weather.as_ref(), query.city.as_deref()).await?;
    Ok(Json(report))
}

async fn plan_trip(
    State(state): State<AppState>,
    payload: Result<Json<TripRequestBody>, JsonRejection>,
) -> Result<Json<PlannedTrip>, ApiError> {
    let Json(body) = payload?;
    let request = TripRequest::try_from(body)?;
    let trip = state.planner.plan_trip(&request).await?;
    Ok(Json(trip))
}

async fn test_rag(State(state): State<AppState>) -> Json<DiagnosticLookup> {
    let results = state.planner.catalog().lookup(DIAGNOSTIC_CITY).to_vec();
    Json(DiagnosticLookup {
        query: format!("What attractions are in {DIAGNOSTIC_CITY}?"),
        results,
    })
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        attraction_cities: state.planner.catalog().len(),
    })
}
