/// HTTP API поверх сервиса предсказаний

use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ValidationError;
use crate::service::PredictionService;
use crate::types::{PredictionResponse, Record};

/// Неизменяемый контекст приложения, общий для всех обработчиков
#[derive(Clone)]
pub struct AppState {
    pub service: PredictionService,
}

pub fn router(service: PredictionService) -> Router {
    let state = AppState { service };

    // CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/model", get(model_info))
        .route("/predict", post(predict))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Fuel consumption API",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn model_info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let artifact = state.service.artifact();
    Json(serde_json::json!({
        "format_version": artifact.format_version(),
        "trained_at": artifact.trained_at(),
        "schema": artifact.schema(),
        "training": artifact.training(),
        "trees": artifact.model().trees().len(),
    }))
}

async fn predict(
    State(state): State<AppState>,
    Json(record): Json<Record>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let response = state.service.respond(&record)?;
    tracing::info!("Predicted fuel consumption: {}", response.fuel_consumption);
    Ok(Json(response))
}

/// Ошибка запроса к API
#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationError),
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        ApiError::Validation(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(error) => {
                tracing::warn!("Rejected request: {}", error);
                let body = serde_json::json!({
                    "error": error.to_string(),
                    "fields": error.issues,
                });
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
        }
    }
}
