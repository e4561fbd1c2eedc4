use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::calculator::EmissionsEngine;
use crate::records::store::RecordStore;
use crate::records::{EmissionRecord, DEFAULT_HISTORY_LIMIT};
use crate::types::{CalculationRequest, EmissionBreakdown};
use crate::validation::validate_request;

#[derive(Clone)]
struct ApiState {
    engine: EmissionsEngine,
    db_path: PathBuf,
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    success: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    success: bool,
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn internal(error: impl std::fmt::Display) -> Self {
        error!("request failed: {error}");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            success: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    provider: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CalculateResponse {
    id: i64,
    total_emissions_kg: f64,
    breakdown: EmissionBreakdown,
}

pub fn router(engine: EmissionsEngine, db_path: PathBuf) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/emissions/calculate", post(calculate))
        .route("/api/emissions/history", get(history))
        .route("/api/emissions/:id", get(record))
        .layer(cors)
        .with_state(ApiState { engine, db_path })
}

pub async fn run_server(engine: EmissionsEngine, db_path: PathBuf, bind: SocketAddr) -> Result<()> {
    let app = router(engine, db_path);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("REST API listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health(State(state): State<ApiState>) -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse {
        status: "ok",
        provider: state.engine.provider_name().to_string(),
    })
}

async fn calculate(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<CalculationRequest>, JsonRejection>,
) -> ApiResult<CalculateResponse> {
    let Json(request) = payload.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    validate_request(&request).map_err(|e| ApiError::bad_request(e.to_string()))?;
    let result = state.engine.calculate(&request).await;
    let store = open_store(&state)?;
    let stored = store
        .insert(&request, &result)
        .map_err(ApiError::internal)?;

    Ok(ok(CalculateResponse {
        id: stored.id,
        total_emissions_kg: result.total_emissions_kg,
        breakdown: result.breakdown,
    }))
}

async fn history(State(state): State<ApiState>) -> ApiResult<Vec<EmissionRecord>> {
    let store = open_store(&state)?;
    let records = store
        .latest(DEFAULT_HISTORY_LIMIT)
        .map_err(ApiError::internal)?;
    Ok(ok(records))
}

async fn record(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> ApiResult<EmissionRecord> {
    let store = open_store(&state)?;
    match store.get(id).map_err(ApiError::internal)? {
        Some(record) => Ok(ok(record)),
        None => Err(ApiError::not_found("record not found")),
    }
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        data,
    })
}

fn open_store(state: &ApiState) -> std::result::Result<RecordStore, ApiError> {
    RecordStore::open(&state.db_path).map_err(ApiError::internal)
}
