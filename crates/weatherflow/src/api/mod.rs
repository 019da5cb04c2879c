use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::error;

use crate::api::models::{ErrorBody, ProgressResponse, ResultResponse};
use crate::collector::{Collector, StartOutcome};
use crate::jobs::JobStore;
use crate::query::{self, QueryError};

pub mod models;

const INTERNAL_ERROR: &str = "Internal Error";
const CONFLICT_MESSAGE: &str = "ID already exists in database, ignoring request.";

/// Everything a request or collection task needs. Built once at startup.
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<dyn JobStore>,
    pub collector: Collector,
}

impl ApiState {
    pub fn new(store: Arc<dyn JobStore>, collector: Collector) -> Self {
        Self { store, collector }
    }
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/collect/:uid", post(collect))
        .route("/progress/:uid", get(get_progress))
        .route("/result/:uid", get(get_result))
        // Health
        .route("/health", get(health))
        .with_state(state)
}

fn error_response(status: StatusCode, msg: impl Into<String>) -> Response {
    (status, Json(ErrorBody::new(msg))).into_response()
}

fn internal_err(e: anyhow::Error) -> Response {
    error!(error = %e, "request failed");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
}

fn query_err(e: QueryError) -> Response {
    match e {
        QueryError::NotFound { .. } => error_response(StatusCode::NOT_FOUND, e.to_string()),
        // already logged with the offending field
        QueryError::Corrupted { .. } => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
        }
        QueryError::Store(e) => internal_err(e),
    }
}

fn check_uid(uid: i64) -> Result<i64, Response> {
    if uid > 0 {
        Ok(uid)
    } else {
        Err(error_response(
            StatusCode::BAD_REQUEST,
            "uid must be a positive integer",
        ))
    }
}

pub async fn collect(Path(uid): Path<i64>, State(state): State<ApiState>) -> Response {
    let uid = match check_uid(uid) {
        Ok(uid) => uid,
        Err(resp) => return resp,
    };

    match state.collector.start_collection(uid).await {
        // handle dropped: tasks keep running after the 202 goes out
        Ok(StartOutcome::Accepted(_)) => StatusCode::ACCEPTED.into_response(),
        Ok(StartOutcome::Conflict) => error_response(StatusCode::CONFLICT, CONFLICT_MESSAGE),
        Err(e) => internal_err(e),
    }
}

pub async fn get_progress(Path(uid): Path<i64>, State(state): State<ApiState>) -> Response {
    let uid = match check_uid(uid) {
        Ok(uid) => uid,
        Err(resp) => return resp,
    };

    match query::get_progress(state.store.as_ref(), uid).await {
        Ok(progress) => (StatusCode::OK, Json(ProgressResponse { progress })).into_response(),
        Err(e) => query_err(e),
    }
}

pub async fn get_result(Path(uid): Path<i64>, State(state): State<ApiState>) -> Response {
    let uid = match check_uid(uid) {
        Ok(uid) => uid,
        Err(resp) => return resp,
    };

    match query::get_results(state.store.as_ref(), uid).await {
        Ok(cities) => (StatusCode::OK, Json(ResultResponse { cities })).into_response(),
        Err(e) => query_err(e),
    }
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
