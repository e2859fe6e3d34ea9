//! HTTP route handlers for the fleet server.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::broadcast::ReportBroadcaster;
use super::error::ApiError;
use super::metrics::Metrics;
use super::request::{RecentParams, ReportMessage, TodayParams, UpsertRequest};
use super::response::DeleteResponse;
use crate::model::UnitReport;
use crate::repository::UnitRepository;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<UnitRepository>,
    pub broadcaster: Arc<ReportBroadcaster>,
    pub metrics: Arc<Metrics>,
}

/// Handle PUT /carts/{unit_id}
///
/// Validates and stores one report, echoes it back, and mirrors it to all
/// live subscribers. Broadcast failures never fail the write.
pub async fn handle_upsert(
    State(state): State<AppState>,
    Path(unit_id): Path<String>,
    body: Bytes,
) -> Result<Json<UnitReport>, ApiError> {
    let request = UpsertRequest::from_body(&body)?;

    state.repo.insert(&unit_id, &request.report).await?;
    state.metrics.reports_written_total.inc();

    let message = ReportMessage {
        id: unit_id,
        report: request.report.clone(),
    };
    state.broadcaster.broadcast(&message.to_payload());
    state.metrics.broadcast_payloads_total.inc();

    Ok(Json(request.report))
}

/// Handle GET /cart/{unit_id}?count=N
///
/// Returns up to `count` reports for the unit, newest-first. An unknown
/// unit yields an empty array.
pub async fn handle_get_recent(
    State(state): State<AppState>,
    Path(unit_id): Path<String>,
    Query(params): Query<RecentParams>,
) -> Result<Json<Vec<UnitReport>>, ApiError> {
    let reports = state.repo.get_recent(&unit_id, params.count()).await?;
    Ok(Json(reports))
}

/// Handle GET /carts/today?count_by_cart=N
///
/// Returns up to `count_by_cart` reports per unit since the start of the
/// current hour, each bucket newest-first.
pub async fn handle_get_today(
    State(state): State<AppState>,
    Query(params): Query<TodayParams>,
) -> Result<Json<HashMap<String, Vec<UnitReport>>>, ApiError> {
    let grouped = state.repo.get_recent_today(params.count_by_cart()).await?;
    Ok(Json(grouped))
}

/// Handle DELETE /carts/{unit_id}
pub async fn handle_delete_unit(
    State(state): State<AppState>,
    Path(unit_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = state.repo.delete_unit(&unit_id).await?;
    state.metrics.reports_deleted_total.inc_by(deleted as u64);
    tracing::info!(unit = %unit_id, deleted, "deleted unit reports");
    Ok(Json(DeleteResponse::unit_deleted(deleted)))
}

/// Handle DELETE /carts
pub async fn handle_delete_all(
    State(state): State<AppState>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = state.repo.delete_all().await?;
    state.metrics.reports_deleted_total.inc_by(deleted as u64);
    tracing::info!(deleted, "deleted all reports");
    Ok(Json(DeleteResponse::all_deleted(deleted)))
}

/// Handle GET /metrics
pub async fn handle_metrics(State(state): State<AppState>) -> impl IntoResponse {
    state
        .metrics
        .live_subscribers
        .set(state.broadcaster.subscriber_count() as i64);
    state.metrics.encode()
}

/// Handle GET /-/healthy
pub async fn handle_healthy() -> StatusCode {
    StatusCode::OK
}

/// Handle GET /-/ready
pub async fn handle_ready() -> StatusCode {
    StatusCode::OK
}
