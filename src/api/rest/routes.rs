use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::engine::optimize::build_and_optimize;
use crate::error::AppError;
use crate::models::route::OptimizedRoute;
use crate::state::AppState;
use crate::store::RouteStore;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/drivers/:driver_id/routes/:date/optimize",
            post(optimize_route),
        )
        .route("/drivers/:driver_id/routes/:date", get(get_route))
}

#[derive(Deserialize)]
pub struct OptimizeParams {
    /// Recompute even when a route for the key already exists. The admin UI
    /// confirms the overwrite before setting this.
    #[serde(default)]
    pub force: bool,
}

async fn optimize_route(
    State(state): State<Arc<AppState>>,
    Path((driver_id, date)): Path<(Uuid, NaiveDate)>,
    Query(params): Query<OptimizeParams>,
) -> Result<Json<OptimizedRoute>, AppError> {
    let start = Instant::now();

    let result = build_and_optimize(
        &state.store,
        state.optimizer.as_ref(),
        &state.depot,
        &state.metrics,
        driver_id,
        date,
        params.force,
    )
    .await;

    let outcome = match &result {
        Ok(_) => "success",
        Err(err) => err.kind(),
    };
    state
        .metrics
        .optimize_latency_seconds
        .with_label_values(&[outcome])
        .observe(start.elapsed().as_secs_f64());
    state
        .metrics
        .route_optimizations_total
        .with_label_values(&[outcome])
        .inc();

    result.map(Json)
}

async fn get_route(
    State(state): State<Arc<AppState>>,
    Path((driver_id, date)): Path<(Uuid, NaiveDate)>,
) -> Result<Json<OptimizedRoute>, AppError> {
    let route = state.store.get(driver_id, date).await?.ok_or_else(|| {
        AppError::NotFound(format!("no optimized route for driver {driver_id} on {date}"))
    })?;

    Ok(Json(route))
}
