use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::post;
use axum::Json;
use axum::Router;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::assignment::{AssignmentStatus, DriverAssignment};
use crate::models::geo::GeoPoint;
use crate::state::AppState;
use crate::store::{AssignmentStore, GeocodeStore};

/// Seeding surfaces for the upstream assignment and geocoding screens. The
/// optimization core only reads these records.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/assignments", post(create_assignment).get(list_assignments))
        .route("/geocodes", post(put_geocode))
}

#[derive(Deserialize)]
pub struct CreateAssignmentRequest {
    pub order_id: Uuid,
    pub driver_id: Uuid,
    pub assigned_date: NaiveDate,
    pub customer_name: String,
    pub phone: String,
    pub full_address: String,
    pub city: String,
    pub package_name: String,
}

#[derive(Deserialize)]
pub struct ListAssignmentsParams {
    pub driver_id: Uuid,
    pub date: NaiveDate,
}

#[derive(Deserialize)]
pub struct PutGeocodeRequest {
    pub order_id: Uuid,
    pub location: GeoPoint,
}

async fn create_assignment(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateAssignmentRequest>,
) -> Result<Json<DriverAssignment>, AppError> {
    if payload.customer_name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "customer_name cannot be empty".to_string(),
        ));
    }

    if payload.full_address.trim().is_empty() {
        return Err(AppError::BadRequest(
            "full_address cannot be empty".to_string(),
        ));
    }

    let assignment = DriverAssignment {
        id: Uuid::new_v4(),
        order_id: payload.order_id,
        driver_id: payload.driver_id,
        assigned_date: payload.assigned_date,
        status: AssignmentStatus::Pending,
        customer_name: payload.customer_name,
        phone: payload.phone,
        full_address: payload.full_address,
        city: payload.city,
        package_name: payload.package_name,
    };

    state.store.insert(assignment.clone()).await?;
    Ok(Json(assignment))
}

async fn list_assignments(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListAssignmentsParams>,
) -> Json<Vec<DriverAssignment>> {
    Json(state.store.assignments_for(params.driver_id, params.date))
}

async fn put_geocode(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PutGeocodeRequest>,
) -> Result<Json<PutGeocodeResponse>, AppError> {
    if !payload.location.is_finite() {
        return Err(AppError::BadRequest(
            "coordinates must be finite numbers".to_string(),
        ));
    }

    state.store.put(payload.order_id, payload.location).await?;
    Ok(Json(PutGeocodeResponse {
        order_id: payload.order_id,
        location: payload.location,
    }))
}

#[derive(serde::Serialize)]
pub struct PutGeocodeResponse {
    pub order_id: Uuid,
    pub location: GeoPoint,
}
