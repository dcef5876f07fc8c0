use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::assignment::DriverAssignment;
use crate::models::geo::GeoPoint;

/// Transient projection of one assignment for the optimization round trip.
/// Built by the orchestrator, submitted to the provider, and recovered in
/// permuted order from the response. Carries the enriched display fields so
/// the stored route needs no second join.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeliveryJob {
    pub stop_id: Uuid,
    pub order_id: Uuid,
    pub location: GeoPoint,
    pub customer_name: String,
    pub phone: String,
    pub full_address: String,
    pub city: String,
    pub package_name: String,
}

impl DeliveryJob {
    pub fn from_assignment(assignment: &DriverAssignment, location: GeoPoint) -> Self {
        Self {
            stop_id: assignment.id,
            order_id: assignment.order_id,
            location,
            customer_name: assignment.customer_name.clone(),
            phone: assignment.phone.clone(),
            full_address: assignment.full_address.clone(),
            city: assignment.city.clone(),
            package_name: assignment.package_name.clone(),
        }
    }
}

/// What the provider gave back, re-correlated onto the caller's jobs.
#[derive(Debug, Clone)]
pub struct OptimizedRouteResult {
    /// Input jobs permuted into the provider's visiting order.
    pub ordered_jobs: Vec<DeliveryJob>,
    /// Encoded polyline, opaque to the core; only the map adapter decodes it.
    pub route_geometry: String,
    pub total_duration_seconds: f64,
    pub total_distance_meters: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RouteStatus {
    Generated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteStart {
    pub address: String,
    pub location: GeoPoint,
}

/// Singleton per (driver_id, route_date); recomputation replaces the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizedRoute {
    pub driver_id: Uuid,
    pub route_date: NaiveDate,
    pub start: RouteStart,
    pub ordered_stops: Vec<DeliveryJob>,
    pub route_geometry: String,
    pub total_duration_seconds: f64,
    pub total_distance_meters: f64,
    pub status: RouteStatus,
    pub optimized_at: DateTime<Utc>,
}

impl OptimizedRoute {
    pub fn from_result(
        driver_id: Uuid,
        route_date: NaiveDate,
        start: RouteStart,
        result: OptimizedRouteResult,
    ) -> Self {
        Self {
            driver_id,
            route_date,
            start,
            ordered_stops: result.ordered_jobs,
            route_geometry: result.route_geometry,
            total_duration_seconds: result.total_duration_seconds,
            total_distance_meters: result.total_distance_meters,
            status: RouteStatus::Generated,
            optimized_at: Utc::now(),
        }
    }
}
