//! Provider boundary for route optimization.
//!
//! The provider is a black box: coordinates in, an optimized visiting order
//! plus geometry and aggregate metrics out. [`correlate`] holds the index
//! arithmetic that maps the provider's answer back onto the caller's stops;
//! [`osrm`] is the HTTP adapter.

pub mod correlate;
pub mod osrm;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::geo::GeoPoint;
use crate::models::route::{DeliveryJob, OptimizedRouteResult};

#[async_trait]
pub trait RouteOptimizer: Send + Sync {
    /// Submits `stops` (non-empty, all with finite coordinates) plus the
    /// depot origin and returns the stops permuted into visiting order.
    ///
    /// The relative input order of `stops` is load-bearing: correlation is
    /// done by index arithmetic over the provider's declared mapping, so the
    /// list must not be reordered between request construction and response
    /// handling.
    async fn optimize(
        &self,
        origin: GeoPoint,
        stops: &[DeliveryJob],
    ) -> Result<OptimizedRouteResult, AppError>;
}

#[derive(Debug, Deserialize)]
pub struct TripResponse {
    pub code: String,
    pub message: Option<String>,
    #[serde(default)]
    pub trips: Vec<Trip>,
    #[serde(default)]
    pub waypoints: Vec<TripWaypoint>,
}

#[derive(Debug, Deserialize)]
pub struct Trip {
    pub geometry: String,
    pub duration: f64,
    pub distance: f64,
}

/// One entry per submitted waypoint, in the original submission order.
/// `waypoint_index` is that waypoint's position in the optimized visiting
/// sequence. `location` is the provider's snapped coordinate and is never
/// used for correlation (floating-point round-tripping makes it unreliable).
#[derive(Debug, Deserialize)]
pub struct TripWaypoint {
    pub waypoint_index: usize,
    #[serde(default)]
    pub location: [f64; 2],
}
