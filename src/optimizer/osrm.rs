use async_trait::async_trait;

use crate::error::AppError;
use crate::models::geo::GeoPoint;
use crate::models::route::{DeliveryJob, OptimizedRouteResult};
use crate::optimizer::correlate::correlate_stops;
use crate::optimizer::{RouteOptimizer, TripResponse};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

/// HTTP adapter for the OSRM `/trip` service.
///
/// The request is an open trip: fixed start at the depot (source=first),
/// fixed end at the last stop (destination=last), no round trip. Geometry
/// comes back as a precision-6 polyline the core treats as opaque; turn
/// instructions are suppressed.
#[derive(Debug, Clone)]
pub struct OsrmTripClient {
    config: OsrmConfig,
    client: reqwest::Client,
}

impl OsrmTripClient {
    pub fn new(config: OsrmConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| AppError::Internal(format!("failed to build http client: {err}")))?;

        Ok(Self { config, client })
    }

    fn trip_url(&self, origin: GeoPoint, stops: &[DeliveryJob]) -> String {
        let coords = std::iter::once(origin.to_lng_lat())
            .chain(stops.iter().map(|stop| stop.location.to_lng_lat()))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/trip/v1/{}/{}?roundtrip=false&source=first&destination=last&geometries=polyline6&overview=full&steps=false",
            self.config.base_url, self.config.profile, coords
        )
    }
}

#[async_trait]
impl RouteOptimizer for OsrmTripClient {
    async fn optimize(
        &self,
        origin: GeoPoint,
        stops: &[DeliveryJob],
    ) -> Result<OptimizedRouteResult, AppError> {
        if stops.is_empty() {
            return Err(AppError::BadRequest("no stops to optimize".to_string()));
        }

        let url = self.trip_url(origin, stops);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| AppError::Provider(format!("request failed: {err}")))?;

        let status = response.status();
        let body: TripResponse = match response.json().await {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(AppError::Provider(format!("provider returned HTTP {status}")));
            }
            Err(err) => {
                return Err(AppError::Provider(format!(
                    "unparseable provider response: {err}"
                )));
            }
        };

        if body.code != "Ok" || !status.is_success() {
            return Err(AppError::Provider(
                body.message.unwrap_or(body.code),
            ));
        }

        let trip = body
            .trips
            .first()
            .ok_or_else(|| AppError::Provider("response contains no trips".to_string()))?;

        let ordered_jobs = correlate_stops(stops, &body.waypoints)?;

        Ok(OptimizedRouteResult {
            ordered_jobs,
            route_geometry: trip.geometry.clone(),
            total_duration_seconds: trip.duration,
            total_distance_meters: trip.distance,
        })
    }
}
