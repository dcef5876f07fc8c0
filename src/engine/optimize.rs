use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::route::{DeliveryJob, OptimizedRoute, RouteStart};
use crate::observability::metrics::Metrics;
use crate::optimizer::RouteOptimizer;
use crate::store::{AssignmentStore, GeocodeStore, RouteStore};

/// Builds and persists the optimized route for one driver-day.
///
/// Loads pending assignments, resolves their geocoded coordinates, drops
/// stops that were never geocoded, submits the rest to the provider, and
/// upserts the correlated result. Provider and correlation failures surface
/// untouched; optimization is an admin-triggered idempotent action and is
/// never retried automatically.
///
/// With `force` unset, an already-stored route for the key is returned as-is;
/// the overwrite confirmation lives in the admin UI.
pub async fn build_and_optimize<S>(
    store: &S,
    optimizer: &dyn RouteOptimizer,
    depot: &RouteStart,
    metrics: &Metrics,
    driver_id: Uuid,
    date: NaiveDate,
    force: bool,
) -> Result<OptimizedRoute, AppError>
where
    S: AssignmentStore + GeocodeStore + RouteStore,
{
    if !force {
        if let Some(existing) = store.get(driver_id, date).await? {
            info!(%driver_id, %date, "returning cached optimized route");
            return Ok(existing);
        }
    }

    let assignments = store.pending_for(driver_id, date).await?;
    if assignments.is_empty() {
        return Err(AppError::NoPendingAssignments { driver_id, date });
    }

    let candidates = assignments.len();
    let mut jobs: Vec<DeliveryJob> = Vec::with_capacity(candidates);
    for assignment in &assignments {
        match store.coordinates_for(assignment.order_id).await? {
            Some(location) if !location.is_sentinel() && location.is_finite() => {
                jobs.push(DeliveryJob::from_assignment(assignment, location));
            }
            _ => {}
        }
    }

    let dropped = candidates - jobs.len();
    if dropped > 0 {
        metrics.stops_dropped_total.inc_by(dropped as u64);
        warn!(
            %driver_id,
            %date,
            dropped,
            candidates,
            "dropping stops without usable coordinates"
        );
    }

    if jobs.is_empty() {
        return Err(AppError::NoGeocodedStops);
    }

    // The job list must keep this exact order through the provider round
    // trip; correlation is index arithmetic over it.
    let result = optimizer.optimize(depot.location, &jobs).await?;

    info!(
        %driver_id,
        %date,
        stops = result.ordered_jobs.len(),
        duration_s = result.total_duration_seconds,
        distance_m = result.total_distance_meters,
        "route optimized"
    );

    let route = OptimizedRoute::from_result(driver_id, date, depot.clone(), result);
    store.upsert(route).await
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::build_and_optimize;
    use crate::error::AppError;
    use crate::models::assignment::{AssignmentStatus, DriverAssignment};
    use crate::models::geo::GeoPoint;
    use crate::models::route::{DeliveryJob, OptimizedRouteResult, RouteStart};
    use crate::observability::metrics::Metrics;
    use crate::optimizer::correlate::correlate_stops;
    use crate::optimizer::{RouteOptimizer, TripWaypoint};
    use crate::store::memory::MemoryStore;
    use crate::store::{AssignmentStore, GeocodeStore, RouteStore};

    /// Permutes submitted stops the way a real provider would, using the
    /// configured visiting positions, and records what was submitted.
    struct StubOptimizer {
        visit_positions: Vec<usize>,
        geometry: String,
        submitted: Mutex<Vec<Vec<DeliveryJob>>>,
    }

    impl StubOptimizer {
        fn new(visit_positions: Vec<usize>, geometry: &str) -> Self {
            Self {
                visit_positions,
                geometry: geometry.to_string(),
                submitted: Mutex::new(Vec::new()),
            }
        }

        fn submitted_stops(&self) -> Vec<Vec<DeliveryJob>> {
            self.submitted.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RouteOptimizer for StubOptimizer {
        async fn optimize(
            &self,
            _origin: GeoPoint,
            stops: &[DeliveryJob],
        ) -> Result<OptimizedRouteResult, AppError> {
            self.submitted.lock().unwrap().push(stops.to_vec());

            let mut waypoints = vec![TripWaypoint {
                waypoint_index: 0,
                location: [0.0, 0.0],
            }];
            waypoints.extend(self.visit_positions.iter().map(|&index| TripWaypoint {
                waypoint_index: index,
                location: [0.0, 0.0],
            }));

            let ordered_jobs = correlate_stops(stops, &waypoints)?;
            Ok(OptimizedRouteResult {
                ordered_jobs,
                route_geometry: self.geometry.clone(),
                total_duration_seconds: 1800.0,
                total_distance_meters: 21000.0,
            })
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn depot() -> RouteStart {
        RouteStart {
            address: "Warehouse, 100 Progress Ave".to_string(),
            location: GeoPoint::new(43.7530, -79.2544),
        }
    }

    fn assignment(driver_id: Uuid, seed: u128) -> DriverAssignment {
        DriverAssignment {
            id: Uuid::from_u128(seed),
            order_id: Uuid::from_u128(seed + 1000),
            driver_id,
            assigned_date: date(),
            status: AssignmentStatus::Pending,
            customer_name: format!("Customer {seed}"),
            phone: format!("416-555-{seed:04}"),
            full_address: format!("{seed} Main St"),
            city: "Toronto".to_string(),
            package_name: "Weekly Box".to_string(),
        }
    }

    async fn seed(
        store: &MemoryStore,
        driver_id: Uuid,
        seed_id: u128,
        location: Option<GeoPoint>,
    ) {
        let a = assignment(driver_id, seed_id);
        let order_id = a.order_id;
        store.insert(a).await.unwrap();
        if let Some(location) = location {
            store.put(order_id, location).await.unwrap();
        }
    }

    #[tokio::test]
    async fn no_pending_assignments_is_a_distinct_signal() {
        let store = MemoryStore::new();
        let optimizer = StubOptimizer::new(vec![], "geo");
        let driver = Uuid::new_v4();

        let err = build_and_optimize(
            &store,
            &optimizer,
            &depot(),
            &Metrics::new(),
            driver,
            date(),
            false,
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), "no_pending_assignments");
        assert!(optimizer.submitted_stops().is_empty());
    }

    #[tokio::test]
    async fn sentinel_and_missing_coordinates_are_excluded() {
        let store = MemoryStore::new();
        let driver = Uuid::new_v4();
        seed(&store, driver, 1, Some(GeoPoint::new(43.70, -79.30))).await;
        seed(&store, driver, 2, Some(GeoPoint::new(0.0, 0.0))).await;
        seed(&store, driver, 3, None).await;

        let optimizer = StubOptimizer::new(vec![1], "geo");
        let route = build_and_optimize(
            &store,
            &optimizer,
            &depot(),
            &Metrics::new(),
            driver,
            date(),
            false,
        )
        .await
        .unwrap();

        let submitted = optimizer.submitted_stops();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].len(), 1);
        assert_eq!(submitted[0][0].stop_id, Uuid::from_u128(1));
        assert_eq!(route.ordered_stops.len(), 1);
    }

    #[tokio::test]
    async fn all_stops_ungeocoded_yields_no_geocoded_stops() {
        let store = MemoryStore::new();
        let driver = Uuid::new_v4();
        seed(&store, driver, 1, Some(GeoPoint::new(0.0, 0.0))).await;
        seed(&store, driver, 2, None).await;

        let optimizer = StubOptimizer::new(vec![], "geo");
        let err = build_and_optimize(
            &store,
            &optimizer,
            &depot(),
            &Metrics::new(),
            driver,
            date(),
            false,
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), "no_geocoded_stops");
        assert!(optimizer.submitted_stops().is_empty());
    }

    #[tokio::test]
    async fn end_to_end_permutation_maps_back_onto_assignments() {
        let store = MemoryStore::new();
        let driver = Uuid::new_v4();
        // A1 and A2 geocoded, A3 carries the never-geocoded sentinel.
        seed(&store, driver, 1, Some(GeoPoint::new(43.70, -79.30))).await;
        seed(&store, driver, 2, Some(GeoPoint::new(43.66, -79.28))).await;
        seed(&store, driver, 3, Some(GeoPoint::new(0.0, 0.0))).await;

        // Provider visits A2 first, A1 second.
        let optimizer = StubOptimizer::new(vec![2, 1], "encoded-polyline");
        let route = build_and_optimize(
            &store,
            &optimizer,
            &depot(),
            &Metrics::new(),
            driver,
            date(),
            false,
        )
        .await
        .unwrap();

        let submitted = optimizer.submitted_stops();
        assert_eq!(submitted[0].len(), 2);
        assert_eq!(submitted[0][0].stop_id, Uuid::from_u128(1));
        assert_eq!(submitted[0][1].stop_id, Uuid::from_u128(2));

        assert_eq!(route.ordered_stops.len(), 2);
        assert_eq!(route.ordered_stops[0].stop_id, Uuid::from_u128(2));
        assert_eq!(route.ordered_stops[1].stop_id, Uuid::from_u128(1));
        assert_eq!(route.route_geometry, "encoded-polyline");
        assert_eq!(route.start.location, GeoPoint::new(43.7530, -79.2544));

        let stored = store.get(driver, date()).await.unwrap().unwrap();
        assert_eq!(stored.ordered_stops[0].stop_id, Uuid::from_u128(2));
    }

    #[tokio::test]
    async fn cached_route_short_circuits_unless_forced() {
        let store = MemoryStore::new();
        let driver = Uuid::new_v4();
        seed(&store, driver, 1, Some(GeoPoint::new(43.70, -79.30))).await;

        let optimizer = StubOptimizer::new(vec![1], "first");
        build_and_optimize(
            &store,
            &optimizer,
            &depot(),
            &Metrics::new(),
            driver,
            date(),
            false,
        )
        .await
        .unwrap();

        // Unforced recomputation returns the stored route without another
        // provider call.
        let cached = build_and_optimize(
            &store,
            &optimizer,
            &depot(),
            &Metrics::new(),
            driver,
            date(),
            false,
        )
        .await
        .unwrap();
        assert_eq!(cached.route_geometry, "first");
        assert_eq!(optimizer.submitted_stops().len(), 1);

        let recomputer = StubOptimizer::new(vec![1], "second");
        let replaced = build_and_optimize(
            &store,
            &recomputer,
            &depot(),
            &Metrics::new(),
            driver,
            date(),
            true,
        )
        .await
        .unwrap();
        assert_eq!(replaced.route_geometry, "second");

        let stored = store.get(driver, date()).await.unwrap().unwrap();
        assert_eq!(stored.route_geometry, "second");
        assert_eq!(store.route_count(), 1);
    }

    #[tokio::test]
    async fn provider_failure_passes_through_and_stores_nothing() {
        struct FailingOptimizer;

        #[async_trait]
        impl RouteOptimizer for FailingOptimizer {
            async fn optimize(
                &self,
                _origin: GeoPoint,
                _stops: &[DeliveryJob],
            ) -> Result<OptimizedRouteResult, AppError> {
                Err(AppError::Provider("NoRoute".to_string()))
            }
        }

        let store = MemoryStore::new();
        let driver = Uuid::new_v4();
        seed(&store, driver, 1, Some(GeoPoint::new(43.70, -79.30))).await;

        let err = build_and_optimize(
            &store,
            &FailingOptimizer,
            &depot(),
            &Metrics::new(),
            driver,
            date(),
            false,
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), "provider_error");
        assert_eq!(store.route_count(), 0);
    }
}
