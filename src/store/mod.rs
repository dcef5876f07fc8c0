//! Store ports. The hosted relational backend is an external collaborator;
//! these traits are its contract, with an in-memory adapter in [`memory`].

pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::assignment::DriverAssignment;
use crate::models::geo::GeoPoint;
use crate::models::route::OptimizedRoute;

#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// Assignments for (driver, date) still awaiting delivery, i.e. status
    /// Pending. Uniqueness of (order_id, assigned_date) per driver is the
    /// store's responsibility, enforced at insert.
    async fn pending_for(
        &self,
        driver_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<DriverAssignment>, AppError>;

    async fn insert(&self, assignment: DriverAssignment) -> Result<(), AppError>;
}

#[async_trait]
pub trait GeocodeStore: Send + Sync {
    /// Precomputed coordinates for an order's delivery address. `None` means
    /// the order was never geocoded and cannot be optimized; callers must
    /// not substitute (0,0).
    async fn coordinates_for(&self, order_id: Uuid) -> Result<Option<GeoPoint>, AppError>;

    async fn put(&self, order_id: Uuid, location: GeoPoint) -> Result<(), AppError>;
}

#[async_trait]
pub trait RouteStore: Send + Sync {
    /// Insert-or-replace keyed on (driver_id, route_date). The route for a
    /// driver-day is a singleton; recomputation overwrites, never appends.
    async fn upsert(&self, route: OptimizedRoute) -> Result<OptimizedRoute, AppError>;

    async fn get(
        &self,
        driver_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<OptimizedRoute>, AppError>;
}
