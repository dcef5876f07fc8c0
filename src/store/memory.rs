use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::assignment::{AssignmentStatus, DriverAssignment};
use crate::models::geo::GeoPoint;
use crate::models::route::OptimizedRoute;
use crate::store::{AssignmentStore, GeocodeStore, RouteStore};

/// DashMap-backed adapter standing in for the hosted backend. The route map
/// key mirrors the UNIQUE(driver_id, route_date) constraint.
#[derive(Default)]
pub struct MemoryStore {
    assignments: DashMap<Uuid, DriverAssignment>,
    geocodes: DashMap<Uuid, GeoPoint>,
    routes: DashMap<(Uuid, NaiveDate), OptimizedRoute>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn assignments_for(&self, driver_id: Uuid, date: NaiveDate) -> Vec<DriverAssignment> {
        self.assignments
            .iter()
            .filter(|entry| {
                entry.value().driver_id == driver_id && entry.value().assigned_date == date
            })
            .map(|entry| entry.value().clone())
            .collect()
    }
}

#[async_trait]
impl AssignmentStore for MemoryStore {
    async fn pending_for(
        &self,
        driver_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<DriverAssignment>, AppError> {
        let mut pending: Vec<DriverAssignment> = self
            .assignments
            .iter()
            .filter(|entry| {
                let a = entry.value();
                a.driver_id == driver_id
                    && a.assigned_date == date
                    && a.status == AssignmentStatus::Pending
            })
            .map(|entry| entry.value().clone())
            .collect();

        // DashMap iteration order is arbitrary; a stable order keeps the
        // provider request deterministic across recomputations.
        pending.sort_by_key(|a| a.id);
        Ok(pending)
    }

    async fn insert(&self, assignment: DriverAssignment) -> Result<(), AppError> {
        let duplicate = self.assignments.iter().any(|entry| {
            let existing = entry.value();
            existing.driver_id == assignment.driver_id
                && existing.order_id == assignment.order_id
                && existing.assigned_date == assignment.assigned_date
        });

        if duplicate {
            return Err(AppError::Conflict(format!(
                "order {} is already assigned to driver {} on {}",
                assignment.order_id, assignment.driver_id, assignment.assigned_date
            )));
        }

        self.assignments.insert(assignment.id, assignment);
        Ok(())
    }
}

#[async_trait]
impl GeocodeStore for MemoryStore {
    async fn coordinates_for(&self, order_id: Uuid) -> Result<Option<GeoPoint>, AppError> {
        Ok(self.geocodes.get(&order_id).map(|entry| *entry.value()))
    }

    async fn put(&self, order_id: Uuid, location: GeoPoint) -> Result<(), AppError> {
        self.geocodes.insert(order_id, location);
        Ok(())
    }
}

#[async_trait]
impl RouteStore for MemoryStore {
    async fn upsert(&self, route: OptimizedRoute) -> Result<OptimizedRoute, AppError> {
        self.routes
            .insert((route.driver_id, route.route_date), route.clone());
        Ok(route)
    }

    async fn get(
        &self,
        driver_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<OptimizedRoute>, AppError> {
        Ok(self
            .routes
            .get(&(driver_id, date))
            .map(|entry| entry.value().clone()))
    }
}
