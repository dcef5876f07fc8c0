use std::sync::Arc;

use crate::models::route::RouteStart;
use crate::observability::metrics::Metrics;
use crate::optimizer::RouteOptimizer;
use crate::store::memory::MemoryStore;

pub struct AppState {
    pub store: MemoryStore,
    pub optimizer: Arc<dyn RouteOptimizer>,
    /// Fixed warehouse origin for every route.
    pub depot: RouteStart,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(optimizer: Arc<dyn RouteOptimizer>, depot: RouteStart) -> Self {
        Self {
            store: MemoryStore::new(),
            optimizer,
            depot,
            metrics: Metrics::new(),
        }
    }
}
