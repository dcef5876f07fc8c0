use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// (0,0) means "never geocoded" in the upstream geocoding step. It is a
    /// real ocean coordinate, so callers filter on this check rather than
    /// treating the point as absent-by-default.
    pub fn is_sentinel(&self) -> bool {
        self.lat == 0.0 && self.lng == 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Renders the point the way the provider expects waypoints: `lon,lat`
    /// with six decimal places.
    pub fn to_lng_lat(&self) -> String {
        format!("{:.6},{:.6}", self.lng, self.lat)
    }
}
