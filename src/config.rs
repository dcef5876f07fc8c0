use std::env;

use crate::error::AppError;
use crate::models::geo::GeoPoint;
use crate::models::route::RouteStart;
use crate::optimizer::osrm::OsrmConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub osrm_base_url: String,
    pub osrm_profile: String,
    pub request_timeout_secs: u64,
    pub depot_address: String,
    pub depot_lat: f64,
    pub depot_lng: f64,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            http_port: parse_or_default("HTTP_PORT", 3000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            osrm_base_url: env::var("OSRM_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            osrm_profile: env::var("OSRM_PROFILE").unwrap_or_else(|_| "car".to_string()),
            request_timeout_secs: parse_or_default("REQUEST_TIMEOUT_SECS", 10)?,
            depot_address: env::var("DEPOT_ADDRESS")
                .unwrap_or_else(|_| "Warehouse, 100 Progress Ave, Scarborough".to_string()),
            depot_lat: parse_or_default("DEPOT_LAT", 43.7530)?,
            depot_lng: parse_or_default("DEPOT_LNG", -79.2544)?,
        })
    }

    pub fn osrm(&self) -> OsrmConfig {
        OsrmConfig {
            base_url: self.osrm_base_url.clone(),
            profile: self.osrm_profile.clone(),
            timeout_secs: self.request_timeout_secs,
        }
    }

    pub fn depot(&self) -> Result<RouteStart, AppError> {
        let location = GeoPoint::new(self.depot_lat, self.depot_lng);
        if !location.is_finite() || location.is_sentinel() {
            return Err(AppError::Internal(format!(
                "invalid depot coordinates: ({}, {})",
                self.depot_lat, self.depot_lng
            )));
        }

        Ok(RouteStart {
            address: self.depot_address.clone(),
            location,
        })
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
