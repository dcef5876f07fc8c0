use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AssignmentStatus {
    Pending,
    OutForDelivery,
    Delivered,
    Failed,
}

/// One order assigned to one driver for one calendar date. The assignment id
/// doubles as the stop id through the optimization round trip. Customer and
/// package fields are denormalized copies so downstream consumers never need
/// a join against the orders table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverAssignment {
    pub id: Uuid,
    pub order_id: Uuid,
    pub driver_id: Uuid,
    pub assigned_date: NaiveDate,
    pub status: AssignmentStatus,
    pub customer_name: String,
    pub phone: String,
    pub full_address: String,
    pub city: String,
    pub package_name: String,
}
