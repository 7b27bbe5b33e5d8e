use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::ride::{RideAccount, RideDriver, RideOut, RideStatus};
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptIn {
    pub ride_id: i64,
    pub account_id: i64,
    pub total: f64,
}

impl ReceiptIn {
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.total.is_finite() {
            return Err(AppError::BadRequest("total must be a finite amount".into()));
        }
        Ok(())
    }
}

/// A negative `total` means the fare was refunded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptOut {
    pub receipt_id: i64,
    pub total: f64,
    pub ride_id: i64,
    pub account_id: i64,
    pub refunded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptGet {
    pub receipt_id: i64,
    pub total: f64,
    pub refunded: bool,
    pub ride: RideOut,
    pub account: RideAccount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetReceiptRide {
    pub id: i64,
    pub account_id: i64,
    pub is_roundtrip: bool,
    pub start_location: String,
    pub end_location: String,
    pub ride_status: RideStatus,
    pub datetime: NaiveDateTime,
    pub vehicle_info: String,
    pub comments: Option<String>,
    pub driver: Option<RideDriver>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptGetWithDriver {
    pub receipt_id: i64,
    pub total: f64,
    pub refunded: bool,
    pub ride: GetReceiptRide,
    pub account: RideAccount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deleted {
    pub message: String,
}

impl Default for Deleted {
    fn default() -> Self {
        Self {
            message: "Deleted".into(),
        }
    }
}
