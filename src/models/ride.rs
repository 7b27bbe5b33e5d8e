use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RideStatus {
    #[default]
    Requested,
    InProgress,
    Completed,
    Cancelled,
}

impl RideStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RideStatus::Requested => "Requested",
            RideStatus::InProgress => "In Progress",
            RideStatus::Completed => "Completed",
            RideStatus::Cancelled => "Cancelled",
        }
    }

    /// A rider may hold at most one active ride.
    pub fn is_active(&self) -> bool {
        matches!(self, RideStatus::Requested | RideStatus::InProgress)
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RideStatus {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "requested" => Ok(RideStatus::Requested),
            "in progress" => Ok(RideStatus::InProgress),
            "completed" | "complete" => Ok(RideStatus::Completed),
            "cancelled" | "canceled" => Ok(RideStatus::Cancelled),
            _ => Err(AppError::BadRequest(format!("unknown ride status: {raw}"))),
        }
    }
}

impl TryFrom<String> for RideStatus {
    type Error = AppError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<RideStatus> for String {
    fn from(status: RideStatus) -> Self {
        status.as_str().to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideIn {
    pub account_id: i64,
    #[serde(default)]
    pub is_roundtrip: bool,
    pub start_location: String,
    pub end_location: String,
    #[serde(default)]
    pub ride_status: RideStatus,
    pub datetime: NaiveDateTime,
    pub vehicle_info: String,
    pub comments: Option<String>,
}

impl RideIn {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.start_location.trim().is_empty() || self.end_location.trim().is_empty() {
            return Err(AppError::BadRequest(
                "start_location and end_location are required".into(),
            ));
        }
        if !self.ride_status.is_active() {
            return Err(AppError::BadRequest(format!(
                "a new ride cannot start as {}",
                self.ride_status
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideOut {
    pub id: i64,
    pub account_id: i64,
    pub driver_id: Option<i64>,
    pub is_roundtrip: bool,
    pub start_location: String,
    pub end_location: String,
    pub ride_status: RideStatus,
    pub datetime: NaiveDateTime,
    pub vehicle_info: String,
    pub comments: Option<String>,
}

/// Public profile of an account as embedded in ride and receipt views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideAccount {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub current_ride: bool,
}

pub type RideDriver = RideAccount;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetRide {
    pub id: i64,
    pub account_id: i64,
    pub driver_id: Option<i64>,
    pub is_roundtrip: bool,
    pub start_location: String,
    pub end_location: String,
    pub ride_status: RideStatus,
    pub datetime: NaiveDateTime,
    pub vehicle_info: String,
    pub comments: Option<String>,
    pub account: RideAccount,
    pub driver: Option<RideDriver>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RideUpdate {
    pub ride_status: Option<RideStatus>,
    pub driver_id: Option<i64>,
}

impl RideUpdate {
    pub fn is_empty(&self) -> bool {
        self.ride_status.is_none() && self.driver_id.is_none()
    }
}
