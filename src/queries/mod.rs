//! Store access for accounts, rides and receipts.
//!
//! Every query aliases its columns and rows are read back by name, so the
//! order of a `SELECT` list never matters to the mapping code.

pub mod accounts;
pub mod receipts;
pub mod rides;

use sqlx::{sqlite::SqliteRow, Row};

use crate::{
    error::AppError,
    models::ride::{RideAccount, RideOut, RideStatus},
};

pub use accounts::AccountQueries;
pub use receipts::ReceiptQueries;
pub use rides::RideQueries;

pub(crate) const RIDE_COLUMNS: &str = "r.id, r.account_id, r.driver_id, r.is_roundtrip, \
     r.start_location, r.end_location, r.ride_status, r.datetime, r.vehicle_info, r.comments";

pub(crate) const RETURNING_RIDE: &str = "RETURNING id, account_id, driver_id, is_roundtrip, \
     start_location, end_location, ride_status, datetime, vehicle_info, comments";

/// Selects the public profile of the account joined as `table`, with every
/// column prefixed by `prefix_`.
pub(crate) fn account_columns(table: &str, prefix: &str) -> String {
    ["username", "first_name", "last_name", "email", "current_ride"]
        .iter()
        .map(|column| format!("{table}.{column} AS {prefix}_{column}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn ride_from_row(row: &SqliteRow) -> Result<RideOut, AppError> {
    let status: String = row.try_get("ride_status")?;
    Ok(RideOut {
        id: row.try_get("id")?,
        account_id: row.try_get("account_id")?,
        driver_id: row.try_get("driver_id")?,
        is_roundtrip: row.try_get("is_roundtrip")?,
        start_location: row.try_get("start_location")?,
        end_location: row.try_get("end_location")?,
        ride_status: status.parse::<RideStatus>()?,
        datetime: row.try_get("datetime")?,
        vehicle_info: row.try_get("vehicle_info")?,
        comments: row.try_get("comments")?,
    })
}

pub(crate) fn account_from_row(row: &SqliteRow, prefix: &str) -> Result<RideAccount, AppError> {
    Ok(RideAccount {
        username: row.try_get(format!("{prefix}_username").as_str())?,
        first_name: row.try_get(format!("{prefix}_first_name").as_str())?,
        last_name: row.try_get(format!("{prefix}_last_name").as_str())?,
        email: row.try_get(format!("{prefix}_email").as_str())?,
        current_ride: row.try_get(format!("{prefix}_current_ride").as_str())?,
    })
}

/// Left-joined accounts come back as all-null columns; that is `None`,
/// never a half-filled profile.
pub(crate) fn optional_account_from_row(
    row: &SqliteRow,
    prefix: &str,
) -> Result<Option<RideAccount>, AppError> {
    let username: Option<String> = row.try_get(format!("{prefix}_username").as_str())?;
    if username.is_none() {
        return Ok(None);
    }
    account_from_row(row, prefix).map(Some)
}
