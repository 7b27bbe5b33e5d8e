use tracing::info;

use super::{
    account_columns, account_from_row, optional_account_from_row, ride_from_row, RETURNING_RIDE,
    RIDE_COLUMNS,
};
use crate::{
    db::{DbPool, ListParams},
    error::AppError,
    models::ride::{GetRide, RideIn, RideOut, RideStatus, RideUpdate},
};

#[derive(Clone)]
pub struct RideQueries {
    pool: DbPool,
}

impl RideQueries {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Inserts the ride unless the rider already has an active one. The
    /// existence check and the insert are one statement.
    pub async fn create(&self, ride: &RideIn) -> Result<RideOut, AppError> {
        ride.validate()?;
        let sql = format!(
            "INSERT INTO rides (account_id, is_roundtrip, start_location, end_location, \
             ride_status, datetime, vehicle_info, comments) \
             SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8 \
             WHERE NOT EXISTS ( \
                 SELECT 1 FROM rides WHERE account_id = ?1 AND ride_status IN (?9, ?10) \
             ) {RETURNING_RIDE}"
        );
        let row = sqlx::query(&sql)
            .bind(ride.account_id)
            .bind(ride.is_roundtrip)
            .bind(ride.start_location.trim())
            .bind(ride.end_location.trim())
            .bind(ride.ride_status.as_str())
            .bind(ride.datetime)
            .bind(&ride.vehicle_info)
            .bind(&ride.comments)
            .bind(RideStatus::Requested.as_str())
            .bind(RideStatus::InProgress.as_str())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Err(AppError::DuplicateRide);
        };
        let created = ride_from_row(&row)?;
        info!(ride_id = created.id, account_id = created.account_id, "ride created");
        Ok(created)
    }

    pub async fn get_ride(&self, ride_id: i64) -> Result<GetRide, AppError> {
        let sql = format!("{} WHERE r.id = ?1", ride_view());
        let row = sqlx::query(&sql)
            .bind(ride_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound("ride"))?;
        get_ride_from_row(&row)
    }

    pub async fn get_all_rides(&self, params: ListParams) -> Result<Vec<GetRide>, AppError> {
        let sql = format!("{} ORDER BY r.id LIMIT ?1 OFFSET ?2", ride_view());
        let rows = sqlx::query(&sql)
            .bind(params.limit())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(get_ride_from_row).collect()
    }

    pub async fn get_all_roundtrips(&self, params: ListParams) -> Result<Vec<GetRide>, AppError> {
        let sql = format!(
            "{} WHERE r.is_roundtrip = 1 ORDER BY r.id LIMIT ?1 OFFSET ?2",
            ride_view()
        );
        let rows = sqlx::query(&sql)
            .bind(params.limit())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(get_ride_from_row).collect()
    }

    /// Rides the account took part in, as rider or as driver.
    pub async fn get_rides_by_account(&self, account_id: i64) -> Result<Vec<GetRide>, AppError> {
        let known: Option<i64> = sqlx::query_scalar("SELECT id FROM accounts WHERE id = ?1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?;
        if known.is_none() {
            return Err(AppError::NotFound("account"));
        }

        let sql = format!(
            "{} WHERE r.account_id = ?1 OR r.driver_id = ?1 ORDER BY r.id",
            ride_view()
        );
        let rows = sqlx::query(&sql)
            .bind(account_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(get_ride_from_row).collect()
    }

    pub async fn update(&self, ride_id: i64, patch: &RideUpdate) -> Result<RideOut, AppError> {
        if patch.is_empty() {
            return Err(AppError::BadRequest(
                "nothing to update: provide ride_status or driver_id".into(),
            ));
        }
        // Moving a ride back into an active status must not give the rider
        // a second active ride.
        let sql = format!(
            "UPDATE rides SET ride_status = COALESCE(?1, ride_status), \
             driver_id = COALESCE(?2, driver_id) \
             WHERE id = ?3 AND ( \
                 ?1 IS NULL OR ?1 NOT IN (?4, ?5) OR NOT EXISTS ( \
                     SELECT 1 FROM rides AS other \
                     WHERE other.account_id = rides.account_id \
                       AND other.id <> rides.id \
                       AND other.ride_status IN (?4, ?5) \
                 ) \
             ) {RETURNING_RIDE}"
        );
        let row = sqlx::query(&sql)
            .bind(patch.ride_status.map(|status| status.as_str()))
            .bind(patch.driver_id)
            .bind(ride_id)
            .bind(RideStatus::Requested.as_str())
            .bind(RideStatus::InProgress.as_str())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            let known: Option<i64> = sqlx::query_scalar("SELECT id FROM rides WHERE id = ?1")
                .bind(ride_id)
                .fetch_optional(&self.pool)
                .await?;
            return Err(match known {
                Some(_) => AppError::DuplicateRide,
                None => AppError::NotFound("ride"),
            });
        };

        let updated = ride_from_row(&row)?;
        info!(
            ride_id,
            status = %updated.ride_status,
            driver_id = ?updated.driver_id,
            "ride updated"
        );
        Ok(updated)
    }
}

fn ride_view() -> String {
    format!(
        "SELECT {RIDE_COLUMNS}, {}, {} \
         FROM rides AS r \
         INNER JOIN accounts AS a ON a.id = r.account_id \
         LEFT JOIN accounts AS d ON d.id = r.driver_id",
        account_columns("a", "rider"),
        account_columns("d", "driver"),
    )
}

fn get_ride_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<GetRide, AppError> {
    let ride = ride_from_row(row)?;
    Ok(GetRide {
        id: ride.id,
        account_id: ride.account_id,
        driver_id: ride.driver_id,
        is_roundtrip: ride.is_roundtrip,
        start_location: ride.start_location,
        end_location: ride.end_location,
        ride_status: ride.ride_status,
        datetime: ride.datetime,
        vehicle_info: ride.vehicle_info,
        comments: ride.comments,
        account: account_from_row(row, "rider")?,
        driver: optional_account_from_row(row, "driver")?,
    })
}
