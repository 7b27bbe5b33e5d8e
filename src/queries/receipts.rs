use sqlx::{sqlite::SqliteRow, Row};
use tracing::{info, warn};

use super::{
    account_columns, account_from_row, optional_account_from_row, ride_from_row, RIDE_COLUMNS,
};
use crate::{
    db::{DbPool, ListParams},
    error::{is_unique_violation, AppError},
    models::receipt::{
        Deleted, GetReceiptRide, ReceiptGet, ReceiptGetWithDriver, ReceiptIn, ReceiptOut,
    },
};

const RETURNING_RECEIPT: &str =
    "RETURNING id AS receipt_id, ride_id, account_id, total, refunded";

#[derive(Clone)]
pub struct ReceiptQueries {
    pool: DbPool,
}

impl ReceiptQueries {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// One receipt per ride; a second insert for the same ride is a
    /// `DuplicateReceipt`.
    pub async fn create(&self, receipt: &ReceiptIn) -> Result<ReceiptOut, AppError> {
        receipt.validate()?;
        let sql = format!(
            "INSERT INTO receipts (ride_id, account_id, total) VALUES (?1, ?2, ?3) \
             {RETURNING_RECEIPT}"
        );
        let row = sqlx::query(&sql)
            .bind(receipt.ride_id)
            .bind(receipt.account_id)
            .bind(receipt.total)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    warn!(ride_id = receipt.ride_id, "duplicate receipt rejected");
                    AppError::DuplicateReceipt
                } else {
                    err.into()
                }
            })?;

        let created = receipt_from_row(&row)?;
        info!(
            receipt_id = created.receipt_id,
            ride_id = created.ride_id,
            total = created.total,
            "receipt created"
        );
        Ok(created)
    }

    /// Marks the ride's receipt refunded and makes its total negative.
    /// Refunding twice leaves the receipt as it was after the first call.
    pub async fn refund(&self, ride_id: i64) -> Result<ReceiptOut, AppError> {
        let sql = format!(
            "UPDATE receipts SET total = -ABS(total), refunded = 1 \
             WHERE ride_id = ?1 {RETURNING_RECEIPT}"
        );
        let row = sqlx::query(&sql)
            .bind(ride_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound("receipt"))?;

        let refunded = receipt_from_row(&row)?;
        info!(ride_id, total = refunded.total, "receipt refunded");
        Ok(refunded)
    }

    pub async fn delete(&self, ride_id: i64) -> Result<Deleted, AppError> {
        let result = sqlx::query("DELETE FROM receipts WHERE ride_id = ?1")
            .bind(ride_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("receipt"));
        }
        info!(ride_id, "receipt deleted");
        Ok(Deleted::default())
    }

    pub async fn get_receipts_by_account(
        &self,
        account_id: i64,
    ) -> Result<Vec<ReceiptGet>, AppError> {
        let sql = format!("{} WHERE re.account_id = ?1 ORDER BY re.id", receipt_view());
        let rows = sqlx::query(&sql)
            .bind(account_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(receipt_get_from_row).collect()
    }

    pub async fn get_receipt(&self, receipt_id: i64) -> Result<ReceiptGet, AppError> {
        let sql = format!("{} WHERE re.id = ?1", receipt_view());
        let row = sqlx::query(&sql)
            .bind(receipt_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound("receipt"))?;
        receipt_get_from_row(&row)
    }

    pub async fn get_receipt_by_ride_id(
        &self,
        ride_id: i64,
    ) -> Result<ReceiptGetWithDriver, AppError> {
        let sql = format!("{} WHERE r.id = ?1", receipt_view());
        let row = sqlx::query(&sql)
            .bind(ride_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound("receipt"))?;
        receipt_with_driver_from_row(&row)
    }

    pub async fn get_all_receipts(&self, params: ListParams) -> Result<Vec<ReceiptGet>, AppError> {
        let sql = format!("{} ORDER BY re.id LIMIT ?1 OFFSET ?2", receipt_view());
        let rows = sqlx::query(&sql)
            .bind(params.limit())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(receipt_get_from_row).collect()
    }
}

fn receipt_view() -> String {
    format!(
        "SELECT re.id AS receipt_id, re.total AS receipt_total, \
         re.refunded AS receipt_refunded, {RIDE_COLUMNS}, {}, {} \
         FROM receipts AS re \
         INNER JOIN rides AS r ON r.id = re.ride_id \
         INNER JOIN accounts AS a ON a.id = re.account_id \
         LEFT JOIN accounts AS d ON d.id = r.driver_id",
        account_columns("a", "account"),
        account_columns("d", "driver"),
    )
}

fn receipt_from_row(row: &SqliteRow) -> Result<ReceiptOut, AppError> {
    Ok(ReceiptOut {
        receipt_id: row.try_get("receipt_id")?,
        total: row.try_get("total")?,
        ride_id: row.try_get("ride_id")?,
        account_id: row.try_get("account_id")?,
        refunded: row.try_get("refunded")?,
    })
}

fn receipt_get_from_row(row: &SqliteRow) -> Result<ReceiptGet, AppError> {
    Ok(ReceiptGet {
        receipt_id: row.try_get("receipt_id")?,
        total: row.try_get("receipt_total")?,
        refunded: row.try_get("receipt_refunded")?,
        ride: ride_from_row(row)?,
        account: account_from_row(row, "account")?,
    })
}

fn receipt_with_driver_from_row(row: &SqliteRow) -> Result<ReceiptGetWithDriver, AppError> {
    let ride = ride_from_row(row)?;
    Ok(ReceiptGetWithDriver {
        receipt_id: row.try_get("receipt_id")?,
        total: row.try_get("receipt_total")?,
        refunded: row.try_get("receipt_refunded")?,
        ride: GetReceiptRide {
            id: ride.id,
            account_id: ride.account_id,
            is_roundtrip: ride.is_roundtrip,
            start_location: ride.start_location,
            end_location: ride.end_location,
            ride_status: ride.ride_status,
            datetime: ride.datetime,
            vehicle_info: ride.vehicle_info,
            comments: ride.comments,
            driver: optional_account_from_row(row, "driver")?,
        },
        account: account_from_row(row, "account")?,
    })
}
