use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};

use crate::{
    db::ListParams,
    error::AppError,
    extract::{AppJson, AppPath, AppQuery},
    models::receipt::{Deleted, ReceiptGet, ReceiptGetWithDriver, ReceiptIn, ReceiptOut},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/receipts", post(create_receipt).get(get_all_receipts))
        .route("/api/receipts/:receipt_id", get(get_receipt))
        .route(
            "/api/receipts/ride/:ride_id",
            get(get_receipt_by_ride).delete(delete_receipt),
        )
        .route(
            "/api/receipts/history/:account_id",
            get(get_receipts_by_account),
        )
        .route("/api/receipts/refund/:ride_id", put(refund_receipt))
}

async fn create_receipt(
    State(state): State<AppState>,
    AppJson(info): AppJson<ReceiptIn>,
) -> Result<Json<ReceiptOut>, AppError> {
    Ok(Json(state.receipts.create(&info).await?))
}

async fn get_all_receipts(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<Json<Vec<ReceiptGet>>, AppError> {
    Ok(Json(state.receipts.get_all_receipts(params).await?))
}

async fn get_receipt(
    State(state): State<AppState>,
    AppPath(receipt_id): AppPath<i64>,
) -> Result<Json<ReceiptGet>, AppError> {
    Ok(Json(state.receipts.get_receipt(receipt_id).await?))
}

async fn get_receipt_by_ride(
    State(state): State<AppState>,
    AppPath(ride_id): AppPath<i64>,
) -> Result<Json<ReceiptGetWithDriver>, AppError> {
    Ok(Json(state.receipts.get_receipt_by_ride_id(ride_id).await?))
}

async fn get_receipts_by_account(
    State(state): State<AppState>,
    AppPath(account_id): AppPath<i64>,
) -> Result<Json<Vec<ReceiptGet>>, AppError> {
    Ok(Json(state.receipts.get_receipts_by_account(account_id).await?))
}

async fn refund_receipt(
    State(state): State<AppState>,
    AppPath(ride_id): AppPath<i64>,
) -> Result<Json<ReceiptOut>, AppError> {
    Ok(Json(state.receipts.refund(ride_id).await?))
}

async fn delete_receipt(
    State(state): State<AppState>,
    AppPath(ride_id): AppPath<i64>,
) -> Result<Json<Deleted>, AppError> {
    Ok(Json(state.receipts.delete(ride_id).await?))
}
