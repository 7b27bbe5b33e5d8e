use axum::{
    extract::State,
    routing::{get, patch, post},
    Json, Router,
};

use crate::{
    db::ListParams,
    error::AppError,
    extract::{AppJson, AppPath, AppQuery},
    models::ride::{GetRide, RideIn, RideOut, RideUpdate},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/rides", post(create_ride).get(get_all_rides))
        .route("/api/rides/:ride_id", get(get_ride))
        .route("/api/roundtrips", get(get_all_roundtrips))
        .route("/api/rides/history/:account_id", get(get_rides_by_account))
        .route("/api/rides/set_status/:ride_id", patch(update_ride))
}

async fn create_ride(
    State(state): State<AppState>,
    AppJson(info): AppJson<RideIn>,
) -> Result<Json<RideOut>, AppError> {
    let ride = state.rides.create(&info).await?;
    Ok(Json(ride))
}

async fn get_ride(
    State(state): State<AppState>,
    AppPath(ride_id): AppPath<i64>,
) -> Result<Json<GetRide>, AppError> {
    Ok(Json(state.rides.get_ride(ride_id).await?))
}

async fn get_all_rides(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<Json<Vec<GetRide>>, AppError> {
    Ok(Json(state.rides.get_all_rides(params).await?))
}

async fn get_all_roundtrips(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<Json<Vec<GetRide>>, AppError> {
    Ok(Json(state.rides.get_all_roundtrips(params).await?))
}

async fn get_rides_by_account(
    State(state): State<AppState>,
    AppPath(account_id): AppPath<i64>,
) -> Result<Json<Vec<GetRide>>, AppError> {
    Ok(Json(state.rides.get_rides_by_account(account_id).await?))
}

async fn update_ride(
    State(state): State<AppState>,
    AppPath(ride_id): AppPath<i64>,
    AppJson(info): AppJson<RideUpdate>,
) -> Result<Json<RideOut>, AppError> {
    Ok(Json(state.rides.update(ride_id, &info).await?))
}
