use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::{
    error::AppError,
    extract::{AppJson, AppPath},
    models::account::{AccountIn, AccountOut, AccountUpdate},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/accounts", post(create_account))
        .route(
            "/api/accounts/:username",
            get(get_account).patch(update_account),
        )
}

async fn create_account(
    State(state): State<AppState>,
    AppJson(info): AppJson<AccountIn>,
) -> Result<Json<AccountOut>, AppError> {
    Ok(Json(state.accounts.create(&info).await?))
}

async fn get_account(
    State(state): State<AppState>,
    AppPath(username): AppPath<String>,
) -> Result<Json<AccountOut>, AppError> {
    Ok(Json(state.accounts.get(&username).await?))
}

async fn update_account(
    State(state): State<AppState>,
    AppPath(username): AppPath<String>,
    AppJson(info): AppJson<AccountUpdate>,
) -> Result<Json<AccountOut>, AppError> {
    Ok(Json(state.accounts.update(&username, &info).await?))
}
