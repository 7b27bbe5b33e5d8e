#![allow(dead_code)]

use std::net::SocketAddr;

use anyhow::Context;
use chrono::NaiveDate;
use ridehail::{
    config::AppConfig,
    db::{init_pool, run_migrations},
    models::{account::AccountIn, ride::RideIn, ride::RideStatus},
    state::AppState,
};
use tempfile::TempDir;

/// Application state on a throwaway SQLite file. The directory lives as
/// long as this value.
pub struct TestState {
    pub app: AppState,
    _root: TempDir,
}

impl TestState {
    pub async fn new() -> anyhow::Result<Self> {
        let root = TempDir::new().context("create temp dir for test state")?;
        let db_path = root.path().join("ridehail.sqlite");
        let database_url = format!("sqlite://{}", db_path.to_string_lossy());

        let config = AppConfig {
            database_url,
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            max_connections: 4,
        };

        let db = init_pool(&config.database_url, config.max_connections).await?;
        run_migrations(&db).await?;

        let app = AppState::new(db);
        Ok(Self { app, _root: root })
    }
}

pub fn account(username: &str) -> AccountIn {
    AccountIn {
        username: username.into(),
        password: format!("{username}-secret"),
        first_name: username.to_uppercase(),
        last_name: "Tester".into(),
        email: format!("{username}@example.com"),
    }
}

pub fn ride_request(account_id: i64, from: &str, to: &str) -> RideIn {
    RideIn {
        account_id,
        is_roundtrip: false,
        start_location: from.into(),
        end_location: to.into(),
        ride_status: RideStatus::Requested,
        datetime: NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|date| date.and_hms_opt(9, 30, 0))
            .expect("valid test timestamp"),
        vehicle_info: "Blue hatchback".into(),
        comments: None,
    }
}
