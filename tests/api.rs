mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use common::TestState;
use ridehail::routes::create_router;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_raw(app, method, uri, body.map(|body| body.to_string())).await
}

async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<String>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_account(app: &Router, username: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/accounts",
        Some(json!({
            "username": username,
            "password": "correct horse",
            "first_name": "Test",
            "last_name": username,
            "email": format!("{username}@example.com"),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["id"].as_i64().unwrap()
}

fn ride_body(account_id: i64) -> Value {
    json!({
        "account_id": account_id,
        "is_roundtrip": true,
        "start_location": "1 Main St",
        "end_location": "Central Station",
        "ride_status": "Requested",
        "datetime": "2024-06-01T09:30:00",
        "vehicle_info": "Grey minivan",
        "comments": "two suitcases",
    })
}

async fn app() -> (TestState, Router) {
    let state = TestState::new().await.unwrap();
    let router = create_router(state.app.clone());
    (state, router)
}

#[tokio::test]
async fn create_ride_echoes_fields_and_unknown_ride_is_404() {
    let (_state, app) = app().await;
    let rider = create_account(&app, "rita").await;

    let (status, ride) = send(&app, "POST", "/api/rides", Some(ride_body(rider))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(ride["id"].as_i64().unwrap() > 0);
    assert_eq!(ride["account_id"], rider);
    assert_eq!(ride["is_roundtrip"], true);
    assert_eq!(ride["start_location"], "1 Main St");
    assert_eq!(ride["ride_status"], "Requested");
    assert_eq!(ride["datetime"], "2024-06-01T09:30:00");
    assert_eq!(ride["comments"], "two suitcases");
    assert_eq!(ride["driver_id"], Value::Null);

    let (status, body) = send(&app, "GET", "/api/rides/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn second_active_ride_is_rejected() {
    let (_state, app) = app().await;
    let rider = create_account(&app, "rita").await;

    let (status, _) = send(&app, "POST", "/api/rides", Some(ride_body(rider))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, "POST", "/api/rides", Some(ride_body(rider))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "duplicate_ride");
}

#[tokio::test]
async fn ride_for_unknown_account_is_bad_request() {
    let (_state, app) = app().await;
    let (status, _) = send(&app, "POST", "/api/rides", Some(ride_body(4242))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listings_are_empty_not_missing() {
    let (_state, app) = app().await;
    for uri in ["/api/rides", "/api/roundtrips", "/api/receipts"] {
        let (status, body) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body, json!([]), "{uri}");
    }
}

#[tokio::test]
async fn history_and_roundtrips() {
    let (_state, app) = app().await;
    let rider = create_account(&app, "rita").await;
    let driver = create_account(&app, "dave").await;

    let (_, ride) = send(&app, "POST", "/api/rides", Some(ride_body(rider))).await;
    let ride_id = ride["id"].as_i64().unwrap();

    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("/api/rides/set_status/{ride_id}"),
        Some(json!({ "ride_status": "In Progress", "driver_id": driver })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["ride_status"], "In Progress");
    assert_eq!(updated["driver_id"], driver);

    let (status, history) = send(&app, "GET", &format!("/api/rides/history/{driver}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history[0]["id"], ride_id);
    assert_eq!(history[0]["account"]["username"], "rita");
    assert_eq!(history[0]["driver"]["username"], "dave");

    let (_, roundtrips) = send(&app, "GET", "/api/roundtrips", None).await;
    assert_eq!(roundtrips.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "GET", "/api/rides/history/777", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_status_patch_is_rejected() {
    let (_state, app) = app().await;
    let rider = create_account(&app, "rita").await;
    let (_, ride) = send(&app, "POST", "/api/rides", Some(ride_body(rider))).await;
    let ride_id = ride["id"].as_i64().unwrap();

    let uri = format!("/api/rides/set_status/{ride_id}");
    let (status, _) = send(&app, "PATCH", &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "PATCH",
        "/api/rides/set_status/9999",
        Some(json!({ "ride_status": "Cancelled" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn receipt_lifecycle() {
    let (_state, app) = app().await;
    let rider = create_account(&app, "rita").await;
    let (_, ride) = send(&app, "POST", "/api/rides", Some(ride_body(rider))).await;
    let ride_id = ride["id"].as_i64().unwrap();

    let receipt = json!({ "ride_id": ride_id, "account_id": rider, "total": 42.5 });
    let (status, created) = send(&app, "POST", "/api/receipts", Some(receipt.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["total"], 42.5);
    assert_eq!(created["ride_id"], ride_id);
    assert_eq!(created["refunded"], false);
    let receipt_id = created["receipt_id"].as_i64().unwrap();

    let (status, body) = send(&app, "POST", "/api/receipts", Some(receipt)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "duplicate_receipt");

    let (status, fetched) = send(&app, "GET", &format!("/api/receipts/{receipt_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["ride"]["id"], ride_id);
    assert_eq!(fetched["account"]["username"], "rita");

    let (_, by_ride) = send(&app, "GET", &format!("/api/receipts/ride/{ride_id}"), None).await;
    assert_eq!(by_ride["ride"]["driver"], Value::Null);

    let refund_uri = format!("/api/receipts/refund/{ride_id}");
    let (_, refunded) = send(&app, "PUT", &refund_uri, None).await;
    assert_eq!(refunded["total"], -42.5);
    let (_, refunded) = send(&app, "PUT", &refund_uri, None).await;
    assert_eq!(refunded["total"], -42.5);
    assert_eq!(refunded["refunded"], true);

    let (_, history) = send(&app, "GET", &format!("/api/receipts/history/{rider}"), None).await;
    assert_eq!(history.as_array().unwrap().len(), 1);

    let by_ride_uri = format!("/api/receipts/ride/{ride_id}");
    let (status, deleted) = send(&app, "DELETE", &by_ride_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["message"], "Deleted");

    let (status, _) = send(&app, "GET", &by_ride_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", &by_ride_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "PUT", &refund_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn accounts_hide_password_and_accept_patches() {
    let (_state, app) = app().await;
    create_account(&app, "rita").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/accounts",
        Some(json!({
            "username": "rita",
            "password": "again",
            "first_name": "R",
            "last_name": "R",
            "email": "rita@example.com",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, account) = send(&app, "GET", "/api/accounts/rita", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(account.get("hashed_password").is_none());
    assert_eq!(account["current_ride"], false);

    let (status, patched) = send(
        &app,
        "PATCH",
        "/api/accounts/rita",
        Some(json!({ "current_ride": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["current_ride"], true);
    assert_eq!(patched["email"], "rita@example.com");

    let (status, _) = send(&app, "GET", "/api/accounts/nobody", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_input_gets_the_error_envelope() {
    let (_state, app) = app().await;
    let rider = create_account(&app, "rita").await;
    let (_, ride) = send(&app, "POST", "/api/rides", Some(ride_body(rider))).await;
    let ride_id = ride["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/rides/set_status/{ride_id}"),
        Some(json!({ "ride_status": "teleported" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");

    let (status, body) =
        send_raw(&app, "POST", "/api/receipts", Some("{not json".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");

    let (status, body) = send(&app, "GET", "/api/rides/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");

    let (status, body) = send(&app, "GET", "/api/receipts?limit=lots", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn reactivating_a_ride_respects_the_active_ride_limit() {
    let (_state, app) = app().await;
    let rider = create_account(&app, "rita").await;

    let (_, first) = send(&app, "POST", "/api/rides", Some(ride_body(rider))).await;
    let first_uri = format!("/api/rides/set_status/{}", first["id"]);
    let (status, _) = send(
        &app,
        "PATCH",
        &first_uri,
        Some(json!({ "ride_status": "Cancelled" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "POST", "/api/rides", Some(ride_body(rider))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "PATCH",
        &first_uri,
        Some(json!({ "ride_status": "Requested" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "duplicate_ride");

    let (_, history) = send(&app, "GET", &format!("/api/rides/history/{rider}"), None).await;
    let active = history
        .as_array()
        .unwrap()
        .iter()
        .filter(|ride| ride["ride_status"] == "Requested" || ride["ride_status"] == "In Progress")
        .count();
    assert_eq!(active, 1);
}

#[tokio::test]
async fn listings_honour_limit_and_offset() {
    let (_state, app) = app().await;
    let mut receipt_ids = Vec::new();
    for (username, total) in [("ann", 10.0), ("ben", 20.0), ("cat", 30.0)] {
        let rider = create_account(&app, username).await;
        let (_, ride) = send(&app, "POST", "/api/rides", Some(ride_body(rider))).await;
        let (status, receipt) = send(
            &app,
            "POST",
            "/api/receipts",
            Some(json!({ "ride_id": ride["id"], "account_id": rider, "total": total })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        receipt_ids.push(receipt["receipt_id"].as_i64().unwrap());
    }

    let (status, page) = send(&app, "GET", "/api/receipts?limit=1&offset=1", None).await;
    assert_eq!(status, StatusCode::OK);
    let page = page.as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["receipt_id"], receipt_ids[1]);
    assert_eq!(page[0]["total"], 20.0);

    let (_, tail) = send(&app, "GET", "/api/receipts?offset=1", None).await;
    let tail: Vec<i64> = tail
        .as_array()
        .unwrap()
        .iter()
        .map(|receipt| receipt["receipt_id"].as_i64().unwrap())
        .collect();
    assert_eq!(tail, receipt_ids[1..].to_vec());

    let (_, rides) = send(&app, "GET", "/api/rides?limit=2", None).await;
    assert_eq!(rides.as_array().unwrap().len(), 2);
}
