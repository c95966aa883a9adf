/*
 * SPDX-FileCopyrightText: 2025 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

mod common;

use axum_test::TestServer;
use entity::user;
use gigsly_core::otp::OtpStore;
use gigsly_core::types::{JwtSecret, ServerState};
use http::StatusCode;
use sea_orm::{DatabaseBackend, MockDatabase};
use serde_json::json;
use std::sync::Arc;
use web::authorization::decode_jwt;
use web::endpoints::auth::OtpResponse;
use web::error::ErrorResponse;

#[tokio::test]
async fn test_send_otp_requires_phone() {
    let state = common::create_mock_state();
    let server = TestServer::new(web::create_router(Arc::clone(&state))).unwrap();

    let response = server.post("/api/send-otp").json(&json!({})).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<ErrorResponse>().error,
        "Phone number is required"
    );
    assert_eq!(state.otp.pending(), 0);
}

#[tokio::test]
async fn test_send_otp_rejects_invalid_phone() {
    let state = common::create_mock_state();
    let server = TestServer::new(web::create_router(Arc::clone(&state))).unwrap();

    let response = server
        .post("/api/send-otp")
        .json(&json!({ "phone": "98765" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<ErrorResponse>().error,
        "Enter a valid 10-digit phone number"
    );
}

#[tokio::test]
async fn test_send_otp_issues_code() {
    let state = common::create_mock_state();
    let server = TestServer::new(web::create_router(Arc::clone(&state))).unwrap();

    let response = server
        .post("/api/send-otp")
        .json(&json!({ "phone": "9876543210" }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: OtpResponse = response.json();
    assert!(body.success);
    assert!(body.token.is_none());
    assert_eq!(state.otp.pending(), 1);
}

#[tokio::test]
async fn test_verify_otp_requires_both_fields() {
    let state = common::create_mock_state();
    let server = TestServer::new(web::create_router(state)).unwrap();

    let response = server
        .post("/api/verify-otp")
        .json(&json!({ "phone": "9876543210" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<ErrorResponse>().error,
        "Phone and OTP are required"
    );
}

#[tokio::test]
async fn test_verify_otp_without_request() {
    let state = common::create_mock_state();
    let server = TestServer::new(web::create_router(state)).unwrap();

    let response = server
        .post("/api/verify-otp")
        .json(&json!({ "phone": "9876543210", "otp": "123456" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<ErrorResponse>().error,
        "No OTP sent to this number"
    );
}

#[tokio::test]
async fn test_verify_otp_wrong_code_keeps_record() {
    let state = common::create_mock_state();
    let server = TestServer::new(web::create_router(Arc::clone(&state))).unwrap();

    let code = state.otp.issue("9876543210");
    let wrong = if code == "111111" { "222222" } else { "111111" };

    let response = server
        .post("/api/verify-otp")
        .json(&json!({ "phone": "9876543210", "otp": wrong }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<ErrorResponse>().error, "Invalid OTP");
    assert_eq!(state.otp.pending(), 1);
}

#[tokio::test]
async fn test_verify_otp_for_new_phone() {
    // The only queued result is the empty user lookup.
    let state = common::create_mock_state();
    let server = TestServer::new(web::create_router(Arc::clone(&state))).unwrap();

    let code = state.otp.issue("9876543210");

    let response = server
        .post("/api/verify-otp")
        .json(&json!({ "phone": "9876543210", "otp": code }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: OtpResponse = response.json();
    assert!(body.success);
    assert_eq!(body.message, "OTP verified");
    assert!(body.token.is_none());
    assert_eq!(state.otp.pending(), 0);
}

#[tokio::test]
async fn test_verify_otp_logs_in_registered_user() {
    let user = common::mock_user("9876543210");

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user.clone()], vec![user.clone()]])
        .into_connection();
    let state = common::create_state_with_db(db);
    let server = TestServer::new(web::create_router(Arc::clone(&state))).unwrap();

    let code = state.otp.issue(&user.phone);

    let response = server
        .post("/api/verify-otp")
        .json(&json!({ "phone": user.phone, "otp": code }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: OtpResponse = response.json();
    let token = body.token.expect("registered users receive a token");

    let claims = decode_jwt(&state, &token).unwrap().claims;
    assert_eq!(claims.id, user.id);
    assert!(claims.exp > claims.iat);
}

#[tokio::test]
async fn test_protected_route_without_header() {
    let state = common::create_mock_state();
    let server = TestServer::new(web::create_router(state)).unwrap();

    let response = server.get("/api/withdrawals").await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(
        response.json::<ErrorResponse>().error,
        "Authorization header not found"
    );
}

#[tokio::test]
async fn test_protected_route_with_malformed_header() {
    let state = common::create_mock_state();
    let server = TestServer::new(web::create_router(state)).unwrap();

    let response = server
        .get("/api/withdrawals")
        .add_header(
            http::header::AUTHORIZATION,
            http::HeaderValue::from_static("Token abc"),
        )
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_protected_route_with_bad_token() {
    let state = common::create_mock_state();
    let server = TestServer::new(web::create_router(state)).unwrap();

    let response = server
        .get("/api/withdrawals")
        .add_header(
            http::header::AUTHORIZATION,
            http::HeaderValue::from_static("Bearer not.a.token"),
        )
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<ErrorResponse>().error,
        "Unable to decode token"
    );
}

#[tokio::test]
async fn test_protected_route_with_deleted_user() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();
    let state = common::create_state_with_db(db);
    let server = TestServer::new(web::create_router(Arc::clone(&state))).unwrap();

    let (name, value) = common::bearer(&state, uuid::Uuid::new_v4());
    let response = server.get("/api/withdrawals").add_header(name, value).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<ErrorResponse>().error, "User not found");
}

#[tokio::test]
async fn test_protected_route_rejects_token_signed_with_empty_key() {
    let state = common::create_mock_state();
    let server = TestServer::new(web::create_router(state)).unwrap();

    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let forger = ServerState {
        db,
        cli: common::create_mock_cli(),
        otp: OtpStore::new(300),
        jwt_secret: JwtSecret::new(""),
    };
    let (name, value) = common::bearer(&forger, uuid::Uuid::new_v4());

    let response = server.get("/api/withdrawals").add_header(name, value).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<ErrorResponse>().error,
        "Unable to decode token"
    );
}
