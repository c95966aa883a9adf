/*
 * SPDX-FileCopyrightText: 2025 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

#![allow(dead_code)]

use chrono::NaiveDate;
use entity::*;
use gigsly_core::otp::OtpStore;
use gigsly_core::types::*;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, Statement};
use std::sync::Arc;
use http::header::{AUTHORIZATION, HeaderName, HeaderValue};
use uuid::Uuid;

pub fn create_mock_cli() -> Cli {
    Cli {
        log_level: "info".to_string(),
        ip: "127.0.0.1".to_string(),
        port: 3000,
        serve_url: "http://127.0.0.1:8000".to_string(),
        database_url: Some("mock://test".to_string()),
        database_url_file: None,
        jwt_secret_file: "/run/secrets/gigsly-jwt".to_string(),
        otp_ttl: 300,
        otp_demo_mode: true,
        report_errors: false,
        sentry_dsn: None,
    }
}

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

pub fn create_state_with_db(db: DatabaseConnection) -> Arc<ServerState> {
    let cli = create_mock_cli();
    let otp = OtpStore::new(cli.otp_ttl);

    Arc::new(ServerState {
        db,
        cli,
        otp,
        jwt_secret: JwtSecret::new(TEST_JWT_SECRET),
    })
}

/// Flattens the mock transaction log. Every other handle on the state must be dropped first.
pub fn executed_statements(state: Arc<ServerState>) -> Vec<Statement> {
    let state = Arc::try_unwrap(state).expect("state is still shared");

    state
        .db
        .into_transaction_log()
        .iter()
        .flat_map(|txn| txn.statements().to_vec())
        .collect()
}

/// Statements whose SQL starts with `prefix`, rendered with their bound values.
pub fn statements_starting_with(statements: &[Statement], prefix: &str) -> Vec<String> {
    statements
        .iter()
        .filter(|stmt| stmt.sql.starts_with(prefix))
        .map(|stmt| format!("{} {:?}", stmt.sql, stmt.values))
        .collect()
}

pub fn create_mock_state() -> Arc<ServerState> {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();

    create_state_with_db(db)
}

pub fn mock_user(phone: &str) -> user::Model {
    mock_user_with_hash(phone, "not-a-password-hash".to_string())
}

pub fn mock_user_with_password(phone: &str, password: &str) -> user::Model {
    mock_user_with_hash(phone, password_auth::generate_hash(password))
}

fn mock_user_with_hash(phone: &str, password: String) -> user::Model {
    let date = NaiveDate::from_ymd_opt(2025, 3, 1)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();

    user::Model {
        id: Uuid::new_v4(),
        phone: phone.to_string(),
        name: "Asha Verma".to_string(),
        email: Some("asha@example.com".to_string()),
        password,
        rating: 4.5,
        completed_tasks: 3,
        total_earnings: 1200,
        last_login_at: date,
        joined_at: date,
    }
}

pub fn mock_task(title: &str, posted_by: Uuid, status: task::TaskStatus) -> task::Model {
    task::Model {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: format!("{} this weekend", title),
        budget: 500,
        category: "Home Repair".to_string(),
        location: "Sonipat".to_string(),
        posted_by,
        accepted_by: None,
        status,
        posted_at: NaiveDate::from_ymd_opt(2025, 3, 2)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap(),
        completed_at: None,
    }
}

pub fn bearer(state: &ServerState, user_id: Uuid) -> (HeaderName, HeaderValue) {
    let token = web::authorization::encode_jwt(state, user_id).unwrap();
    (
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    )
}
