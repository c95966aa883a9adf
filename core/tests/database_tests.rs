/*
 * SPDX-FileCopyrightText: 2025 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Tests for database helpers against a mock connection

use chrono::NaiveDate;
use entity::*;
use gigsly_core::database::*;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
use uuid::Uuid;

fn user_model(id: Uuid, rating: f64) -> user::Model {
    let date = NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    user::Model {
        id,
        phone: "9876543210".to_owned(),
        name: "Asha Verma".to_owned(),
        email: None,
        password: "hash".to_owned(),
        rating,
        completed_tasks: 2,
        total_earnings: 900,
        last_login_at: date,
        joined_at: date,
    }
}

fn review_model(reviewee: Uuid, rating: i16) -> review::Model {
    review::Model {
        id: Uuid::new_v4(),
        task: Uuid::new_v4(),
        reviewer: Uuid::new_v4(),
        reviewee,
        rating,
        comment: "Great work".to_owned(),
        created_at: NaiveDate::from_ymd_opt(2025, 2, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
    }
}

#[tokio::test]
async fn test_refresh_user_rating() -> Result<(), DbErr> {
    let user_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            review_model(user_id, 5),
            review_model(user_id, 4),
            review_model(user_id, 4),
        ]])
        .append_query_results([
            vec![user_model(user_id, 0.0)],
            vec![user_model(user_id, 4.3)],
        ])
        .into_connection();

    let rating = refresh_user_rating(&db, user_id).await?;
    assert_eq!(rating, 4.3);

    Ok(())
}

#[tokio::test]
async fn test_refresh_user_rating_missing_user() {
    let user_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<review::Model>::new()])
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();

    let result = refresh_user_rating(&db, user_id).await;
    assert!(matches!(result, Err(DbErr::RecordNotFound(_))));
}

#[tokio::test]
async fn test_application_counts() -> Result<(), DbErr> {
    let task_a = Uuid::new_v4();
    let task_b = Uuid::new_v4();
    let date = NaiveDate::from_ymd_opt(2025, 2, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    let app = |task: Uuid| application::Model {
        id: Uuid::new_v4(),
        task,
        user: Uuid::new_v4(),
        bid: 100,
        message: "Available".to_owned(),
        status: application::ApplicationStatus::Pending,
        created_at: date,
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![app(task_a), app(task_a), app(task_b)]])
        .into_connection();

    let counts = get_application_counts(&db, vec![task_a, task_b]).await?;
    assert_eq!(counts.get(&task_a), Some(&2));
    assert_eq!(counts.get(&task_b), Some(&1));

    // No query is issued for an empty id list.
    let counts = get_application_counts(&db, Vec::new()).await?;
    assert!(counts.is_empty());

    Ok(())
}
