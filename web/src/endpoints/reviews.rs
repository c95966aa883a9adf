/*
 * SPDX-FileCopyrightText: 2025 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::endpoints::users::UserSummary;
use crate::error::{WebError, WebResult};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::{NaiveDateTime, Utc};
use entity::task::TaskStatus;
use gigsly_core::database::{get_users_by_ids, refresh_user_rating};
use gigsly_core::input::*;
use gigsly_core::ratings::reviewee_for;
use gigsly_core::types::*;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReviewQuery {
    pub task_id: Option<Uuid>,
    /// Reviews received by this user.
    pub user_id: Option<Uuid>,
    pub reviewer_id: Option<Uuid>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MakeReviewRequest {
    pub task_id: Uuid,
    pub rating: i16,
    pub comment: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: Uuid,
    pub task_id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewee_id: Uuid,
    pub rating: i16,
    pub comment: String,
    pub created_at: NaiveDateTime,
    pub reviewer: Option<UserSummary>,
}

impl ReviewResponse {
    pub fn new(review: MReview, reviewer: Option<&MUser>) -> Self {
        Self {
            id: review.id,
            task_id: review.task,
            reviewer_id: review.reviewer,
            reviewee_id: review.reviewee,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
            reviewer: reviewer.map(UserSummary::from),
        }
    }
}

pub async fn get_reviews(
    state: State<Arc<ServerState>>,
    query: Result<Query<ReviewQuery>, QueryRejection>,
) -> WebResult<Json<Vec<ReviewResponse>>> {
    let Query(query) = query?;

    let mut select = EReview::find();

    if let Some(task_id) = query.task_id {
        select = select.filter(CReview::Task.eq(task_id));
    }

    if let Some(user_id) = query.user_id {
        select = select.filter(CReview::Reviewee.eq(user_id));
    }

    if let Some(reviewer_id) = query.reviewer_id {
        select = select.filter(CReview::Reviewer.eq(reviewer_id));
    }

    let reviews = select
        .order_by_desc(CReview::CreatedAt)
        .all(&state.db)
        .await?;

    let reviewer_ids = reviews.iter().map(|r| r.reviewer).collect();
    let reviewers = get_users_by_ids(&state.db, reviewer_ids).await?;

    Ok(Json(
        reviews
            .into_iter()
            .map(|r| {
                let reviewer = reviewers.get(&r.reviewer);
                ReviewResponse::new(r, reviewer)
            })
            .collect(),
    ))
}

pub async fn post_review(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    payload: Result<Json<MakeReviewRequest>, JsonRejection>,
) -> WebResult<(StatusCode, Json<ReviewResponse>)> {
    let Json(body) = payload?;

    validate_rating(body.rating)?;
    let comment = require_text("Comment", &body.comment, None)?;

    let txn = state.db.begin().await?;

    let task = ETask::find_by_id(body.task_id)
        .one(&txn)
        .await?
        .ok_or_else(|| WebError::not_found("Task"))?;

    if task.status != TaskStatus::Completed {
        return Err(WebError::BadRequest(
            "Only completed tasks can be reviewed".to_string(),
        ));
    }

    let reviewee = reviewee_for(&task, user.id)
        .ok_or_else(|| WebError::not_allowed("review this task"))?;

    let existing = EReview::find()
        .filter(CReview::Task.eq(task.id))
        .filter(CReview::Reviewer.eq(user.id))
        .one(&txn)
        .await?;

    if existing.is_some() {
        return Err(WebError::already_exists("Review for this task"));
    }

    let review = AReview {
        id: Set(Uuid::new_v4()),
        task: Set(task.id),
        reviewer: Set(user.id),
        reviewee: Set(reviewee),
        rating: Set(body.rating),
        comment: Set(comment),
        created_at: Set(Utc::now().naive_utc()),
    };

    let review = review
        .insert(&txn)
        .await
        .map_err(|e| WebError::conflict_on_unique(e, "Review for this task"))?;
    let rating = refresh_user_rating(&txn, reviewee).await?;

    txn.commit().await?;
    tracing::info!("User {} rating is now {}", reviewee, rating);

    Ok((
        StatusCode::CREATED,
        Json(ReviewResponse::new(review, Some(&user))),
    ))
}
