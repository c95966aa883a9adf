/*
 * SPDX-FileCopyrightText: 2025 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::endpoints::users::UserSummary;
use crate::error::{WebError, WebResult};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::{NaiveDateTime, Utc};
use entity::application::ApplicationStatus;
use entity::task::TaskStatus;
use gigsly_core::consts::MAX_TITLE_LENGTH;
use gigsly_core::database::{get_application_counts, get_users_by_ids};
use gigsly_core::feed::{FeedEntry, FeedFilter, SortMode, build_feed};
use gigsly_core::input::*;
use gigsly_core::types::*;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QuerySelect, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    pub location: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_budget: Option<i64>,
    pub max_budget: Option<i64>,
    pub status: Option<String>,
    pub posted_by: Option<Uuid>,
    pub sort: Option<String>,
}

impl TaskQuery {
    pub fn into_filter(self) -> Result<FeedFilter, WebError> {
        let status = match self.status.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => Some(TaskStatus::from_str(s).map_err(WebError::BadRequest)?),
            _ => None,
        };

        let sort = match self.sort.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => SortMode::from_str(s).map_err(WebError::BadRequest)?,
            _ => SortMode::default(),
        };

        Ok(FeedFilter {
            search: self.search,
            category: self.category,
            min_budget: self.min_budget,
            max_budget: self.max_budget,
            status,
            posted_by: self.posted_by,
            location: self.location,
            sort,
        })
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MakeTaskRequest {
    pub title: String,
    pub description: String,
    pub budget: i64,
    pub category: String,
    pub location: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub budget: i64,
    pub category: String,
    pub location: String,
    pub posted_by: Uuid,
    pub accepted_by: Option<Uuid>,
    pub status: TaskStatus,
    pub posted_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
    pub applications: u64,
    pub posted_by_user: Option<UserSummary>,
}

impl TaskResponse {
    pub fn new(task: MTask, applications: u64, poster: Option<&MUser>) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            budget: task.budget,
            category: task.category,
            location: task.location,
            posted_by: task.posted_by,
            accepted_by: task.accepted_by,
            status: task.status,
            posted_at: task.posted_at,
            completed_at: task.completed_at,
            applications,
            posted_by_user: poster.map(UserSummary::from),
        }
    }
}

async fn load_task(state: &ServerState, task_id: Uuid) -> WebResult<TaskResponse> {
    let task = ETask::find_by_id(task_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Task"))?;

    let counts = get_application_counts(&state.db, vec![task.id]).await?;
    let poster = EUser::find_by_id(task.posted_by).one(&state.db).await?;
    let applications = counts.get(&task.id).copied().unwrap_or(0);

    Ok(TaskResponse::new(task, applications, poster.as_ref()))
}

pub async fn get_tasks(
    state: State<Arc<ServerState>>,
    query: Result<Query<TaskQuery>, QueryRejection>,
) -> WebResult<Json<Vec<TaskResponse>>> {
    let Query(query) = query?;
    let filter = query.into_filter()?;

    let tasks = ETask::find().all(&state.db).await?;
    let task_ids = tasks.iter().map(|t| t.id).collect();
    let counts = get_application_counts(&state.db, task_ids).await?;

    let entries = tasks
        .into_iter()
        .map(|task| FeedEntry {
            applications: counts.get(&task.id).copied().unwrap_or(0),
            task,
        })
        .collect();

    let feed = build_feed(entries, &filter);

    let mut poster_ids: Vec<Uuid> = feed.iter().map(|e| e.task.posted_by).collect();
    poster_ids.sort();
    poster_ids.dedup();
    let posters: HashMap<Uuid, MUser> = get_users_by_ids(&state.db, poster_ids).await?;

    Ok(Json(
        feed.into_iter()
            .map(|e| {
                let poster = posters.get(&e.task.posted_by);
                TaskResponse::new(e.task, e.applications, poster)
            })
            .collect(),
    ))
}

pub async fn post_task(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    payload: Result<Json<MakeTaskRequest>, JsonRejection>,
) -> WebResult<(StatusCode, Json<TaskResponse>)> {
    let Json(body) = payload?;

    let title = require_text("Title", &body.title, Some(MAX_TITLE_LENGTH))?;
    let description = require_text("Description", &body.description, None)?;
    let location = require_text("Location", &body.location, None)?;
    validate_budget(body.budget)?;
    validate_category(&body.category)?;

    let task = ATask {
        id: Set(Uuid::new_v4()),
        title: Set(title),
        description: Set(description),
        budget: Set(body.budget),
        category: Set(body.category),
        location: Set(location),
        posted_by: Set(user.id),
        accepted_by: Set(None),
        status: Set(TaskStatus::Open),
        posted_at: Set(Utc::now().naive_utc()),
        completed_at: Set(None),
    };

    let task = task.insert(&state.db).await?;
    tracing::info!("User {} posted task {}", user.id, task.id);

    Ok((StatusCode::CREATED, Json(TaskResponse::new(task, 0, Some(&user)))))
}

pub async fn get_task(
    state: State<Arc<ServerState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> WebResult<Json<TaskResponse>> {
    let Path(task_id) = path?;

    Ok(Json(load_task(&state, task_id).await?))
}

/// Marks an in-progress task as done and pays the accepted bid to the worker.
pub async fn post_task_complete(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> WebResult<Json<TaskResponse>> {
    let Path(task_id) = path?;

    let txn = state.db.begin().await?;

    let task = ETask::find_by_id(task_id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(|| WebError::not_found("Task"))?;

    if task.posted_by != user.id {
        return Err(WebError::not_allowed("complete this task"));
    }

    if !task.status.can_transition_to(TaskStatus::Completed) {
        return Err(WebError::BadRequest(
            "Only in-progress tasks can be completed".to_string(),
        ));
    }

    let worker_id = task
        .accepted_by
        .ok_or_else(|| WebError::BadRequest("Task has no accepted worker".to_string()))?;

    let payment = EApplication::find()
        .filter(CApplication::Task.eq(task.id))
        .filter(CApplication::User.eq(worker_id))
        .filter(CApplication::Status.eq(ApplicationStatus::Accepted))
        .one(&txn)
        .await?
        .map(|a| a.bid)
        .unwrap_or(task.budget);

    let worker = EUser::find_by_id(worker_id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(|| WebError::not_found("Worker"))?;

    let completed_tasks = worker.completed_tasks + 1;
    let total_earnings = worker.total_earnings + payment;

    let mut aworker: AUser = worker.into();
    aworker.completed_tasks = Set(completed_tasks);
    aworker.total_earnings = Set(total_earnings);
    aworker.update(&txn).await?;

    let mut atask: ATask = task.into();
    atask.status = Set(TaskStatus::Completed);
    atask.completed_at = Set(Some(Utc::now().naive_utc()));
    atask.update(&txn).await?;

    txn.commit().await?;
    tracing::info!(
        "Task {} completed, credited ₹{} to {}",
        task_id,
        payment,
        worker_id
    );

    Ok(Json(load_task(&state, task_id).await?))
}
