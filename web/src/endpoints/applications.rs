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
use gigsly_core::database::get_users_by_ids;
use gigsly_core::input::*;
use gigsly_core::types::*;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationQuery {
    pub task_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MakeApplicationRequest {
    pub task_id: Uuid,
    pub bid: i64,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub bid: i64,
    pub message: String,
    pub status: ApplicationStatus,
    pub created_at: NaiveDateTime,
    pub user: Option<UserSummary>,
    pub task_title: Option<String>,
}

impl ApplicationResponse {
    pub fn new(application: MApplication, user: Option<&MUser>, task: Option<&MTask>) -> Self {
        Self {
            id: application.id,
            task_id: application.task,
            user_id: application.user,
            bid: application.bid,
            message: application.message,
            status: application.status,
            created_at: application.created_at,
            user: user.map(UserSummary::from),
            task_title: task.map(|t| t.title.clone()),
        }
    }
}

pub async fn get_applications(
    state: State<Arc<ServerState>>,
    query: Result<Query<ApplicationQuery>, QueryRejection>,
) -> WebResult<Json<Vec<ApplicationResponse>>> {
    let Query(query) = query?;

    let mut select = EApplication::find();

    if let Some(task_id) = query.task_id {
        select = select.filter(CApplication::Task.eq(task_id));
    }

    if let Some(user_id) = query.user_id {
        select = select.filter(CApplication::User.eq(user_id));
    }

    let applications = select
        .order_by_desc(CApplication::CreatedAt)
        .all(&state.db)
        .await?;

    if applications.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let user_ids = applications.iter().map(|a| a.user).collect();
    let users = get_users_by_ids(&state.db, user_ids).await?;

    let task_ids: Vec<Uuid> = applications.iter().map(|a| a.task).collect();
    let tasks: HashMap<Uuid, MTask> = ETask::find()
        .filter(CTask::Id.is_in(task_ids))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();

    Ok(Json(
        applications
            .into_iter()
            .map(|a| {
                let user = users.get(&a.user);
                let task = tasks.get(&a.task);
                ApplicationResponse::new(a, user, task)
            })
            .collect(),
    ))
}

pub async fn post_application(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    payload: Result<Json<MakeApplicationRequest>, JsonRejection>,
) -> WebResult<(StatusCode, Json<ApplicationResponse>)> {
    let Json(body) = payload?;

    validate_bid(body.bid)?;
    let message = require_text("Message", &body.message, None)?;

    let task = ETask::find_by_id(body.task_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Task"))?;

    if task.status != TaskStatus::Open {
        return Err(WebError::BadRequest(
            "Task is not open for applications".to_string(),
        ));
    }

    if task.posted_by == user.id {
        return Err(WebError::BadRequest(
            "You cannot apply to your own task".to_string(),
        ));
    }

    let existing = EApplication::find()
        .filter(CApplication::Task.eq(task.id))
        .filter(CApplication::User.eq(user.id))
        .all(&state.db)
        .await?;

    if existing.iter().any(|a| a.status.is_live()) {
        return Err(WebError::already_exists("Application for this task"));
    }

    let application = AApplication {
        id: Set(Uuid::new_v4()),
        task: Set(task.id),
        user: Set(user.id),
        bid: Set(body.bid),
        message: Set(message),
        status: Set(ApplicationStatus::Pending),
        created_at: Set(Utc::now().naive_utc()),
    };

    let application = application.insert(&state.db).await?;
    tracing::info!("User {} applied to task {}", user.id, task.id);

    Ok((
        StatusCode::CREATED,
        Json(ApplicationResponse::new(application, Some(&user), Some(&task))),
    ))
}

/// Accepts one application, rejects the other pending ones and starts the task.
pub async fn post_application_accept(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> WebResult<Json<ApplicationResponse>> {
    let Path(application_id) = path?;

    let txn = state.db.begin().await?;

    // Both rows stay locked until commit so two accepts cannot interleave.
    let application = EApplication::find_by_id(application_id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(|| WebError::not_found("Application"))?;

    let task = ETask::find_by_id(application.task)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(|| WebError::not_found("Task"))?;

    if task.posted_by != user.id {
        return Err(WebError::not_allowed("accept applications for this task"));
    }

    if !task.status.can_transition_to(TaskStatus::InProgress) {
        return Err(WebError::BadRequest(
            "Task is not open for applications".to_string(),
        ));
    }

    if application.status != ApplicationStatus::Pending {
        return Err(WebError::BadRequest(
            "Only pending applications can be accepted".to_string(),
        ));
    }

    let worker_id = application.user;

    let mut aapplication: AApplication = application.into();
    aapplication.status = Set(ApplicationStatus::Accepted);
    let application = aapplication.update(&txn).await?;

    EApplication::update_many()
        .col_expr(CApplication::Status, Expr::value(ApplicationStatus::Rejected))
        .filter(CApplication::Task.eq(task.id))
        .filter(CApplication::Status.eq(ApplicationStatus::Pending))
        .filter(CApplication::Id.ne(application.id))
        .exec(&txn)
        .await?;

    let mut atask: ATask = task.into();
    atask.status = Set(TaskStatus::InProgress);
    atask.accepted_by = Set(Some(worker_id));
    let task = atask.update(&txn).await?;

    txn.commit().await?;
    tracing::info!(
        "Application {} accepted, task {} is now {}",
        application.id,
        task.id,
        task.status.as_str()
    );

    let worker = EUser::find_by_id(worker_id).one(&state.db).await?;

    Ok(Json(ApplicationResponse::new(
        application,
        worker.as_ref(),
        Some(&task),
    )))
}

pub async fn post_application_withdraw(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> WebResult<Json<ApplicationResponse>> {
    let Path(application_id) = path?;

    let application = EApplication::find_by_id(application_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("Application"))?;

    if application.user != user.id {
        return Err(WebError::not_allowed("withdraw this application"));
    }

    if application.status != ApplicationStatus::Pending {
        return Err(WebError::BadRequest(
            "Only pending applications can be withdrawn".to_string(),
        ));
    }

    let mut aapplication: AApplication = application.into();
    aapplication.status = Set(ApplicationStatus::Withdrawn);
    let application = aapplication.update(&state.db).await?;

    Ok(Json(ApplicationResponse::new(application, Some(&user), None)))
}
