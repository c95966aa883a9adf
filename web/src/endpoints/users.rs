/*
 * SPDX-FileCopyrightText: 2025 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::{WebError, WebResult};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::{NaiveDateTime, Utc};
use gigsly_core::consts::NULL_TIME;
use gigsly_core::database::get_user_by_phone;
use gigsly_core::input::*;
use gigsly_core::ratings::{RatingSummary, summarize};
use gigsly_core::types::*;
use password_auth::generate_hash;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub phone: String,
    pub name: String,
    pub email: Option<String>,
    pub rating: f64,
    pub completed_tasks: i32,
    pub total_earnings: i64,
    pub joined_at: NaiveDateTime,
    pub last_login_at: NaiveDateTime,
}

impl From<MUser> for UserResponse {
    fn from(user: MUser) -> Self {
        Self {
            id: user.id,
            phone: user.phone,
            name: user.name,
            email: user.email,
            rating: user.rating,
            completed_tasks: user.completed_tasks,
            total_earnings: user.total_earnings,
            joined_at: user.joined_at,
            last_login_at: user.last_login_at,
        }
    }
}

/// Public view of a user embedded in tasks, applications and reviews.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub rating: f64,
    pub completed_tasks: i32,
}

impl From<&MUser> for UserSummary {
    fn from(user: &MUser) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            rating: user.rating,
            completed_tasks: user.completed_tasks,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MakeUserRequest {
    pub phone: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct PatchUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Empty or missing emails are stored as absent.
fn normalize_email(email: Option<&str>) -> Result<Option<String>, InputError> {
    match email.map(str::trim).filter(|e| !e.is_empty()) {
        Some(email) => {
            validate_email(email)?;
            Ok(Some(email.to_string()))
        }
        None => Ok(None),
    }
}

pub async fn get_users(state: State<Arc<ServerState>>) -> WebResult<Json<Vec<UserResponse>>> {
    let users = EUser::find()
        .order_by_desc(CUser::JoinedAt)
        .all(&state.db)
        .await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn post_user(
    state: State<Arc<ServerState>>,
    payload: Result<Json<MakeUserRequest>, JsonRejection>,
) -> WebResult<(StatusCode, Json<UserResponse>)> {
    let Json(body) = payload?;

    let phone = require_text("Phone number", body.phone.as_deref().unwrap_or_default(), None)?;
    validate_phone(&phone)?;
    let name = validate_name(body.name.as_deref().unwrap_or_default())?;
    let email = normalize_email(body.email.as_deref())?;
    let password = body.password.unwrap_or_default();

    if password.trim().is_empty() {
        return Err(InputError::Required("Password").into());
    }

    if get_user_by_phone(&state.db, &phone).await?.is_some() {
        return Err(WebError::already_exists("User with this phone number"));
    }

    let user = AUser {
        id: Set(Uuid::new_v4()),
        phone: Set(phone),
        name: Set(name),
        email: Set(email),
        password: Set(generate_hash(password)),
        rating: Set(0.0),
        completed_tasks: Set(0),
        total_earnings: Set(0),
        last_login_at: Set(*NULL_TIME),
        joined_at: Set(Utc::now().naive_utc()),
    };

    // A concurrent signup can pass the lookup above, the unique index catches it.
    let user = user
        .insert(&state.db)
        .await
        .map_err(|e| WebError::conflict_on_unique(e, "User with this phone number"))?;
    tracing::info!("Created user {}", user.id);

    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn get_user(
    state: State<Arc<ServerState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> WebResult<Json<UserResponse>> {
    let Path(user_id) = path?;

    let user = EUser::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::not_found("User"))?;

    Ok(Json(user.into()))
}

pub async fn get_user_rating(
    state: State<Arc<ServerState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> WebResult<Json<RatingSummary>> {
    let Path(user_id) = path?;

    if EUser::find_by_id(user_id).one(&state.db).await?.is_none() {
        return Err(WebError::not_found("User"));
    }

    let reviews = EReview::find()
        .filter(CReview::Reviewee.eq(user_id))
        .all(&state.db)
        .await?;

    Ok(Json(summarize(reviews.iter().map(|r| r.rating))))
}

pub async fn patch_user(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    payload: Result<Json<PatchUserRequest>, JsonRejection>,
) -> WebResult<Json<UserResponse>> {
    let Json(body) = payload?;
    let user_id = user.id;
    let mut auser: AUser = user.into();

    if let Some(name) = body.name.as_deref() {
        auser.name = Set(validate_name(name)?);
    }

    if body.email.is_some() {
        auser.email = Set(normalize_email(body.email.as_deref())?);
    }

    if let Some(phone) = body.phone.as_deref() {
        let phone = phone.trim().to_string();
        validate_phone(&phone)?;

        if let Some(existing) = get_user_by_phone(&state.db, &phone).await? {
            if existing.id != user_id {
                return Err(WebError::already_exists("User with this phone number"));
            }
        }

        auser.phone = Set(phone);
    }

    let user = auser
        .update(&state.db)
        .await
        .map_err(|e| WebError::conflict_on_unique(e, "User with this phone number"))?;

    Ok(Json(user.into()))
}
