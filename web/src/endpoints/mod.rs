/*
 * SPDX-FileCopyrightText: 2025 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod applications;
pub mod auth;
pub mod reviews;
pub mod tasks;
pub mod users;
pub mod withdrawals;

use crate::error::{WebError, WebResult};
use axum::extract::Json;
use gigsly_core::consts::TASK_CATEGORIES;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn handle_404() -> WebError {
    WebError::NotFound("Not Found".to_string())
}

pub async fn get_health() -> WebResult<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}

pub async fn get_categories() -> WebResult<Json<Vec<&'static str>>> {
    Ok(Json(TASK_CATEGORIES.to_vec()))
}
