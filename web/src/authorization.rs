/*
 * SPDX-FileCopyrightText: 2025 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use chrono::{Duration, Utc};
use gigsly_core::consts::TOKEN_LIFETIME_HOURS;
use gigsly_core::types::*;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::WebError;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub exp: usize,
    pub iat: usize,
    pub id: Uuid,
}

/// Resolves the bearer token to a user and stores it as a request extension.
pub async fn authorize(
    state: State<Arc<ServerState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, WebError> {
    let auth_header = match req.headers().get(axum::http::header::AUTHORIZATION) {
        Some(header) => header
            .to_str()
            .map_err(|_| WebError::Forbidden("Authorization header empty".to_string()))?,
        None => {
            return Err(WebError::Forbidden(
                "Authorization header not found".to_string(),
            ));
        }
    };

    let mut header = auth_header.split_whitespace();

    let token = match (header.next(), header.next()) {
        (Some("Bearer"), Some(token)) => token.to_string(),
        _ => {
            return Err(WebError::Forbidden(
                "Invalid Authorization header".to_string(),
            ));
        }
    };

    let token_data = decode_jwt(&state, &token)
        .map_err(|_| WebError::Unauthorized("Unable to decode token".to_string()))?;

    let current_user = EUser::find_by_id(token_data.claims.id)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::Unauthorized("User not found".to_string()))?;

    req.extensions_mut().insert(current_user);
    Ok(next.run(req).await)
}

pub fn encode_jwt(state: &ServerState, id: Uuid) -> Result<String> {
    let now = Utc::now();
    let exp = (now + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp() as usize;
    let iat = now.timestamp() as usize;

    let claims = Claims { iat, exp, id };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.jwt_secret.as_bytes()),
    )
    .context("Failed to encode token")
}

pub fn decode_jwt(state: &ServerState, jwt: &str) -> Result<TokenData<Claims>> {
    decode(
        jwt,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode token")
}

pub async fn update_last_login(state: &ServerState, user: MUser) -> Result<MUser> {
    let mut auser: AUser = user.into();

    auser.last_login_at = Set(Utc::now().naive_utc());
    auser
        .update(&state.db)
        .await
        .context("Failed to update user last login")
}
