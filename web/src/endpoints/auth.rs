/*
 * SPDX-FileCopyrightText: 2025 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::authorization::{encode_jwt, update_last_login};
use crate::error::{WebError, WebResult};
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::Json;
use gigsly_core::database::get_user_by_phone;
use gigsly_core::input::{require_text, validate_otp_format, validate_phone};
use gigsly_core::types::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize, Deserialize, Debug)]
pub struct SendOtpRequest {
    pub phone: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct VerifyOtpRequest {
    pub phone: Option<String>,
    pub otp: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct OtpResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

pub async fn post_send_otp(
    state: State<Arc<ServerState>>,
    payload: Result<Json<SendOtpRequest>, JsonRejection>,
) -> WebResult<Json<OtpResponse>> {
    let Json(body) = payload?;

    let phone = require_text("Phone number", body.phone.as_deref().unwrap_or_default(), None)?;
    validate_phone(&phone)?;

    let code = state.otp.issue(&phone);

    let message = if state.cli.otp_demo_mode {
        tracing::info!(
            "Demo OTP for {}: {} (valid for {}s)",
            phone,
            code,
            state.otp.ttl().num_seconds()
        );
        "OTP generated and logged to console (demo mode)".to_string()
    } else {
        tracing::debug!("Issued OTP for {}", phone);
        "OTP sent".to_string()
    };

    Ok(Json(OtpResponse {
        success: true,
        message,
        token: None,
    }))
}

pub async fn post_verify_otp(
    state: State<Arc<ServerState>>,
    payload: Result<Json<VerifyOtpRequest>, JsonRejection>,
) -> WebResult<Json<OtpResponse>> {
    let Json(body) = payload?;

    let (phone, otp) = match (body.phone.as_deref(), body.otp.as_deref()) {
        (Some(phone), Some(otp)) if !phone.trim().is_empty() && !otp.trim().is_empty() => {
            (phone.trim().to_string(), otp.trim().to_string())
        }
        _ => {
            return Err(WebError::BadRequest(
                "Phone and OTP are required".to_string(),
            ));
        }
    };

    validate_otp_format(&otp)?;
    state.otp.verify(&phone, &otp)?;

    let token = match get_user_by_phone(&state.db, &phone).await? {
        Some(user) => {
            let user = update_last_login(&state, user).await?;
            Some(encode_jwt(&state, user.id).map_err(|_| WebError::failed_to_generate_token())?)
        }
        None => None,
    };

    Ok(Json(OtpResponse {
        success: true,
        message: "OTP verified".to_string(),
        token,
    }))
}
