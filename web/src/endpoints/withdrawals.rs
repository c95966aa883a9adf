/*
 * SPDX-FileCopyrightText: 2025 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::{WebError, WebResult};
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::{NaiveDateTime, Utc};
use entity::withdrawal::PayoutMethod;
use gigsly_core::input::validate_otp_format;
use gigsly_core::payout::{payout_destination, plan_withdrawal};
use gigsly_core::types::*;
use password_auth::verify_password;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MakeWithdrawalRequest {
    pub password: String,
    pub otp: String,
    pub account_number: Option<String>,
    pub upi_id: Option<String>,
    pub amount: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalResponse {
    pub id: Uuid,
    pub amount: i64,
    pub method: PayoutMethod,
    pub destination: String,
    pub created_at: NaiveDateTime,
}

impl From<MWithdrawal> for WithdrawalResponse {
    fn from(withdrawal: MWithdrawal) -> Self {
        Self {
            id: withdrawal.id,
            amount: withdrawal.amount,
            method: withdrawal.method,
            destination: withdrawal.destination,
            created_at: withdrawal.created_at,
        }
    }
}

pub async fn get_withdrawals(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
) -> WebResult<Json<Vec<WithdrawalResponse>>> {
    let withdrawals = EWithdrawal::find()
        .filter(CWithdrawal::User.eq(user.id))
        .order_by_desc(CWithdrawal::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(
        withdrawals
            .into_iter()
            .map(WithdrawalResponse::from)
            .collect(),
    ))
}

/// Pays out earnings after re-checking the password and an OTP sent to the
/// account's phone. Every check runs before the OTP is consumed.
pub async fn post_withdrawal(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    payload: Result<Json<MakeWithdrawalRequest>, JsonRejection>,
) -> WebResult<(StatusCode, Json<WithdrawalResponse>)> {
    let Json(body) = payload?;

    if verify_password(&body.password, &user.password).is_err() {
        return Err(WebError::invalid_credentials());
    }

    let (method, destination) =
        payout_destination(body.account_number.as_deref(), body.upi_id.as_deref())
            .map_err(WebError::BadRequest)?;

    plan_withdrawal(user.total_earnings, body.amount).map_err(WebError::BadRequest)?;

    let otp = body.otp.trim();
    validate_otp_format(otp)?;
    state.otp.verify(&user.phone, otp)?;

    let txn = state.db.begin().await?;

    // Earnings may have changed since the middleware loaded the user.
    let current = EUser::find_by_id(user.id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(|| WebError::not_found("User"))?;

    let amount = plan_withdrawal(current.total_earnings, body.amount).map_err(WebError::BadRequest)?;
    let remaining = current.total_earnings - amount;

    let mut auser: AUser = current.into();
    auser.total_earnings = Set(remaining);
    auser.update(&txn).await?;

    let withdrawal = AWithdrawal {
        id: Set(Uuid::new_v4()),
        user: Set(user.id),
        amount: Set(amount),
        method: Set(method),
        destination: Set(destination),
        created_at: Set(Utc::now().naive_utc()),
    };

    let withdrawal = withdrawal.insert(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        "User {} withdrew ₹{} via {:?}",
        user.id,
        amount,
        withdrawal.method
    );

    Ok((StatusCode::CREATED, Json(withdrawal.into())))
}
