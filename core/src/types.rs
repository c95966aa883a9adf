/*
 * SPDX-FileCopyrightText: 2025 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::input::{greater_than_zero, port_in_range};
use super::otp::OtpStore;
use clap::Parser;
use entity::*;
use sea_orm::DatabaseConnection;
use std::fmt;

#[derive(Parser, Debug, Clone)]
#[command(name = "Gigsly", display_name = "Gigsly", bin_name = "gigsly-server", author = "Wavelens", version, about, long_about = None)]
pub struct Cli {
    #[arg(long, env = "GIGSLY_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
    #[arg(long, env = "GIGSLY_IP", default_value = "127.0.0.1")]
    pub ip: String,
    #[arg(long, env = "GIGSLY_PORT", value_parser = port_in_range, default_value_t = 3000)]
    pub port: u16,
    #[arg(
        long,
        env = "GIGSLY_SERVE_URL",
        default_value = "http://127.0.0.1:8000"
    )]
    pub serve_url: String,
    #[arg(long, env = "GIGSLY_DATABASE_URL")]
    pub database_url: Option<String>,
    #[arg(long, env = "GIGSLY_DATABASE_URL_FILE")]
    pub database_url_file: Option<String>,
    #[arg(long, env = "GIGSLY_JWT_SECRET_FILE")]
    pub jwt_secret_file: String,
    #[arg(long, env = "GIGSLY_OTP_TTL", value_parser = greater_than_zero::<i64>, default_value = "300")]
    pub otp_ttl: i64,
    #[arg(long, env = "GIGSLY_OTP_DEMO_MODE", default_value = "true")]
    pub otp_demo_mode: bool,
    #[arg(long, env = "GIGSLY_REPORT_ERRORS", default_value = "false")]
    pub report_errors: bool,
    #[arg(long, env = "GIGSLY_SENTRY_DSN")]
    pub sentry_dsn: Option<String>,
}

#[derive(Debug)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub cli: Cli,
    pub otp: OtpStore,
    pub jwt_secret: JwtSecret,
}

/// HMAC key for session tokens. Never empty once loaded.
#[derive(Clone)]
pub struct JwtSecret(String);

impl JwtSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JwtSecret(..)")
    }
}

pub type EApplication = application::Entity;
pub type EReview = review::Entity;
pub type ETask = task::Entity;
pub type EUser = user::Entity;
pub type EWithdrawal = withdrawal::Entity;

pub type MApplication = application::Model;
pub type MReview = review::Model;
pub type MTask = task::Model;
pub type MUser = user::Model;
pub type MWithdrawal = withdrawal::Model;

pub type AApplication = application::ActiveModel;
pub type AReview = review::ActiveModel;
pub type ATask = task::ActiveModel;
pub type AUser = user::ActiveModel;
pub type AWithdrawal = withdrawal::ActiveModel;

pub type CApplication = application::Column;
pub type CReview = review::Column;
pub type CTask = task::Column;
pub type CUser = user::Column;
pub type CWithdrawal = withdrawal::Column;
