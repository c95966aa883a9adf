/*
 * SPDX-FileCopyrightText: 2025 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod consts;
pub mod database;
pub mod feed;
pub mod input;
pub mod otp;
pub mod payout;
pub mod ratings;
pub mod types;

use anyhow::{Context, Result};
use consts::OTP_SWEEP_INTERVAL_SECS;
use database::connect_db;
use input::load_secret;
use otp::OtpStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tracing_subscriber::EnvFilter;
use types::*;

pub fn init_logging(cli: &Cli) {
    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

pub async fn init_state(cli: Cli) -> Result<Arc<ServerState>> {
    tracing::info!("Starting Gigsly Server on {}:{}", cli.ip, cli.port);

    let jwt_secret = load_secret(&cli.jwt_secret_file)
        .map(JwtSecret::new)
        .context("Failed to load JWT secret")?;

    let db = connect_db(&cli).await?;
    let otp = OtpStore::new(cli.otp_ttl);

    Ok(Arc::new(ServerState {
        db,
        cli,
        otp,
        jwt_secret,
    }))
}

pub async fn otp_sweep_loop(state: Arc<ServerState>) {
    let mut interval = time::interval(Duration::from_secs(OTP_SWEEP_INTERVAL_SECS));

    loop {
        interval.tick().await;

        let removed = state.otp.purge_expired();
        if removed > 0 {
            tracing::debug!(
                "Removed {} expired OTP records, {} still pending",
                removed,
                state.otp.pending()
            );
        }
    }
}
