/*
 * SPDX-FileCopyrightText: 2025 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use clap::Parser;
use gigsly_core::types::Cli;
use gigsly_core::{init_logging, init_state, otp_sweep_loop};
use std::sync::Arc;

#[tokio::main]
pub async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let _guard = match (&cli.sentry_dsn, cli.report_errors) {
        (Some(dsn), true) => Some(sentry::init(dsn.as_str())),
        (None, true) => {
            tracing::warn!("Error reporting enabled without a sentry dsn");
            None
        }
        _ => None,
    };

    let state = match init_state(cli).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize server: {:#}", e);
            std::process::exit(1);
        }
    };

    tokio::spawn(otp_sweep_loop(Arc::clone(&state)));
    web::serve_web(Arc::clone(&state)).await?;

    Ok(())
}
