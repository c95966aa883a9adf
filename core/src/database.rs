/*
 * SPDX-FileCopyrightText: 2025 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use anyhow::{Context, Result};
use migration::Migrator;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectOptions, ConnectionTrait, Database,
    DatabaseConnection, DbErr, EntityTrait, QueryFilter,
};
use sea_orm_migration::MigratorTrait;
use std::collections::HashMap;
use std::time::Duration;
use tracing::log::LevelFilter;
use uuid::Uuid;

use super::ratings::summarize;
use super::types::*;

pub async fn connect_db(cli: &Cli) -> Result<DatabaseConnection> {
    let db_url = if let Some(file) = &cli.database_url_file {
        std::fs::read_to_string(file)
            .context("Failed to read database url from file")?
            .trim()
            .to_string()
    } else if let Some(url) = &cli.database_url {
        url.clone()
    } else {
        anyhow::bail!("No database url provided")
    };

    let mut opt = ConnectOptions::new(db_url);

    // Only enable SQL logging at debug level
    if cli.log_level == "debug" {
        opt.sqlx_logging(true)
            .sqlx_logging_level(LevelFilter::Debug);
    } else {
        opt.sqlx_logging(false);
    }

    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(8));

    let db = Database::connect(opt)
        .await
        .context("Failed to connect to database")?;
    Migrator::up(&db, None)
        .await
        .context("Failed to run database migrations")?;
    Ok(db)
}

pub async fn get_user_by_phone<C: ConnectionTrait>(
    db: &C,
    phone: &str,
) -> Result<Option<MUser>, DbErr> {
    EUser::find().filter(CUser::Phone.eq(phone)).one(db).await
}

pub async fn get_users_by_ids<C: ConnectionTrait>(
    db: &C,
    ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, MUser>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    Ok(EUser::find()
        .filter(CUser::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect())
}

pub async fn get_application_counts<C: ConnectionTrait>(
    db: &C,
    task_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, u64>, DbErr> {
    if task_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let applications = EApplication::find()
        .filter(CApplication::Task.is_in(task_ids))
        .all(db)
        .await?;

    let mut counts = HashMap::new();
    for application in applications {
        *counts.entry(application.task).or_insert(0) += 1;
    }

    Ok(counts)
}

/// Recomputes the cached rating of `user_id` from every review they received.
pub async fn refresh_user_rating<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<f64, DbErr> {
    let reviews = EReview::find()
        .filter(CReview::Reviewee.eq(user_id))
        .all(db)
        .await?;

    let summary = summarize(reviews.iter().map(|r| r.rating));

    let user = EUser::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("user {}", user_id)))?;

    let mut auser: AUser = user.into();
    auser.rating = Set(summary.average);
    auser.update(db).await?;

    Ok(summary.average)
}
