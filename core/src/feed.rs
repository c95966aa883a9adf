/*
 * SPDX-FileCopyrightText: 2025 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Task feed filtering and ordering.
//!
//! The database hands back every task once; filtering, sorting and the
//! location preference are applied here so the rules stay in one place and
//! can be tested without a database.

use entity::task::TaskStatus;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::str::FromStr;
use uuid::Uuid;

use super::types::MTask;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    #[default]
    Newest,
    Oldest,
    BudgetHigh,
    BudgetLow,
    Applications,
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortMode::Newest),
            "oldest" => Ok(SortMode::Oldest),
            "budget-high" => Ok(SortMode::BudgetHigh),
            "budget-low" => Ok(SortMode::BudgetLow),
            "applications" => Ok(SortMode::Applications),
            _ => Err(format!("Unknown sort order: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub task: MTask,
    pub applications: u64,
}

#[derive(Debug, Clone, Default)]
pub struct FeedFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_budget: Option<i64>,
    pub max_budget: Option<i64>,
    pub status: Option<TaskStatus>,
    pub posted_by: Option<Uuid>,
    pub location: Option<String>,
    pub sort: SortMode,
}

impl FeedFilter {
    pub fn matches(&self, task: &MTask) -> bool {
        if let Some(search) = non_empty(&self.search) {
            let needle = search.to_lowercase();
            let hit = task.title.to_lowercase().contains(&needle)
                || task.description.to_lowercase().contains(&needle)
                || task.category.to_lowercase().contains(&needle);

            if !hit {
                return false;
            }
        }

        if let Some(category) = non_empty(&self.category) {
            if category != "All" && task.category != category {
                return false;
            }
        }

        if self.min_budget.is_some_and(|min| task.budget < min) {
            return false;
        }

        if self.max_budget.is_some_and(|max| task.budget > max) {
            return false;
        }

        if self.status.is_some_and(|status| task.status != status) {
            return false;
        }

        if self.posted_by.is_some_and(|user| task.posted_by != user) {
            return false;
        }

        true
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn sort_entries(entries: &mut [FeedEntry], mode: SortMode) {
    match mode {
        SortMode::Newest => entries.sort_by_key(|e| Reverse(e.task.posted_at)),
        SortMode::Oldest => entries.sort_by_key(|e| e.task.posted_at),
        SortMode::BudgetHigh => entries.sort_by_key(|e| Reverse(e.task.budget)),
        SortMode::BudgetLow => entries.sort_by_key(|e| e.task.budget),
        SortMode::Applications => entries.sort_by_key(|e| Reverse(e.applications)),
    }
}

/// Moves tasks whose location equals `location` (ignoring case) to the front.
/// Both groups keep their relative order.
pub fn prefer_location(entries: Vec<FeedEntry>, location: &str) -> Vec<FeedEntry> {
    let location = location.trim().to_lowercase();

    let (mut local, rest): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .partition(|e| e.task.location.trim().to_lowercase() == location);

    local.extend(rest);
    local
}

pub fn build_feed(entries: Vec<FeedEntry>, filter: &FeedFilter) -> Vec<FeedEntry> {
    let mut entries: Vec<FeedEntry> = entries
        .into_iter()
        .filter(|e| filter.matches(&e.task))
        .collect();

    sort_entries(&mut entries, filter.sort);

    match non_empty(&filter.location) {
        Some(location) => prefer_location(entries, location),
        None => entries,
    }
}
