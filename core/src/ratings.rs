/*
 * SPDX-FileCopyrightText: 2025 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::consts::RATING_RANGE;
use super::types::MTask;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub average: f64,
    pub count: usize,
    /// Number of reviews per star, index 0 holds one-star reviews.
    pub distribution: [usize; 5],
}

pub fn summarize<I>(ratings: I) -> RatingSummary
where
    I: IntoIterator<Item = i16>,
{
    let mut distribution = [0usize; 5];
    let mut total: i64 = 0;
    let mut count = 0usize;

    for rating in ratings {
        if !RATING_RANGE.contains(&rating) {
            continue;
        }

        distribution[(rating - 1) as usize] += 1;
        total += rating as i64;
        count += 1;
    }

    let average = if count == 0 {
        0.0
    } else {
        round_rating(total as f64 / count as f64)
    };

    RatingSummary {
        average,
        count,
        distribution,
    }
}

pub fn round_rating(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// The party a review is about: a poster reviews the worker and the worker
/// reviews the poster. Anyone else has no one to review on this task.
pub fn reviewee_for(task: &MTask, reviewer: Uuid) -> Option<Uuid> {
    let worker = task.accepted_by?;

    if reviewer == task.posted_by {
        Some(worker)
    } else if reviewer == worker {
        Some(task.posted_by)
    } else {
        None
    }
}
