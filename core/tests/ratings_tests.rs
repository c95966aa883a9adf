/*
 * SPDX-FileCopyrightText: 2025 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Tests for rating aggregation and payout rules

use chrono::NaiveDate;
use entity::task::TaskStatus;
use entity::withdrawal::PayoutMethod;
use gigsly_core::payout::*;
use gigsly_core::ratings::*;
use gigsly_core::types::MTask;
use uuid::Uuid;

#[test]
fn test_summarize_empty() {
    let summary = summarize(Vec::new());
    assert_eq!(summary.average, 0.0);
    assert_eq!(summary.count, 0);
    assert_eq!(summary.distribution, [0; 5]);
}

#[test]
fn test_summarize_rounds_to_one_decimal() {
    let summary = summarize(vec![5, 4, 4]);
    assert_eq!(summary.average, 4.3);
    assert_eq!(summary.count, 3);
    assert_eq!(summary.distribution, [0, 0, 0, 2, 1]);

    let summary = summarize(vec![5, 5, 4, 5, 5]);
    assert_eq!(summary.average, 4.8);
}

#[test]
fn test_summarize_ignores_out_of_range() {
    let summary = summarize(vec![0, 3, 9]);
    assert_eq!(summary.count, 1);
    assert_eq!(summary.average, 3.0);
}

#[test]
fn test_reviewee_for() {
    let poster = Uuid::new_v4();
    let worker = Uuid::new_v4();
    let date = NaiveDate::from_ymd_opt(2025, 6, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    let mut task = MTask {
        id: Uuid::new_v4(),
        title: "Tap repair".to_string(),
        description: "Kitchen tap".to_string(),
        budget: 300,
        category: "Plumbing".to_string(),
        location: "Sonipat".to_string(),
        posted_by: poster,
        accepted_by: Some(worker),
        status: TaskStatus::Completed,
        posted_at: date,
        completed_at: Some(date),
    };

    assert_eq!(reviewee_for(&task, poster), Some(worker));
    assert_eq!(reviewee_for(&task, worker), Some(poster));
    assert_eq!(reviewee_for(&task, Uuid::new_v4()), None);

    task.accepted_by = None;
    assert_eq!(reviewee_for(&task, poster), None);
}

#[test]
fn test_plan_withdrawal() {
    assert_eq!(plan_withdrawal(2000, None), Ok(2000));
    assert_eq!(plan_withdrawal(2000, Some(500)), Ok(500));
    assert!(plan_withdrawal(0, None).is_err());
    assert!(plan_withdrawal(2000, Some(0)).is_err());
    assert!(plan_withdrawal(2000, Some(-10)).is_err());
    assert_eq!(
        plan_withdrawal(2000, Some(2001)),
        Err("Cannot withdraw ₹2001, available balance is ₹2000".to_string())
    );
}

#[test]
fn test_payout_destination() {
    assert_eq!(
        payout_destination(None, Some("asha@okbank")),
        Ok((PayoutMethod::Upi, "asha@okbank".to_string()))
    );
    assert_eq!(
        payout_destination(Some("123456789012"), None),
        Ok((PayoutMethod::Bank, "123456789012".to_string()))
    );
    // UPI wins when both are given.
    assert_eq!(
        payout_destination(Some("123456789012"), Some("asha@okbank")),
        Ok((PayoutMethod::Upi, "asha@okbank".to_string()))
    );
    assert!(payout_destination(Some("  "), Some("")).is_err());
    assert!(payout_destination(None, Some("asha")).is_err());
    assert!(payout_destination(Some("12ab56789"), None).is_err());
    assert!(payout_destination(Some("1234"), None).is_err());
}
