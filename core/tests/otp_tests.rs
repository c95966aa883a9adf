/*
 * SPDX-FileCopyrightText: 2025 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Tests for the in-memory OTP store

use chrono::{Duration, Utc};
use gigsly_core::otp::*;
use std::sync::Arc;

#[test]
fn test_issue_and_verify() {
    let store = OtpStore::new(300);
    let now = Utc::now();

    let code = store.issue_at("9876543210", now);
    assert_eq!(store.pending(), 1);

    assert!(store.verify_at("9876543210", &code, now).is_ok());
    assert_eq!(store.pending(), 0);

    // A verified code cannot be reused.
    assert_eq!(
        store.verify_at("9876543210", &code, now),
        Err(OtpError::NotRequested)
    );
}

#[test]
fn test_verify_without_request() {
    let store = OtpStore::new(300);

    assert_eq!(
        store.verify("9876543210", "123456"),
        Err(OtpError::NotRequested)
    );
    assert_eq!(
        OtpError::NotRequested.to_string(),
        "No OTP sent to this number"
    );
}

#[test]
fn test_wrong_code_keeps_record() {
    let store = OtpStore::new(300);
    let now = Utc::now();

    let code = store.issue_at("9876543210", now);
    let wrong = if code == "100000" { "100001" } else { "100000" };

    assert_eq!(
        store.verify_at("9876543210", wrong, now),
        Err(OtpError::Invalid)
    );
    assert_eq!(store.pending(), 1);
    assert!(store.verify_at("9876543210", &code, now).is_ok());
}

#[test]
fn test_expires_after_five_minutes() {
    let store = OtpStore::new(300);
    let now = Utc::now();

    let code = store.issue_at("9876543210", now);
    let later = now + Duration::minutes(5) + Duration::seconds(1);

    assert_eq!(
        store.verify_at("9876543210", &code, later),
        Err(OtpError::Expired)
    );
    // Expired records are deleted on the failed attempt.
    assert_eq!(store.pending(), 0);
    assert_eq!(
        store.verify_at("9876543210", &code, later),
        Err(OtpError::NotRequested)
    );
}

#[test]
fn test_codes_are_scoped_to_phone() {
    let store = OtpStore::new(300);
    let now = Utc::now();

    let code = store.issue_at("9876543210", now);
    store.issue_at("9123456780", now);

    assert_eq!(
        store.verify_at("9000000000", &code, now),
        Err(OtpError::NotRequested)
    );
    assert!(store.verify_at("9876543210", &code, now).is_ok());
    assert_eq!(store.pending(), 1);
}

#[test]
fn test_purge_expired() {
    let store = OtpStore::new(60);
    let now = Utc::now();

    store.issue_at("9876543210", now - Duration::minutes(10));
    store.issue_at("9123456780", now - Duration::minutes(5));
    store.issue_at("9000000000", now);

    assert_eq!(store.purge_expired_at(now), 2);
    assert_eq!(store.pending(), 1);
    assert_eq!(store.purge_expired_at(now), 0);
}

#[test]
fn test_concurrent_issue() {
    let store = Arc::new(OtpStore::new(300));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for j in 0..50 {
                    store.issue(&format!("98765{:02}{:03}", i, j));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.pending(), 400);
}
