/*
 * SPDX-FileCopyrightText: 2025 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! In-memory one-time passcodes keyed by phone number.
//!
//! Codes live in process memory only and vanish on restart. Each phone holds at
//! most one record; issuing again replaces it. A record is removed when it is
//! verified successfully, when a verification finds it expired, or when the
//! background sweep runs.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

use super::consts::OTP_CODE_RANGE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpRecord {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpError {
    NotRequested,
    Expired,
    Invalid,
}

impl fmt::Display for OtpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OtpError::NotRequested => write!(f, "No OTP sent to this number"),
            OtpError::Expired => write!(f, "OTP expired"),
            OtpError::Invalid => write!(f, "Invalid OTP"),
        }
    }
}

impl std::error::Error for OtpError {}

#[derive(Debug)]
pub struct OtpStore {
    ttl: Duration,
    records: Mutex<HashMap<String, OtpRecord>>,
}

impl OtpStore {
    pub fn new(ttl_seconds: i64) -> Self {
        Self {
            ttl: Duration::seconds(ttl_seconds),
            records: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn records(&self) -> MutexGuard<'_, HashMap<String, OtpRecord>> {
        // A panic while holding the lock cannot leave a record half written.
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn issue(&self, phone: &str) -> String {
        self.issue_at(phone, Utc::now())
    }

    pub fn issue_at(&self, phone: &str, now: DateTime<Utc>) -> String {
        let code = generate_code();

        self.records().insert(
            phone.to_string(),
            OtpRecord {
                code: code.clone(),
                expires_at: now + self.ttl,
            },
        );

        code
    }

    pub fn verify(&self, phone: &str, code: &str) -> Result<(), OtpError> {
        self.verify_at(phone, code, Utc::now())
    }

    pub fn verify_at(&self, phone: &str, code: &str, now: DateTime<Utc>) -> Result<(), OtpError> {
        let mut records = self.records();

        let record = records.get(phone).ok_or(OtpError::NotRequested)?;

        if now > record.expires_at {
            records.remove(phone);
            return Err(OtpError::Expired);
        }

        if record.code != code {
            return Err(OtpError::Invalid);
        }

        records.remove(phone);
        Ok(())
    }

    /// Drops every expired record and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    pub fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut records = self.records();
        let before = records.len();
        records.retain(|_, record| now <= record.expires_at);
        before - records.len()
    }

    pub fn pending(&self) -> usize {
        self.records().len()
    }
}

pub fn generate_code() -> String {
    rand::rng().random_range(OTP_CODE_RANGE).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_code_is_six_digits() {
        for _ in 0..1000 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(code.chars().next(), Some('0'));
        }
    }

    #[test]
    fn test_issue_replaces_previous_code() {
        let store = OtpStore::new(300);
        let now = Utc::now();

        store.issue_at("9876543210", now);
        let second = store.issue_at("9876543210", now);

        assert_eq!(store.pending(), 1);
        assert!(store.verify_at("9876543210", &second, now).is_ok());
    }

    #[test]
    fn test_expiry_boundary() {
        let store = OtpStore::new(300);
        let now = Utc::now();
        let code = store.issue_at("9876543210", now);

        // Exactly at the deadline the code is still accepted.
        assert!(
            store
                .verify_at("9876543210", &code, now + Duration::seconds(300))
                .is_ok()
        );
    }
}
