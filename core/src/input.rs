/*
 * SPDX-FileCopyrightText: 2025 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use anyhow::{Context, Result};
use email_address::EmailAddress;
use std::fmt;

use super::consts::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    Required(&'static str),
    TooLong(&'static str, usize),
    Phone,
    Email,
    Budget,
    Bid,
    Category(String),
    Rating,
    OtpFormat,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Required(field) => write!(f, "{} is required", field),
            InputError::TooLong(field, max) => {
                write!(f, "{} cannot exceed {} characters", field, max)
            }
            InputError::Phone => write!(f, "Enter a valid {}-digit phone number", PHONE_LENGTH),
            InputError::Email => write!(f, "Enter a valid email address"),
            InputError::Budget => write!(f, "Budget must be at least ₹{}", MIN_BUDGET),
            InputError::Bid => write!(f, "Bid must be greater than zero"),
            InputError::Category(c) => write!(f, "Unknown category: {}", c),
            InputError::Rating => write!(
                f,
                "Rating must be between {} and {}",
                RATING_RANGE.start(),
                RATING_RANGE.end()
            ),
            InputError::OtpFormat => write!(f, "OTP must be 6 digits"),
        }
    }
}

impl std::error::Error for InputError {}

pub fn port_in_range(s: &str) -> Result<u16, String> {
    let port: usize = s
        .parse()
        .map_err(|_| format!("`{s}` is not a port number"))?;

    if PORT_RANGE.contains(&port) {
        Ok(port as u16)
    } else {
        Err(format!(
            "port not in range {}-{}",
            PORT_RANGE.start(),
            PORT_RANGE.end()
        ))
    }
}

pub fn greater_than_zero<
    T: std::str::FromStr + std::cmp::PartialOrd + std::fmt::Display + Default,
>(
    s: &str,
) -> Result<T, String> {
    let num: T = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid number", s))?;

    if num > T::default() {
        Ok(num)
    } else {
        Err(format!("`{}` is not larger than 0", s))
    }
}

/// Reads a secret from `f`, failing when the file is unreadable or holds only whitespace.
pub fn load_secret(f: &str) -> Result<String> {
    let s = std::fs::read_to_string(f)
        .with_context(|| format!("Failed to read secret from {}", f))?;
    let secret = s.trim().replace(char::from(25), "");

    if secret.is_empty() {
        anyhow::bail!("Secret file {} is empty", f);
    }

    Ok(secret)
}

/// Trims `value` and rejects it when nothing is left or it exceeds `max` characters.
pub fn require_text(
    field: &'static str,
    value: &str,
    max: Option<usize>,
) -> Result<String, InputError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(InputError::Required(field));
    }

    if let Some(max) = max {
        if value.chars().count() > max {
            return Err(InputError::TooLong(field, max));
        }
    }

    Ok(value.to_string())
}

pub fn validate_phone(phone: &str) -> Result<(), InputError> {
    if phone.len() == PHONE_LENGTH && phone.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(InputError::Phone)
    }
}

/// Emails are optional; an empty string counts as absent.
pub fn validate_email(email: &str) -> Result<(), InputError> {
    if email.is_empty() {
        return Ok(());
    }

    if email.chars().any(char::is_whitespace) || !EmailAddress::is_valid(email) {
        return Err(InputError::Email);
    }

    // The domain must carry a top level part, `user@localhost` is not accepted.
    match email.rsplit_once('@') {
        Some((_, domain)) => match domain.rsplit_once('.') {
            Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
            _ => Err(InputError::Email),
        },
        None => Err(InputError::Email),
    }
}

pub fn validate_name(name: &str) -> Result<String, InputError> {
    require_text("Name", name, Some(MAX_NAME_LENGTH))
}

pub fn validate_budget(budget: i64) -> Result<(), InputError> {
    if budget >= MIN_BUDGET {
        Ok(())
    } else {
        Err(InputError::Budget)
    }
}

pub fn validate_bid(bid: i64) -> Result<(), InputError> {
    if bid > 0 { Ok(()) } else { Err(InputError::Bid) }
}

pub fn validate_category(category: &str) -> Result<(), InputError> {
    if TASK_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(InputError::Category(category.to_string()))
    }
}

pub fn validate_rating(rating: i16) -> Result<(), InputError> {
    if RATING_RANGE.contains(&rating) {
        Ok(())
    } else {
        Err(InputError::Rating)
    }
}

pub fn validate_otp_format(otp: &str) -> Result<(), InputError> {
    if otp.len() == 6 && otp.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(InputError::OtpFormat)
    }
}
