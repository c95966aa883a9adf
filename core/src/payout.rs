/*
 * SPDX-FileCopyrightText: 2025 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use entity::withdrawal::PayoutMethod;

/// Amount to withdraw; without an explicit request the full balance is paid out.
pub fn plan_withdrawal(earnings: i64, requested: Option<i64>) -> Result<i64, String> {
    let amount = requested.unwrap_or(earnings);

    if amount <= 0 {
        return Err("No earnings available to withdraw".to_string());
    }

    if amount > earnings {
        return Err(format!(
            "Cannot withdraw ₹{}, available balance is ₹{}",
            amount, earnings
        ));
    }

    Ok(amount)
}

pub fn payout_destination(
    account_number: Option<&str>,
    upi_id: Option<&str>,
) -> Result<(PayoutMethod, String), String> {
    let account_number = account_number.map(str::trim).filter(|s| !s.is_empty());
    let upi_id = upi_id.map(str::trim).filter(|s| !s.is_empty());

    match (upi_id, account_number) {
        (Some(upi), _) => {
            if !upi.contains('@') || upi.starts_with('@') || upi.ends_with('@') {
                return Err("Invalid UPI ID".to_string());
            }
            Ok((PayoutMethod::Upi, upi.to_string()))
        }
        (None, Some(account)) => {
            if !(9..=18).contains(&account.len()) || !account.chars().all(|c| c.is_ascii_digit())
            {
                return Err("Invalid bank account number".to_string());
            }
            Ok((PayoutMethod::Bank, account.to_string()))
        }
        (None, None) => Err("Enter a bank account number or UPI ID".to_string()),
    }
}
