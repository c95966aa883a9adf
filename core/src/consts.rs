/*
 * SPDX-FileCopyrightText: 2025 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use chrono::{DateTime, NaiveDateTime};
use std::ops::RangeInclusive;
use std::sync::LazyLock;

pub const PORT_RANGE: RangeInclusive<usize> = 1..=65535;

pub static NULL_TIME: LazyLock<NaiveDateTime> =
    LazyLock::new(|| DateTime::from_timestamp(0, 0).unwrap().naive_utc());

pub const OTP_CODE_RANGE: RangeInclusive<u32> = 100_000..=999_999;
pub const OTP_SWEEP_INTERVAL_SECS: u64 = 60;

pub const PHONE_LENGTH: usize = 10;
pub const MIN_BUDGET: i64 = 30;
pub const RATING_RANGE: RangeInclusive<i16> = 1..=5;

pub const MAX_TITLE_LENGTH: usize = 120;
pub const MAX_NAME_LENGTH: usize = 80;

pub const TOKEN_LIFETIME_HOURS: i64 = 24;

pub const TASK_CATEGORIES: [&str; 49] = [
    "Technology",
    "Business",
    "Legal",
    "Content Writing",
    "Design",
    "Marketing",
    "Education",
    "Consulting",
    "Finance",
    "Healthcare",
    "Teaching",
    "Household Chores",
    "Home Repair",
    "Event Planning",
    "Photography",
    "Videography",
    "Fitness & Wellness",
    "Beauty & Personal Care",
    "Pet Care",
    "Gardening",
    "Transportation",
    "Delivery",
    "Tutoring",
    "Translation",
    "Writing & Editing",
    "Accounting",
    "Data Entry",
    "Virtual Assistance",
    "Cleaning",
    "Cooking & Catering",
    "Childcare",
    "Elderly Care",
    "Moving Services",
    "Car Wash & Detailing",
    "Plumbing",
    "Electrical",
    "Carpentry",
    "Painting",
    "Appliance Repair",
    "IT Support",
    "Web Development",
    "App Development",
    "Graphic Design",
    "Social Media Management",
    "SEO",
    "HR & Recruitment",
    "Real Estate",
    "Travel Planning",
    "Other",
];
