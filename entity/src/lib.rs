/*
 * SPDX-FileCopyrightText: 2025 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod application;
pub mod review;
pub mod task;
pub mod user;
pub mod withdrawal;
