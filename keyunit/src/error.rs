// SPDX-FileCopyrightText: 2025 Contributors to the key-unit scheduler project.
// SPDX-License-Identifier: Apache-2.0

//! Error types for scheduler configuration and request delivery.
//!
//! Scheduling itself never fails. These errors only come from loading
//! settings and from request sinks that report a failed delivery.

use std::time::Duration;

/// Convenience result type using [`Error`] as the error variant.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can occur around the key-unit scheduler.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A request sink could not deliver a key-unit request.
    ///
    /// The scheduler logs this and carries on; its state is updated as if
    /// the delivery had succeeded.
    #[error("Request delivery failed: {0}")]
    Delivery(String),

    /// A settings document could not be parsed.
    #[error("Invalid settings: {0}")]
    Config(#[from] serde_json::Error),

    /// The interval cannot be expressed in a nanosecond clock.
    #[error("Interval out of range: {0:?}")]
    IntervalOutOfRange(Duration),

    /// A generic error for failures not covered by the other variants.
    #[error("Other error: {0}")]
    Other(String),
}
