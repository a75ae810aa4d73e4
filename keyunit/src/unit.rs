// SPDX-FileCopyrightText: 2025 Contributors to the key-unit scheduler project.
// SPDX-License-Identifier: Apache-2.0

//! Media units flowing through the scheduler.

use std::time::Duration;

/// Anything carrying an optional presentation timestamp.
pub trait Timestamped {
    /// The presentation timestamp, `None` if unknown.
    fn timestamp(&self) -> Option<Duration>;
}

/// An opaque chunk of media with its presentation timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUnit<T> {
    pub timestamp: Option<Duration>,
    pub payload: T,
}

impl<T> MediaUnit<T> {
    pub fn new(timestamp: Option<Duration>, payload: T) -> Self {
        MediaUnit { timestamp, payload }
    }
}

impl<T> Timestamped for MediaUnit<T> {
    fn timestamp(&self) -> Option<Duration> {
        self.timestamp
    }
}

impl Timestamped for Option<Duration> {
    fn timestamp(&self) -> Option<Duration> {
        *self
    }
}
