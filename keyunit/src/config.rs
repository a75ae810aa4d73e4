// SPDX-FileCopyrightText: 2025 Contributors to the key-unit scheduler project.
// SPDX-License-Identifier: Apache-2.0

//! Scheduler configuration.
//!
//! The scheduler has a single option, the request `interval`. It can be built
//! in code, or loaded from a JSON document where the interval is given in
//! integer nanoseconds:
//!
//! ```
//! use keyunit::config::Settings;
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), keyunit::Error> {
//! let settings = Settings::from_json(r#"{ "interval": 2000000000 }"#)?;
//! assert_eq!(settings.interval, Duration::from_secs(2));
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default request interval (10 seconds).
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Largest interval a nanosecond clock can represent.
///
/// `u64::MAX` nanoseconds is reserved by GStreamer for "no time".
pub const MAX_INTERVAL_NS: u64 = u64::MAX - 1;

/// User-configurable settings for the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Minimum media time between two key-unit requests. Zero disables
    /// scheduling.
    #[serde(with = "duration_ns")]
    pub interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl Settings {
    /// Creates settings with the given interval.
    pub fn with_interval(interval: Duration) -> Self {
        Settings { interval }
    }

    /// Parses settings from a JSON document.
    ///
    /// Missing keys fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for malformed JSON and
    /// [`Error::IntervalOutOfRange`] if the interval exceeds
    /// [`MAX_INTERVAL_NS`].
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serializes the settings to a JSON document.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Checks that the interval fits a nanosecond clock.
    pub fn validate(&self) -> Result<()> {
        if self.interval.as_nanos() > u128::from(MAX_INTERVAL_NS) {
            return Err(Error::IntervalOutOfRange(self.interval));
        }
        Ok(())
    }

    /// Returns the interval in nanoseconds, saturating at [`MAX_INTERVAL_NS`].
    pub fn interval_ns(&self) -> u64 {
        u64::try_from(self.interval.as_nanos())
            .unwrap_or(MAX_INTERVAL_NS)
            .min(MAX_INTERVAL_NS)
    }

    /// Returns `true` if scheduling is turned off (zero interval).
    pub fn is_disabled(&self) -> bool {
        self.interval.is_zero()
    }
}

/// Serde helper encoding a [`Duration`] as integer nanoseconds.
mod duration_ns {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let ns = u64::try_from(value.as_nanos())
            .map_err(|_| <S::Error as serde::ser::Error>::custom("interval exceeds u64 nanoseconds"))?;
        serializer.serialize_u64(ns)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_nanos(u64::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_interval_is_ten_seconds() {
        let settings = Settings::default();
        assert_eq!(settings.interval, Duration::from_secs(10));
        assert_eq!(settings.interval_ns(), 10_000_000_000);
        assert!(!settings.is_disabled());
    }

    #[test]
    fn missing_keys_use_defaults() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn zero_interval_is_valid() {
        let settings = Settings::from_json(r#"{"interval": 0}"#).unwrap();
        assert!(settings.is_disabled());
    }

    #[test]
    fn json_uses_nanoseconds() {
        let settings = Settings::with_interval(Duration::from_millis(1500));
        assert_eq!(settings.to_json().unwrap(), r#"{"interval":1500000000}"#);
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = Settings::from_json(r#"{"interval": "soon"}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn reserved_interval_is_rejected() {
        let settings = Settings::with_interval(Duration::from_nanos(u64::MAX));
        assert!(matches!(
            settings.validate(),
            Err(Error::IntervalOutOfRange(_))
        ));
        assert_eq!(settings.interval_ns(), MAX_INTERVAL_NS);
    }
}
