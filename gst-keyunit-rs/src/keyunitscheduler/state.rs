//! State Management for the Key-Unit Scheduler Element
//!
//! ## Key Types
//! - `Settings`: User-configurable properties (interval)
//! - `Context`: Runtime state, present between `start()` and `stop()`

// SPDX-FileCopyrightText: 2025 Contributors to the key-unit scheduler project.
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use gstreamer as gst;
use keyunit::KeyUnitScheduler;

/// Default value for the interval property (10 seconds)
pub(crate) const DEFAULT_INTERVAL: gst::ClockTime =
    gst::ClockTime::from_nseconds(keyunit::DEFAULT_INTERVAL.as_nanos() as u64);

/// User-configurable settings for the keyunitscheduler element.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    /// Media time between two force-key-unit events (zero disables)
    pub interval: gst::ClockTime,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl Settings {
    /// Builds the core scheduler settings from the element settings.
    pub fn to_core(&self) -> keyunit::Settings {
        keyunit::Settings::with_interval(Duration::from_nanos(self.interval.nseconds()))
    }
}

/// Context wrapper for the element's mutable state.
///
/// `scheduler` is created in start() and dropped in stop(), following
/// GStreamer's state transition lifecycle.
#[derive(Default)]
pub(crate) struct Context {
    /// The running scheduler (None when stopped)
    pub scheduler: Option<KeyUnitScheduler>,
}

impl Context {
    /// Replaces any previous scheduler with a freshly started one.
    pub fn start(&mut self, settings: &Settings) {
        let mut scheduler = KeyUnitScheduler::new(settings.to_core());
        scheduler.start();
        self.scheduler = Some(scheduler);
    }

    pub fn stop(&mut self) {
        self.scheduler = None;
    }
}
