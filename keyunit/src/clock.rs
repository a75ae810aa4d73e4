// SPDX-FileCopyrightText: 2025 Contributors to the key-unit scheduler project.
// SPDX-License-Identifier: Apache-2.0

//! Read-only access to the host clock.
//!
//! The scheduler never owns a clock. It asks the host for the current clock
//! time and the pipeline base time when it emits a request, and reports the
//! derived times as unknown when no clock is attached.

use std::time::Duration;

/// A snapshot of the host clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTimes {
    /// Current absolute clock time.
    pub now: Duration,

    /// Clock time at which the pipeline started running.
    pub base_time: Duration,
}

impl ClockTimes {
    /// Running time of the pipeline, `now - base_time`.
    ///
    /// Saturates at zero if the clock reads earlier than the base time.
    pub fn running_time(&self) -> Duration {
        self.now.saturating_sub(self.base_time)
    }

    /// Stream time, i.e. the absolute clock time `now`.
    ///
    /// No segment is involved, so this differs from a GStreamer segment
    /// stream time.
    pub fn stream_time(&self) -> Duration {
        self.now
    }
}

/// Source of clock readings for the scheduler.
pub trait ClockSource {
    /// Returns the current clock readings, or `None` if no clock is attached.
    fn clock_times(&self) -> Option<ClockTimes>;
}

/// A clock source for hosts without a clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoClock;

impl ClockSource for NoClock {
    fn clock_times(&self) -> Option<ClockTimes> {
        None
    }
}

/// A clock source that always returns the same readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub ClockTimes);

impl FixedClock {
    pub fn new(now: Duration, base_time: Duration) -> Self {
        FixedClock(ClockTimes { now, base_time })
    }
}

impl ClockSource for FixedClock {
    fn clock_times(&self) -> Option<ClockTimes> {
        Some(self.0)
    }
}

impl<C: ClockSource + ?Sized> ClockSource for &C {
    fn clock_times(&self) -> Option<ClockTimes> {
        (**self).clock_times()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_time_subtracts_base_time() {
        let times = ClockTimes {
            now: Duration::from_secs(15),
            base_time: Duration::from_secs(5),
        };
        assert_eq!(times.running_time(), Duration::from_secs(10));
        assert_eq!(times.stream_time(), Duration::from_secs(15));
    }

    #[test]
    fn running_time_saturates() {
        let times = ClockTimes {
            now: Duration::from_secs(1),
            base_time: Duration::from_secs(5),
        };
        assert_eq!(times.running_time(), Duration::ZERO);
    }

    #[test]
    fn no_clock_has_no_readings() {
        assert_eq!(NoClock.clock_times(), None);
    }
}
