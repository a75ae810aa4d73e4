// SPDX-FileCopyrightText: 2025 Contributors to the key-unit scheduler project.
// SPDX-License-Identifier: Apache-2.0

//! The periodic key-unit scheduler.
//!
//! [`KeyUnitScheduler`] watches the timestamps of the units passing through
//! it and asks upstream for a new key unit every `interval` of media time.
//! The first timestamped unit after [`KeyUnitScheduler::start`] always
//! triggers a request, so every output stream begins on a requested key
//! unit.
//!
//! ## Decision Policy
//! ```text
//! interval == 0                      -> never request
//! unit timestamp unknown             -> skip
//! no request since start             -> request
//! ts - last_request_time >= interval -> request
//! otherwise                          -> skip
//! ```
//!
//! The scheduler is single-threaded: the host must serialise calls to
//! `start`, `poll` and `process` for one instance.

use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::{
    clock::ClockSource,
    config::Settings,
    request::{KeyUnitRequest, RequestSink},
    unit::Timestamped,
};

/// Per-activation scheduler state.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct State {
    /// Timestamp of the unit that triggered the last request.
    pub last_request_time: Option<Duration>,

    /// Sequence number for the next request.
    pub sequence_count: u32,
}

/// Periodic key-unit request scheduler.
///
/// # Examples
///
/// ```
/// use keyunit::{KeyUnitScheduler, NoClock, RequestLog, Settings};
/// use std::time::Duration;
///
/// let mut scheduler = KeyUnitScheduler::new(Settings::with_interval(Duration::from_secs(1)));
/// let mut log = RequestLog::new();
///
/// for ms in [0, 500, 1000] {
///     scheduler.process(Some(Duration::from_millis(ms)), &NoClock, &mut log);
/// }
///
/// let counts: Vec<u32> = log.requests().iter().map(|r| r.count).collect();
/// assert_eq!(counts, [0, 1]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct KeyUnitScheduler {
    settings: Settings,
    state: State,
}

impl KeyUnitScheduler {
    /// Creates a scheduler in its freshly started state.
    pub fn new(settings: Settings) -> Self {
        KeyUnitScheduler {
            settings,
            state: State::default(),
        }
    }

    /// Resets the scheduler for a new activation.
    ///
    /// Clears the last request time and zeroes the sequence counter, so the
    /// next timestamped unit triggers request #0.
    pub fn start(&mut self) {
        debug!(interval = ?self.settings.interval, "Starting key unit scheduler");
        self.state = State::default();
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn interval(&self) -> Duration {
        self.settings.interval
    }

    /// Changes the interval. The counter and last request time are kept.
    pub fn set_interval(&mut self, interval: Duration) {
        self.settings.interval = interval;
    }

    pub fn last_request_time(&self) -> Option<Duration> {
        self.state.last_request_time
    }

    /// Sequence number the next request will carry.
    pub fn sequence_count(&self) -> u32 {
        self.state.sequence_count
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Returns `true` if a unit at `timestamp` is due for a request.
    fn is_due(&self, timestamp: Duration) -> bool {
        match self.state.last_request_time {
            None => true,
            Some(last) => timestamp
                .checked_sub(last)
                .is_some_and(|elapsed| elapsed >= self.settings.interval),
        }
    }

    /// Decides whether a unit at `timestamp` triggers a request.
    ///
    /// On a request this reads the clock, builds the [`KeyUnitRequest`] and
    /// advances the state. Dispatching the request is left to the caller.
    pub fn poll<C>(&mut self, timestamp: Option<Duration>, clock: &C) -> Option<KeyUnitRequest>
    where
        C: ClockSource + ?Sized,
    {
        if self.settings.is_disabled() {
            return None;
        }

        let Some(timestamp) = timestamp else {
            trace!("Unit without timestamp, not scheduling");
            return None;
        };

        if !self.is_due(timestamp) {
            trace!(?timestamp, "No key unit due");
            return None;
        }

        let times = clock.clock_times();
        let request = KeyUnitRequest {
            timestamp,
            stream_time: times.map(|t| t.stream_time()),
            running_time: times.map(|t| t.running_time()),
            all_headers: true,
            count: self.state.sequence_count,
        };

        self.state.sequence_count = self.state.sequence_count.wrapping_add(1);
        self.state.last_request_time = Some(timestamp);

        debug!(%request, "Scheduling key unit");
        Some(request)
    }

    /// Processes one unit and passes it through unchanged.
    ///
    /// If the unit is due, a request is sent through `sink`. A failed
    /// delivery is logged and does not affect the state.
    pub fn process<U, C, S>(&mut self, unit: U, clock: &C, sink: &mut S) -> U
    where
        U: Timestamped,
        C: ClockSource + ?Sized,
        S: RequestSink + ?Sized,
    {
        if let Some(request) = self.poll(unit.timestamp(), clock)
            && let Err(err) = sink.send_request(&request)
        {
            warn!(%request, "Key unit request not delivered: {}", err);
        }

        unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{FixedClock, NoClock};
    use tracing_test::traced_test;

    fn ms(ms: u64) -> Option<Duration> {
        Some(Duration::from_millis(ms))
    }

    fn scheduler(interval_ms: u64) -> KeyUnitScheduler {
        KeyUnitScheduler::new(Settings::with_interval(Duration::from_millis(interval_ms)))
    }

    #[test]
    fn first_unit_is_always_due() {
        let mut s = scheduler(1000);
        let request = s.poll(ms(123_456), &NoClock).unwrap();
        assert_eq!(request.count, 0);
        assert_eq!(request.timestamp, Duration::from_millis(123_456));
        assert_eq!(s.last_request_time(), ms(123_456));
        assert_eq!(s.sequence_count(), 1);
    }

    #[test]
    fn backwards_timestamp_is_not_due() {
        let mut s = scheduler(1000);
        assert!(s.poll(ms(5000), &NoClock).is_some());
        assert!(s.poll(ms(1000), &NoClock).is_none());
        assert_eq!(s.last_request_time(), ms(5000));
    }

    #[test]
    fn clock_times_are_reported() {
        let mut s = scheduler(1000);
        let clock = FixedClock::new(Duration::from_secs(12), Duration::from_secs(2));
        let request = s.poll(ms(0), &clock).unwrap();
        assert_eq!(request.running_time, Some(Duration::from_secs(10)));
        assert_eq!(request.stream_time, Some(Duration::from_secs(12)));
        assert!(request.all_headers);
    }

    #[test]
    fn missing_clock_reports_unknown_times() {
        let mut s = scheduler(1000);
        let request = s.poll(ms(0), &NoClock).unwrap();
        assert_eq!(request.running_time, None);
        assert_eq!(request.stream_time, None);
    }

    #[test]
    fn interval_change_keeps_counter() {
        let mut s = scheduler(1000);
        s.poll(ms(0), &NoClock);
        s.set_interval(Duration::from_millis(100));
        let request = s.poll(ms(100), &NoClock).unwrap();
        assert_eq!(request.count, 1);
    }

    #[test]
    fn disabling_stops_requests() {
        let mut s = scheduler(1000);
        s.poll(ms(0), &NoClock);
        s.set_interval(Duration::ZERO);
        assert!(s.poll(ms(10_000), &NoClock).is_none());
        assert_eq!(s.sequence_count(), 1);
    }

    #[test]
    fn failed_delivery_still_advances_state() {
        let mut s = scheduler(1000);
        let mut failing = |_: &KeyUnitRequest| -> crate::Result<()> {
            Err(crate::Error::Delivery("nobody upstream".into()))
        };
        let unit = s.process(ms(0), &NoClock, &mut failing);
        assert_eq!(unit, ms(0));
        assert_eq!(s.sequence_count(), 1);
        assert_eq!(s.last_request_time(), ms(0));
    }

    #[traced_test]
    #[test]
    fn emission_is_logged() {
        let mut s = scheduler(1000);
        s.poll(ms(0), &NoClock);
        assert!(logs_contain("Scheduling key unit"));
    }
}
