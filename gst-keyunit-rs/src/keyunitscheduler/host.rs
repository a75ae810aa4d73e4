//! Host Adapters for the Scheduler Core
//!
//! Bridges the GStreamer side of the element to the seams of the
//! [`keyunit`] crate:
//! - `ElementClock`: reads the element clock and base time ([`ClockSource`])
//! - `UpstreamEvents`: pushes force-key-unit events out of the sink pad
//!   ([`RequestSink`])

// SPDX-FileCopyrightText: 2025 Contributors to the key-unit scheduler project.
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use gst::prelude::*;
use gstreamer as gst;
use gstreamer_video as gst_video;
use keyunit::{ClockSource, ClockTimes, KeyUnitRequest, RequestSink, config::MAX_INTERVAL_NS};

/// Converts a core duration to a GStreamer clock time.
///
/// Saturates below `GST_CLOCK_TIME_NONE`.
pub(crate) fn clock_time(duration: Duration) -> gst::ClockTime {
    let ns = u64::try_from(duration.as_nanos()).unwrap_or(MAX_INTERVAL_NS);
    gst::ClockTime::from_nseconds(ns.min(MAX_INTERVAL_NS))
}

/// Converts a GStreamer clock time to a core duration.
pub(crate) fn duration(time: gst::ClockTime) -> Duration {
    Duration::from_nanos(time.nseconds())
}

/// Clock readings taken from the element's pipeline clock.
pub(crate) struct ElementClock<'a> {
    element: &'a gst::Element,
}

impl<'a> ElementClock<'a> {
    pub fn new(element: &'a gst::Element) -> Self {
        ElementClock { element }
    }
}

impl ClockSource for ElementClock<'_> {
    fn clock_times(&self) -> Option<ClockTimes> {
        let now = self.element.current_clock_time()?;
        let base_time = self.element.base_time().unwrap_or(gst::ClockTime::ZERO);

        Some(ClockTimes {
            now: duration(now),
            base_time: duration(base_time),
        })
    }
}

/// Builds the upstream force-key-unit event for a request.
///
/// The standard fields carry the running time, all-headers flag and count;
/// the media timestamp and stream time travel as extra structure fields.
/// `stream-time` holds the element's clock time, not a segment stream time.
pub(crate) fn force_key_unit_event(request: &KeyUnitRequest) -> gst::Event {
    gst_video::UpstreamForceKeyUnitEvent::builder()
        .running_time(request.running_time.map(clock_time))
        .all_headers(request.all_headers)
        .count(request.count)
        .other_field("timestamp", clock_time(request.timestamp))
        .other_field("stream-time", request.stream_time.map(clock_time))
        .build()
}

/// Sends requests upstream as force-key-unit events on a sink pad.
pub(crate) struct UpstreamEvents<'a> {
    sinkpad: &'a gst::Pad,
}

impl<'a> UpstreamEvents<'a> {
    pub fn new(sinkpad: &'a gst::Pad) -> Self {
        UpstreamEvents { sinkpad }
    }
}

impl RequestSink for UpstreamEvents<'_> {
    fn send_request(&mut self, request: &KeyUnitRequest) -> keyunit::Result<()> {
        if self.sinkpad.push_event(force_key_unit_event(request)) {
            Ok(())
        } else {
            Err(keyunit::Error::Delivery(format!(
                "force-key-unit event #{} not handled upstream",
                request.count
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_carries_request_fields() {
        gst::init().unwrap();

        let request = KeyUnitRequest {
            timestamp: Duration::from_secs(4),
            stream_time: Some(Duration::from_secs(9)),
            running_time: Some(Duration::from_secs(3)),
            all_headers: true,
            count: 7,
        };
        let event = force_key_unit_event(&request);

        let fku = gst_video::UpstreamForceKeyUnitEvent::parse(&event).unwrap();
        assert_eq!(fku.running_time, Some(gst::ClockTime::from_seconds(3)));
        assert!(fku.all_headers);
        assert_eq!(fku.count, 7);

        let s = event.structure().unwrap();
        assert_eq!(
            s.get::<gst::ClockTime>("timestamp").unwrap(),
            gst::ClockTime::from_seconds(4)
        );
        assert_eq!(
            s.get::<Option<gst::ClockTime>>("stream-time").unwrap(),
            Some(gst::ClockTime::from_seconds(9))
        );
    }

    #[test]
    fn unknown_times_stay_unknown() {
        gst::init().unwrap();

        let request = KeyUnitRequest {
            timestamp: Duration::ZERO,
            stream_time: None,
            running_time: None,
            all_headers: true,
            count: 0,
        };
        let event = force_key_unit_event(&request);

        let fku = gst_video::UpstreamForceKeyUnitEvent::parse(&event).unwrap();
        assert_eq!(fku.running_time, None);
        let s = event.structure().unwrap();
        assert_eq!(
            s.get::<Option<gst::ClockTime>>("stream-time").unwrap(),
            None
        );
    }

    #[test]
    fn clock_time_conversion_saturates() {
        assert_eq!(clock_time(Duration::from_nanos(42)).nseconds(), 42);
        assert_eq!(
            clock_time(Duration::from_secs(u64::MAX)).nseconds(),
            MAX_INTERVAL_NS
        );
    }
}
