// SPDX-FileCopyrightText: 2025 Contributors to the key-unit scheduler project.
// SPDX-License-Identifier: Apache-2.0

//! Key-unit requests and the seam through which they are delivered.

use std::fmt;
use std::time::Duration;

use crate::Result;

/// An out-of-band request asking upstream to start a new key unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyUnitRequest {
    /// Timestamp of the media unit that triggered the request.
    pub timestamp: Duration,

    /// Absolute clock time when the request was made, unknown without a
    /// clock.
    ///
    /// This is not a segment stream time: it is not derived from the
    /// segment of the stream the unit belongs to.
    pub stream_time: Option<Duration>,

    /// Pipeline running time, unknown without a clock.
    pub running_time: Option<Duration>,

    /// Request codec headers along with the key unit. Always `true`.
    pub all_headers: bool,

    /// Sequence number of this request since the last start.
    pub count: u32,
}

impl fmt::Display for KeyUnitRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} at {:?}", self.count, self.timestamp)?;
        if let Some(running_time) = self.running_time {
            write!(f, " (running time {running_time:?})")?;
        }
        Ok(())
    }
}

/// Delivers key-unit requests upstream.
///
/// Delivery is best-effort: the scheduler logs a failed delivery and does
/// not retry.
pub trait RequestSink {
    fn send_request(&mut self, request: &KeyUnitRequest) -> Result<()>;
}

impl<F> RequestSink for F
where
    F: FnMut(&KeyUnitRequest) -> Result<()>,
{
    fn send_request(&mut self, request: &KeyUnitRequest) -> Result<()> {
        self(request)
    }
}

impl RequestSink for Vec<KeyUnitRequest> {
    fn send_request(&mut self, request: &KeyUnitRequest) -> Result<()> {
        self.push(*request);
        Ok(())
    }
}

/// A sink that records every request, for tools and tests.
#[derive(Debug, Default, Clone)]
pub struct RequestLog {
    requests: Vec<KeyUnitRequest>,
}

impl RequestLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests received so far, in delivery order.
    pub fn requests(&self) -> &[KeyUnitRequest] {
        &self.requests
    }

    pub fn into_requests(self) -> Vec<KeyUnitRequest> {
        self.requests
    }
}

impl RequestSink for RequestLog {
    fn send_request(&mut self, request: &KeyUnitRequest) -> Result<()> {
        self.requests.push(*request);
        Ok(())
    }
}
