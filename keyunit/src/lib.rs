// SPDX-FileCopyrightText: 2025 Contributors to the key-unit scheduler project.
// SPDX-License-Identifier: Apache-2.0

//! # keyunit - Periodic Key-Unit Scheduling
//!
//! Host-independent core of the `keyunitscheduler` GStreamer element. The
//! scheduler sits inline in a media pipeline, inspects the timestamp of every
//! unit passing through, and at a fixed media-time cadence asks upstream (an
//! encoder) to start a new key unit. Downstream fragmenters can then cut
//! fragments exactly on those key units.
//!
//! ## Overview
//!
//! - [`KeyUnitScheduler`]: the state machine (`start`, `poll`, `process`)
//! - [`Settings`]: the request interval, loadable from JSON
//! - [`ClockSource`]: read-only access to the host clock
//! - [`RequestSink`]: best-effort delivery of [`KeyUnitRequest`]s upstream
//!
//! ## Architecture
//!
//! ```text
//!   units ──► KeyUnitScheduler::process ──► units (unchanged)
//!                    │         ▲
//!                    │         └── ClockSource (now, base time)
//!                    ▼
//!               RequestSink ──► upstream
//! ```
//!
//! ## Example
//!
//! ```
//! use keyunit::{KeyUnitScheduler, MediaUnit, NoClock, RequestLog, Settings};
//! use std::time::Duration;
//!
//! let mut scheduler = KeyUnitScheduler::new(Settings::with_interval(Duration::from_secs(2)));
//! let mut requests = RequestLog::new();
//!
//! let unit = MediaUnit::new(Some(Duration::ZERO), vec![0u8; 16]);
//! let unit = scheduler.process(unit, &NoClock, &mut requests);
//!
//! assert_eq!(unit.payload.len(), 16);
//! assert_eq!(requests.requests()[0].count, 0);
//! ```
//!
//! ## Thread Safety
//!
//! The scheduler holds no locks. Hosts that share it between threads wrap it
//! in their own synchronisation and serialise `start` against `process`.

mod error;
mod scheduler;

pub mod clock;
pub mod config;
pub mod request;
pub mod unit;

pub use clock::{ClockSource, ClockTimes, FixedClock, NoClock};
pub use config::{DEFAULT_INTERVAL, Settings};
pub use error::{Error, Result};
pub use request::{KeyUnitRequest, RequestLog, RequestSink};
pub use scheduler::{KeyUnitScheduler, State};
pub use unit::{MediaUnit, Timestamped};
