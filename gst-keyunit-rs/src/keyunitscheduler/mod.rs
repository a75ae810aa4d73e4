//! Key-Unit Scheduler Element
//!
//! This module implements `keyunitscheduler`, a GStreamer filter that passes
//! buffers through untouched and, every `interval` of media time, sends an
//! upstream force-key-unit event so the encoder produces a key frame.
//!
//! ## Responsibilities
//! - Feeds each buffer's PTS to the [`keyunit::KeyUnitScheduler`]
//! - Reads the element clock and base time for the event's running time
//! - Pushes the force-key-unit event upstream through the sink pad
//!
//! ## Properties
//! - `interval`: Nanoseconds between requests (default 10 s, 0 disables)
//!
//! ## Example Pipeline
//! ```bash
//! gst-launch-1.0 videotestsrc ! x264enc ! keyunitscheduler interval=5000000000 ! \
//!     h264parse ! fakesink
//! ```

// SPDX-FileCopyrightText: 2025 Contributors to the key-unit scheduler project.
// SPDX-License-Identifier: Apache-2.0

use gst::glib;
use gst::prelude::*;
use gstreamer as gst;
use gstreamer_base as gst_base;

/// Core implementation (properties, state management, GStreamer trait impls)
mod imp;

/// Adapters from GStreamer clock and pads to the scheduler seams
mod host;

/// State structures (settings, scheduler instance)
mod state;

/// GLib wrapper type for the KeyUnitScheduler element.
///
/// ## Inheritance Chain (GStreamer class hierarchy)
/// - `gst::Object`
/// - `gst::Element`
/// - `gst_base::BaseTransform` (one sink pad, one src pad, in-place processing)
/// - `KeyUnitScheduler`
glib::wrapper! {
    pub struct KeyUnitScheduler(ObjectSubclass<imp::KeyUnitScheduler>) @extends gst_base::BaseTransform, gst::Element, gst::Object;
}

/// Registers the keyunitscheduler element with GStreamer.
///
/// The rank is NONE: the element is never autoplugged and must be requested
/// by name.
pub fn register(plugin: &gst::Plugin) -> Result<(), glib::BoolError> {
    gst::Element::register(
        Some(plugin),
        "keyunitscheduler",
        gst::Rank::NONE,
        KeyUnitScheduler::static_type(),
    )
}
