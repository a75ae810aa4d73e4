//! GStreamer Plugin for Periodic Key-Unit Scheduling
//!
//! This crate implements a GStreamer plugin providing one element:
//!
//! - **keyunitscheduler**: a pass-through filter that asks upstream for a new
//!   key unit (e.g. a video keyframe) every `interval` of media time, so that
//!   a downstream fragmenter (HLS/DASH sink, fMP4 muxer) can start each
//!   fragment on a key frame.
//!
//! The scheduling policy lives in the [`keyunit`] crate; this crate only
//! adapts it to GStreamer buffers, the element clock and upstream events.
//!
//! ## Example Pipeline
//! ```bash
//! gst-launch-1.0 videotestsrc ! x264enc ! keyunitscheduler interval=2000000000 ! \
//!     h264parse ! mpegtsmux ! hlssink
//! ```

// SPDX-FileCopyrightText: 2025 Contributors to the key-unit scheduler project.
// SPDX-License-Identifier: Apache-2.0

#![allow(clippy::non_send_fields_in_send_ty, unused_doc_comments)]

use gst::glib;
use gstreamer as gst;

/// Key-unit scheduler element (pass-through, sends force-key-unit upstream)
pub mod keyunitscheduler;

/// Registers all elements of the plugin with GStreamer.
///
/// # Arguments
/// * `plugin` - The GStreamer plugin instance being initialized
///
/// # Returns
/// * `Ok(())` if the element registered successfully
/// * `Err(BoolError)` if registration failed
fn plugin_init(plugin: &gst::Plugin) -> Result<(), glib::BoolError> {
    keyunitscheduler::register(plugin)?;

    Ok(())
}

gst::plugin_define!(
    keyunit,
    env!("CARGO_PKG_DESCRIPTION"),
    plugin_init,
    concat!(env!("CARGO_PKG_VERSION"), "-", env!("COMMIT_ID")),
    "Apache-2.0",
    env!("CARGO_PKG_NAME"),
    env!("CARGO_PKG_NAME"),
    "Unknown package origin",
    env!("BUILD_REL_DATE")
);
