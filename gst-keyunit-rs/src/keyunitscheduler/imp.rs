//! Key-Unit Scheduler Implementation
//!
//! This module contains the GStreamer side of the keyunitscheduler element.
//! It implements GStreamer's BaseTransform trait, handling:
//! - Element lifecycle (start/stop reset the scheduler)
//! - Property management (interval)
//! - Per-buffer scheduling in always-in-place passthrough mode
//!
//! ## Implementation Structure
//! - `KeyUnitScheduler`: The struct holding element state (settings, context)
//! - `ObjectImpl`: GObject property system integration
//! - `ElementImpl`: GStreamer element metadata and pad templates
//! - `BaseTransformImpl`: start, stop and the in-place transform

// SPDX-FileCopyrightText: 2025 Contributors to the key-unit scheduler project.
// SPDX-License-Identifier: Apache-2.0

use gst::glib;
use gst::prelude::*;
use gst::subclass::prelude::*;
use gst_base::prelude::*;
use gst_base::subclass::prelude::*;
use gstreamer as gst;
use gstreamer_base as gst_base;

use keyunit::RequestSink;
use tracing::trace;

use std::sync::LazyLock;
use std::sync::Mutex;

use crate::keyunitscheduler;
use crate::keyunitscheduler::host::{ElementClock, UpstreamEvents, duration};
use crate::keyunitscheduler::state::{Context, DEFAULT_INTERVAL, Settings};

/// GStreamer debug category for keyunitscheduler messages.
///
/// Set GST_DEBUG=keyunitscheduler:6 to see every scheduling decision.
pub(crate) static CAT: LazyLock<gst::DebugCategory> = LazyLock::new(|| {
    gst::DebugCategory::new(
        "keyunitscheduler",
        gst::DebugColorFlags::empty(),
        Some("Key Unit Scheduler"),
    )
});

/// Key-unit scheduler element implementation.
///
/// Settings and context sit behind separate mutexes: properties may be set
/// from the application thread while buffers flow on the streaming thread.
/// When both are needed, `context` is locked first.
#[derive(Default)]
pub struct KeyUnitScheduler {
    /// User-configurable properties (interval)
    settings: Mutex<Settings>,

    /// Runtime state (scheduler between start and stop)
    context: Mutex<Context>,
}

/// Registers the element type with the GLib type system.
#[glib::object_subclass]
impl ObjectSubclass for KeyUnitScheduler {
    /// GType name, unique across all registered elements
    const NAME: &'static str = "GstRsKeyUnitScheduler";

    /// Public wrapper type
    type Type = keyunitscheduler::KeyUnitScheduler;

    /// Parent class (BaseTransform provides pad handling and passthrough)
    type ParentType = gst_base::BaseTransform;
}

/// GObject property system implementation.
///
/// Exposes `interval`, settable from gst-launch as e.g.
/// `keyunitscheduler interval=2000000000`.
impl ObjectImpl for KeyUnitScheduler {
    /// Returns the list of properties this element exposes.
    fn properties() -> &'static [glib::ParamSpec] {
        static PROPERTIES: LazyLock<Vec<glib::ParamSpec>> = LazyLock::new(|| {
            vec![
                // Nanoseconds between force-key-unit events, 0 disables
                glib::ParamSpecUInt64::builder("interval")
                    .nick("Interval")
                    .blurb("Interval in nanoseconds between key unit requests (0 = disabled)")
                    .minimum(0)
                    .maximum(keyunit::config::MAX_INTERVAL_NS)
                    .default_value(DEFAULT_INTERVAL.nseconds())
                    .mutable_playing()
                    .build(),
            ]
        });

        PROPERTIES.as_ref()
    }

    /// Called once the object is constructed.
    ///
    /// Installs a tracing subscriber when built with the `tracing` feature,
    /// so logs from the scheduler core show up next to GStreamer's.
    fn constructed(&self) {
        #[cfg(feature = "tracing")]
        {
            use tracing_subscriber::filter::LevelFilter;
            use tracing_subscriber::util::SubscriberInitExt;

            let _ = tracing_subscriber::fmt()
                .compact()
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_target(false)
                .with_max_level(LevelFilter::TRACE)
                .with_ansi(true)
                .finish()
                .try_init();
        }

        self.parent_constructed();
    }

    /// Called when a property is set via g_object_set() or gst-launch.
    ///
    /// # Arguments
    /// * `_id` - Property index (unused; matched by name)
    /// * `value` - New value for the property
    /// * `pspec` - Property specification (contains name)
    fn set_property(&self, _id: usize, value: &glib::Value, pspec: &glib::ParamSpec) {
        match pspec.name() {
            "interval" => {
                let Ok(interval) = value.get::<u64>() else {
                    gst::error!(CAT, imp = self, "Invalid type for interval property");
                    return;
                };
                // The pspec range keeps the value below GST_CLOCK_TIME_NONE
                let interval = gst::ClockTime::from_nseconds(interval);

                let Ok(mut settings) = self.settings.lock() else {
                    gst::error!(
                        CAT,
                        imp = self,
                        "Settings mutex poisoned, property change ignored"
                    );
                    return;
                };
                gst::info!(
                    CAT,
                    imp = self,
                    "Changing interval from {} to {}",
                    settings.interval,
                    interval
                );
                settings.interval = interval;
                // Released before the context lock; start() takes them in the
                // opposite order
                drop(settings);

                // A running scheduler picks up the new interval on the next buffer
                if let Ok(mut context) = self.context.lock()
                    && let Some(scheduler) = context.scheduler.as_mut()
                {
                    scheduler.set_interval(duration(interval));
                }
            }
            other => {
                gst::error!(CAT, imp = self, "Unknown property '{}'", other);
            }
        }
    }

    /// Called when a property is read via g_object_get().
    ///
    /// Falls back to the default value if the settings cannot be locked.
    fn property(&self, _id: usize, pspec: &glib::ParamSpec) -> glib::Value {
        let Ok(settings) = self.settings.lock() else {
            gst::error!(CAT, imp = self, "Settings mutex poisoned");
            return DEFAULT_INTERVAL.nseconds().to_value();
        };

        match pspec.name() {
            "interval" => settings.interval.nseconds().to_value(),
            other => {
                gst::error!(CAT, imp = self, "Unknown property {}", other);
                DEFAULT_INTERVAL.nseconds().to_value()
            }
        }
    }
}

/// GStreamer object implementation, no custom behavior.
impl GstObjectImpl for KeyUnitScheduler {}

/// GStreamer element implementation: metadata and pad templates.
impl ElementImpl for KeyUnitScheduler {
    /// Returns element metadata displayed by gst-inspect.
    fn metadata() -> Option<&'static gst::subclass::ElementMetadata> {
        static ELEMENT_METADATA: LazyLock<gst::subclass::ElementMetadata> = LazyLock::new(|| {
            gst::subclass::ElementMetadata::new(
                "Key Unit Scheduler",
                "Filter/Video",
                "Periodically requests key units from upstream",
                "Contributors to the key-unit scheduler project",
            )
        });

        Some(&*ELEMENT_METADATA)
    }

    /// Returns pad templates: one always sink and src pad, both accepting any caps.
    fn pad_templates() -> &'static [gst::PadTemplate] {
        static PAD_TEMPLATES: LazyLock<Result<Vec<gst::PadTemplate>, glib::BoolError>> =
            LazyLock::new(|| {
                let caps = gst::Caps::new_any();

                let src_pad_template = gst::PadTemplate::new(
                    "src",
                    gst::PadDirection::Src,
                    gst::PadPresence::Always,
                    &caps,
                )?;

                let sink_pad_template = gst::PadTemplate::new(
                    "sink",
                    gst::PadDirection::Sink,
                    gst::PadPresence::Always,
                    &caps,
                )?;

                Ok(vec![src_pad_template, sink_pad_template])
            });

        match PAD_TEMPLATES.as_ref() {
            Ok(templates) => templates,
            Err(err) => {
                trace!("Failed to create pad templates: {:?}", err);
                &[]
            }
        }
    }
}

/// BaseTransform implementation.
///
/// The element never modifies buffers. It runs always-in-place and stays in
/// passthrough once caps are set, with the in-place hook still called so
/// every buffer reaches the scheduler.
impl BaseTransformImpl for KeyUnitScheduler {
    const MODE: gst_base::subclass::BaseTransformMode =
        gst_base::subclass::BaseTransformMode::AlwaysInPlace;
    const PASSTHROUGH_ON_SAME_CAPS: bool = true;
    const TRANSFORM_IP_ON_PASSTHROUGH: bool = true;

    /// Called when transitioning READY -> PAUSED.
    ///
    /// Creates a fresh scheduler, so every (re)start numbers requests from
    /// zero and requests a key unit on the first timestamped buffer.
    fn start(&self) -> Result<(), gst::ErrorMessage> {
        // Context before settings: an interval set concurrently either lands
        // in the settings read below or finds the new scheduler.
        let mut context = self.context.lock().map_err(|e| {
            gst::error_msg!(gst::CoreError::Failed, ["Failed to get state mutex: {}", e])
        })?;

        let settings = self
            .settings
            .lock()
            .map_err(|e| {
                gst::error_msg!(
                    gst::CoreError::Failed,
                    ["Failed to get settings mutex: {}", e]
                )
            })?
            .clone();

        context.start(&settings);

        gst::info!(
            CAT,
            imp = self,
            "Started with interval {}",
            settings.interval
        );
        Ok(())
    }

    /// Called when transitioning PAUSED -> READY. Drops the scheduler.
    fn stop(&self) -> Result<(), gst::ErrorMessage> {
        let mut context = self.context.lock().map_err(|e| {
            gst::error_msg!(
                gst::CoreError::Failed,
                ["Failed to get context mutex: {}", e]
            )
        })?;
        context.stop();

        gst::info!(CAT, imp = self, "Stopped");
        Ok(())
    }

    /// In-place hook for writable buffers. Only reads the PTS.
    fn transform_ip(&self, buffer: &mut gst::BufferRef) -> Result<gst::FlowSuccess, gst::FlowError> {
        self.schedule(buffer)
    }

    /// In-place hook in passthrough mode, where the buffer stays read-only.
    fn transform_ip_passthrough(
        &self,
        buffer: &gst::Buffer,
    ) -> Result<gst::FlowSuccess, gst::FlowError> {
        self.schedule(buffer)
    }
}

impl KeyUnitScheduler {
    /// Runs one buffer through the scheduler and sends the resulting
    /// force-key-unit event, if any, upstream.
    ///
    /// The buffer is never touched. The event is pushed after the context
    /// lock is released, as upstream may call back into the element.
    fn schedule(&self, buffer: &gst::BufferRef) -> Result<gst::FlowSuccess, gst::FlowError> {
        let obj = self.obj();
        let element = obj.upcast_ref::<gst::Element>();

        let request = {
            let mut context = self.context.lock().map_err(|_| gst::FlowError::Error)?;
            let Some(scheduler) = context.scheduler.as_mut() else {
                trace!("Buffer before start, passing through");
                return Ok(gst::FlowSuccess::Ok);
            };

            scheduler.poll(buffer.pts().map(duration), &ElementClock::new(element))
        };

        if let Some(request) = request {
            gst::debug!(
                CAT,
                imp = self,
                "Requesting key unit {} for buffer {}",
                request.count,
                buffer.pts().display()
            );

            let sinkpad = obj.sink_pad();
            if let Err(err) = UpstreamEvents::new(sinkpad).send_request(&request) {
                gst::debug!(CAT, imp = self, "{}", err);
            }
        }

        Ok(gst::FlowSuccess::Ok)
    }
}
