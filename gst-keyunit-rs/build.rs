//! Build Script for gst-keyunit-rs
//!
//! This build script runs during compilation and generates version information
//! for the GStreamer plugin using `gst_plugin_version_helper`.
//!
//! ## Generated Environment Variables
//! - `COMMIT_ID`: Git commit hash (for version string)
//! - `BUILD_REL_DATE`: Build date (for plugin metadata)
//!
//! These are read in lib.rs via `env!` and passed to `gst::plugin_define!`.

// SPDX-FileCopyrightText: 2025 Contributors to the key-unit scheduler project.
// SPDX-License-Identifier: Apache-2.0

fn main() {
    gst_plugin_version_helper::info()
}
