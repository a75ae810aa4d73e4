// SPDX-FileCopyrightText: 2025 Contributors to the key-unit scheduler project.
// SPDX-License-Identifier: Apache-2.0

//! Runs a list of unit timestamps through the scheduler and prints the
//! key-unit requests it would send upstream.
//!
//! ```bash
//! cargo run -p keyunit --example schedule -- --interval-ms 1000 0 500 1000 - 1999 2000
//! ```

mod common;

use std::time::Duration;

use clap::Parser;
use keyunit::{
    ClockSource, FixedClock, KeyUnitScheduler, NoClock, RequestLog, Settings,
    config::DEFAULT_INTERVAL,
};
use tracing::info;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Opts {
    /// Request interval in milliseconds (0 disables scheduling).
    #[arg(long, default_value_t = DEFAULT_INTERVAL.as_millis() as u64)]
    interval_ms: u64,

    /// Settings document (JSON). Overrides --interval-ms.
    #[arg(long)]
    settings: Option<std::path::PathBuf>,

    /// Clock time in milliseconds to report with each request.
    #[arg(long)]
    clock_ms: Option<u64>,

    /// Pipeline base time in milliseconds.
    #[arg(long, default_value_t = 0)]
    base_time_ms: u64,

    /// Unit timestamps in milliseconds, `-` for a unit without timestamp.
    timestamps: Vec<String>,
}

fn parse_timestamp(arg: &str) -> Result<Option<Duration>, keyunit::Error> {
    if arg == "-" {
        return Ok(None);
    }
    arg.parse::<u64>()
        .map(|ms| Some(Duration::from_millis(ms)))
        .map_err(|e| keyunit::Error::Other(format!("Invalid timestamp '{arg}': {e}")))
}

fn main() -> Result<(), keyunit::Error> {
    common::setup_logging();
    let opts = Opts::parse();

    let settings = match &opts.settings {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|e| {
                keyunit::Error::Other(format!("Reading \"{}\": {e}", path.display()))
            })?;
            Settings::from_json(&json)?
        }
        None => Settings::with_interval(Duration::from_millis(opts.interval_ms)),
    };

    let clock: Box<dyn ClockSource> = match opts.clock_ms {
        Some(now) => Box::new(FixedClock::new(
            Duration::from_millis(now),
            Duration::from_millis(opts.base_time_ms),
        )),
        None => Box::new(NoClock),
    };

    info!("Scheduling with interval {:?}", settings.interval);
    let mut scheduler = KeyUnitScheduler::new(settings);
    let mut log = RequestLog::new();

    for arg in &opts.timestamps {
        let timestamp = parse_timestamp(arg)?;
        scheduler.process(timestamp, clock.as_ref(), &mut log);
    }

    for request in log.requests() {
        println!("{request}");
    }
    info!(
        "{} request(s) for {} unit(s)",
        log.requests().len(),
        opts.timestamps.len()
    );

    Ok(())
}
