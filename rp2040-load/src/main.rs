// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Flash an RP2040 board in BOOTSEL mode.
//!
//! Usage:
//!   rp2040-load -D firmware.elf
//!   rp2040-load -v -D firmware.elf --tools-dir /opt/pico-tools

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::level_filters::LevelFilter;

use rp2040_load::cli::Cli;
use rp2040_load::{pipeline, Reporter, SystemRunner, ThreadSleeper};

fn main() -> Result<ExitCode> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if args.debug {
            LevelFilter::DEBUG
        } else {
            LevelFilter::OFF
        })
        .init();

    let config = args.into_config()?;
    let reporter = Reporter::stdout(config.verbose);

    match pipeline::run(&config, &SystemRunner, &ThreadSleeper, &reporter) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            tracing::debug!(error = %e, "flashing aborted");
            Ok(ExitCode::FAILURE)
        }
    }
}
