// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Flashing pipeline: convert, probe, load, reboot.

use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::report::Reporter;
use crate::retry::{self, Sleeper};
use crate::runner::{Failure, Invocation, RunMode, Runner};

/// One step of the flashing pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Convert,
    Probe,
    Load,
    Reboot,
}

impl Stage {
    /// Pipeline order.
    pub const ALL: [Stage; 4] = [Stage::Convert, Stage::Probe, Stage::Load, Stage::Reboot];

    /// Text printed on the verbose channel before the stage runs.
    pub fn description(&self) -> Option<&'static str> {
        match self {
            Stage::Convert => Some("Converting elf to uf2 ..."),
            Stage::Probe => Some("Looking for RP2040 device in BOOTSEL mode "),
            Stage::Load => None,
            Stage::Reboot => Some("Rebooting RP2040 device ..."),
        }
    }

    pub fn mode(&self) -> RunMode {
        match self {
            Stage::Convert | Stage::Reboot => RunMode::SILENT,
            Stage::Probe => RunMode::SPINNER,
            Stage::Load => RunMode::FORWARD,
        }
    }

    /// Command line for this stage.
    pub fn invocation(&self, config: &Config) -> Invocation {
        match self {
            Stage::Convert => Invocation::new(config.converter())
                .arg(&config.binary)
                .arg(config.image()),
            Stage::Probe => Invocation::new(config.loader()).arg("info"),
            Stage::Load => Invocation::new(config.loader())
                .arg("load")
                .arg(config.image()),
            Stage::Reboot => Invocation::new(config.loader()).arg("reboot"),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Convert => "convert",
            Stage::Probe => "probe",
            Stage::Load => "load",
            Stage::Reboot => "reboot",
        };
        f.write_str(name)
    }
}

/// Fatal pipeline failure.
#[derive(Debug, Error)]
pub enum FlashError {
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Failure,
        output: String,
    },

    #[error("no RP2040 device in BOOTSEL mode after {attempts} attempts: {source}")]
    DeviceNotFound {
        attempts: u32,
        #[source]
        source: Failure,
        output: String,
    },
}

impl FlashError {
    /// Captured output of the command that failed.
    pub fn output(&self) -> &str {
        match self {
            FlashError::Stage { output, .. } | FlashError::DeviceNotFound { output, .. } => output,
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            FlashError::Stage { stage, .. } => *stage,
            FlashError::DeviceNotFound { .. } => Stage::Probe,
        }
    }
}

/// Run the whole pipeline, stopping at the first fatal failure.
///
/// On failure the captured output of the failing command is written to the
/// verbose channel before the error is returned; a stage that forwarded its
/// output live only gets a line break. On success a blank line terminates the
/// output.
pub fn run(
    config: &Config,
    runner: &dyn Runner,
    sleeper: &dyn Sleeper,
    reporter: &Reporter,
) -> Result<(), FlashError> {
    reporter.verbose_line(&format!(
        "{} {}",
        config.program_name,
        env!("CARGO_PKG_VERSION")
    ));

    for stage in Stage::ALL {
        if let Err(e) = run_stage(stage, config, runner, sleeper, reporter) {
            // Forwarded stages already echoed their output as it arrived.
            if e.stage().mode().forward {
                reporter.verbose_line("");
            } else {
                reporter.verbose_line(e.output());
            }
            return Err(e);
        }
    }

    reporter.blank_line();
    Ok(())
}

fn run_stage(
    stage: Stage,
    config: &Config,
    runner: &dyn Runner,
    sleeper: &dyn Sleeper,
    reporter: &Reporter,
) -> Result<(), FlashError> {
    debug!(%stage, "starting stage");

    let description = stage.description();
    if let Some(text) = description {
        reporter.verbose(text);
    }

    let invocation = stage.invocation(config);
    match stage {
        Stage::Probe => {
            retry::acquire(runner, sleeper, reporter, &invocation, &config.retry)?;
        }
        _ => {
            let outcome = runner.run(&invocation, stage.mode(), reporter);
            if let Err(source) = outcome.result {
                return Err(FlashError::Stage {
                    stage,
                    source,
                    output: outcome.output,
                });
            }
        }
    }

    if description.is_some() {
        reporter.verbose_line(" OK");
    }
    Ok(())
}
