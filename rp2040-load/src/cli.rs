// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Command-line interface definitions.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::Config;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "rp2040-load", version)]
#[command(about = "Convert an ELF to UF2 and flash it onto an RP2040 in BOOTSEL mode")]
pub struct Cli {
    /// Show verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Path of the elf file to load
    #[arg(short = 'D', long = "binary", value_name = "ELF")]
    pub binary: Option<PathBuf>,

    /// Directory containing elf2uf2 and picotool (defaults to this executable's directory)
    #[arg(long, value_name = "DIR")]
    pub tools_dir: Option<PathBuf>,

    /// Print internal debug events on stderr
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Build the immutable run configuration.
    pub fn into_config(self) -> Result<Config> {
        let exe = env::current_exe().context("Failed to locate the running executable")?;
        let tools_dir = match self.tools_dir {
            Some(dir) => dir,
            None => exe
                .parent()
                .map(PathBuf::from)
                .with_context(|| format!("{} has no parent directory", exe.display()))?,
        };
        let program_name = exe
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());

        Ok(Config::new(self.binary.unwrap_or_default(), tools_dir)
            .with_verbose(self.verbose)
            .with_program_name(program_name))
    }
}
