// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Run configuration, built once at startup and never mutated.

use std::env::consts::EXE_SUFFIX;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::retry::RetryPolicy;

/// File name of the ELF to UF2 converter, without platform suffix.
pub const CONVERTER_NAME: &str = "elf2uf2";

/// File name of the device management tool, without platform suffix.
pub const LOADER_NAME: &str = "picotool";

/// Immutable settings for a single flashing run.
#[derive(Clone, Debug)]
pub struct Config {
    /// Enables the verbose logging channel on stdout.
    pub verbose: bool,
    /// ELF file to convert and load.
    pub binary: PathBuf,
    /// Directory holding `elf2uf2` and `picotool`.
    pub tools_dir: PathBuf,
    /// Device probe retry budget.
    pub retry: RetryPolicy,
    /// Name shown in the verbose banner.
    pub program_name: String,
}

impl Config {
    pub fn new(binary: impl Into<PathBuf>, tools_dir: impl Into<PathBuf>) -> Self {
        Self {
            verbose: false,
            binary: binary.into(),
            tools_dir: tools_dir.into(),
            retry: RetryPolicy::default(),
            program_name: env!("CARGO_PKG_NAME").to_string(),
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_program_name(mut self, name: impl Into<String>) -> Self {
        self.program_name = name.into();
        self
    }

    /// Full path of the converter executable.
    pub fn converter(&self) -> PathBuf {
        tool_path(&self.tools_dir, CONVERTER_NAME)
    }

    /// Full path of the device management executable.
    pub fn loader(&self) -> PathBuf {
        tool_path(&self.tools_dir, LOADER_NAME)
    }

    /// Path of the UF2 image produced next to the ELF.
    pub fn image(&self) -> PathBuf {
        uf2_path(&self.binary)
    }
}

fn tool_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}{EXE_SUFFIX}"))
}

/// Append `.uf2` to `elf`, keeping its existing extension (`fw.elf` -> `fw.elf.uf2`).
pub fn uf2_path(elf: &Path) -> PathBuf {
    let mut name = OsString::from(elf.as_os_str());
    name.push(".uf2");
    PathBuf::from(name)
}
