// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Flash firmware onto an RP2040 through `elf2uf2` and `picotool`.
//!
//! The ELF is converted to UF2, the device is polled in BOOTSEL mode until it
//! shows up, then the image is loaded and the device rebooted.

pub mod cli;
pub mod config;
pub mod pipeline;
pub mod report;
pub mod retry;
pub mod runner;

pub use config::Config;
pub use pipeline::{FlashError, Stage};
pub use report::Reporter;
pub use retry::{RetryPolicy, Sleeper, ThreadSleeper};
pub use runner::{Failure, Invocation, Outcome, RunMode, Runner, SystemRunner};
