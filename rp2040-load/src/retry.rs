// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Bounded-retry device acquisition.
//!
//! The device probe is run once unconditionally and then retried on a fixed
//! interval until it succeeds or the attempt budget is spent. The attempt
//! budget counts the first invocation, so `N` attempts means `N - 1` delays.

use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::pipeline::FlashError;
use crate::report::Reporter;
use crate::runner::{Invocation, RunMode, Runner};

/// Total number of probe invocations, including the first one.
pub const MAX_PROBE_ATTEMPTS: u32 = 20;

/// Delay between two probe invocations.
pub const PROBE_INTERVAL: Duration = Duration::from_millis(500);

/// Attempt budget and pacing of the probe loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl RetryPolicy {
    /// A budget of 0 is raised to 1; the first probe always runs.
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            interval,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(MAX_PROBE_ATTEMPTS, PROBE_INTERVAL)
    }
}

/// State of the probe loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbeState {
    /// Running the zero-based attempt.
    Probing(u32),
    Succeeded,
    FailedFinal,
}

impl ProbeState {
    /// Next state after the current attempt finished. Terminal states are absorbing.
    pub fn advance(self, succeeded: bool, policy: &RetryPolicy) -> ProbeState {
        match self {
            ProbeState::Probing(_) if succeeded => ProbeState::Succeeded,
            ProbeState::Probing(attempt) if attempt + 1 >= policy.max_attempts => {
                ProbeState::FailedFinal
            }
            ProbeState::Probing(attempt) => ProbeState::Probing(attempt + 1),
            terminal => terminal,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProbeState::Probing(_))
    }
}

/// Blocking delay, abstracted so the loop can be driven without real waits.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the current thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Run `probe` until it succeeds or the budget is exhausted.
///
/// Returns the number of invocations performed on success. On exhaustion the
/// last failure and its captured output are returned as
/// [`FlashError::DeviceNotFound`].
pub fn acquire(
    runner: &dyn Runner,
    sleeper: &dyn Sleeper,
    reporter: &Reporter,
    probe: &Invocation,
    policy: &RetryPolicy,
) -> Result<u32, FlashError> {
    let mut attempt = 0;

    loop {
        let outcome = runner.run(probe, RunMode::SPINNER, reporter);
        let Err(source) = outcome.result else {
            debug!(attempts = attempt + 1, "device found");
            return Ok(attempt + 1);
        };

        match ProbeState::Probing(attempt).advance(false, policy) {
            ProbeState::Probing(next_attempt) => {
                debug!(attempt, error = %source, "probe failed, retrying");
                sleeper.sleep(policy.interval);
                attempt = next_attempt;
            }
            _ => {
                debug!(attempts = attempt + 1, "device not found, giving up");
                return Err(FlashError::DeviceNotFound {
                    attempts: attempt + 1,
                    source,
                    output: outcome.output,
                });
            }
        }
    }
}
