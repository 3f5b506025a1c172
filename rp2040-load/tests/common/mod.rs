// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Duration;

use rp2040_load::{Failure, Invocation, Outcome, Reporter, RunMode, Runner, Sleeper};

/// In-memory stdout replacement.
#[derive(Clone, Default)]
pub struct Sink(Rc<RefCell<Vec<u8>>>);

impl Sink {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    pub fn reporter(&self, verbose: bool) -> Reporter {
        Reporter::with_writer(verbose, self.clone())
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Recorded runner call.
#[derive(Clone, Debug)]
pub struct Call {
    pub invocation: Invocation,
    pub mode: RunMode,
}

impl Call {
    pub fn args(&self) -> Vec<String> {
        self.invocation
            .args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

/// Runner answering from a script of results; succeeds once the script runs out.
/// Forwarded stages echo the canned output, like the real runner does.
#[derive(Default)]
pub struct ScriptedRunner {
    script: RefCell<VecDeque<bool>>,
    calls: RefCell<Vec<Call>>,
    output: String,
}

impl ScriptedRunner {
    pub fn new(script: impl IntoIterator<Item = bool>) -> Self {
        Self {
            script: RefCell::new(script.into_iter().collect()),
            calls: RefCell::new(Vec::new()),
            output: String::new(),
        }
    }

    /// Always fails.
    pub fn failing(n: usize) -> Self {
        Self::new(std::iter::repeat(false).take(n))
    }

    pub fn with_output(mut self, output: &str) -> Self {
        self.output = output.to_string();
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl Runner for ScriptedRunner {
    fn run(&self, invocation: &Invocation, mode: RunMode, reporter: &Reporter) -> Outcome {
        if mode.forward {
            reporter.forward(self.output.as_bytes());
        }
        self.calls.borrow_mut().push(Call {
            invocation: invocation.clone(),
            mode,
        });
        let ok = self.script.borrow_mut().pop_front().unwrap_or(true);
        if ok {
            Outcome::success(self.output.clone())
        } else {
            Outcome::failure(
                Failure::Exit {
                    program: invocation.program().display().to_string(),
                    code: Some(1),
                },
                self.output.clone(),
            )
        }
    }
}

/// Sleeper recording requested delays without waiting.
#[derive(Default)]
pub struct RecordingSleeper {
    pub delays: RefCell<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn count(&self) -> usize {
        self.delays.borrow().len()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.delays.borrow_mut().push(duration);
    }
}
