// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! External command execution.
//!
//! A command is spawned directly (never through a shell), its stdout and
//! stderr are merged into one pipe and drained into a capture buffer. When
//! forwarding is requested the same chunks are echoed to the reporter as
//! they arrive, so capture and pass-through always both happen.

use std::ffi::OsString;
use std::fmt;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::debug;

use crate::report::{ProgressTicker, Reporter};

const READ_CHUNK_SIZE: usize = 1024;

/// Program plus arguments, passed to the OS verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {:?}", arg)?;
        }
        Ok(())
    }
}

/// How a command's output is presented while it runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunMode {
    /// Echo output to the terminal (only effective in verbose mode).
    pub forward: bool,
    /// Show the progress marker while the command runs.
    pub spinner: bool,
}

impl RunMode {
    pub const SILENT: RunMode = RunMode {
        forward: false,
        spinner: false,
    };
    pub const FORWARD: RunMode = RunMode {
        forward: true,
        spinner: false,
    };
    pub const SPINNER: RunMode = RunMode {
        forward: false,
        spinner: true,
    };
}

/// Why a command did not succeed.
#[derive(Debug, Error)]
pub enum Failure {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {}", describe_code(.code))]
    Exit { program: String, code: Option<i32> },

    #[error("I/O error while running {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

/// Result of one command execution.
#[derive(Debug)]
pub struct Outcome {
    pub result: Result<(), Failure>,
    /// Merged stdout and stderr.
    pub output: String,
}

impl Outcome {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            result: Ok(()),
            output: output.into(),
        }
    }

    pub fn failure(failure: Failure, output: impl Into<String>) -> Self {
        Self {
            result: Err(failure),
            output: output.into(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Something that can run an [`Invocation`] to completion.
pub trait Runner {
    fn run(&self, invocation: &Invocation, mode: RunMode, reporter: &Reporter) -> Outcome;
}

/// Runs commands as real child processes.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&self, invocation: &Invocation, mode: RunMode, reporter: &Reporter) -> Outcome {
        let program = invocation.program_name();
        debug!(command = %invocation, ?mode, "spawning");

        let (mut reader, writer) = match io::pipe() {
            Ok(pipe) => pipe,
            Err(source) => return Outcome::failure(Failure::Spawn { program, source }, ""),
        };
        let writer_err = match writer.try_clone() {
            Ok(w) => w,
            Err(source) => return Outcome::failure(Failure::Spawn { program, source }, ""),
        };

        let mut command = Command::new(invocation.program());
        command.args(invocation.args()).stdout(writer).stderr(writer_err);
        hide_console_window(&mut command);

        let spawned = command.spawn();
        // Release our write ends so the read loop sees EOF when the child exits.
        drop(command);

        let mut child = match spawned {
            Ok(child) => child,
            Err(source) => {
                debug!(%program, error = %source, "spawn failed");
                return Outcome::failure(Failure::Spawn { program, source }, "");
            }
        };

        let mut ticker = mode.spinner.then(|| ProgressTicker::start(reporter));
        let mut captured = Vec::new();
        let mut buf = [0u8; READ_CHUNK_SIZE];
        let mut read_error = None;

        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if let Some(ticker) = ticker.as_mut() {
                        ticker.poll(reporter);
                    }
                    if mode.forward {
                        reporter.forward(&buf[..n]);
                    }
                    captured.extend_from_slice(&buf[..n]);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    read_error = Some(e);
                    break;
                }
            }
        }

        let status = child.wait();
        let output = String::from_utf8_lossy(&captured).into_owned();

        let result = match (read_error, status) {
            (Some(source), _) | (None, Err(source)) => Err(Failure::Io { program, source }),
            (None, Ok(status)) if status.success() => Ok(()),
            (None, Ok(status)) => Err(Failure::Exit {
                program,
                code: status.code(),
            }),
        };

        match &result {
            Ok(()) => debug!(bytes = captured.len(), "command succeeded"),
            Err(e) => debug!(bytes = captured.len(), error = %e, "command failed"),
        }

        Outcome { result, output }
    }
}

#[cfg(windows)]
fn hide_console_window(command: &mut Command) {
    use std::os::windows::process::CommandExt;

    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    command.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(windows))]
fn hide_console_window(_command: &mut Command) {}
