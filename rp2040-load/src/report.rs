// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! User-facing output: the verbose channel and the progress marker.
//!
//! Everything goes to a single sink (stdout in the binary). Verbose text is
//! dropped unless verbose logging is enabled; progress markers and the final
//! blank line are always written.

use std::cell::RefCell;
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Character emitted by the progress indicator.
pub const PROGRESS_MARKER: &str = ".";

/// Minimum time between two progress markers.
pub const PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

/// Output sink shared by the runner, the retry loop and the pipeline.
pub struct Reporter {
    verbose: bool,
    out: RefCell<Box<dyn Write>>,
}

impl Reporter {
    /// Reporter writing to the process's stdout.
    pub fn stdout(verbose: bool) -> Self {
        Self::with_writer(verbose, io::stdout())
    }

    pub fn with_writer(verbose: bool, writer: impl Write + 'static) -> Self {
        Self {
            verbose,
            out: RefCell::new(Box::new(writer)),
        }
    }

    /// Print on the verbose channel, without newline.
    pub fn verbose(&self, msg: &str) {
        if self.verbose {
            self.write(msg.as_bytes());
        }
    }

    /// Print a line on the verbose channel.
    pub fn verbose_line(&self, msg: &str) {
        if self.verbose {
            self.write(msg.as_bytes());
            self.write(b"\n");
        }
    }

    /// Pass through a chunk of child process output.
    pub fn forward(&self, chunk: &[u8]) {
        if self.verbose {
            self.write(chunk);
        }
    }

    /// Emit one progress marker.
    pub fn marker(&self) {
        self.write(PROGRESS_MARKER.as_bytes());
    }

    pub fn blank_line(&self) {
        self.write(b"\n");
    }

    // Terminal write errors are not actionable here.
    fn write(&self, bytes: &[u8]) {
        let mut out = self.out.borrow_mut();
        let _ = out.write_all(bytes);
        let _ = out.flush();
    }
}

/// Time-based progress indicator, polled from the output read loop.
#[derive(Debug)]
pub struct ProgressTicker {
    last: Instant,
}

impl ProgressTicker {
    /// Emit the initial marker and start timing.
    pub fn start(reporter: &Reporter) -> Self {
        reporter.marker();
        Self {
            last: Instant::now(),
        }
    }

    /// Emit a marker if more than [`PROGRESS_INTERVAL`] passed since the last one.
    /// Returns whether a marker was written.
    pub fn poll(&mut self, reporter: &Reporter) -> bool {
        if self.last.elapsed() > PROGRESS_INTERVAL {
            reporter.marker();
            self.last = Instant::now();
            true
        } else {
            false
        }
    }
}
