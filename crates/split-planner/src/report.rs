// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Human-readable reporting of the selection and of prescheduling warnings.
//!
//! Reporting is observation only: nothing the planner returns depends on
//! it, and write failures are logged and dropped.

use std::io::{self, IsTerminal, Write};

use crate::{Partition, PrescheduleWarning};

const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Receives what the planner wants to tell the user.
pub trait Reporter {
    /// Prescheduling was skipped for this run.
    fn warn(&mut self, warning: &PrescheduleWarning);

    /// The planner settled on a selection.
    fn selection(&mut self, partition: &Partition);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn warn(&mut self, _warning: &PrescheduleWarning) {}

    fn selection(&mut self, _partition: &Partition) {}
}

/// Whether to emit ANSI color codes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Color when the stream is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Resolves the choice for a concrete stream.
    pub fn enabled_for<S: IsTerminal>(self, stream: &S) -> bool {
        match self {
            ColorChoice::Auto => stream.is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            other => Err(format!(
                "unknown color choice '{other}'; expected 'auto', 'always', or 'never'"
            )),
        }
    }
}

/// Writes the group header and the selected names to a terminal-like stream.
///
/// ```text
///
/// Running test group #1 (3 tests)
/// test_a
/// test_b
/// test_c
/// ```
#[derive(Debug)]
pub struct TerminalReporter<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> TerminalReporter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    /// Consumes the reporter and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_styled(&mut self, text: &str) {
        let result = if self.color {
            write!(self.out, "{YELLOW}{text}{RESET}")
        } else {
            self.out.write_all(text.as_bytes())
        };
        if let Err(e) = result.and_then(|()| self.out.flush()) {
            tracing::debug!("report write failed: {e}");
        }
    }
}

impl TerminalReporter<io::Stderr> {
    /// Reports to standard error, honouring `color`.
    pub fn stderr(color: ColorChoice) -> Self {
        let out = io::stderr();
        let color = color.enabled_for(&out);
        Self::new(out, color)
    }
}

impl<W: Write> Reporter for TerminalReporter<W> {
    fn warn(&mut self, warning: &PrescheduleWarning) {
        self.write_styled(&format!(
            "WARNING: {warning}. Prescheduling will be skipped.\n"
        ));
    }

    fn selection(&mut self, partition: &Partition) {
        self.write_styled(&format!("\n{}\n", partition.summary()));
        let mut names = partition.names().join("\n");
        names.push('\n');
        self.write_styled(&names);
    }
}
