// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `split-tests select` command: print the tests one group should run.
//!
//! The selected names go to stdout so they can be piped into the test
//! runner; the group report and any warnings go to stderr.

use std::io::Write;

use split_planner::{Planner, SplitConfig, TerminalReporter};

use super::{read_items, Format, SplitArgs};

pub fn execute(config: SplitConfig, args: SplitArgs) -> anyhow::Result<()> {
    let items = read_items(args.input.as_deref())?;
    let request = config.to_request();

    let mut planner = Planner::with_reporter(TerminalReporter::stderr(config.color()));
    let partition = match config.prescheduled_source() {
        Some(source) => planner.plan_with_source(&items, &request, &source)?,
        None => planner.plan(&items, &request)?,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        Format::Text => {
            for name in partition.names() {
                writeln!(out, "{name}")?;
            }
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut out, &partition)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}
