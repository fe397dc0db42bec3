// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `split-tests layout` command: dry run over every group.
//!
//! Computes each group's selection exactly as the shards would, prints
//! them, and fails if some test would run in no group or in several.

use std::io::Write;

use split_planner::{Planner, SplitConfig, TerminalReporter};

use super::{read_items, Format, SplitArgs};

pub fn execute(config: SplitConfig, args: SplitArgs) -> anyhow::Result<()> {
    let items = read_items(args.input.as_deref())?;
    let request = config.to_request();

    let mut planner = Planner::with_reporter(TerminalReporter::stderr(config.color()));
    let layout = match config.prescheduled_source() {
        Some(source) => planner.layout_with_source(&items, &request, &source)?,
        None => planner.layout(&items, &request)?,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        Format::Text => {
            for group in &layout.groups {
                writeln!(out, "# {}", group.summary())?;
                for name in group.names() {
                    writeln!(out, "{name}")?;
                }
            }
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut out, &layout)?;
            writeln!(out)?;
        }
    }
    out.flush()?;

    // Pinning a name in two slots, for instance, runs it twice.
    if let Err(e) = layout.validate(&items) {
        tracing::warn!("{e}");
        return Err(e.into());
    }
    tracing::info!("{}", layout.summary());
    Ok(())
}
