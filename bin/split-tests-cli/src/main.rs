// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # split-tests
//!
//! Command-line interface for the split planner.
//!
//! ## Usage
//! ```bash
//! # Run shard 2 of 4 from a list of discovered test names
//! cargo test -- --list --format terse | sed 's/: test$//' \
//!     | split-tests select --test-group-count 4 --test-group 2
//!
//! # Shuffle with a seed and pin slow tests to groups
//! split-tests select --input tests.txt --test-group-count 4 --test-group 1 \
//!     --test-group-random-seed 1234 --test-group-prescheduled ci/pinned.json
//!
//! # Dry run: show every group
//! split-tests layout --input tests.txt --test-group-count 4
//! ```

mod commands;

use clap::{Parser, Subcommand};
use split_planner::ColorChoice;

#[derive(Parser)]
#[command(
    name = "split-tests",
    about = "Split a test collection into evenly sized groups and pick one",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file (CLI arguments override it).
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Color the group report: auto, always, never.
    #[arg(long, global = true)]
    color: Option<ColorChoice>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tests one group should run.
    Select {
        #[command(flatten)]
        split: commands::SplitArgs,
    },

    /// Print every group's tests and check that together they cover the collection.
    Layout {
        #[command(flatten)]
        split: commands::SplitArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    match cli.command {
        Commands::Select { split } => {
            let config = commands::load_config(cli.config.as_deref(), &split, cli.color)?;
            commands::select::execute(config, split)
        }
        Commands::Layout { split } => {
            let config = commands::load_config(cli.config.as_deref(), &split, cli.color)?;
            commands::layout::execute(config, split)
        }
    }
}
