// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations and the plumbing they share.

pub mod layout;
pub mod select;

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use anyhow::Context;
use split_planner::{ColorChoice, SplitConfig, TestItem};
use tracing_subscriber::EnvFilter;

/// Output format for the selected tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// One test name per line.
    #[default]
    Text,
    /// The partition as JSON.
    Json,
}

/// Arguments shared by every subcommand.
#[derive(Debug, clap::Args)]
pub struct SplitArgs {
    /// File with one discovered test name per line ("-" or absent reads stdin).
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// The number of groups to split the tests into.
    #[arg(long = "test-group-count")]
    pub group_count: Option<usize>,

    /// The group of tests that should be executed.
    #[arg(long = "test-group")]
    pub group_id: Option<usize>,

    /// Integer to seed pseudo-random test selection.
    #[arg(long = "test-group-random-seed", allow_negative_numbers = true)]
    pub seed: Option<i64>,

    /// Path to a JSON file pinning tests to groups.
    #[arg(long = "test-group-prescheduled")]
    pub prescheduled: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

impl SplitArgs {
    fn as_config(&self, color: Option<ColorChoice>) -> SplitConfig {
        SplitConfig {
            group_count: self.group_count,
            group_id: self.group_id,
            seed: self.seed,
            prescheduled: self.prescheduled.clone(),
            color,
        }
    }
}

/// Initialises the tracing subscriber on stderr.
///
/// `RUST_LOG` wins when set; otherwise the level follows `-v` count.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Merges the optional TOML config with the command-line flags.
pub fn load_config(
    path: Option<&Path>,
    args: &SplitArgs,
    color: Option<ColorChoice>,
) -> anyhow::Result<SplitConfig> {
    let file = match path {
        Some(path) => SplitConfig::from_file(path)?,
        None => SplitConfig::default(),
    };
    let config = file.merge(args.as_config(color));
    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

/// Reads the discovered test names, skipping blank lines.
pub fn read_items(input: Option<&Path>) -> anyhow::Result<Vec<TestItem>> {
    let names = match input {
        Some(path) if path != Path::new("-") => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("cannot open test list '{}'", path.display()))?;
            collect_names(io::BufReader::new(file))?
        }
        _ => collect_names(io::stdin().lock())?,
    };
    tracing::debug!("read {} test names", names.len());
    Ok(TestItem::sequence(names))
}

fn collect_names<R: BufRead>(reader: R) -> anyhow::Result<Vec<String>> {
    let mut names = Vec::new();
    for line in reader.lines() {
        let line = line.context("cannot read test list")?;
        let name = line.trim();
        if !name.is_empty() {
            names.push(name.to_string());
        }
    }
    Ok(names)
}
