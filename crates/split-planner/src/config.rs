// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Split configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! group_count = 4
//! group_id = 2
//! seed = 1234
//! prescheduled = "ci/prescheduled.json"
//! color = "auto"
//! ```
//!
//! Every key is optional; an empty file describes a run without splitting.

use std::path::{Path, PathBuf};

use crate::prescheduled::JsonFileSource;
use crate::report::ColorChoice;
use crate::{PlannerError, ScheduleRequest};

/// Configuration for one split run.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SplitConfig {
    /// Number of groups to split the tests into.
    pub group_count: Option<usize>,
    /// 1-based id of the group to run.
    pub group_id: Option<usize>,
    /// Seed for shuffling the unscheduled pool.
    pub seed: Option<i64>,
    /// Path to a JSON file pinning tests to groups.
    pub prescheduled: Option<PathBuf>,
    /// Whether reports use ANSI colors. `None` leaves the choice to a
    /// lower layer, or [`ColorChoice::Auto`] when nothing sets it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorChoice>,
}

impl SplitConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, PlannerError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PlannerError::ConfigError(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, PlannerError> {
        toml::from_str(toml_str)
            .map_err(|e| PlannerError::ConfigError(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, PlannerError> {
        toml::to_string_pretty(self)
            .map_err(|e| PlannerError::ConfigError(format!("TOML serialise error: {e}")))
    }

    /// Overlays `other` on top of `self`: every value set in `other` wins.
    pub fn merge(self, other: SplitConfig) -> SplitConfig {
        SplitConfig {
            group_count: other.group_count.or(self.group_count),
            group_id: other.group_id.or(self.group_id),
            seed: other.seed.or(self.seed),
            prescheduled: other.prescheduled.or(self.prescheduled),
            color: other.color.or(self.color),
        }
    }

    /// The effective color choice.
    pub fn color(&self) -> ColorChoice {
        self.color.unwrap_or_default()
    }

    /// Builds the schedule request; prescheduled slots are left to
    /// [`SplitConfig::prescheduled_source`].
    pub fn to_request(&self) -> ScheduleRequest {
        ScheduleRequest {
            group_count: self.group_count,
            group_id: self.group_id,
            seed: self.seed,
            prescheduled: None,
        }
    }

    /// Returns the JSON source for the prescheduled file, if one is set.
    pub fn prescheduled_source(&self) -> Option<JsonFileSource> {
        self.prescheduled.as_ref().map(JsonFileSource::new)
    }
}
