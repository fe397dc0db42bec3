// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Prescheduled assignments: tests pinned to specific groups.
//!
//! # Format
//! A JSON array with one slot per group. Slot `i` lists, in order, the test
//! names pinned to group `i + 1`:
//!
//! ```json
//! [["test_a", "test_b"], ["test_c"]]
//! ```
//!
//! Where the data comes from is abstracted behind [`PrescheduleSource`], so
//! the planner itself never touches the filesystem.

use std::path::{Path, PathBuf};

use crate::PrescheduleWarning;

/// Supplies the raw prescheduled slots.
pub trait PrescheduleSource {
    /// Loads the slots, or explains why prescheduling must be skipped.
    fn load(&self) -> Result<Vec<Vec<String>>, PrescheduleWarning>;
}

/// Reads prescheduled slots from a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PrescheduleSource for JsonFileSource {
    fn load(&self) -> Result<Vec<Vec<String>>, PrescheduleWarning> {
        let content =
            std::fs::read_to_string(&self.path).map_err(|source| PrescheduleWarning::Unreadable {
                path: self.path.clone(),
                source,
            })?;
        parse_slots(&content)
    }
}

/// Serves a fixed set of slots, e.g. from a config file or a test.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    slots: Vec<Vec<String>>,
}

impl InMemorySource {
    pub fn new(slots: Vec<Vec<String>>) -> Self {
        Self { slots }
    }
}

impl PrescheduleSource for InMemorySource {
    fn load(&self) -> Result<Vec<Vec<String>>, PrescheduleWarning> {
        Ok(self.slots.clone())
    }
}

/// Parses prescheduled slots from JSON text.
pub fn parse_slots(json: &str) -> Result<Vec<Vec<String>>, PrescheduleWarning> {
    serde_json::from_str(json).map_err(|source| PrescheduleWarning::Malformed { source })
}

/// Checks that `slots` has exactly one entry per group.
pub(crate) fn check_slots(
    slots: &[Vec<String>],
    group_count: usize,
) -> Result<(), PrescheduleWarning> {
    if slots.len() != group_count {
        return Err(PrescheduleWarning::SlotMismatch {
            expected: group_count,
            found: slots.len(),
        });
    }
    Ok(())
}
