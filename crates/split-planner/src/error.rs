// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error and warning types for the split planner.
//!
//! [`PlannerError`] is fatal: it means the group arguments cannot produce a
//! meaningful selection and the run should abort. [`PrescheduleWarning`] is
//! recoverable: prescheduling is switched off for the run and planning
//! carries on with the even split alone.

use std::path::PathBuf;

/// Errors that abort planning.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlannerError {
    /// The target group id is not in `1..=group_count`.
    #[error("invalid test-group argument: group {group_id} is outside 1..={group_count}")]
    GroupOutOfRange { group_id: usize, group_count: usize },

    /// The target group's slice starts past the end of the unscheduled pool.
    #[error(
        "invalid test-group argument: group {group_id} starts at {start} \
         but only {pool_len} unscheduled tests exist"
    )]
    GroupBeyondPool {
        group_id: usize,
        start: usize,
        pool_len: usize,
    },

    /// A layout was asked for more groups than there are tests.
    #[error("invalid test-group argument: {group_count} groups for {tests} tests")]
    TooManyGroups { group_count: usize, tests: usize },

    /// A partition does not describe a subsequence of the discovered tests.
    #[error("invalid partition: {detail}")]
    InvalidPartition { detail: String },

    /// The groups of a layout do not cover the discovered tests exactly once.
    #[error("incomplete layout: {detail}")]
    IncompleteLayout { detail: String },

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

/// Conditions that disable prescheduling for a single run.
#[derive(Debug, thiserror::Error)]
pub enum PrescheduleWarning {
    /// The prescheduled file is missing or could not be read.
    #[error("unable to load prescheduled tests from '{}': {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The prescheduled data is not a JSON array of arrays of strings.
    #[error("unable to parse prescheduled tests: {source}")]
    Malformed {
        #[source]
        source: serde_json::Error,
    },

    /// The number of prescheduled slots differs from the group count.
    #[error(
        "prescheduled tests do not match up with the group count \
         ({found} slots for {expected} groups)"
    )]
    SlotMismatch { expected: usize, found: usize },
}
