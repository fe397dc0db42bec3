// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The parameters of one planning run.

use crate::order::{DiscoveryOrder, PoolOrder, SeededShuffle};
use crate::PlannerError;

/// What the host asked for: how many groups, which one to run, and the
/// optional seed and prescheduled assignment.
///
/// A `group_count` or `group_id` that is `None` or `0` means splitting was
/// not requested; the planner then hands every item back untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleRequest {
    /// Number of groups to split the tests into.
    pub group_count: Option<usize>,
    /// 1-based id of the group to run.
    pub group_id: Option<usize>,
    /// Seed for shuffling the unscheduled pool. `None` keeps discovery order.
    pub seed: Option<i64>,
    /// Pinned test names per group; slot `i` belongs to group `i + 1`.
    pub prescheduled: Option<Vec<Vec<String>>>,
}

impl ScheduleRequest {
    /// Creates a request for group `group_id` out of `group_count`.
    pub fn new(group_count: usize, group_id: usize) -> Self {
        Self {
            group_count: Some(group_count),
            group_id: Some(group_id),
            ..Default::default()
        }
    }

    /// Sets the shuffle seed.
    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the prescheduled assignment.
    pub fn with_prescheduled(mut self, prescheduled: Vec<Vec<String>>) -> Self {
        self.prescheduled = Some(prescheduled);
        self
    }

    /// Returns `(group_count, group_id)` when splitting was requested.
    pub fn target(&self) -> Option<(usize, usize)> {
        match (self.group_count, self.group_id) {
            (Some(count), Some(id)) if count > 0 && id > 0 => Some((count, id)),
            _ => None,
        }
    }

    /// Returns `true` if splitting was requested.
    pub fn is_enabled(&self) -> bool {
        self.target().is_some()
    }

    /// Checks that the target group lies in `1..=group_count`.
    ///
    /// A disabled request is always valid.
    pub fn validate(&self) -> Result<(), PlannerError> {
        match self.target() {
            Some((group_count, group_id)) if group_id > group_count => {
                Err(PlannerError::GroupOutOfRange {
                    group_id,
                    group_count,
                })
            }
            _ => Ok(()),
        }
    }

    /// Creates the pool ordering this request calls for.
    pub fn pool_order(&self) -> Box<dyn PoolOrder> {
        match self.seed {
            Some(seed) => Box::new(SeededShuffle::new(seed)),
            None => Box::new(DiscoveryOrder::new()),
        }
    }
}
