// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Partitions: the output of the planner.
//!
//! A [`Partition`] is the subset of discovered tests one group should run,
//! kept in discovery order. A [`Layout`] holds the partitions of every
//! group for a single request and can check that together they cover the
//! discovered tests exactly once.

use crate::{PlannerError, TestItem};

/// The tests selected for one group.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Partition {
    /// 1-based id of the group, `None` when splitting was not requested.
    pub group_id: Option<usize>,
    /// Number of groups the tests were split into.
    pub group_count: Option<usize>,
    /// Even-split size of a group's share of the unscheduled pool.
    pub group_size: usize,
    /// How many of `items` were pinned to this group by prescheduling.
    pub prescheduled_count: usize,
    /// Selected tests, sorted by discovery position.
    pub items: Vec<TestItem>,
}

impl Partition {
    /// A partition holding every item, used when splitting is disabled.
    pub fn unfiltered(items: &[TestItem]) -> Self {
        Self {
            group_id: None,
            group_count: None,
            group_size: items.len(),
            prescheduled_count: 0,
            items: items.to_vec(),
        }
    }

    /// Returns the number of selected tests.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no test was selected.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Names of the selected tests, in discovery order.
    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(TestItem::name).collect()
    }

    /// Discovery positions of the selected tests.
    pub fn positions(&self) -> Vec<usize> {
        self.items.iter().map(TestItem::position).collect()
    }

    /// Filters the host's own items down to this partition.
    ///
    /// `host_items` must be in the same order as the sequence the partition
    /// was planned from; elements at unselected positions are dropped.
    pub fn apply<T>(&self, host_items: Vec<T>) -> Vec<T> {
        let mut keep = vec![false; host_items.len()];
        for pos in self.positions() {
            if let Some(slot) = keep.get_mut(pos) {
                *slot = true;
            }
        }
        host_items
            .into_iter()
            .zip(keep)
            .filter_map(|(item, keep)| keep.then_some(item))
            .collect()
    }

    /// Validates the partition against the sequence it was planned from.
    ///
    /// Checks:
    /// - Every position exists in `items` and names the same test.
    /// - Positions are strictly increasing (discovery order, no duplicates).
    /// - The prescheduled count does not exceed the selection.
    pub fn validate(&self, items: &[TestItem]) -> Result<(), PlannerError> {
        let mut previous: Option<usize> = None;

        for item in &self.items {
            let pos = item.position();
            match items.get(pos) {
                Some(original) if original.name() == item.name() => {}
                Some(original) => {
                    return Err(PlannerError::InvalidPartition {
                        detail: format!(
                            "position {pos} holds '{}', not '{}'",
                            original.name(),
                            item.name(),
                        ),
                    });
                }
                None => {
                    return Err(PlannerError::InvalidPartition {
                        detail: format!(
                            "position {pos} is past the end of {} discovered tests",
                            items.len(),
                        ),
                    });
                }
            }

            if let Some(prev) = previous {
                if pos <= prev {
                    return Err(PlannerError::InvalidPartition {
                        detail: format!("position {pos} follows {prev}"),
                    });
                }
            }
            previous = Some(pos);
        }

        if self.prescheduled_count > self.items.len() {
            return Err(PlannerError::InvalidPartition {
                detail: format!(
                    "{} prescheduled tests in a selection of {}",
                    self.prescheduled_count,
                    self.items.len(),
                ),
            });
        }

        Ok(())
    }

    /// Returns the one-line header shown before the selected names.
    pub fn summary(&self) -> String {
        match self.group_id {
            Some(id) => format!("Running test group #{id} ({} tests)", self.len()),
            None => format!("Running all {} tests (no test group requested)", self.len()),
        }
    }
}

/// The partitions of every group for one request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Layout {
    /// One partition per group, ordered by group id.
    pub groups: Vec<Partition>,
}

impl Layout {
    /// Returns the number of groups.
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// Returns the total number of selected tests across all groups.
    pub fn total_tests(&self) -> usize {
        self.groups.iter().map(Partition::len).sum()
    }

    /// Validates every group and checks that together they select each
    /// discovered test exactly once.
    pub fn validate(&self, items: &[TestItem]) -> Result<(), PlannerError> {
        let mut seen = vec![0usize; items.len()];

        for group in &self.groups {
            group.validate(items)?;
            for pos in group.positions() {
                seen[pos] += 1;
            }
        }

        let missing: Vec<&str> = items
            .iter()
            .zip(&seen)
            .filter(|(_, &count)| count == 0)
            .map(|(item, _)| item.name())
            .collect();
        if !missing.is_empty() {
            return Err(PlannerError::IncompleteLayout {
                detail: format!("no group runs {missing:?}"),
            });
        }

        let repeated: Vec<&str> = items
            .iter()
            .zip(&seen)
            .filter(|(_, &count)| count > 1)
            .map(|(item, _)| item.name())
            .collect();
        if !repeated.is_empty() {
            return Err(PlannerError::IncompleteLayout {
                detail: format!("more than one group runs {repeated:?}"),
            });
        }

        Ok(())
    }

    /// Returns a one-line description of the group sizes.
    pub fn summary(&self) -> String {
        let sizes: Vec<usize> = self.groups.iter().map(Partition::len).collect();
        format!(
            "{} groups, {} tests total, group sizes: {:?}",
            self.num_groups(),
            self.total_tests(),
            sizes,
        )
    }
}
