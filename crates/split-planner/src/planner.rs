// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The planner: selects one group's share of the discovered tests.
//!
//! # Algorithm
//!
//! ```text
//! items ──► split pools ──► order unscheduled ──► slice group ──► + pinned ──► sort by position
//!              │                (PoolOrder)       ceil(n / count)
//!              └─ names in any prescheduled slot leave the unscheduled pool
//! ```
//!
//! Every shard of a CI run computes the same pools and the same ordering,
//! so the even-split slices of all groups are disjoint and cover the
//! unscheduled pool.

use std::collections::HashMap;

use crate::order::PoolOrder;
use crate::prescheduled::{check_slots, PrescheduleSource};
use crate::report::{NoopReporter, Reporter};
use crate::{Layout, Partition, PlannerError, PrescheduleWarning, ScheduleRequest, TestItem};

/// Returns the even-split group size: `ceil(total_items / group_count)`.
///
/// The last groups may be smaller, or empty when the pool runs out.
pub fn group_size(total_items: usize, group_count: usize) -> usize {
    total_items.div_ceil(group_count.max(1))
}

/// Returns the 1-based `group_id`'s slice of `pool`.
///
/// The slice is `pool[start..start + group_size]` clamped to the pool,
/// where `start = group_size * (group_id - 1)`. A start at or past the end
/// of the pool is an error.
pub fn group_slice<T>(pool: &[T], group_size: usize, group_id: usize) -> Result<&[T], PlannerError> {
    let start = group_id.checked_sub(1).map(|i| i.saturating_mul(group_size));
    match start {
        Some(start) if start < pool.len() => {
            let end = start.saturating_add(group_size).min(pool.len());
            Ok(&pool[start..end])
        }
        _ => Err(PlannerError::GroupBeyondPool {
            group_id,
            start: start.unwrap_or(0),
            pool_len: pool.len(),
        }),
    }
}

/// Plans test groups and reports the outcome.
///
/// # Example
/// ```
/// use split_planner::{Planner, ScheduleRequest, TestItem};
///
/// let items = TestItem::sequence(["a", "b", "c", "d", "e"]);
/// let partition = Planner::new()
///     .plan(&items, &ScheduleRequest::new(2, 2))
///     .unwrap();
/// assert_eq!(partition.names(), vec!["d", "e"]);
/// ```
#[derive(Debug, Default)]
pub struct Planner<R: Reporter = NoopReporter> {
    reporter: R,
}

impl Planner<NoopReporter> {
    /// Creates a planner that reports nothing.
    pub fn new() -> Self {
        Self {
            reporter: NoopReporter,
        }
    }
}

impl<R: Reporter> Planner<R> {
    /// Creates a planner that reports to `reporter`.
    pub fn with_reporter(reporter: R) -> Self {
        Self { reporter }
    }

    /// Returns the reporter.
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Consumes the planner and returns the reporter.
    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// Selects the tests the requested group should run.
    ///
    /// `items` must be the full discovered sequence as built by
    /// [`TestItem::sequence`]. When the request does not ask for splitting
    /// every item is returned unchanged and nothing is reported.
    ///
    /// # Errors
    /// [`PlannerError::GroupOutOfRange`] if the group id exceeds the group
    /// count, and [`PlannerError::GroupBeyondPool`] if the group's slice
    /// starts past the unscheduled pool while the group has no pinned tests
    /// to run instead.
    pub fn plan(
        &mut self,
        items: &[TestItem],
        request: &ScheduleRequest,
    ) -> Result<Partition, PlannerError> {
        let Some((group_count, group_id)) = request.target() else {
            tracing::debug!("no test group requested; keeping all {} tests", items.len());
            return Ok(Partition::unfiltered(items));
        };
        request.validate()?;

        let slots = self.resolve_slots(request.prescheduled.as_deref(), group_count);
        let order = request.pool_order();
        let partition = Pools::new(items, slots, group_count, order.as_ref()).group(group_id)?;

        tracing::info!(
            group_id,
            group_count,
            selected = partition.len(),
            prescheduled = partition.prescheduled_count,
            order = order.name(),
            "selected test group",
        );
        self.reporter.selection(&partition);
        Ok(partition)
    }

    /// Like [`Planner::plan`], with the prescheduled slots loaded from
    /// `source`.
    ///
    /// A source that fails to load disables prescheduling for the run; the
    /// failure is reported as a warning. The source is not consulted when
    /// splitting is disabled.
    pub fn plan_with_source(
        &mut self,
        items: &[TestItem],
        request: &ScheduleRequest,
        source: &dyn PrescheduleSource,
    ) -> Result<Partition, PlannerError> {
        if !request.is_enabled() {
            return self.plan(items, request);
        }
        let request = self.load_slots(request, source);
        self.plan(items, &request)
    }

    /// Computes the partition of every group for `request`.
    ///
    /// The request's group id is ignored. A request without a group count
    /// yields a single group holding every test. Nothing is reported except
    /// prescheduling warnings.
    ///
    /// The pools are split and ordered once and every group is a slice of
    /// them, so each group matches what [`Planner::plan`] selects for it.
    ///
    /// # Errors
    /// [`PlannerError::TooManyGroups`] when there are more groups than
    /// tests, and [`PlannerError::GroupBeyondPool`] when some group would be
    /// rejected by [`Planner::plan`].
    pub fn layout(
        &mut self,
        items: &[TestItem],
        request: &ScheduleRequest,
    ) -> Result<Layout, PlannerError> {
        let group_count = match request.group_count {
            Some(count) if count > 0 => count,
            _ => {
                return Ok(Layout {
                    groups: vec![Partition::unfiltered(items)],
                })
            }
        };

        if group_count > items.len().max(1) {
            return Err(PlannerError::TooManyGroups {
                group_count,
                tests: items.len(),
            });
        }

        let slots = self.resolve_slots(request.prescheduled.as_deref(), group_count);
        let order = request.pool_order();
        let pools = Pools::new(items, slots, group_count, order.as_ref());
        let groups = (1..=group_count)
            .map(|group_id| pools.group(group_id))
            .collect::<Result<Vec<_>, _>>()?;

        let layout = Layout { groups };
        tracing::debug!("layout: {}", layout.summary());
        Ok(layout)
    }

    /// Like [`Planner::layout`], with the prescheduled slots loaded from
    /// `source`.
    pub fn layout_with_source(
        &mut self,
        items: &[TestItem],
        request: &ScheduleRequest,
        source: &dyn PrescheduleSource,
    ) -> Result<Layout, PlannerError> {
        if !matches!(request.group_count, Some(count) if count > 0) {
            return self.layout(items, request);
        }
        let request = self.load_slots(request, source);
        self.layout(items, &request)
    }

    fn load_slots(
        &mut self,
        request: &ScheduleRequest,
        source: &dyn PrescheduleSource,
    ) -> ScheduleRequest {
        let mut request = request.clone();
        request.prescheduled = match source.load() {
            Ok(slots) => Some(slots),
            Err(warning) => {
                self.skip_prescheduling(&warning);
                None
            }
        };
        request
    }

    /// Returns the usable slots, or an empty assignment when prescheduling
    /// is absent or does not fit the group count.
    fn resolve_slots<'r>(
        &mut self,
        slots: Option<&'r [Vec<String>]>,
        group_count: usize,
    ) -> &'r [Vec<String>] {
        let Some(slots) = slots else {
            return &[];
        };
        match check_slots(slots, group_count) {
            Ok(()) => slots,
            Err(warning) => {
                self.skip_prescheduling(&warning);
                &[]
            }
        }
    }

    fn skip_prescheduling(&mut self, warning: &PrescheduleWarning) {
        tracing::warn!("{warning}; prescheduling will be skipped");
        self.reporter.warn(warning);
    }
}

/// The discovered tests split by whether prescheduling claims them, with
/// the unscheduled pool already ordered.
///
/// Built once per request; each group is then a cheap slice of the pool
/// plus its own slot's pinned tests.
struct Pools<'a> {
    items: &'a [TestItem],
    slots: &'a [Vec<String>],
    /// Last discovered index for each name.
    by_name: HashMap<&'a str, usize>,
    /// Tests no slot names, in pool order.
    unscheduled: Vec<&'a TestItem>,
    group_count: usize,
    group_size: usize,
}

impl<'a> Pools<'a> {
    fn new(
        items: &'a [TestItem],
        slots: &'a [Vec<String>],
        group_count: usize,
        order: &dyn PoolOrder,
    ) -> Self {
        // Later duplicates win, so a repeated name refers to the last test
        // discovered under it.
        let by_name: HashMap<&str, usize> = items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.name(), i))
            .collect();

        let mut claimed = vec![false; items.len()];
        for name in slots.iter().flatten() {
            if let Some(&i) = by_name.get(name.as_str()) {
                claimed[i] = true;
            }
        }

        let mut unscheduled: Vec<&TestItem> = items
            .iter()
            .zip(&claimed)
            .filter(|(_, &claimed)| !claimed)
            .map(|(item, _)| item)
            .collect();
        order.arrange(&mut unscheduled);

        let group_size = group_size(unscheduled.len(), group_count);
        tracing::debug!(
            unscheduled = unscheduled.len(),
            pinned = items.len() - unscheduled.len(),
            group_size,
            order = order.name(),
            "split pools",
        );

        Self {
            items,
            slots,
            by_name,
            unscheduled,
            group_count,
            group_size,
        }
    }

    /// Tests named in `group_id`'s slot, by discovery position, once each.
    fn pinned(&self, group_id: usize) -> Vec<&'a TestItem> {
        let mut pinned: Vec<&TestItem> = self
            .slots
            .get(group_id - 1)
            .into_iter()
            .flatten()
            .filter_map(|name| self.by_name.get(name.as_str()))
            .map(|&i| &self.items[i])
            .collect();
        pinned.sort_by_key(|item| item.position());
        pinned.dedup_by_key(|item| item.position());
        pinned
    }

    /// Selects one group's tests.
    fn group(&self, group_id: usize) -> Result<Partition, PlannerError> {
        let pinned = self.pinned(group_id);

        let slice: &[&TestItem] = match group_slice(&self.unscheduled, self.group_size, group_id) {
            Ok(slice) => slice,
            // Nothing to slice, or the group still has pinned tests to run.
            Err(_) if self.unscheduled.is_empty() || !pinned.is_empty() => &[],
            Err(e) => return Err(e),
        };

        let mut selected: Vec<TestItem> = slice
            .iter()
            .chain(pinned.iter())
            .map(|&item| item.clone())
            .collect();
        selected.sort_by_key(TestItem::position);

        Ok(Partition {
            group_id: Some(group_id),
            group_count: Some(self.group_count),
            group_size: self.group_size,
            prescheduled_count: pinned.len(),
            items: selected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prescheduled::InMemorySource;
    use crate::report::TerminalReporter;
    use pretty_assertions::assert_eq;

    fn abcde() -> Vec<TestItem> {
        TestItem::sequence(["a", "b", "c", "d", "e"])
    }

    fn slots(groups: &[&[&str]]) -> Vec<Vec<String>> {
        groups
            .iter()
            .map(|g| g.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    fn names(p: &Partition) -> Vec<String> {
        p.names().into_iter().map(String::from).collect()
    }

    fn recording() -> Planner<TerminalReporter<Vec<u8>>> {
        Planner::with_reporter(TerminalReporter::new(Vec::new(), false))
    }

    fn output(planner: Planner<TerminalReporter<Vec<u8>>>) -> String {
        String::from_utf8(planner.into_reporter().into_inner()).unwrap()
    }

    #[test]
    fn test_group_size() {
        assert_eq!(group_size(5, 2), 3);
        assert_eq!(group_size(4, 2), 2);
        assert_eq!(group_size(0, 3), 0);
        assert_eq!(group_size(2, 5), 1);
    }

    #[test]
    fn test_group_slice_clamps() {
        let pool = [1, 2, 3, 4, 5];
        assert_eq!(group_slice(&pool, 3, 1).unwrap(), &[1, 2, 3]);
        assert_eq!(group_slice(&pool, 3, 2).unwrap(), &[4, 5]);
    }

    #[test]
    fn test_group_slice_beyond_pool() {
        let pool = [1, 2];
        let result = group_slice(&pool, 1, 3);
        assert!(matches!(
            result,
            Err(PlannerError::GroupBeyondPool {
                group_id: 3,
                start: 2,
                pool_len: 2
            })
        ));
        assert!(group_slice(&pool, 1, 0).is_err());
    }

    #[test]
    fn test_even_split() {
        let items = abcde();
        let g1 = Planner::new().plan(&items, &ScheduleRequest::new(2, 1)).unwrap();
        let g2 = Planner::new().plan(&items, &ScheduleRequest::new(2, 2)).unwrap();
        assert_eq!(g1.names(), vec!["a", "b", "c"]);
        assert_eq!(g2.names(), vec!["d", "e"]);
        assert_eq!(g1.group_size, 3);
    }

    #[test]
    fn test_prescheduled_added_and_reordered() {
        let items = abcde();
        let request = ScheduleRequest::new(2, 1).with_prescheduled(slots(&[&["e"], &[]]));
        let p = Planner::new().plan(&items, &request).unwrap();
        assert_eq!(p.names(), vec!["a", "b", "e"]);
        assert_eq!(p.group_size, 2);
        assert_eq!(p.prescheduled_count, 1);
    }

    #[test]
    fn test_pinned_elsewhere_leaves_pool() {
        let items = abcde();
        let request = ScheduleRequest::new(2, 2).with_prescheduled(slots(&[&["a"], &[]]));
        let p = Planner::new().plan(&items, &request).unwrap();
        // Pool is [b, c, d, e]; group 2 gets [d, e] and never sees a.
        assert_eq!(p.names(), vec!["d", "e"]);
    }

    #[test]
    fn test_prescheduled_precedence_over_slice() {
        let items = abcde();
        // Without prescheduling, a belongs to group 1.
        let request = ScheduleRequest::new(2, 2).with_prescheduled(slots(&[&[], &["a"]]));
        let p = Planner::new().plan(&items, &request).unwrap();
        assert_eq!(p.names(), vec!["a", "d", "e"]);
    }

    #[test]
    fn test_unknown_prescheduled_names_ignored() {
        let items = abcde();
        let request =
            ScheduleRequest::new(2, 1).with_prescheduled(slots(&[&["zzz", "b"], &["nope"]]));
        let p = Planner::new().plan(&items, &request).unwrap();
        // Pool [a, c, d, e], size 2 → [a, c] + pinned b.
        assert_eq!(p.names(), vec!["a", "b", "c"]);
        assert_eq!(p.prescheduled_count, 1);
    }

    #[test]
    fn test_repeated_pinned_name_selected_once() {
        let items = abcde();
        let request = ScheduleRequest::new(2, 1).with_prescheduled(slots(&[&["e", "e"], &["e"]]));
        let p = Planner::new().plan(&items, &request).unwrap();
        assert_eq!(p.names(), vec!["a", "b", "e"]);
        p.validate(&items).unwrap();
    }

    #[test]
    fn test_slot_mismatch_disables_prescheduling() {
        let items = abcde();
        let request = ScheduleRequest::new(2, 1).with_prescheduled(slots(&[&["e"]]));
        let mut planner = recording();
        let p = planner.plan(&items, &request).unwrap();
        assert_eq!(p.names(), vec!["a", "b", "c"]);
        assert_eq!(p.prescheduled_count, 0);
        let out = output(planner);
        assert!(out.starts_with("WARNING: prescheduled tests do not match up"));
    }

    #[test]
    fn test_disabled_returns_input() {
        let items = abcde();
        let mut planner = recording();
        let p = planner.plan(&items, &ScheduleRequest::default()).unwrap();
        assert_eq!(p.items, items);
        assert_eq!(p.group_id, None);
        assert!(output(planner).is_empty());
    }

    #[test]
    fn test_group_out_of_range() {
        let result = Planner::new().plan(&abcde(), &ScheduleRequest::new(2, 3));
        assert!(matches!(
            result,
            Err(PlannerError::GroupOutOfRange {
                group_id: 3,
                group_count: 2
            })
        ));
    }

    #[test]
    fn test_group_beyond_pool() {
        let items = TestItem::sequence(["a", "b"]);
        let result = Planner::new().plan(&items, &ScheduleRequest::new(3, 3));
        assert!(matches!(result, Err(PlannerError::GroupBeyondPool { .. })));
    }

    #[test]
    fn test_group_beyond_pool_rescued_by_pinned() {
        let items = TestItem::sequence(["a", "b", "c"]);
        let request =
            ScheduleRequest::new(3, 3).with_prescheduled(slots(&[&[], &[], &["c"]]));
        // Pool [a, b], size 1 → group 3 starts at 2, but c is pinned to it.
        let p = Planner::new().plan(&items, &request).unwrap();
        assert_eq!(p.names(), vec!["c"]);
    }

    #[test]
    fn test_empty_input() {
        let p = Planner::new()
            .plan(&[], &ScheduleRequest::new(4, 2))
            .unwrap();
        assert!(p.is_empty());
    }

    #[test]
    fn test_all_tests_pinned() {
        let items = TestItem::sequence(["a", "b"]);
        let request = ScheduleRequest::new(2, 2).with_prescheduled(slots(&[&["a"], &["b"]]));
        let p = Planner::new().plan(&items, &request).unwrap();
        assert_eq!(p.names(), vec!["b"]);
    }

    #[test]
    fn test_seed_shuffles_but_keeps_discovery_order() {
        let items = TestItem::sequence((0..40).map(|i| format!("t{i:02}")));
        let request = ScheduleRequest::new(4, 1).with_seed(1234);
        let p = Planner::new().plan(&items, &request).unwrap();
        assert_eq!(p.len(), 10);
        p.validate(&items).unwrap();
        // A shuffled pool almost surely does not hand group 1 the first ten.
        assert_ne!(names(&p), (0..10).map(|i| format!("t{i:02}")).collect::<Vec<_>>());
    }

    #[test]
    fn test_reports_selection() {
        let items = abcde();
        let mut planner = recording();
        planner.plan(&items, &ScheduleRequest::new(2, 2)).unwrap();
        assert_eq!(output(planner), "\nRunning test group #2 (2 tests)\nd\ne\n");
    }

    #[test]
    fn test_plan_with_source() {
        let items = abcde();
        let source = InMemorySource::new(slots(&[&["e"], &[]]));
        let p = Planner::new()
            .plan_with_source(&items, &ScheduleRequest::new(2, 1), &source)
            .unwrap();
        assert_eq!(p.names(), vec!["a", "b", "e"]);
    }

    #[test]
    fn test_plan_with_failing_source() {
        struct Broken;
        impl PrescheduleSource for Broken {
            fn load(&self) -> Result<Vec<Vec<String>>, PrescheduleWarning> {
                Err(PrescheduleWarning::Malformed {
                    source: serde_json::from_str::<Vec<Vec<String>>>("{").unwrap_err(),
                })
            }
        }

        let items = abcde();
        let mut planner = recording();
        let p = planner
            .plan_with_source(&items, &ScheduleRequest::new(2, 1), &Broken)
            .unwrap();
        assert_eq!(p.names(), vec!["a", "b", "c"]);
        assert!(output(planner).contains("unable to parse prescheduled tests"));
    }

    #[test]
    fn test_source_not_loaded_when_disabled() {
        struct Panics;
        impl PrescheduleSource for Panics {
            fn load(&self) -> Result<Vec<Vec<String>>, PrescheduleWarning> {
                panic!("source consulted for a disabled request");
            }
        }

        let items = abcde();
        let p = Planner::new()
            .plan_with_source(&items, &ScheduleRequest::default(), &Panics)
            .unwrap();
        assert_eq!(p.len(), 5);
    }

    #[test]
    fn test_layout() {
        let items = abcde();
        let request = ScheduleRequest::new(2, 1).with_prescheduled(slots(&[&["e"], &["a"]]));
        let layout = Planner::new().layout(&items, &request).unwrap();
        assert_eq!(layout.num_groups(), 2);
        assert_eq!(layout.groups[0].names(), vec!["b", "c", "e"]);
        assert_eq!(layout.groups[1].names(), vec!["a", "d"]);
        layout.validate(&items).unwrap();
    }

    #[test]
    fn test_layout_disabled() {
        let items = abcde();
        let layout = Planner::new()
            .layout(&items, &ScheduleRequest::default())
            .unwrap();
        assert_eq!(layout.num_groups(), 1);
        assert_eq!(layout.groups[0].len(), 5);
    }

    #[test]
    fn test_layout_too_many_groups() {
        let items = TestItem::sequence(["a", "b"]);
        let result = Planner::new().layout(&items, &ScheduleRequest::new(3, 1));
        assert!(matches!(
            result,
            Err(PlannerError::TooManyGroups {
                group_count: 3,
                tests: 2
            })
        ));
    }

    #[test]
    fn test_layout_empty_input_caps_groups() {
        let result = Planner::new().layout(&[], &ScheduleRequest::new(20_000_000, 1));
        assert!(matches!(result, Err(PlannerError::TooManyGroups { .. })));

        let layout = Planner::new().layout(&[], &ScheduleRequest::new(1, 1)).unwrap();
        assert_eq!(layout.num_groups(), 1);
        assert!(layout.groups[0].is_empty());
    }

    #[test]
    fn test_layout_group_beyond_pool() {
        let items = TestItem::sequence(["a", "b", "c"]);
        let request = ScheduleRequest::new(3, 1).with_prescheduled(slots(&[&["c"], &[], &[]]));
        // Pool [a, b], size 1 → group 3 starts at 2 and has nothing pinned.
        let result = Planner::new().layout(&items, &request);
        assert!(matches!(
            result,
            Err(PlannerError::GroupBeyondPool {
                group_id: 3,
                start: 2,
                pool_len: 2
            })
        ));
    }

    #[test]
    fn test_layout_one_test_per_group() {
        let items = TestItem::sequence((0..2_000).map(|i| format!("t{i}")));
        let request = ScheduleRequest::new(2_000, 1).with_seed(-9);
        let layout = Planner::new().layout(&items, &request).unwrap();
        assert_eq!(layout.num_groups(), 2_000);
        assert!(layout.groups.iter().all(|g| g.len() == 1));
        layout.validate(&items).unwrap();

        for group_id in [1, 777, 2_000] {
            let mut shard = request.clone();
            shard.group_id = Some(group_id);
            let p = Planner::new().plan(&items, &shard).unwrap();
            assert_eq!(p, layout.groups[group_id - 1]);
        }
    }

    /// Keeps what the planner reports, for inspection.
    #[derive(Debug, Default)]
    struct Recorder {
        warnings: Vec<String>,
        selections: Vec<Vec<String>>,
    }

    impl Reporter for Recorder {
        fn warn(&mut self, warning: &PrescheduleWarning) {
            self.warnings.push(warning.to_string());
        }

        fn selection(&mut self, partition: &Partition) {
            self.selections.push(names(partition));
        }
    }

    #[test]
    fn test_reporter_sees_warning_and_selection() {
        let items = abcde();
        let request = ScheduleRequest::new(2, 2).with_prescheduled(slots(&[&["a"]]));
        let mut planner = Planner::with_reporter(Recorder::default());
        planner.plan(&items, &request).unwrap();

        let recorder = planner.reporter();
        assert_eq!(recorder.warnings.len(), 1);
        assert!(recorder.warnings[0].contains("(1 slots for 2 groups)"));
        assert_eq!(recorder.selections, vec![vec!["d".to_string(), "e".to_string()]]);
    }

    #[test]
    fn test_layout_reports_warning_once() {
        let items = abcde();
        let request = ScheduleRequest::new(2, 1).with_prescheduled(slots(&[&["a"]]));
        let mut planner = Planner::with_reporter(Recorder::default());
        planner.layout(&items, &request).unwrap();

        assert_eq!(planner.reporter().warnings.len(), 1);
        assert!(planner.reporter().selections.is_empty());
    }
}
