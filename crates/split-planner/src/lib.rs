// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # split-planner
//!
//! Splits an ordered test collection into evenly sized groups so that a
//! single group can run in isolation, e.g. on one CI shard.
//!
//! # Strategies
//!
//! | Layer | Effect |
//! |---|---|
//! | Even split | Group `k` of `n` gets slice `k` of `ceil(len / n)`-sized slices. |
//! | [`SeededShuffle`] | The unscheduled pool is shuffled with a seed before slicing. |
//! | Prescheduling | Named tests are pinned to groups and bypass the split. |
//!
//! Whatever is selected comes back in discovery order.
//!
//! # Collaborators
//!
//! The planner never reads files or writes to a terminal itself:
//! prescheduled slots come from a [`PrescheduleSource`] and the summary
//! goes to a [`Reporter`]. [`JsonFileSource`] and [`TerminalReporter`] are
//! the stock implementations.
//!
//! # Example
//! ```
//! use split_planner::{Planner, ScheduleRequest, TestItem};
//!
//! let items = TestItem::sequence(["a", "b", "c", "d", "e"]);
//! let request = ScheduleRequest::new(2, 1)
//!     .with_prescheduled(vec![vec!["e".into()], vec![]]);
//! let partition = Planner::new().plan(&items, &request).unwrap();
//! assert_eq!(partition.names(), vec!["a", "b", "e"]);
//! ```

pub mod config;
mod error;
mod item;
pub mod order;
pub(crate) mod partition;
pub mod planner;
pub mod prescheduled;
pub mod report;
mod request;

pub use config::SplitConfig;
pub use error::{PlannerError, PrescheduleWarning};
pub use item::TestItem;
pub use order::{DiscoveryOrder, PoolOrder, SeededShuffle};
pub use partition::{Layout, Partition};
pub use planner::{group_size, group_slice, Planner};
pub use prescheduled::{InMemorySource, JsonFileSource, PrescheduleSource};
pub use report::{ColorChoice, NoopReporter, Reporter, TerminalReporter};
pub use request::ScheduleRequest;

/// Selects the tests for `request` without reporting.
///
/// Prescheduled slots are loaded from `source` when one is given.
/// Shorthand for a [`Planner`] with a [`NoopReporter`].
pub fn select(
    items: &[TestItem],
    request: &ScheduleRequest,
    source: Option<&dyn PrescheduleSource>,
) -> Result<Partition, PlannerError> {
    let mut planner = Planner::new();
    match source {
        Some(source) => planner.plan_with_source(items, request, source),
        None => planner.plan(items, request),
    }
}
