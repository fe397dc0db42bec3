// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`PoolOrder`] trait and its implementations.

pub mod discovery;
pub mod shuffle;

pub use discovery::DiscoveryOrder;
pub use shuffle::SeededShuffle;

use crate::TestItem;

/// Decides the order of the unscheduled pool before it is sliced.
///
/// Orders are purely algorithmic and must be deterministic: the same pool
/// must always come out in the same order, otherwise different shards of
/// one CI run would disagree about who owns which test.
pub trait PoolOrder: Send + Sync {
    /// Human-readable name of this ordering.
    fn name(&self) -> &str;

    /// Reorders the pool in place.
    fn arrange(&self, pool: &mut [&TestItem]);
}
