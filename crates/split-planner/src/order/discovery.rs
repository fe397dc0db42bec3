// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Discovery ordering: the pool is sliced exactly as it was collected.

use crate::order::PoolOrder;
use crate::TestItem;

/// Leaves the pool in discovery order.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOrder;

impl DiscoveryOrder {
    pub fn new() -> Self {
        Self
    }
}

impl PoolOrder for DiscoveryOrder {
    fn name(&self) -> &str {
        "discovery"
    }

    fn arrange(&self, _pool: &mut [&TestItem]) {}
}
