// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Seeded shuffling of the unscheduled pool.
//!
//! The pool is permuted with a Fisher–Yates shuffle
//! ([`SliceRandom::shuffle`]) driven by a [`ChaCha8Rng`] seeded from the
//! user's integer. ChaCha8 is portable and stable across platforms, so
//! every shard of a CI run that passes the same seed computes the same
//! permutation and the groups stay disjoint.
//!
//! The permutation is reproducible for a given seed and pool within this
//! implementation. It is not bit-compatible with the shuffles of other
//! languages' standard libraries.

use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::order::PoolOrder;
use crate::TestItem;

/// Shuffles the pool with a seeded ChaCha8 generator.
///
/// Any integer is a valid seed; negative seeds are reinterpreted bit for
/// bit as `u64` to seed the generator.
#[derive(Debug, Clone)]
pub struct SeededShuffle {
    seed: i64,
}

impl SeededShuffle {
    pub fn new(seed: i64) -> Self {
        Self { seed }
    }

    /// The seed this shuffle was created with.
    pub fn seed(&self) -> i64 {
        self.seed
    }
}

impl PoolOrder for SeededShuffle {
    fn name(&self) -> &str {
        "seeded-shuffle"
    }

    fn arrange(&self, pool: &mut [&TestItem]) {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed as u64);
        pool.shuffle(&mut rng);
    }
}
