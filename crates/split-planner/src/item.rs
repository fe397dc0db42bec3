// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Discovered test items.

use std::fmt;

/// A single discovered test: its name and its position in discovery order.
///
/// Items are only created through [`TestItem::sequence`], which numbers
/// them `0..n` in the order given, so a position always equals the item's
/// index in the sequence handed to the planner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct TestItem {
    name: String,
    position: usize,
}

impl TestItem {
    /// Builds the full discovered sequence from test names in discovery order.
    pub fn sequence<I, S>(names: I) -> Vec<TestItem>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .enumerate()
            .map(|(position, name)| TestItem {
                name: name.into(),
                position,
            })
            .collect()
    }

    /// The test name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of this item in the discovered sequence.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl fmt::Display for TestItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
