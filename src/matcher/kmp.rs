// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Single-pattern substring search with the prefix function.
//!
//! Matching is exact and case-sensitive, over the UTF-8 bytes of pattern and text. Since UTF-8
//! is self-synchronizing, a byte-level match is always a match on character boundaries.

use std::collections::HashMap;
use std::sync::Arc;

/// Compute the failure table of `pattern`.
///
/// Entry `i` is the length of the longest proper prefix of `pattern[..=i]` that is also a suffix
/// of it. The table has one entry per byte of the pattern.
pub fn compute_failure_table(pattern: &str) -> Vec<usize> {
    let pattern = pattern.as_bytes();
    let mut table = vec![0; pattern.len()];

    let mut len = 0;
    for i in 1..pattern.len() {
        while len > 0 && pattern[i] != pattern[len] {
            len = table[len - 1];
        }
        if pattern[i] == pattern[len] {
            len += 1;
        }
        table[i] = len;
    }

    table
}

/// Search `text` for `pattern` using its precomputed failure `table`.
///
/// Returns `false` for an empty pattern or text, and for a pattern longer than the text.
pub fn find_with_table(pattern: &str, table: &[usize], text: &str) -> bool {
    let (pattern, text) = (pattern.as_bytes(), text.as_bytes());
    if pattern.is_empty() || text.is_empty() || pattern.len() > text.len() {
        return false;
    }
    debug_assert_eq!(pattern.len(), table.len(), "failure table of another pattern");

    let mut matched = 0;
    for &byte in text {
        while matched > 0 && byte != pattern[matched] {
            matched = table[matched - 1];
        }
        if byte == pattern[matched] {
            matched += 1;
            if matched == pattern.len() {
                return true;
            }
        }
    }

    false
}

/// Memoized failure tables keyed by exact pattern text.
///
/// The cache only grows. Patterns are expected to be few and reused across many searches.
#[derive(Debug, Default, Clone)]
pub struct FailureCache {
    tables: HashMap<String, Arc<[usize]>>,
}

impl FailureCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the failure table of `pattern`, computing it on first use.
    pub fn table(&mut self, pattern: &str) -> Arc<[usize]> {
        if let Some(table) = self.tables.get(pattern) {
            return table.clone();
        }

        let table: Arc<[usize]> = compute_failure_table(pattern).into();
        self.tables.insert(pattern.to_string(), table.clone());
        table
    }

    /// Report whether `pattern` occurs in `text`.
    ///
    /// Trivial cases (empty input, pattern longer than text) are answered without touching the
    /// cache.
    pub fn search(&mut self, pattern: &str, text: &str) -> bool {
        if pattern.is_empty() || text.is_empty() || pattern.len() > text.len() {
            return false;
        }

        let table = self.table(pattern);
        find_with_table(pattern, &table, text)
    }

    /// Whether the table of `pattern` has been computed.
    pub fn contains(&self, pattern: &str) -> bool {
        self.tables.contains_key(pattern)
    }

    /// The number of cached tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
