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

use std::sync::Arc;

use crate::filter::Filter;
use crate::filter::FilterResult;
use crate::matcher::FailureCache;
use crate::matcher::find_with_table;

/// A filter that searches the message for one pattern.
///
/// With `admit_on_match`, only messages containing the pattern are written; otherwise only
/// messages not containing it are.
#[derive(Debug, Clone)]
pub struct PatternFilter {
    pattern: String,
    table: Arc<[usize]>,
    admit_on_match: bool,
}

impl PatternFilter {
    /// Create a filter, taking the failure table of `pattern` from `cache`.
    pub fn new(pattern: impl Into<String>, admit_on_match: bool, cache: &mut FailureCache) -> Self {
        let pattern = pattern.into();
        let table = cache.table(&pattern);
        Self {
            pattern,
            table,
            admit_on_match,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn admit_on_match(&self) -> bool {
        self.admit_on_match
    }

    pub(crate) fn matches(&self, text: &str) -> FilterResult {
        let found = find_with_table(&self.pattern, &self.table, text);
        FilterResult::from_match(found, self.admit_on_match)
    }
}

impl From<PatternFilter> for Filter {
    fn from(filter: PatternFilter) -> Self {
        Filter::Pattern(filter)
    }
}
