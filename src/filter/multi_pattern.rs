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

use crate::filter::Filter;
use crate::filter::FilterResult;
use crate::matcher::PatternSet;
use crate::matcher::Trie;

/// A filter that searches the message for any of several patterns.
///
/// Each filter owns a trie built from its own patterns, so the cost of a search does not grow
/// with the patterns of other filters.
#[derive(Debug, Clone)]
pub struct MultiPatternFilter {
    trie: Trie<true>,
    interest: PatternSet,
    admit_on_match: bool,
}

impl MultiPatternFilter {
    pub fn new<I, S>(patterns: I, admit_on_match: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let trie = Trie::from_patterns(patterns);
        let interest = trie.all_patterns();
        Self {
            trie,
            interest,
            admit_on_match,
        }
    }

    /// The distinct, non-empty patterns of this filter.
    pub fn patterns(&self) -> &[String] {
        self.trie.patterns()
    }

    pub fn admit_on_match(&self) -> bool {
        self.admit_on_match
    }

    pub(crate) fn matches(&self, text: &str) -> FilterResult {
        let found = self.trie.search(&self.interest, text);
        FilterResult::from_match(found, self.admit_on_match)
    }
}

impl From<MultiPatternFilter> for Filter {
    fn from(filter: MultiPatternFilter) -> Self {
        Filter::MultiPattern(filter)
    }
}
