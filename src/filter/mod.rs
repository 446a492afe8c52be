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

//! Admit/reject predicates over records.
//!
//! Filters only run for records whose `message` is text. A record is written iff every
//! registered filter accepts it, and the first rejection stops the evaluation.

use crate::Record;

pub use self::custom::CustomFilter;
pub use self::multi_pattern::MultiPatternFilter;
pub use self::pattern::PatternFilter;

mod custom;
mod multi_pattern;
mod pattern;

/// The decision of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResult {
    /// The record may be written.
    Accept,
    /// The record should not be written.
    Reject,
}

impl FilterResult {
    /// Combine the outcome of a search with the polarity of a pattern filter.
    pub(crate) fn from_match(found: bool, admit_on_match: bool) -> FilterResult {
        if found == admit_on_match {
            FilterResult::Accept
        } else {
            FilterResult::Reject
        }
    }
}

#[derive(Debug)]
pub enum Filter {
    /// A single-pattern filter.
    Pattern(PatternFilter),
    /// A multi-pattern filter.
    MultiPattern(MultiPatternFilter),
    /// A custom filter.
    Custom(CustomFilter),
}

impl Filter {
    /// Evaluate the filter on a record whose message is `text`.
    pub(crate) fn matches(&self, record: &Record, text: &str) -> FilterResult {
        match self {
            Filter::Pattern(filter) => filter.matches(text),
            Filter::MultiPattern(filter) => filter.matches(text),
            Filter::Custom(filter) => filter.matches(record),
        }
    }
}
