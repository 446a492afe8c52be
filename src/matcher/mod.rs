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

//! Substring matchers used by pattern filters.
//!
//! * [`kmp`] searches one pattern at a time with a memoized prefix-function table.
//! * [`aho_corasick`] searches many patterns in one pass over the text.

pub use self::aho_corasick::PatternId;
pub use self::aho_corasick::PatternIndex;
pub use self::aho_corasick::PatternSet;
pub use self::aho_corasick::Trie;
pub use self::kmp::FailureCache;
pub use self::kmp::compute_failure_table;
pub use self::kmp::find_with_table;

pub mod aho_corasick;
pub mod kmp;
