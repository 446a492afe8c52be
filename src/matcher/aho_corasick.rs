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

//! Multi-pattern substring search with an Aho-Corasick automaton.
//!
//! A [`Trie`] is an arena of nodes addressed by index. Node `0` is the root. Each node keeps a
//! sorted list of byte-labelled edges to its children, a failure link and the set of patterns
//! that end at it, its own as well as those inherited through the failure link.
//!
//! Failure links are only valid for the exact set of patterns they were built from. This is
//! encoded in the type: insertion always yields a `Trie<false>`, which cannot be searched until
//! [`Trie::build_failure_links`] turns it into a `Trie<true>`.

use std::collections::HashMap;
use std::collections::VecDeque;

const ROOT: usize = 0;

/// Identifies a pattern inserted into a [`Trie`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct PatternId(usize);

impl PatternId {
    /// The insertion index of the pattern.
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
struct Node {
    // sorted by byte
    children: Vec<(u8, usize)>,
    fail: usize,
    terminal: Option<PatternId>,
    outputs: Vec<PatternId>,
}

/// A trie of patterns, optionally carrying Aho-Corasick failure links.
///
/// * `LINKED=false`: patterns can be inserted, but the trie cannot be searched.
/// * `LINKED=true`: failure links and output sets are up to date, and the trie can be searched.
///   Inserting another pattern consumes it and yields an unlinked trie again.
///
/// # Examples
///
/// ```
/// use snaplog::matcher::Trie;
///
/// let trie = Trie::new()
///     .insert("he")
///     .insert("she")
///     .insert("his")
///     .insert("hers")
///     .build_failure_links();
///
/// let interest = trie.pattern_set(["she", "hers"]);
/// assert!(trie.search(&interest, "ushers"));
/// ```
#[derive(Debug, Clone)]
pub struct Trie<const LINKED: bool = true> {
    nodes: Vec<Node>,
    patterns: Vec<String>,
    ids: HashMap<String, PatternId>,
}

impl Default for Trie<false> {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Trie<true> {
    fn default() -> Self {
        Trie::new().build_failure_links()
    }
}

impl Trie<false> {
    /// Create a trie holding only the root.
    pub fn new() -> Trie<false> {
        Trie {
            nodes: vec![Node::default()],
            patterns: vec![],
            ids: HashMap::new(),
        }
    }
}

impl<const LINKED: bool> Trie<LINKED> {
    /// Insert the byte path of `pattern`, marking its last node as terminal.
    ///
    /// Empty patterns never match and are ignored; inserting a known pattern again is a no-op.
    /// Either way the result must be relinked before it can be searched.
    pub fn insert(mut self, pattern: &str) -> Trie<false> {
        if !pattern.is_empty() && !self.ids.contains_key(pattern) {
            let id = PatternId(self.patterns.len());

            let mut node = ROOT;
            for &byte in pattern.as_bytes() {
                node = match self.child(node, byte) {
                    Some(next) => next,
                    None => self.add_child(node, byte),
                };
            }
            self.nodes[node].terminal = Some(id);

            self.patterns.push(pattern.to_string());
            self.ids.insert(pattern.to_string(), id);
        }

        Trie {
            nodes: self.nodes,
            patterns: self.patterns,
            ids: self.ids,
        }
    }

    /// Compute every node's failure link and output set with a breadth-first pass from the root.
    ///
    /// Links and outputs are rebuilt from scratch, so this is also how a trie is relinked after
    /// further insertions.
    pub fn build_failure_links(mut self) -> Trie<true> {
        let mut queue = VecDeque::new();

        let root = &mut self.nodes[ROOT];
        root.fail = ROOT;
        root.outputs = root.terminal.into_iter().collect();
        for i in 0..self.nodes[ROOT].children.len() {
            let (_, child) = self.nodes[ROOT].children[i];
            let node = &mut self.nodes[child];
            node.fail = ROOT;
            node.outputs = node.terminal.into_iter().collect();
            queue.push_back(child);
        }

        while let Some(parent) = queue.pop_front() {
            for i in 0..self.nodes[parent].children.len() {
                let (byte, child) = self.nodes[parent].children[i];

                let mut fail = self.nodes[parent].fail;
                while fail != ROOT && self.child(fail, byte).is_none() {
                    fail = self.nodes[fail].fail;
                }
                let fail = self.child(fail, byte).unwrap_or(ROOT);

                // the failure node is shallower, so its outputs are already final
                let inherited = self.nodes[fail].outputs.clone();
                let node = &mut self.nodes[child];
                node.fail = fail;
                node.outputs = node.terminal.into_iter().chain(inherited).collect();

                queue.push_back(child);
            }
        }

        Trie {
            nodes: self.nodes,
            patterns: self.patterns,
            ids: self.ids,
        }
    }

    /// All inserted patterns, in insertion order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// The id of `pattern`, if it has been inserted.
    pub fn pattern_id(&self, pattern: &str) -> Option<PatternId> {
        self.ids.get(pattern).copied()
    }

    /// The pattern text of `id`.
    pub fn pattern(&self, id: PatternId) -> Option<&str> {
        self.patterns.get(id.0).map(String::as_str)
    }

    /// The number of distinct patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Resolve `patterns` into a [`PatternSet`] for this trie.
    ///
    /// Patterns that were never inserted cannot match and are left out.
    pub fn pattern_set<I, S>(&self, patterns: I) -> PatternSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = PatternSet::default();
        for pattern in patterns {
            if let Some(id) = self.pattern_id(pattern.as_ref()) {
                set.insert(id);
            }
        }
        set
    }

    /// A [`PatternSet`] holding every inserted pattern.
    pub fn all_patterns(&self) -> PatternSet {
        PatternSet {
            members: vec![true; self.patterns.len()],
        }
    }

    fn child(&self, node: usize, byte: u8) -> Option<usize> {
        let children = &self.nodes[node].children;
        children
            .binary_search_by_key(&byte, |&(b, _)| b)
            .ok()
            .map(|i| children[i].1)
    }

    fn add_child(&mut self, node: usize, byte: u8) -> usize {
        let child = self.nodes.len();
        self.nodes.push(Node::default());

        let children = &mut self.nodes[node].children;
        let pos = children.partition_point(|&(b, _)| b < byte);
        children.insert(pos, (byte, child));
        child
    }
}

impl Trie<true> {
    /// Build a searchable trie from a list of patterns.
    pub fn from_patterns<I, S>(patterns: I) -> Trie<true>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        patterns
            .into_iter()
            .fold(Trie::new(), |trie, pattern| trie.insert(pattern.as_ref()))
            .build_failure_links()
    }

    /// Report whether any pattern of `interest` occurs in `text`.
    ///
    /// The text is scanned once, and the scan stops at the first occurrence of a pattern of
    /// interest. Occurrences of other inserted patterns are passed over.
    pub fn search(&self, interest: &PatternSet, text: &str) -> bool {
        self.find(interest, text).is_some()
    }

    /// Return the first pattern of `interest` found in `text`, by end position.
    pub fn find(&self, interest: &PatternSet, text: &str) -> Option<PatternId> {
        if interest.is_empty() || text.is_empty() {
            return None;
        }

        let mut node = ROOT;
        for &byte in text.as_bytes() {
            node = self.step(node, byte);
            let found = self.nodes[node]
                .outputs
                .iter()
                .find(|&&id| interest.contains(id));
            if let Some(&id) = found {
                return Some(id);
            }
        }

        None
    }

    fn step(&self, mut node: usize, byte: u8) -> usize {
        loop {
            if let Some(next) = self.child(node, byte) {
                return next;
            }
            if node == ROOT {
                return ROOT;
            }
            node = self.nodes[node].fail;
        }
    }
}

/// A subset of the patterns of a [`Trie`], used to narrow a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternSet {
    members: Vec<bool>,
}

impl PatternSet {
    pub fn insert(&mut self, id: PatternId) {
        if self.members.len() <= id.0 {
            self.members.resize(id.0 + 1, false);
        }
        self.members[id.0] = true;
    }

    pub fn contains(&self, id: PatternId) -> bool {
        self.members.get(id.0).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.members.iter().filter(|&&m| m).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.members.iter().any(|&m| m)
    }
}

/// A trie that accumulates every pattern it is ever asked about.
///
/// New patterns are inserted and the failure links rebuilt before the search that needs them, so
/// callers never observe stale links.
#[derive(Debug, Clone, Default)]
pub struct PatternIndex {
    trie: Trie<true>,
    builds: usize,
}

impl PatternIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert any of `patterns` not yet known, relinking once if something was added.
    ///
    /// Returns whether the trie changed.
    pub fn extend<I, S>(&mut self, patterns: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unlinked: Option<Trie<false>> = None;
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let known = match &unlinked {
                Some(trie) => trie.pattern_id(pattern).is_some(),
                None => self.trie.pattern_id(pattern).is_some(),
            };
            if pattern.is_empty() || known {
                continue;
            }
            unlinked = Some(match unlinked.take() {
                Some(trie) => trie.insert(pattern),
                None => std::mem::take(&mut self.trie).insert(pattern),
            });
        }

        match unlinked {
            Some(trie) => {
                self.trie = trie.build_failure_links();
                self.builds += 1;
                true
            }
            None => false,
        }
    }

    /// Report whether any of `patterns` occurs in `text`.
    pub fn match_any<I, S>(&mut self, patterns: I, text: &str) -> bool
    where
        I: IntoIterator<Item = S> + Clone,
        S: AsRef<str>,
    {
        self.extend(patterns.clone());
        let interest = self.trie.pattern_set(patterns);
        self.trie.search(&interest, text)
    }

    /// The accumulated trie.
    pub fn trie(&self) -> &Trie<true> {
        &self.trie
    }

    /// How many times the failure links have been rebuilt.
    pub fn builds(&self) -> usize {
        self.builds
    }
}
