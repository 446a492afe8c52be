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

use std::collections::HashMap;

/// An insertion-ordered collection of uniquely named items.
///
/// Iteration follows insertion order. Registering a name that already exists replaces the item
/// and keeps its original position.
#[derive(Debug)]
pub(crate) struct Registry<T> {
    entries: Vec<(String, T)>,
    index: HashMap<String, usize>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: vec![],
            index: HashMap::new(),
        }
    }
}

impl<T> Registry<T> {
    /// Register `item` under `name`, returning the item it replaced.
    pub(crate) fn insert(&mut self, name: impl Into<String>, item: T) -> Option<T> {
        let name = name.into();
        match self.index.get(&name) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, item)),
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, item));
                None
            }
        }
    }

    /// Unregister `name`, returning its item.
    pub(crate) fn remove(&mut self, name: &str) -> Option<T> {
        let pos = self.index.remove(name)?;
        let (_, item) = self.entries.remove(pos);
        for (name, _) in &self.entries[pos..] {
            if let Some(i) = self.index.get_mut(name) {
                *i -= 1;
            }
        }
        Some(item)
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, item)| item)
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.iter_mut().map(|(_, item)| item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_survives_replace_and_remove() {
        let mut registry = Registry::default();
        registry.insert("a", 1);
        registry.insert("b", 2);
        registry.insert("c", 3);

        assert_eq!(registry.insert("a", 10), Some(1));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["a", "b", "c"]);

        assert_eq!(registry.remove("b"), Some(2));
        assert_eq!(registry.remove("b"), None);
        registry.insert("d", 4);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["a", "c", "d"]);
        assert_eq!(registry.values().copied().collect::<Vec<_>>(), vec![10, 3, 4]);

        // indices after the removed entry were shifted
        assert_eq!(registry.insert("c", 30), Some(3));
        assert_eq!(registry.values().copied().collect::<Vec<_>>(), vec![10, 30, 4]);
        assert!(registry.contains("d"));
    }
}
