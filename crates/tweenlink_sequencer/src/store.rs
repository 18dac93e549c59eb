// SPDX-License-Identifier: MIT OR Apache-2.0
//! Insertion-ordered store of scheduled animations.

use crate::descriptor::{AnimationDescriptor, AnimationId};
use indexmap::IndexMap;

/// The set of descriptors a sequencer currently schedules.
///
/// Insertion order is kept and is the fallback ordering key.
#[derive(Debug)]
pub struct AnimationStore<T> {
    entries: IndexMap<AnimationId, AnimationDescriptor<T>>,
    next_id: u64,
}

impl<T> AnimationStore<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            next_id: 0,
        }
    }

    /// Hand out a fresh ID, never reused by this store
    pub fn generate_id(&mut self) -> AnimationId {
        let id = AnimationId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append a descriptor
    pub fn add(&mut self, descriptor: AnimationDescriptor<T>) {
        self.entries.insert(descriptor.id(), descriptor);
    }

    /// Remove the first descriptor matching `predicate`.
    ///
    /// Returns whether anything was removed.
    pub fn remove_first_matching<F>(&mut self, mut predicate: F) -> bool
    where
        F: FnMut(&AnimationDescriptor<T>) -> bool,
    {
        match self.entries.values().position(&mut predicate) {
            Some(index) => {
                self.entries.shift_remove_index(index);
                true
            }
            None => false,
        }
    }

    /// Remove a descriptor by ID
    pub fn remove(&mut self, id: AnimationId) -> bool {
        self.remove_first_matching(|d| d.id() == id)
    }

    /// Remove every descriptor
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Get a descriptor
    pub fn get(&self, id: AnimationId) -> Option<&AnimationDescriptor<T>> {
        self.entries.get(&id)
    }

    /// Descriptors in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &AnimationDescriptor<T>> {
        self.entries.values()
    }

    /// Borrowed snapshot in insertion order, safe to sort or iterate while
    /// the caller decides what to mutate next
    pub fn snapshot(&self) -> Vec<&AnimationDescriptor<T>> {
        self.entries.values().collect()
    }

    /// Number of descriptors
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for AnimationStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::TweenMethod;
    use crate::engine::PropertyMap;

    fn push(store: &mut AnimationStore<&'static str>, element: &'static str) -> AnimationId {
        let id = store.generate_id();
        store.add(AnimationDescriptor::new(id, TweenMethod::To(PropertyMap::new()), element, None, None));
        id
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut store: AnimationStore<&str> = AnimationStore::new();
        let a = store.generate_id();
        let b = store.generate_id();
        assert_eq!(a, AnimationId(0));
        assert!(b > a);

        // Clearing does not rewind the counter
        store.clear();
        assert!(store.generate_id() > b);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut store = AnimationStore::new();
        push(&mut store, "a");
        let b = push(&mut store, "b");
        push(&mut store, "c");

        assert!(store.remove(b));
        let elements: Vec<_> = store.iter().map(|d| *d.element()).collect();
        assert_eq!(elements, vec!["a", "c"]);
    }

    #[test]
    fn test_remove_first_matching_only_once() {
        let mut store = AnimationStore::new();
        push(&mut store, "same");
        push(&mut store, "same");

        assert!(store.remove_first_matching(|d| *d.element() == "same"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.iter().next().map(|d| d.id()), Some(AnimationId(1)));

        assert!(store.remove_first_matching(|d| *d.element() == "same"));
        assert!(!store.remove_first_matching(|d| *d.element() == "same"));
        assert!(store.is_empty());
    }
}
