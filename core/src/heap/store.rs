//! Backing containers for the binary heap
//!
//! The heap performs every structural move through its store, so a store
//! that tracks identities sees each swap exactly once and can keep its
//! side table consistent.

use hashbrown::HashMap;

/// Identity of a heap element, stable across position changes.
pub trait HeapKey {
    /// The element's stable id. Must not change while the element is stored.
    fn heap_key(&self) -> u64;
}

/// A contiguous container the heap can rearrange.
pub trait HeapStore<T> {
    /// Number of stored elements.
    fn len(&self) -> usize;

    /// Borrow the element at `index`. Panics if out of bounds.
    fn get(&self, index: usize) -> &T;

    /// Exchange the elements at `a` and `b`.
    fn swap(&mut self, a: usize, b: usize);

    /// Append an element at the tail.
    fn push(&mut self, item: T);

    /// Remove and return the tail element.
    fn pop_last(&mut self) -> Option<T>;

    /// True when no elements are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Plain vector store with no identity tracking.
#[derive(Debug, Clone)]
pub struct VecStore<T> {
    items: Vec<T>,
}

impl<T> Default for VecStore<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> HeapStore<T> for VecStore<T> {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn get(&self, index: usize) -> &T {
        &self.items[index]
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.items.swap(a, b);
    }

    fn push(&mut self, item: T) {
        self.items.push(item);
    }

    fn pop_last(&mut self) -> Option<T> {
        self.items.pop()
    }
}

/// Vector store that additionally maintains an id→index map.
///
/// The map is updated for both elements of a swap in the same call; this
/// coupling is what makes removal-by-id safe no matter how the heap has
/// rearranged the array since insertion.
#[derive(Debug, Clone)]
pub struct KeyedStore<T: HeapKey> {
    items: Vec<T>,
    index: HashMap<u64, usize>,
}

impl<T: HeapKey> Default for KeyedStore<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: HeapKey> KeyedStore<T> {
    /// Current array position of the element with `key`, if present.
    pub fn index_of(&self, key: u64) -> Option<usize> {
        self.index.get(&key).copied()
    }
}

impl<T: HeapKey> HeapStore<T> for KeyedStore<T> {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn get(&self, index: usize) -> &T {
        &self.items[index]
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.items.swap(a, b);
        let key_a = self.items[a].heap_key();
        let key_b = self.items[b].heap_key();
        self.index.insert(key_a, a);
        self.index.insert(key_b, b);
    }

    fn push(&mut self, item: T) {
        let key = item.heap_key();
        debug_assert!(
            !self.index.contains_key(&key),
            "heap key {key} inserted twice"
        );
        self.index.insert(key, self.items.len());
        self.items.push(item);
    }

    fn pop_last(&mut self) -> Option<T> {
        let item = self.items.pop()?;
        let removed = self.index.remove(&item.heap_key());
        debug_assert_eq!(removed, Some(self.items.len()), "id map out of sync");
        Some(item)
    }
}
