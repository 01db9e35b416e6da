//! Array-backed binary min-heap, generic over its backing store.

use std::cmp::Ordering;
use std::marker::PhantomData;

use super::store::{HeapKey, HeapStore, KeyedStore, VecStore};

/// Binary min-heap over a pluggable store and comparator.
///
/// The comparator supplies the total order; ties break however the
/// comparator says they do. The element the comparator calls smallest is
/// always at index 0.
pub struct Heap<T, S, C>
where
    S: HeapStore<T>,
    C: Fn(&T, &T) -> Ordering,
{
    store: S,
    cmp: C,
    _item: PhantomData<T>,
}

/// Heap without identity tracking.
pub type VecHeap<T, C> = Heap<T, VecStore<T>, C>;

/// Heap whose store maintains an id→index map for O(log n) removal by id.
pub type IndexedHeap<T, C> = Heap<T, KeyedStore<T>, C>;

impl<T, S, C> Heap<T, S, C>
where
    S: HeapStore<T> + Default,
    C: Fn(&T, &T) -> Ordering,
{
    /// Create an empty heap ordered by `cmp`.
    pub fn new(cmp: C) -> Self {
        Self {
            store: S::default(),
            cmp,
            _item: PhantomData,
        }
    }
}

impl<T, S, C> Heap<T, S, C>
where
    S: HeapStore<T>,
    C: Fn(&T, &T) -> Ordering,
{
    /// Number of stored elements.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// True when the heap holds nothing.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Borrow the minimum element, if any.
    pub fn peek(&self) -> Option<&T> {
        if self.store.is_empty() {
            None
        } else {
            Some(self.store.get(0))
        }
    }

    /// Borrow the element at an arbitrary position.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.store.len() {
            Some(self.store.get(index))
        } else {
            None
        }
    }

    /// Insert an element and restore ordering. O(log n).
    pub fn push(&mut self, item: T) {
        self.store.push(item);
        self.sift_up(self.store.len() - 1);
    }

    /// Remove and return the minimum. `None` on an empty heap.
    pub fn pop(&mut self) -> Option<T> {
        if self.store.is_empty() {
            return None;
        }
        let last = self.store.len() - 1;
        self.store.swap(0, last);
        let item = self.store.pop_last();
        if !self.store.is_empty() {
            self.sift_down(0);
        }
        item
    }

    /// Remove and return the element at `index`. `None` if out of bounds.
    ///
    /// The tail element takes the vacated slot and is then re-heapified in
    /// whichever direction it needs to move.
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        let len = self.store.len();
        if index >= len {
            return None;
        }
        let last = len - 1;
        self.store.swap(index, last);
        let item = self.store.pop_last();
        if index < last {
            self.fix(index);
        }
        item
    }

    /// Re-heapify at `index` after the element's key changed externally.
    pub fn fix(&mut self, index: usize) {
        if !self.sift_down(index) {
            self.sift_up(index);
        }
    }

    fn less(&self, a: usize, b: usize) -> bool {
        (self.cmp)(self.store.get(a), self.store.get(b)) == Ordering::Less
    }

    fn sift_up(&mut self, mut index: usize) -> bool {
        let mut moved = false;
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.less(index, parent) {
                self.store.swap(index, parent);
                index = parent;
                moved = true;
            } else {
                break;
            }
        }
        moved
    }

    fn sift_down(&mut self, mut index: usize) -> bool {
        let len = self.store.len();
        let mut moved = false;
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut child = left;
            if right < len && self.less(right, left) {
                child = right;
            }
            if self.less(child, index) {
                self.store.swap(child, index);
                index = child;
                moved = true;
            } else {
                break;
            }
        }
        moved
    }
}

impl<T, C> IndexedHeap<T, C>
where
    T: HeapKey,
    C: Fn(&T, &T) -> Ordering,
{
    /// Current heap position of the element with `key`.
    pub fn index_of(&self, key: u64) -> Option<usize> {
        self.store.index_of(key)
    }

    /// Remove the element with `key` wherever it sits. O(log n).
    ///
    /// `None` when no such element is stored; callers treat that as a
    /// no-op, not an error.
    pub fn remove_by_key(&mut self, key: u64) -> Option<T> {
        let index = self.store.index_of(key)?;
        self.remove_at(index)
    }
}
