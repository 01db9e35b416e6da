//! Indexed priority queue
//!
//! This module provides:
//! - **Stores**: pluggable backing containers for the heap array
//! - **Heap**: an array-backed binary min-heap over any store
//! - **IndexedHeap**: a heap whose store also maintains an identity→index
//!   map, so an element can be located and removed by id in O(log n)
//!
//! # Identity vs position
//!
//! An element's identity (its `heap_key`) is stable for its whole lifetime;
//! its position in the backing array changes on every swap. The two are kept
//! strictly separate: position is recorded only in the keyed store's side
//! table, which is updated for both elements of every swap in the same
//! operation. Nothing else in the crate is allowed to cache heap positions.

mod binary;
mod store;


pub use binary::{Heap, IndexedHeap, VecHeap};
pub use store::{HeapKey, HeapStore, KeyedStore, VecStore};
