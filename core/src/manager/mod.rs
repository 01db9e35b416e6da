//! Per-target action registry
//!
//! This module provides:
//! - **Records**: one per target with at least one running action, pooled
//!   in an index-addressed arena with an explicit free-list
//! - **ActionManager**: drives `step` for every active, non-paused action
//!   once per tick and keeps list mutation safe during that iteration
//!
//! # Re-entrancy protocol
//!
//! While a record is being iterated it is locked and the action currently
//! executing is moved out of its slot. Callbacks fired from inside `step`
//! hold `&mut ActionManager` and may add or remove actions — their own
//! record's or any other's. Removals at or before the iteration index
//! compensate it, so no sibling is skipped or double-stepped; deleting a
//! locked record is deferred until the lock is released.

mod manager;
mod record;

#[cfg(test)]
mod manager_tests;

pub use manager::{ActionHandle, ActionId, ActionManager};
