//! Target records and their recycling arena

use std::cell::RefCell;
use std::rc::Weak;

use crate::action::Action;
use crate::target::{Node, TargetId, WeakTarget};

use super::manager::ActionId;

/// One entry in a record's action list.
///
/// `action` is `None` exactly while that action is moved out for stepping.
/// The tag is cached here so tag lookups keep working for the in-flight
/// action.
#[derive(Debug)]
pub(crate) struct ActionSlot {
    pub(crate) id: ActionId,
    pub(crate) tag: i32,
    pub(crate) action: Option<Action>,
}

/// Bookkeeping for one target with at least one running action.
#[derive(Debug)]
pub(crate) struct TargetRecord {
    pub(crate) target_id: TargetId,
    pub(crate) target: WeakTarget,
    pub(crate) slots: Vec<ActionSlot>,
    /// Index of the slot currently being stepped.
    pub(crate) current: usize,
    /// Set when the in-flight action was removed from inside its own
    /// callback; tells the update loop not to put it back.
    pub(crate) current_removed: bool,
    pub(crate) paused: bool,
    /// True while the update loop is iterating this record.
    pub(crate) locked: bool,
    /// False while the record sits on the free-list.
    pub(crate) active: bool,
}

fn dead_target() -> WeakTarget {
    Weak::<RefCell<Node>>::new()
}

impl TargetRecord {
    fn new(target_id: TargetId, target: WeakTarget) -> Self {
        Self {
            target_id,
            target,
            slots: Vec::new(),
            current: 0,
            current_removed: false,
            paused: false,
            locked: false,
            active: true,
        }
    }

    /// Clear everything before the record goes back in the pool. A stale
    /// target or action reference surviving into the next tenant is a
    /// correctness hazard, not just a leak.
    fn reset(&mut self) {
        self.target_id = 0;
        self.target = dead_target();
        self.slots.clear();
        self.current = 0;
        self.current_removed = false;
        self.paused = false;
        self.locked = false;
        self.active = false;
    }
}

/// Index-addressed arena of records with an explicit free-list.
///
/// "Deleting" a record resets it and returns its index to the free-list,
/// so steady-state frames allocate nothing.
#[derive(Debug)]
pub(crate) struct RecordArena {
    slots: Vec<TargetRecord>,
    free: Vec<usize>,
}

impl RecordArena {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub(crate) fn get(&self, index: usize) -> &TargetRecord {
        &self.slots[index]
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> &mut TargetRecord {
        &mut self.slots[index]
    }

    /// Hand out a reset record, reusing a pooled one when available.
    pub(crate) fn acquire(&mut self, target_id: TargetId, target: WeakTarget) -> usize {
        if let Some(index) = self.free.pop() {
            let record = &mut self.slots[index];
            debug_assert!(!record.active, "pooled record still active");
            debug_assert!(record.slots.is_empty(), "pooled record not reset");
            record.target_id = target_id;
            record.target = target;
            record.active = true;
            index
        } else {
            self.slots.push(TargetRecord::new(target_id, target));
            self.slots.len() - 1
        }
    }

    /// Reset a record and return its index to the pool.
    pub(crate) fn release(&mut self, index: usize) {
        let record = &mut self.slots[index];
        debug_assert!(!record.locked, "released a locked record");
        record.reset();
        self.free.push(index);
    }

    /// Number of records waiting on the free-list.
    pub(crate) fn pooled(&self) -> usize {
        self.free.len()
    }
}
