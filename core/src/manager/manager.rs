//! Action manager
//!
//! Maps target identity to its list of running actions and advances every
//! active, non-paused action once per tick. Registration-time argument
//! errors from the original contract (null action / null target) are
//! unrepresentable here — both parameters are owned values — so
//! `add_action` cannot fail.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use hashbrown::HashMap;

use crate::action::Action;
use crate::target::{SharedTarget, TargetId};

use super::record::{ActionSlot, RecordArena};

/// Unique id of one running action, monotonic for the manager's lifetime.
pub type ActionId = u64;

/// Handle to a running action, returned by [`ActionManager::add_action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionHandle {
    pub(crate) target: TargetId,
    pub(crate) id: ActionId,
}

impl ActionHandle {
    /// The target this action runs against.
    pub fn target_id(&self) -> TargetId {
        self.target
    }
}

/// Registry of running actions, one record per target.
pub struct ActionManager {
    arena: RecordArena,
    by_target: HashMap<TargetId, usize>,
    /// Record indices in registration order; the per-tick visit order.
    order: Vec<usize>,
    next_action_id: ActionId,
    in_update: bool,
    /// Position in `order` currently being visited, compensated by
    /// removals so no record is skipped.
    cursor: isize,
}

impl Default for ActionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionManager {
    /// Create a manager with a small default record pool.
    pub fn new() -> Self {
        Self::with_pool_capacity(16)
    }

    /// Create a manager sized for roughly `capacity` concurrent targets.
    pub fn with_pool_capacity(capacity: usize) -> Self {
        Self {
            arena: RecordArena::with_capacity(capacity),
            by_target: HashMap::new(),
            order: Vec::new(),
            next_action_id: 0,
            in_update: false,
            cursor: 0,
        }
    }

    // ─── Registration ───────────────────────────────────────────────────────

    /// Start `action` against `target` and register it for per-tick
    /// stepping. `paused` applies when this creates the target's record;
    /// an existing record keeps its pause state.
    pub fn add_action(
        &mut self,
        mut action: Action,
        target: &SharedTarget,
        paused: bool,
    ) -> ActionHandle {
        let target_id = target.borrow().target_id();
        let index = match self.by_target.get(&target_id) {
            Some(&index) => index,
            None => {
                let index = self.arena.acquire(target_id, Rc::downgrade(target));
                self.arena.get_mut(index).paused = paused;
                self.by_target.insert(target_id, index);
                self.order.push(index);
                index
            }
        };

        let id = self.next_action_id;
        self.next_action_id += 1;
        action.start(target);
        let record = self.arena.get_mut(index);
        record.slots.push(ActionSlot {
            id,
            tag: action.tag(),
            action: Some(action),
        });
        ActionHandle {
            target: target_id,
            id,
        }
    }

    // ─── Removal ────────────────────────────────────────────────────────────

    /// Stop and unregister one action. No-op when the handle is stale.
    pub fn remove_action(&mut self, handle: ActionHandle) {
        let Some(&index) = self.by_target.get(&handle.target) else {
            return;
        };
        let Some(pos) = self
            .arena
            .get(index)
            .slots
            .iter()
            .position(|slot| slot.id == handle.id)
        else {
            return;
        };
        self.remove_slot(index, pos);
    }

    /// Stop and unregister the first action labeled `tag` on `target`.
    /// No-op when nothing matches.
    pub fn remove_action_by_tag(&mut self, tag: i32, target: TargetId) {
        let Some(&index) = self.by_target.get(&target) else {
            return;
        };
        let Some(pos) = self
            .arena
            .get(index)
            .slots
            .iter()
            .position(|slot| slot.tag == tag)
        else {
            return;
        };
        self.remove_slot(index, pos);
    }

    /// Stop and unregister everything running against `target`.
    pub fn remove_all_actions_from_target(&mut self, target: TargetId) {
        let Some(&index) = self.by_target.get(&target) else {
            return;
        };
        if self.arena.get(index).locked {
            // mid-iteration: drop the list now, let the update loop delete
            // the record when it releases the lock
            let record = self.arena.get_mut(index);
            for mut slot in record.slots.drain(..) {
                if let Some(action) = &mut slot.action {
                    action.stop();
                }
            }
            record.current = 0;
            record.current_removed = true;
        } else {
            self.remove_record(index, true);
        }
    }

    /// Stop and unregister every action for every target.
    pub fn remove_all_actions(&mut self) {
        let targets: Vec<TargetId> = self
            .order
            .iter()
            .map(|&index| self.arena.get(index).target_id)
            .collect();
        for target in targets {
            self.remove_all_actions_from_target(target);
        }
    }

    /// Unlink the slot at `pos`, compensating an in-progress iteration.
    fn remove_slot(&mut self, index: usize, pos: usize) {
        let empty_unlocked = {
            let record = self.arena.get_mut(index);
            let mut slot = record.slots.remove(pos);
            if record.locked {
                if slot.action.is_none() && pos == record.current {
                    // the in-flight action; the update loop drops it
                    record.current_removed = true;
                } else if pos < record.current {
                    record.current -= 1;
                }
            }
            if let Some(action) = &mut slot.action {
                action.stop();
            }
            record.slots.is_empty() && !record.locked
        };
        if empty_unlocked {
            self.remove_record(index, false);
        }
    }

    /// Delete a record: stop leftovers, unlink from the visit order (fixing
    /// the outer cursor), and recycle into the pool.
    fn remove_record(&mut self, index: usize, stop_actions: bool) {
        let target_id = {
            let record = self.arena.get_mut(index);
            debug_assert!(!record.locked, "deleting a locked record");
            if stop_actions {
                for slot in &mut record.slots {
                    if let Some(action) = &mut slot.action {
                        action.stop();
                    }
                }
            }
            record.slots.clear();
            record.target_id
        };
        self.by_target.remove(&target_id);
        if let Some(pos) = self.order.iter().position(|&i| i == index) {
            self.order.remove(pos);
            if self.in_update && (pos as isize) <= self.cursor {
                self.cursor -= 1;
            }
        }
        self.arena.release(index);
    }

    // ─── Pause / resume ─────────────────────────────────────────────────────

    /// Suspend stepping for `target`. No-op when it has no actions.
    pub fn pause_target(&mut self, target: TargetId) {
        if let Some(&index) = self.by_target.get(&target) {
            self.arena.get_mut(index).paused = true;
        }
    }

    /// Resume stepping for `target`. No-op when it has no actions.
    pub fn resume_target(&mut self, target: TargetId) {
        if let Some(&index) = self.by_target.get(&target) {
            self.arena.get_mut(index).paused = false;
        }
    }

    /// Pause every target that is currently running and return the set
    /// that was paused, for later selective resume.
    pub fn pause_all_running_actions(&mut self) -> Vec<TargetId> {
        let indices = self.order.clone();
        let mut paused = Vec::new();
        for index in indices {
            let record = self.arena.get_mut(index);
            if !record.paused {
                record.paused = true;
                paused.push(record.target_id);
            }
        }
        paused
    }

    /// Resume every target in `targets`.
    pub fn resume_targets(&mut self, targets: &[TargetId]) {
        for &target in targets {
            self.resume_target(target);
        }
    }

    // ─── Queries ────────────────────────────────────────────────────────────

    /// Number of actions running against `target`.
    pub fn running_action_count(&self, target: TargetId) -> usize {
        self.by_target
            .get(&target)
            .map(|&index| self.arena.get(index).slots.len())
            .unwrap_or(0)
    }

    /// Borrow the first action labeled `tag` on `target`.
    pub fn get_action_by_tag(&self, tag: i32, target: TargetId) -> Option<&Action> {
        let &index = self.by_target.get(&target)?;
        self.arena
            .get(index)
            .slots
            .iter()
            .find(|slot| slot.tag == tag)
            .and_then(|slot| slot.action.as_ref())
    }

    /// Handle of the first action labeled `tag` on `target`.
    pub fn handle_by_tag(&self, tag: i32, target: TargetId) -> Option<ActionHandle> {
        let &index = self.by_target.get(&target)?;
        self.arena
            .get(index)
            .slots
            .iter()
            .find(|slot| slot.tag == tag)
            .map(|slot| ActionHandle {
                target,
                id: slot.id,
            })
    }

    /// True when `target` is paused.
    pub fn is_paused(&self, target: TargetId) -> bool {
        self.by_target
            .get(&target)
            .map(|&index| self.arena.get(index).paused)
            .unwrap_or(false)
    }

    /// Number of targets with at least one running action.
    pub fn target_count(&self) -> usize {
        self.order.len()
    }

    /// Number of records waiting on the free-list.
    pub fn pooled_records(&self) -> usize {
        self.arena.pooled()
    }

    // ─── Per-tick drive ─────────────────────────────────────────────────────

    /// Step every active, non-paused action by `dt * action.speed`,
    /// removing the ones that report done. Targets are visited in
    /// registration order, actions in list order.
    pub fn update(&mut self, dt: f32) {
        if self.in_update {
            tracing::warn!("re-entrant ActionManager::update ignored");
            return;
        }
        self.in_update = true;
        self.cursor = 0;
        while self.cursor >= 0 && (self.cursor as usize) < self.order.len() {
            let index = self.order[self.cursor as usize];
            self.update_record(index, dt);
            self.cursor += 1;
        }
        self.in_update = false;
    }

    fn update_record(&mut self, index: usize, dt: f32) {
        {
            let record = self.arena.get_mut(index);
            if !record.active || record.paused {
                return;
            }
            if record.target.strong_count() == 0 {
                let target_id = record.target_id;
                tracing::debug!(target = target_id, "target dropped; retiring its actions");
                self.remove_record(index, true);
                return;
            }
            record.locked = true;
            record.current = 0;
        }

        loop {
            let taken = {
                let record = self.arena.get_mut(index);
                if record.current >= record.slots.len() {
                    None
                } else {
                    let current = record.current;
                    record.current_removed = false;
                    let slot = &mut record.slots[current];
                    slot.action.take().map(|action| (slot.id, action))
                }
            };
            let Some((id, mut action)) = taken else {
                break;
            };

            let speed = action.speed();
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                action.step(dt * speed, self);
            }));

            let record = self.arena.get_mut(index);
            match outcome {
                Err(_) => {
                    // isolate the failure: drop this action, keep stepping
                    // the rest of the tick
                    tracing::error!(action = id, "action panicked during step; removed");
                    action.stop();
                    if !record.current_removed {
                        let current = record.current;
                        record.slots.remove(current);
                    }
                }
                Ok(()) => {
                    if record.current_removed {
                        // removed from inside its own callback; the slot is
                        // already gone, just release the target relation
                        action.stop();
                    } else if action.is_done() {
                        action.stop();
                        let current = record.current;
                        record.slots.remove(current);
                    } else {
                        let current = record.current;
                        record.slots[current].action = Some(action);
                        record.current += 1;
                    }
                }
            }
        }

        let empty = {
            let record = self.arena.get_mut(index);
            record.locked = false;
            record.current_removed = false;
            record.slots.is_empty()
        };
        if empty {
            self.remove_record(index, false);
        }
    }
}
