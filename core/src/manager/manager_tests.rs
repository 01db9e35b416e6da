//! Tests for ActionManager iteration and re-entrancy
//!
//! Verifies per-tick stepping, pause/resume, record pooling, and the
//! lock/defer protocol that keeps add/remove safe from inside callbacks
//! fired during the very update pass that is iterating.

use std::cell::RefCell;
use std::rc::Rc;

use nalgebra_glm as glm;

use crate::action::Action;
use crate::target::{Node, SharedTarget, TargetId};

use super::{ActionHandle, ActionManager};

fn make_target(id: TargetId) -> (Rc<RefCell<Node>>, SharedTarget) {
    let node = Node::shared(id);
    let shared: SharedTarget = node.clone();
    (node, shared)
}

fn move_x(duration: f32, dx: f32) -> Action {
    Action::move_by(duration, glm::vec3(dx, 0.0, 0.0))
}

fn pos_x(node: &Rc<RefCell<Node>>) -> f32 {
    node.borrow().position.x
}

#[test]
fn test_add_action_steps_each_tick() {
    let mut mgr = ActionManager::new();
    let (node, target) = make_target(1);

    mgr.add_action(move_x(1.0, 10.0), &target, false);
    assert_eq!(mgr.running_action_count(1), 1);

    mgr.update(0.0); // prime
    mgr.update(0.5);
    assert!((pos_x(&node) - 5.0).abs() < 1e-4);

    mgr.update(0.5);
    assert!((pos_x(&node) - 10.0).abs() < 1e-4);

    // finished actions are stopped, removed, and the record pooled
    assert_eq!(mgr.running_action_count(1), 0);
    assert_eq!(mgr.target_count(), 0);
    assert_eq!(mgr.pooled_records(), 1);
}

#[test]
fn test_pooled_record_is_reused_clean() {
    let mut mgr = ActionManager::new();
    let (_node_a, target_a) = make_target(1);
    mgr.add_action(move_x(0.5, 1.0), &target_a, false);
    mgr.update(0.0);
    mgr.update(1.0);
    assert_eq!(mgr.pooled_records(), 1);

    let (node_b, target_b) = make_target(2);
    mgr.add_action(move_x(1.0, 10.0), &target_b, false);
    assert_eq!(mgr.pooled_records(), 0, "record recycled from the pool");
    assert!(!mgr.is_paused(2), "recycled record must not inherit state");

    mgr.update(0.0);
    mgr.update(1.0);
    assert!((pos_x(&node_b) - 10.0).abs() < 1e-4);
}

#[test]
fn test_action_speed_multiplier_scales_dt() {
    let mut mgr = ActionManager::new();
    let (node, target) = make_target(1);
    mgr.add_action(move_x(1.0, 10.0).with_speed(2.0), &target, false);

    mgr.update(0.0);
    mgr.update(0.5);

    assert!((pos_x(&node) - 10.0).abs() < 1e-4, "dt is doubled");
    assert_eq!(mgr.target_count(), 0);
}

#[test]
fn test_remove_action_by_handle() {
    let mut mgr = ActionManager::new();
    let (node, target) = make_target(1);
    let handle = mgr.add_action(move_x(1.0, 10.0), &target, false);

    mgr.remove_action(handle);
    mgr.update(0.0);
    mgr.update(0.5);

    assert_eq!(pos_x(&node), 0.0);
    assert_eq!(mgr.target_count(), 0);

    // stale handle removal is a no-op
    mgr.remove_action(handle);
}

#[test]
fn test_remove_action_by_tag() {
    let mut mgr = ActionManager::new();
    let (node, target) = make_target(1);
    mgr.add_action(move_x(1.0, 10.0).with_tag(7), &target, false);
    mgr.add_action(move_x(1.0, 100.0).with_tag(8), &target, false);

    mgr.remove_action_by_tag(7, 1);
    assert_eq!(mgr.running_action_count(1), 1);
    assert!(mgr.get_action_by_tag(8, 1).is_some());
    assert!(mgr.get_action_by_tag(7, 1).is_none());

    mgr.update(0.0);
    mgr.update(1.0);
    assert!((pos_x(&node) - 100.0).abs() < 1e-4, "only the tagged-8 action ran");
}

#[test]
fn test_remove_all_actions_from_target() {
    let mut mgr = ActionManager::new();
    let (_node, target) = make_target(1);
    let (node2, target2) = make_target(2);
    mgr.add_action(move_x(1.0, 10.0), &target, false);
    mgr.add_action(move_x(1.0, 10.0), &target, false);
    mgr.add_action(move_x(1.0, 10.0), &target2, false);

    mgr.remove_all_actions_from_target(1);

    assert_eq!(mgr.running_action_count(1), 0);
    assert_eq!(mgr.running_action_count(2), 1);

    mgr.update(0.0);
    mgr.update(1.0);
    assert!((pos_x(&node2) - 10.0).abs() < 1e-4);
}

#[test]
fn test_remove_all_actions() {
    let mut mgr = ActionManager::new();
    let (node, target) = make_target(1);
    let (node2, target2) = make_target(2);
    mgr.add_action(move_x(1.0, 10.0), &target, false);
    mgr.add_action(move_x(1.0, 10.0), &target2, false);

    mgr.remove_all_actions();
    mgr.update(0.0);
    mgr.update(0.5);

    assert_eq!(pos_x(&node), 0.0);
    assert_eq!(pos_x(&node2), 0.0);
    assert_eq!(mgr.target_count(), 0);
    assert_eq!(mgr.pooled_records(), 2);
}

#[test]
fn test_pause_and_resume_target() {
    let mut mgr = ActionManager::new();
    let (node, target) = make_target(1);
    mgr.add_action(move_x(1.0, 10.0), &target, false);
    mgr.update(0.0);

    mgr.pause_target(1);
    mgr.update(0.5);
    assert_eq!(pos_x(&node), 0.0, "paused target does not step");

    mgr.resume_target(1);
    mgr.update(0.5);
    assert!((pos_x(&node) - 5.0).abs() < 1e-4);
}

#[test]
fn test_add_action_paused_from_the_start() {
    let mut mgr = ActionManager::new();
    let (node, target) = make_target(1);
    mgr.add_action(move_x(1.0, 10.0), &target, true);

    mgr.update(0.5);
    assert_eq!(pos_x(&node), 0.0);

    mgr.resume_target(1);
    mgr.update(0.0);
    mgr.update(0.5);
    assert!((pos_x(&node) - 5.0).abs() < 1e-4);
}

#[test]
fn test_pause_all_returns_set_for_selective_resume() {
    let mut mgr = ActionManager::new();
    let (node_a, target_a) = make_target(1);
    let (node_b, target_b) = make_target(2);
    let (_node_c, target_c) = make_target(3);
    mgr.add_action(move_x(1.0, 10.0), &target_a, false);
    mgr.add_action(move_x(1.0, 10.0), &target_b, false);
    mgr.add_action(move_x(1.0, 10.0), &target_c, true);

    let paused = mgr.pause_all_running_actions();
    assert_eq!(paused, vec![1, 2], "already-paused targets are not reported");

    mgr.update(0.5);
    assert_eq!(pos_x(&node_a), 0.0);

    mgr.resume_targets(&paused);
    mgr.update(0.0);
    mgr.update(0.5);
    assert!((pos_x(&node_a) - 5.0).abs() < 1e-4);
    assert!((pos_x(&node_b) - 5.0).abs() < 1e-4);
}

#[test]
fn test_get_action_by_tag() {
    let mut mgr = ActionManager::new();
    let (_node, target) = make_target(1);
    mgr.add_action(move_x(1.0, 10.0).with_tag(42), &target, false);

    let found = mgr.get_action_by_tag(42, 1).expect("tagged action present");
    assert_eq!(found.tag(), 42);
    assert!(mgr.get_action_by_tag(41, 1).is_none());
    assert!(mgr.get_action_by_tag(42, 9).is_none());
}

#[test]
fn test_callback_removes_itself_without_skipping_sibling() {
    let mut mgr = ActionManager::new();
    let (node, target) = make_target(1);

    let own_handle: Rc<RefCell<Option<ActionHandle>>> = Rc::new(RefCell::new(None));
    let handle_ref = Rc::clone(&own_handle);
    let handle = mgr.add_action(
        Action::call_func(move |ctx| {
            let handle = (*handle_ref.borrow()).expect("handle stored before update");
            ctx.manager.remove_action(handle);
        }),
        &target,
        false,
    );
    *own_handle.borrow_mut() = Some(handle);
    mgr.add_action(move_x(1.0, 10.0), &target, false);
    mgr.add_action(move_x(1.0, 100.0), &target, false);

    mgr.update(0.0); // call-func fires and removes itself here
    assert_eq!(mgr.running_action_count(1), 2);

    mgr.update(0.5);
    assert!(
        (pos_x(&node) - 55.0).abs() < 1e-3,
        "both siblings stepped exactly once, got {}",
        pos_x(&node)
    );
}

#[test]
fn test_callback_removes_earlier_sibling_without_double_step() {
    let mut mgr = ActionManager::new();
    let (node, target) = make_target(1);

    let first = mgr.add_action(move_x(1.0, 10.0), &target, false);
    mgr.add_action(
        Action::call_func(move |ctx| {
            ctx.manager.remove_action(first);
        }),
        &target,
        false,
    );
    mgr.add_action(move_x(1.0, 100.0), &target, false);

    mgr.update(0.0);
    assert_eq!(mgr.running_action_count(1), 1, "first removed, call-func done");

    mgr.update(0.5);
    assert!(
        (pos_x(&node) - 50.0).abs() < 1e-3,
        "remaining action stepped exactly once, got {}",
        pos_x(&node)
    );
}

#[test]
fn test_callback_adds_action_to_same_target() {
    let mut mgr = ActionManager::new();
    let (node, target) = make_target(1);

    let target_clone = target.clone();
    mgr.add_action(
        Action::call_func(move |ctx| {
            ctx.manager
                .add_action(move_x(1.0, 10.0), &target_clone, false);
        }),
        &target,
        false,
    );

    mgr.update(0.0);
    assert_eq!(mgr.running_action_count(1), 1, "added action registered");

    mgr.update(0.5);
    mgr.update(0.5);
    assert!((pos_x(&node) - 10.0).abs() < 1e-3);
}

#[test]
fn test_callback_clears_own_target_record() {
    let mut mgr = ActionManager::new();
    let (node, target) = make_target(1);

    mgr.add_action(
        Action::call_func(move |ctx| {
            ctx.manager.remove_all_actions_from_target(1);
        }),
        &target,
        false,
    );
    mgr.add_action(move_x(1.0, 10.0), &target, false);

    mgr.update(0.0);

    assert_eq!(mgr.target_count(), 0, "record deleted after unlock");
    assert_eq!(mgr.pooled_records(), 1);
    mgr.update(0.5);
    assert_eq!(pos_x(&node), 0.0);
}

#[test]
fn test_callback_removes_other_record_without_skipping_later_one() {
    let mut mgr = ActionManager::new();
    let (node_a, target_a) = make_target(1);
    let (node_b, target_b) = make_target(2);
    let (node_c, target_c) = make_target(3);

    // middle target's callback deletes the first record mid-pass
    mgr.add_action(move_x(1.0, 10.0), &target_a, false);
    mgr.add_action(
        Action::call_func(move |ctx| {
            ctx.manager.remove_all_actions_from_target(1);
        }),
        &target_b,
        false,
    );
    mgr.add_action(move_x(1.0, 10.0), &target_c, false);

    mgr.update(0.0);
    assert_eq!(mgr.target_count(), 1, "only the third target remains");

    mgr.update(0.5);
    assert_eq!(pos_x(&node_a), 0.0);
    assert_eq!(pos_x(&node_b), 0.0);
    assert!(
        (pos_x(&node_c) - 5.0).abs() < 1e-3,
        "later record stepped exactly once, got {}",
        pos_x(&node_c)
    );
}

#[test]
fn test_dropped_target_retires_record() {
    let mut mgr = ActionManager::new();
    {
        let (node, target) = make_target(1);
        mgr.add_action(move_x(1.0, 10.0), &target, false);
        drop(node);
        drop(target);
    }
    assert_eq!(mgr.target_count(), 1);

    mgr.update(0.5);

    assert_eq!(mgr.target_count(), 0, "dead target retired on update");
    assert_eq!(mgr.pooled_records(), 1);
}

#[test]
fn test_panicking_action_does_not_starve_others() {
    let mut mgr = ActionManager::new();
    let (node, target) = make_target(1);
    let (node2, target2) = make_target(2);

    mgr.add_action(Action::call_func(|_| panic!("boom")), &target, false);
    mgr.add_action(move_x(1.0, 10.0), &target2, false);

    mgr.update(0.0);
    mgr.update(0.5);

    assert_eq!(pos_x(&node), 0.0);
    assert!((pos_x(&node2) - 5.0).abs() < 1e-3, "second target still stepped");
    assert_eq!(mgr.running_action_count(1), 0, "panicking action dropped");
}
