//! Tests for composite actions
//!
//! Sequencing edge cases, repeat carry-over, spawn padding, and speed
//! scaling. Actions are primed with `step(0.0)` after start so deltas
//! accumulate exactly.

use std::cell::RefCell;
use std::rc::Rc;

use nalgebra_glm as glm;

use crate::manager::ActionManager;
use crate::target::{Node, SharedTarget};

use super::{Action, Ease};

fn make_target(id: u64) -> (Rc<RefCell<Node>>, SharedTarget) {
    let node = Node::shared(id);
    let shared: SharedTarget = node.clone();
    (node, shared)
}

fn assert_vec3_eq(actual: glm::Vec3, expected: glm::Vec3) {
    assert!(
        glm::distance(&actual, &expected) < 1e-3,
        "expected {expected:?}, got {actual:?}"
    );
}

fn move_x(duration: f32, dx: f32) -> Action {
    Action::move_by(duration, glm::vec3(dx, 0.0, 0.0))
}

#[test]
fn test_sequence_timing_at_boundaries() {
    let (node, target) = make_target(1);
    let mut seq = Action::sequence(vec![move_x(1.0, 10.0), move_x(1.0, 100.0)]);
    let mut mgr = ActionManager::new();

    seq.start(&target);
    seq.step(0.0, &mut mgr);

    seq.step(0.5, &mut mgr);
    assert_vec3_eq(node.borrow().position, glm::vec3(5.0, 0.0, 0.0));

    seq.step(0.5, &mut mgr);
    assert_vec3_eq(node.borrow().position, glm::vec3(10.0, 0.0, 0.0));

    seq.step(0.5, &mut mgr);
    assert_vec3_eq(node.borrow().position, glm::vec3(60.0, 0.0, 0.0));

    seq.step(0.5, &mut mgr);
    assert_vec3_eq(node.borrow().position, glm::vec3(110.0, 0.0, 0.0));
    assert!(seq.is_done());
}

#[test]
fn test_sequence_finishes_first_child_exactly_once() {
    let (_node, target) = make_target(1);
    let count = Rc::new(RefCell::new(0_u32));
    let inner = Rc::clone(&count);
    // the call-func sits at the boundary; crossing it twice would double-fire
    let mut seq = Action::sequence(vec![
        move_x(1.0, 10.0),
        Action::call_func(move |_| *inner.borrow_mut() += 1),
        move_x(1.0, 10.0),
    ]);
    let mut mgr = ActionManager::new();

    seq.start(&target);
    seq.step(0.0, &mut mgr);
    for _ in 0..8 {
        seq.step(0.25, &mut mgr);
    }

    assert_eq!(*count.borrow(), 1, "boundary child fires exactly once");
    assert!(seq.is_done());
}

#[test]
fn test_sequence_replays_skipped_child() {
    let (node, target) = make_target(1);
    let count = Rc::new(RefCell::new(0_u32));
    let inner = Rc::clone(&count);
    let mut seq = Action::sequence(vec![
        Action::call_func(move |_| *inner.borrow_mut() += 1),
        move_x(0.1, 10.0),
        move_x(1.0, 100.0),
    ]);
    let mut mgr = ActionManager::new();

    seq.start(&target);
    // one giant step blows straight past the first two children
    seq.step(0.0, &mut mgr);
    seq.step(10.0, &mut mgr);

    assert_eq!(*count.borrow(), 1, "skipped instant still fires");
    assert_vec3_eq(node.borrow().position, glm::vec3(110.0, 0.0, 0.0));
    assert!(seq.is_done());
}

#[test]
fn test_sequence_duration_is_sum() {
    let seq = Action::sequence(vec![
        move_x(1.0, 1.0),
        move_x(2.0, 1.0),
        Action::delay(0.5),
    ]);
    assert!((seq.duration() - 3.5).abs() < 1e-6);
}

#[test]
fn test_sequence_reverse_flips_order_and_negates() {
    let (node, target) = make_target(1);
    let seq = Action::sequence(vec![move_x(1.0, 10.0), move_x(1.0, 100.0)]);
    let mut reversed = seq.reverse().expect("all children reversible");
    let mut mgr = ActionManager::new();

    reversed.start(&target);
    reversed.step(0.0, &mut mgr);
    reversed.step(0.5, &mut mgr);
    // the second child's inverse runs first
    assert_vec3_eq(node.borrow().position, glm::vec3(-50.0, 0.0, 0.0));

    reversed.step(1.5, &mut mgr);
    assert_vec3_eq(node.borrow().position, glm::vec3(-110.0, 0.0, 0.0));
}

#[test]
fn test_sequence_with_to_child_is_not_reversible() {
    let seq = Action::sequence(vec![
        move_x(1.0, 10.0),
        Action::move_to(1.0, glm::vec3(0.0, 0.0, 0.0)),
    ]);
    assert!(seq.reverse().is_err());
}

#[test]
fn test_spawn_runs_children_together() {
    let (node, target) = make_target(1);
    let mut spawn = Action::spawn(vec![
        move_x(1.0, 10.0),
        Action::rotate_by(2.0, glm::vec3(0.0, 0.0, 90.0)),
    ]);
    assert!((spawn.duration() - 2.0).abs() < 1e-6, "duration is the max");
    let mut mgr = ActionManager::new();

    spawn.start(&target);
    spawn.step(0.0, &mut mgr);
    spawn.step(1.0, &mut mgr);

    // the shorter child is padded, so outer t = 0.5 completes it
    assert_vec3_eq(node.borrow().position, glm::vec3(10.0, 0.0, 0.0));
    assert_vec3_eq(node.borrow().rotation, glm::vec3(0.0, 0.0, 45.0));
    assert!(!spawn.is_done());

    spawn.step(1.0, &mut mgr);
    assert_vec3_eq(node.borrow().rotation, glm::vec3(0.0, 0.0, 90.0));
    assert!(spawn.is_done());
}

#[test]
fn test_spawn_reverse_reverses_both_children() {
    let (node, target) = make_target(1);
    let spawn = Action::spawn(vec![
        move_x(1.0, 10.0),
        Action::rotate_by(2.0, glm::vec3(0.0, 0.0, 90.0)),
    ]);
    let mut reversed = spawn.reverse().expect("children reversible");
    assert!((reversed.duration() - 2.0).abs() < 1e-6, "max relation kept");
    let mut mgr = ActionManager::new();

    reversed.start(&target);
    reversed.step(0.0, &mut mgr);
    reversed.step(2.0, &mut mgr);

    assert_vec3_eq(node.borrow().position, glm::vec3(-10.0, 0.0, 0.0));
    assert_vec3_eq(node.borrow().rotation, glm::vec3(0.0, 0.0, -90.0));
}

#[test]
fn test_repeat_carry_over_spans_cycles() {
    let (node, target) = make_target(1);
    let mut repeat = Action::repeat(move_x(1.0, 10.0), 3);
    assert!((repeat.duration() - 3.0).abs() < 1e-6);
    let mut mgr = ActionManager::new();

    repeat.start(&target);
    repeat.step(0.0, &mut mgr);
    // one delta spanning two full cycles plus half of the third; leftover
    // time must carry across each boundary with no discontinuity
    repeat.step(2.5, &mut mgr);

    assert_vec3_eq(node.borrow().position, glm::vec3(25.0, 0.0, 0.0));
    assert!(!repeat.is_done());

    repeat.step(0.5, &mut mgr);
    assert_vec3_eq(node.borrow().position, glm::vec3(30.0, 0.0, 0.0));
    assert!(repeat.is_done());
}

#[test]
fn test_repeat_of_instant_fires_exact_count() {
    let (_node, target) = make_target(1);
    let count = Rc::new(RefCell::new(0_u32));
    let inner = Rc::clone(&count);
    let mut repeat = Action::repeat(Action::call_func(move |_| *inner.borrow_mut() += 1), 3);
    let mut mgr = ActionManager::new();

    repeat.start(&target);
    repeat.step(0.0, &mut mgr);

    assert_eq!(*count.borrow(), 3, "instant inner fires once per repetition");
    assert!(repeat.is_done());
}

#[test]
fn test_repeat_under_sequence_replays_cycles() {
    let (node, target) = make_target(1);
    let mut seq = Action::sequence(vec![
        Action::repeat(move_x(0.5, 10.0), 2),
        move_x(1.0, 100.0),
    ]);
    let mut mgr = ActionManager::new();

    seq.start(&target);
    seq.step(0.0, &mut mgr);
    seq.step(1.0, &mut mgr);
    assert_vec3_eq(node.borrow().position, glm::vec3(20.0, 0.0, 0.0));

    seq.step(1.0, &mut mgr);
    assert_vec3_eq(node.borrow().position, glm::vec3(120.0, 0.0, 0.0));
    assert!(seq.is_done());
}

#[test]
fn test_repeat_forever_restarts_with_leftover() {
    let (node, target) = make_target(1);
    let mut forever = Action::repeat_forever(move_x(1.0, 10.0));
    let mut mgr = ActionManager::new();

    forever.start(&target);
    forever.step(0.0, &mut mgr);
    forever.step(2.25, &mut mgr);

    assert_vec3_eq(node.borrow().position, glm::vec3(22.5, 0.0, 0.0));
    assert!(!forever.is_done(), "repeat-forever never reports done");

    forever.step(0.75, &mut mgr);
    assert_vec3_eq(node.borrow().position, glm::vec3(30.0, 0.0, 0.0));
    assert!(!forever.is_done());
}

#[test]
fn test_speed_scales_driving_dt() {
    let (node, target) = make_target(1);
    let mut fast = Action::speed(move_x(1.0, 10.0), 2.0);
    let mut mgr = ActionManager::new();

    fast.start(&target);
    fast.step(0.0, &mut mgr);
    fast.step(0.25, &mut mgr);
    assert_vec3_eq(node.borrow().position, glm::vec3(5.0, 0.0, 0.0));

    fast.step(0.25, &mut mgr);
    assert_vec3_eq(node.borrow().position, glm::vec3(10.0, 0.0, 0.0));
    assert!(fast.is_done());
}

#[test]
fn test_speed_keeps_duration_bookkeeping() {
    let fast = Action::speed(move_x(1.0, 10.0), 4.0);
    assert!((fast.duration() - 1.0).abs() < 1e-6);
}

#[test]
fn test_eased_sequence_still_hits_endpoints() {
    let (node, target) = make_target(1);
    let mut seq = Action::sequence(vec![move_x(1.0, 10.0), move_x(1.0, 10.0)])
        .easing(Ease::SineInOut);
    let mut mgr = ActionManager::new();

    seq.start(&target);
    seq.step(0.0, &mut mgr);
    for _ in 0..4 {
        seq.step(0.5, &mut mgr);
    }

    assert_vec3_eq(node.borrow().position, glm::vec3(20.0, 0.0, 0.0));
    assert!(seq.is_done());
}

#[test]
fn test_repeat_reverse_repeats_the_inverse() {
    let (node, target) = make_target(1);
    let repeat = Action::repeat(move_x(1.0, 10.0), 2);
    let mut reversed = repeat.reverse().expect("inner reversible");
    let mut mgr = ActionManager::new();

    reversed.start(&target);
    reversed.step(0.0, &mut mgr);
    reversed.step(2.0, &mut mgr);

    assert_vec3_eq(node.borrow().position, glm::vec3(-20.0, 0.0, 0.0));
    assert!(reversed.is_done());
}
