//! Tick orchestration
//!
//! One [`Engine::tick`] is a full synchronous pass: all due timers fire,
//! then every running action steps, then the host's painter runs against
//! the mutated scene state. Nothing suspends mid-tick, and the ordering is
//! part of the contract — a timer handler observes the world as of the
//! previous frame's actions, an action observes this frame's timers.

use crate::config::EngineConfig;
use crate::manager::ActionManager;
use crate::sched::TickScheduler;

/// Render/draw step invoked once per tick after both updates.
///
/// The scene itself is host-owned; painters capture whatever state they
/// need to draw.
pub trait Painter {
    /// Paint the current scene state.
    fn paint(&mut self, frame: u64, now: f64);
}

/// Owns the scheduler and manager and advances both once per tick.
pub struct Engine {
    scheduler: TickScheduler,
    manager: ActionManager,
    painter: Option<Box<dyn Painter>>,
    config: EngineConfig,
    now: f64,
    frame: u64,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with explicit configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            scheduler: TickScheduler::new(),
            manager: ActionManager::with_pool_capacity(config.record_pool_capacity),
            painter: None,
            config,
            now: 0.0,
            frame: 0,
        }
    }

    /// Install the render step invoked at the end of every tick.
    pub fn set_painter(&mut self, painter: impl Painter + 'static) {
        self.painter = Some(Box::new(painter));
    }

    /// The timer scheduler.
    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    /// The timer scheduler, mutably.
    pub fn scheduler_mut(&mut self) -> &mut TickScheduler {
        &mut self.scheduler
    }

    /// The action manager.
    pub fn manager(&self) -> &ActionManager {
        &self.manager
    }

    /// The action manager, mutably.
    pub fn manager_mut(&mut self) -> &mut ActionManager {
        &mut self.manager
    }

    /// Current simulation time in seconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Number of completed ticks.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Advance the whole system by `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        self.now += dt;
        // all due timers fire before any action steps
        self.scheduler.advance(self.now);
        self.manager.update(dt as f32);
        if let Some(painter) = &mut self.painter {
            painter.paint(self.frame, self.now);
        }
        self.frame += 1;
        if self.config.log_frame_stats && self.frame % self.config.frame_stats_interval == 0 {
            tracing::debug!(
                frame = self.frame,
                timers = self.scheduler.len(),
                targets = self.manager.target_count(),
                "frame stats"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use nalgebra_glm as glm;

    use crate::action::Action;
    use crate::target::{Node, SharedTarget};

    use super::{Engine, Painter};

    struct EventLog(Rc<RefCell<Vec<String>>>);

    impl Painter for EventLog {
        fn paint(&mut self, frame: u64, _now: f64) {
            self.0.borrow_mut().push(format!("paint:{frame}"));
        }
    }

    #[test]
    fn test_tick_orders_timers_actions_paint() {
        let mut engine = Engine::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        engine.set_painter(EventLog(Rc::clone(&log)));

        let timer_log = Rc::clone(&log);
        engine
            .scheduler_mut()
            .schedule_once(move |_| timer_log.borrow_mut().push("timer".to_string()), 0.5);

        let node = Node::shared(1);
        let shared: SharedTarget = node.clone();
        let action_log = Rc::clone(&log);
        engine.manager_mut().add_action(
            Action::call_func(move |_| action_log.borrow_mut().push("action".to_string())),
            &shared,
            false,
        );

        engine.tick(1.0);

        assert_eq!(
            *log.borrow(),
            vec!["timer", "action", "paint:0"],
            "timers fire before actions, painter runs last"
        );
        assert_eq!(engine.frame(), 1);
        assert!((engine.now() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_tick_advances_actions_by_dt() {
        let mut engine = Engine::new();
        let node = Node::shared(1);
        let shared: SharedTarget = node.clone();
        engine
            .manager_mut()
            .add_action(Action::move_by(1.0, glm::vec3(10.0, 0.0, 0.0)), &shared, false);

        engine.tick(0.0); // prime
        engine.tick(0.5);

        assert!((node.borrow().position.x - 5.0).abs() < 1e-4);
    }
}
