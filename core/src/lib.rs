//! cadence-core: a frame-driven action and timer scheduler.
//!
//! Once per tick, the engine advances due timers, then every running
//! action per target, then hands the mutated scene to the host's painter.
//! See [`engine::Engine`] for the orchestrating loop, [`sched`] for
//! timers, [`action`] for the composable animation algebra and [`manager`]
//! for the per-target registry.

pub mod action;
pub mod clock;
pub mod config;
pub mod engine;
pub mod heap;
pub mod manager;
pub mod sched;
pub mod script;
pub mod target;

// Re-exports for convenience
pub use action::{Action, ActionError, BezierConfig, CallbackCtx, Ease, TAG_UNSET};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::EngineConfig;
pub use engine::{Engine, Painter};
pub use heap::{Heap, HeapKey, IndexedHeap, VecHeap};
pub use manager::{ActionHandle, ActionId, ActionManager};
pub use sched::{TickScheduler, Timer, TimerHandler, TimerId, TimerTick};
pub use script::{
    ActionSpec, PlayDefinition, ScriptError, load_plays_from_dir, load_plays_from_file,
};
pub use target::{Node, SharedTarget, Target, TargetId, WeakTarget};
