//! Timer scheduling
//!
//! This module provides:
//! - **Timer**: one schedulable unit — a handler, a start time, an
//!   interval, a once/repeating flag
//! - **TickScheduler**: owns the timer heap and fires everything due each
//!   tick, in non-decreasing due-time order
//!
//! # Ordering
//!
//! Timers are ordered by `(next_due, id)` ascending. Ids are monotonic per
//! scheduler, so equal due times fire in the order they were scheduled —
//! stable FIFO, by contract rather than by accident of heap internals.

mod scheduler;
mod timer;


pub use scheduler::{TickScheduler, TimerTick};
pub use timer::{Timer, TimerHandler, TimerId};
