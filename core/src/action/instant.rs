//! Instant actions
//!
//! Zero-duration actions that complete on their first update. The only
//! instant in the set is the call-function leaf; the payload of a callback
//! is whatever its closure captured.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::manager::ActionManager;
use crate::target::SharedTarget;

/// Context handed to a call-function callback.
///
/// The manager reference is what makes callbacks free to add and remove
/// actions — including the one currently executing — while the frame
/// update is in progress.
pub struct CallbackCtx<'a> {
    /// The action's target, if it is still alive.
    pub target: Option<SharedTarget>,
    /// The manager driving the current update.
    pub manager: &'a mut ActionManager,
}

/// Shared callback slot. Cloning an action shares the callback.
pub type ActionCallback = Rc<RefCell<dyn FnMut(&mut CallbackCtx<'_>)>>;

/// Invokes an external callback once, then reports done.
#[derive(Clone)]
pub(crate) struct CallFunc {
    callback: ActionCallback,
    pub(crate) done: bool,
}

impl CallFunc {
    pub(crate) fn new(callback: impl FnMut(&mut CallbackCtx<'_>) + 'static) -> Self {
        Self {
            callback: Rc::new(RefCell::new(callback)),
            done: false,
        }
    }

    pub(crate) fn start(&mut self) {
        self.done = false;
    }

    pub(crate) fn update(&mut self, target: Option<SharedTarget>, manager: &mut ActionManager) {
        if self.done {
            return;
        }
        self.done = true;
        let callback = Rc::clone(&self.callback);
        let mut ctx = CallbackCtx { target, manager };
        (&mut *callback.borrow_mut())(&mut ctx);
    }

    /// An unfired copy sharing the same callback.
    pub(crate) fn clone_fresh(&self) -> Self {
        Self {
            callback: Rc::clone(&self.callback),
            done: false,
        }
    }
}

impl fmt::Debug for CallFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallFunc").field("done", &self.done).finish()
    }
}
