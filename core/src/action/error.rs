//! Error types for action operations

use thiserror::Error;

/// Errors surfaced by the action API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// `reverse()` was requested on an action with no defined inverse.
    ///
    /// "-to" transforms depend on a start value observed at bind time, so
    /// there is nothing to negate; callers must check before using the
    /// result.
    #[error("action `{kind}` has no defined reverse")]
    NotReversible {
        /// Constructor name of the offending action.
        kind: &'static str,
    },
}
