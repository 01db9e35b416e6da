//! Declarative play definitions
//!
//! This module provides:
//! - **Definitions**: serde templates describing action trees (loaded from
//!   TOML)
//! - **Loader**: reads definition files from disk and validates them
//!
//! A "play" names a target node and an [`ActionSpec`] tree; `build()` turns
//! the spec into a real [`Action`](crate::action::Action). Call-function
//! actions are deliberately not expressible here — callbacks are code, not
//! content.

mod definition;
mod error;
mod loader;

#[cfg(test)]
mod script_tests;

pub use definition::{ActionSpec, BuildError, PlayDefinition};
pub use error::ScriptError;
pub use loader::{load_plays_from_dir, load_plays_from_file};
