//! Studio Traits - employee trait rule engine
//!
//! Employees carry one major and two minor traits. Traits contribute
//! conditional modifiers to work statistics, shared tags unlock synergies,
//! and some major traits unlock multi-day arcs with their own modifiers.
//! `TraitSystem` ties the pieces together.

pub mod arcs;
pub mod content;
pub mod core;
pub mod system;
pub mod traits;

pub use crate::core::{EngineConfig, Result, TraitError};
pub use crate::system::TraitSystem;
