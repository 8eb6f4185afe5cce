//! Multi-day behavioral arcs unlocked by major traits

pub mod definition;
pub mod manager;
pub mod state;

pub use definition::{ArcDefinition, ArcStage};
pub use manager::{ArcEvent, ArcManager};
pub use state::{ActiveArc, ArcHistory, ArcSnapshot, ArcState};
