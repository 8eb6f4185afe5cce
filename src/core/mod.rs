pub mod config;
pub mod error;
pub mod types;

pub use config::EngineConfig;
pub use error::{Result, TraitError};
pub use types::{ArcId, Day, EmployeeId, TraitId};
