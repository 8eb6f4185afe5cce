//! Employee traits: definitions, conditions, synergies, evaluation

pub mod catalog;
pub mod condition;
pub mod context;
pub mod definition;
pub mod evaluator;
pub mod generator;
pub mod modifier;
pub mod synergy;

pub use catalog::TraitCatalog;
pub use condition::{CompareOp, Condition};
pub use context::{ContextField, ContextFlag, EmployeeConditionContext, ProjectPhase};
pub use definition::{TraitCategory, TraitDefinition, TraitRarity, TraitTag, TraitTier};
pub use evaluator::{StatMap, TraitEvaluator};
pub use generator::{GeneratedTraits, TraitGenerator};
pub use modifier::{EventCategory, Modifier, ModifierOp, Stat};
pub use synergy::{SynergyRule, SynergyRuleSet};
