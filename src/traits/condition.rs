//! Declarative conditions over an employee context
//!
//! Conditions are authored in content files and evaluated every tick. They
//! form a small tree: leaves test one context value, `All`/`Any` combine
//! children.
//!
//! ```toml
//! condition = { kind = "all", conditions = [
//!     { kind = "compare", field = "stress", op = ">", value = 0.6 },
//!     { kind = "flag", flag = "is_crunching", equals = true },
//! ] }
//! ```

use serde::{Deserialize, Serialize};

use crate::traits::context::{ContextField, ContextFlag, EmployeeConditionContext, ProjectPhase};

/// Tolerance for `==` when no config is at hand
pub const DEFAULT_EPSILON: f32 = 1e-4;

/// Comparison operators supported by `Compare` leaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "==")]
    Eq,
}

impl CompareOp {
    pub fn apply(self, lhs: f32, rhs: f32, epsilon: f32) -> bool {
        match self {
            CompareOp::Lt => lhs < rhs,
            CompareOp::Lte => lhs <= rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Gte => lhs >= rhs,
            CompareOp::Eq => (lhs - rhs).abs() <= epsilon,
        }
    }
}

/// Condition tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    /// Always holds
    Always,
    /// Compare a numeric field against a threshold
    Compare {
        field: ContextField,
        op: CompareOp,
        value: f32,
    },
    /// Check a boolean field
    Flag {
        flag: ContextFlag,
        #[serde(default = "default_true")]
        equals: bool,
    },
    /// Project is in the given phase
    Phase { phase: ProjectPhase },
    /// Every child holds. Empty is false.
    All { conditions: Vec<Condition> },
    /// At least one child holds. Empty is false.
    Any { conditions: Vec<Condition> },
}

fn default_true() -> bool {
    true
}

impl Condition {
    pub fn compare(field: ContextField, op: CompareOp, value: f32) -> Self {
        Condition::Compare { field, op, value }
    }

    pub fn flag(flag: ContextFlag, equals: bool) -> Self {
        Condition::Flag { flag, equals }
    }

    pub fn all(conditions: Vec<Condition>) -> Self {
        Condition::All { conditions }
    }

    pub fn any(conditions: Vec<Condition>) -> Self {
        Condition::Any { conditions }
    }

    /// Evaluate against a context using the default `==` tolerance
    pub fn evaluate(&self, ctx: &EmployeeConditionContext) -> bool {
        self.evaluate_with(ctx, DEFAULT_EPSILON)
    }

    /// Evaluate against a context with an explicit `==` tolerance
    pub fn evaluate_with(&self, ctx: &EmployeeConditionContext, epsilon: f32) -> bool {
        match self {
            Condition::Always => true,
            Condition::Compare { field, op, value } => {
                op.apply(ctx.numeric(*field), *value, epsilon)
            }
            Condition::Flag { flag, equals } => ctx.flag(*flag) == *equals,
            Condition::Phase { phase } => ctx.project_phase == *phase,
            Condition::All { conditions } => {
                !conditions.is_empty() && conditions.iter().all(|c| c.evaluate_with(ctx, epsilon))
            }
            Condition::Any { conditions } => {
                conditions.iter().any(|c| c.evaluate_with(ctx, epsilon))
            }
        }
    }
}
