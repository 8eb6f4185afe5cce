//! Per-employee arc runtime state
//!
//! Runtime records are kept apart from the authored `ArcDefinition`s; they
//! only refer to an arc by id.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::arcs::definition::ArcDefinition;
use crate::core::types::{ArcId, Day, EmployeeId};

/// An arc currently running for an employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveArc {
    pub arc_id: ArcId,
    pub stage_index: usize,
    pub days_in_stage: u32,
    pub started_day: Day,
}

impl ActiveArc {
    pub fn new(arc_id: ArcId, started_day: Day) -> Self {
        Self {
            arc_id,
            stage_index: 0,
            days_in_stage: 0,
            started_day,
        }
    }
}

/// Cooldown and retrigger dampening left behind by a completed arc
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcHistory {
    pub arc_id: ArcId,
    pub cooldown_days_remaining: u32,
    /// Multiplier on the arc's start chance; recovers toward 1.0
    pub retrigger_multiplier: f32,
    /// Recovery days left once the cooldown has run out
    pub recovery_days_to_baseline: u32,
    /// Change in the multiplier per recovery day
    pub recovery_per_day: f32,
    /// Times this arc has completed for the employee
    pub completions: u32,
}

impl ArcHistory {
    /// History for an arc that just completed
    pub fn on_completion(arc: &ArcDefinition, previous: Option<&ArcHistory>) -> Self {
        let multiplier = arc.post_cooldown_chance_multiplier;
        let recovery_days = arc.recovery_days_to_baseline;
        let recovery_per_day = if recovery_days == 0 {
            0.0
        } else {
            (1.0 - multiplier) / recovery_days as f32
        };
        let completions = previous
            .filter(|h| h.arc_id == arc.id)
            .map_or(0, |h| h.completions)
            + 1;

        Self {
            arc_id: arc.id.clone(),
            cooldown_days_remaining: arc.cooldown_days,
            retrigger_multiplier: if recovery_days == 0 && arc.cooldown_days == 0 {
                1.0
            } else {
                multiplier
            },
            recovery_days_to_baseline: recovery_days,
            recovery_per_day,
            completions,
        }
    }

    pub fn in_cooldown(&self) -> bool {
        self.cooldown_days_remaining > 0
    }

    pub fn is_recovered(&self) -> bool {
        !self.in_cooldown() && self.recovery_days_to_baseline == 0
    }

    /// Advance one day: count down the cooldown, then recover the multiplier
    pub fn decay_one_day(&mut self) {
        if self.cooldown_days_remaining > 0 {
            self.cooldown_days_remaining -= 1;
            return;
        }

        if self.recovery_days_to_baseline == 0 {
            self.retrigger_multiplier = 1.0;
            return;
        }

        self.recovery_days_to_baseline -= 1;
        if self.recovery_days_to_baseline == 0 {
            self.retrigger_multiplier = 1.0;
        } else if self.retrigger_multiplier < 1.0 {
            self.retrigger_multiplier = (self.retrigger_multiplier + self.recovery_per_day).min(1.0);
        } else {
            self.retrigger_multiplier = (self.retrigger_multiplier + self.recovery_per_day).max(1.0);
        }
    }
}

/// Everything the arc manager tracks for one employee
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArcState {
    pub active: Option<ActiveArc>,
    pub history: Option<ArcHistory>,
}

impl ArcState {
    pub fn is_empty(&self) -> bool {
        self.active.is_none() && self.history.is_none()
    }
}

/// Arc state for every tracked employee, for save/restore
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArcSnapshot {
    pub states: AHashMap<EmployeeId, ArcState>,
}
