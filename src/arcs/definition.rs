//! Authored arc definitions

use serde::{Deserialize, Serialize};

use crate::core::types::ArcId;
use crate::traits::condition::Condition;
use crate::traits::modifier::Modifier;

/// One stage of an arc
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcStage {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Declared minimum length. Not used by the daily transition.
    #[serde(default)]
    pub min_days: u32,
    /// Stage ends once this many days have been spent in it
    pub max_days: u32,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
}

impl ArcStage {
    pub fn new(name: impl Into<String>, min_days: u32, max_days: u32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            min_days,
            max_days,
            modifiers: Vec::new(),
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }
}

/// A multi-stage episode unlocked by a major trait
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcDefinition {
    pub id: ArcId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Must hold on a given day for the start roll to happen
    #[serde(default = "default_start_condition")]
    pub start_condition: Condition,
    /// Base probability of starting on an eligible day
    pub start_chance_per_day: f32,
    pub stages: Vec<ArcStage>,
    /// Days after completion during which the arc cannot restart
    #[serde(default)]
    pub cooldown_days: u32,
    /// Start chance multiplier once the cooldown ends
    #[serde(default = "default_multiplier")]
    pub post_cooldown_chance_multiplier: f32,
    /// Days over which the multiplier climbs back to 1.0 after the cooldown
    #[serde(default)]
    pub recovery_days_to_baseline: u32,
}

fn default_start_condition() -> Condition {
    Condition::Always
}

fn default_multiplier() -> f32 {
    1.0
}

impl ArcDefinition {
    pub fn new(id: impl Into<String>, start_chance_per_day: f32) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id: ArcId(id),
            description: String::new(),
            start_condition: Condition::Always,
            start_chance_per_day,
            stages: Vec::new(),
            cooldown_days: 0,
            post_cooldown_chance_multiplier: 1.0,
            recovery_days_to_baseline: 0,
        }
    }

    pub fn with_stage(mut self, stage: ArcStage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn with_start_condition(mut self, condition: Condition) -> Self {
        self.start_condition = condition;
        self
    }

    pub fn with_cooldown(mut self, days: u32, multiplier: f32, recovery_days: u32) -> Self {
        self.cooldown_days = days;
        self.post_cooldown_chance_multiplier = multiplier;
        self.recovery_days_to_baseline = recovery_days;
        self
    }

    pub fn stage(&self, index: usize) -> Option<&ArcStage> {
        self.stages.get(index)
    }

    /// Arcs without stages can never run
    pub fn is_runnable(&self) -> bool {
        !self.stages.is_empty()
    }

    /// Longest possible run, in days
    pub fn max_length_days(&self) -> u32 {
        self.stages.iter().map(|s| s.max_days).sum()
    }

    /// Content problems with this definition, empty when well-formed
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.stages.is_empty() {
            problems.push(format!("{}: arc has no stages", self.id));
        }
        if !(0.0..=1.0).contains(&self.start_chance_per_day) {
            problems.push(format!(
                "{}: start chance {} outside [0, 1]",
                self.id, self.start_chance_per_day
            ));
        }
        for stage in &self.stages {
            if stage.min_days > stage.max_days {
                problems.push(format!(
                    "{}: stage '{}' has min_days {} > max_days {}",
                    self.id, stage.name, stage.min_days, stage.max_days
                ));
            }
        }
        problems
    }
}
