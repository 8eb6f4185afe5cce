//! Conditional numeric effects on employee statistics

use serde::{Deserialize, Serialize};

use crate::traits::condition::Condition;
use crate::traits::context::EmployeeConditionContext;

/// Statistics a modifier can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Productivity,
    /// Symmetric daily swing applied on top of productivity
    ProductivityVariance,
    BugRate,
    CodeQuality,
    Creativity,
    LearningRate,
    MoraleGain,
    MoraleDecay,
    StressGain,
    BurnoutResistance,
    QuitChance,
    /// Effect on teammates' productivity
    TeamProductivity,
    MentoringBonus,
    CrunchTolerance,
    /// Likelihood multiplier for random events
    EventWeight,
}

impl Stat {
    pub const ALL: [Stat; 15] = [
        Stat::Productivity,
        Stat::ProductivityVariance,
        Stat::BugRate,
        Stat::CodeQuality,
        Stat::Creativity,
        Stat::LearningRate,
        Stat::MoraleGain,
        Stat::MoraleDecay,
        Stat::StressGain,
        Stat::BurnoutResistance,
        Stat::QuitChance,
        Stat::TeamProductivity,
        Stat::MentoringBonus,
        Stat::CrunchTolerance,
        Stat::EventWeight,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stat::Productivity => "Productivity",
            Stat::ProductivityVariance => "Productivity Variance",
            Stat::BugRate => "Bug Rate",
            Stat::CodeQuality => "Code Quality",
            Stat::Creativity => "Creativity",
            Stat::LearningRate => "Learning Rate",
            Stat::MoraleGain => "Morale Gain",
            Stat::MoraleDecay => "Morale Decay",
            Stat::StressGain => "Stress Gain",
            Stat::BurnoutResistance => "Burnout Resistance",
            Stat::QuitChance => "Quit Chance",
            Stat::TeamProductivity => "Team Productivity",
            Stat::MentoringBonus => "Mentoring Bonus",
            Stat::CrunchTolerance => "Crunch Tolerance",
            Stat::EventWeight => "Event Weight",
        }
    }
}

/// How a modifier's value is meant to be applied by the consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierOp {
    /// Fractional change (0.10 = +10%)
    #[default]
    AddPercent,
    /// Absolute change in the statistic's own units
    AddFlat,
}

/// Event categories a modifier can be scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Positive,
    Negative,
    Personal,
    Team,
    Technical,
    Crunch,
}

/// A single conditional effect on one statistic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    pub stat: Stat,
    #[serde(default)]
    pub op: ModifierOp,
    pub value: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_category: Option<EventCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl Modifier {
    pub fn new(stat: Stat, value: f32) -> Self {
        Self {
            stat,
            op: ModifierOp::AddPercent,
            value,
            event_category: None,
            condition: None,
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_event_category(mut self, category: EventCategory) -> Self {
        self.event_category = Some(category);
        self
    }

    /// True when there is no condition or the condition holds
    pub fn condition_met(&self, ctx: &EmployeeConditionContext) -> bool {
        self.condition.as_ref().map_or(true, |c| c.evaluate(ctx))
    }

    /// Same as `condition_met` with an explicit `==` tolerance
    pub fn condition_met_with(&self, ctx: &EmployeeConditionContext, epsilon: f32) -> bool {
        self.condition
            .as_ref()
            .map_or(true, |c| c.evaluate_with(ctx, epsilon))
    }

    /// True for `EventWeight` modifiers scoped to `category` or unscoped
    pub fn applies_to_event(&self, category: EventCategory) -> bool {
        self.stat == Stat::EventWeight && self.event_category.map_or(true, |c| c == category)
    }

    /// Magnitude used to order stacked modifiers
    pub fn absolute_value(&self) -> f32 {
        self.value.abs()
    }
}
