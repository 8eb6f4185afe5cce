//! Trait evaluation: conditional modifiers, synergies, diminishing returns
//!
//! Every met modifier from the employee's traits and unlocked synergies is
//! grouped by statistic. Within a statistic, sources are ranked by magnitude
//! and weighted 100% / 60% / 35% / 20%... so many small traits can't stack
//! without bound.

use ahash::AHashMap;
use rand::Rng;

use crate::core::config::EngineConfig;
use crate::traits::context::EmployeeConditionContext;
use crate::traits::definition::TraitDefinition;
use crate::traits::modifier::{EventCategory, Modifier, Stat};
use crate::traits::synergy::{count_tags, SynergyRule, SynergyRuleSet};

/// Net effect per statistic. A missing key means no effect.
pub type StatMap = AHashMap<Stat, f32>;

/// Combine same-stat values with rank-based diminishing weights
///
/// Values are ranked by absolute size (ties: positive first) and the signed
/// values are summed with `config.stacking_weight(rank)`.
pub fn stack_diminishing(values: impl IntoIterator<Item = f32>, config: &EngineConfig) -> f32 {
    let mut values: Vec<f32> = values.into_iter().collect();
    values.sort_by(|a, b| b.abs().total_cmp(&a.abs()).then(b.total_cmp(a)));
    values
        .iter()
        .enumerate()
        .map(|(rank, v)| v * config.stacking_weight(rank))
        .sum()
}

/// Clamp `1 + modifier` into the configured event weight bounds
pub fn clamp_event_weight(modifier: f32, config: &EngineConfig) -> f32 {
    if modifier.is_nan() {
        return 1.0_f32.clamp(config.event_weight_min, config.event_weight_max);
    }
    (1.0 + modifier).clamp(config.event_weight_min, config.event_weight_max)
}

/// Daily productivity multiplier from a `ProductivityVariance` effect
///
/// The effect is a symmetric range: 0.2 yields a multiplier in [0.8, 1.2].
/// Degenerate ranges (≤ -100%) give exactly 1.0, other negatives use their
/// magnitude, and the range is capped at 100%.
pub fn roll_productivity_variance(stats: &StatMap, rng: &mut impl Rng) -> f32 {
    let range = match stats.get(&Stat::ProductivityVariance) {
        Some(r) => *r,
        None => return 1.0,
    };
    if !range.is_finite() || range <= -1.0 {
        return 1.0;
    }
    let range = range.abs().min(1.0);
    if range == 0.0 {
        return 1.0;
    }
    1.0 + rng.gen_range(-range..=range)
}

/// Aggregates trait and synergy modifiers into a `StatMap`
#[derive(Debug, Clone)]
pub struct TraitEvaluator {
    config: EngineConfig,
    synergies: SynergyRuleSet,
}

impl TraitEvaluator {
    pub fn new(config: EngineConfig, synergies: SynergyRuleSet) -> Self {
        Self { config, synergies }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn synergies(&self) -> &SynergyRuleSet {
        &self.synergies
    }

    /// Net effect per statistic for one employee's traits
    pub fn evaluate(
        &self,
        major: Option<&TraitDefinition>,
        minors: &[&TraitDefinition],
        ctx: &EmployeeConditionContext,
    ) -> StatMap {
        let mut grouped: AHashMap<Stat, Vec<f32>> = AHashMap::new();
        for modifier in self.met_modifiers(major, minors, ctx) {
            grouped.entry(modifier.stat).or_default().push(modifier.value);
        }

        grouped
            .into_iter()
            .map(|(stat, values)| (stat, stack_diminishing(values, &self.config)))
            .collect()
    }

    /// Synergy rules unlocked by these traits
    pub fn applied_synergies(
        &self,
        major: Option<&TraitDefinition>,
        minors: &[&TraitDefinition],
    ) -> Vec<&SynergyRule> {
        let tags = count_tags(major.into_iter().chain(minors.iter().copied()));
        self.synergies.applicable(&tags)
    }

    /// Event weight multiplier for one event category, clamped
    ///
    /// Uses `EventWeight` modifiers scoped to `category` or left unscoped.
    pub fn event_weight_for(
        &self,
        major: Option<&TraitDefinition>,
        minors: &[&TraitDefinition],
        ctx: &EmployeeConditionContext,
        category: EventCategory,
    ) -> f32 {
        clamp_event_weight(self.event_weight_sum(major, minors, ctx, category), &self.config)
    }

    /// Stacked, unclamped `EventWeight` modifier for one category
    pub fn event_weight_sum(
        &self,
        major: Option<&TraitDefinition>,
        minors: &[&TraitDefinition],
        ctx: &EmployeeConditionContext,
        category: EventCategory,
    ) -> f32 {
        let values = self
            .met_modifiers(major, minors, ctx)
            .filter(|m| m.applies_to_event(category))
            .map(|m| m.value);
        stack_diminishing(values, &self.config)
    }

    /// Clamp an already aggregated event weight modifier
    pub fn event_weight_modifier(&self, modifier: f32) -> f32 {
        clamp_event_weight(modifier, &self.config)
    }

    fn met_modifiers<'a>(
        &'a self,
        major: Option<&'a TraitDefinition>,
        minors: &'a [&'a TraitDefinition],
        ctx: &'a EmployeeConditionContext,
    ) -> impl Iterator<Item = &'a Modifier> + 'a {
        let epsilon = self.config.float_epsilon;
        let trait_modifiers = major
            .into_iter()
            .chain(minors.iter().copied())
            .flat_map(|t| t.modifiers.iter());
        let synergy_modifiers = self
            .applied_synergies(major, minors)
            .into_iter()
            .flat_map(|rule| rule.modifiers.iter());

        trait_modifiers
            .chain(synergy_modifiers)
            .filter(move |m| m.condition_met_with(ctx, epsilon))
    }
}
