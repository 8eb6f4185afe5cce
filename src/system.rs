//! Trait system facade
//!
//! Wires the catalog, evaluator, arc manager and generator together. One
//! instance is built per session and passed by reference to whoever needs
//! trait effects. The caller pushes day ticks with `advance_day` and asks for
//! each employee's statistics with a fresh context.

use std::path::Path;

use ahash::AHashMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::arcs::manager::{ArcEvent, ArcManager};
use crate::arcs::state::{ArcSnapshot, ArcState};
use crate::content::ContentPack;
use crate::core::config::EngineConfig;
use crate::core::error::{Result, TraitError};
use crate::core::types::{Day, EmployeeId};
use crate::traits::catalog::TraitCatalog;
use crate::traits::context::EmployeeConditionContext;
use crate::traits::definition::{TraitDefinition, TraitTag};
use crate::traits::evaluator::{roll_productivity_variance, StatMap, TraitEvaluator};
use crate::traits::generator::{GeneratedTraits, TraitGenerator};
use crate::traits::modifier::{EventCategory, Modifier};
use crate::traits::synergy::{count_tags, SynergyRuleSet};

pub struct TraitSystem {
    catalog: TraitCatalog,
    evaluator: TraitEvaluator,
    arcs: ArcManager,
    generator: TraitGenerator,
    rng: ChaCha8Rng,
    current_day: Day,
}

impl TraitSystem {
    /// Build a system from loaded content
    ///
    /// `seed` drives every random roll: trait generation, arc starts and
    /// productivity variance each get their own stream derived from it.
    pub fn new(
        catalog: TraitCatalog,
        synergies: SynergyRuleSet,
        config: EngineConfig,
        seed: u64,
    ) -> Result<Self> {
        config.validate().map_err(TraitError::InvalidConfig)?;

        let mut master = ChaCha8Rng::seed_from_u64(seed);
        let generator = TraitGenerator::new(&config, master.gen());
        let arcs = ArcManager::new(master.gen());
        let rng = ChaCha8Rng::seed_from_u64(master.gen());

        Ok(Self {
            catalog,
            evaluator: TraitEvaluator::new(config, synergies),
            arcs,
            generator,
            rng,
            current_day: 0,
        })
    }

    /// System over the built-in content pack
    pub fn with_builtin_content(config: EngineConfig, seed: u64) -> Result<Self> {
        let (catalog, synergies) = ContentPack::builtin()?.into_parts();
        Self::new(catalog, synergies, config, seed)
    }

    /// System over the content files in `dir`
    pub fn from_content_dir(dir: &Path, config: EngineConfig, seed: u64) -> Result<Self> {
        let (catalog, synergies) = ContentPack::load_dir(dir)?.into_parts();
        Self::new(catalog, synergies, config, seed)
    }

    pub fn current_day(&self) -> Day {
        self.current_day
    }

    /// Move the calendar forward one day
    pub fn advance_day(&mut self) -> Day {
        self.current_day += 1;
        self.current_day
    }

    pub fn set_day(&mut self, day: Day) {
        self.current_day = day;
    }

    pub fn catalog(&self) -> &TraitCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        self.evaluator.config()
    }

    pub fn trait_definition(&self, id: &str) -> Option<&TraitDefinition> {
        self.catalog.get(id)
    }

    /// Full statistics for one employee on the current day
    ///
    /// Runs the employee's daily arc step (at most once per day) and adds
    /// the running arc stage's modifiers on top of the stacked trait effects.
    /// Unknown trait ids contribute nothing.
    pub fn evaluate_employee_traits<S: AsRef<str>>(
        &mut self,
        employee: EmployeeId,
        major_id: &str,
        minor_ids: &[S],
        ctx: &EmployeeConditionContext,
    ) -> StatMap {
        let major = resolve(&self.catalog, major_id);
        let minors = resolve_all(&self.catalog, minor_ids);

        let mut stats = self.evaluator.evaluate(major, &minors, ctx);
        self.arcs
            .process_day(&self.catalog, employee, major, ctx, self.current_day);

        let epsilon = self.evaluator.config().float_epsilon;
        fold_arc_modifiers(
            &mut stats,
            self.arcs.active_arc_modifiers(&self.catalog, employee),
            ctx,
            epsilon,
        );
        stats
    }

    /// Stacked trait and synergy effects, without touching arc state
    pub fn evaluate_traits_only<S: AsRef<str>>(
        &self,
        major_id: &str,
        minor_ids: &[S],
        ctx: &EmployeeConditionContext,
    ) -> StatMap {
        let major = resolve(&self.catalog, major_id);
        let minors = resolve_all(&self.catalog, minor_ids);
        self.evaluator.evaluate(major, &minors, ctx)
    }

    /// Run only the daily arc step for an employee
    pub fn process_daily_arcs(
        &mut self,
        employee: EmployeeId,
        major_id: &str,
        ctx: &EmployeeConditionContext,
    ) -> Vec<ArcEvent> {
        let major = resolve(&self.catalog, major_id);
        self.arcs
            .process_day(&self.catalog, employee, major, ctx, self.current_day)
    }

    /// Tag counts across the given traits
    pub fn count_tags<S: AsRef<str>>(&self, trait_ids: &[S]) -> AHashMap<TraitTag, u32> {
        count_tags(resolve_all(&self.catalog, trait_ids))
    }

    /// Roll traits for a new employee
    pub fn generate_traits(&mut self) -> Result<GeneratedTraits> {
        self.generator.generate(&self.catalog)
    }

    /// Daily productivity multiplier from an evaluated `StatMap`
    pub fn roll_productivity_variance(&mut self, stats: &StatMap) -> f32 {
        roll_productivity_variance(stats, &mut self.rng)
    }

    /// Event weight multiplier for one category, including a running arc
    pub fn event_weight_for<S: AsRef<str>>(
        &self,
        employee: EmployeeId,
        major_id: &str,
        minor_ids: &[S],
        ctx: &EmployeeConditionContext,
        category: EventCategory,
    ) -> f32 {
        let major = resolve(&self.catalog, major_id);
        let minors = resolve_all(&self.catalog, minor_ids);
        let epsilon = self.evaluator.config().float_epsilon;

        let from_traits = self.evaluator.event_weight_sum(major, &minors, ctx, category);
        let from_arc: f32 = self
            .arcs
            .active_arc_modifiers(&self.catalog, employee)
            .iter()
            .filter(|m| m.applies_to_event(category) && m.condition_met_with(ctx, epsilon))
            .map(|m| m.value)
            .sum();
        self.evaluator.event_weight_modifier(from_traits + from_arc)
    }

    pub fn active_arc_modifiers(&self, employee: EmployeeId) -> &[Modifier] {
        self.arcs.active_arc_modifiers(&self.catalog, employee)
    }

    pub fn arcs(&self) -> &ArcManager {
        &self.arcs
    }

    pub fn arc_state(&self, employee: EmployeeId) -> ArcState {
        self.arcs.arc_state(employee)
    }

    pub fn load_arc_state(&mut self, employee: EmployeeId, state: ArcState) {
        self.arcs.load_arc_state(employee, state);
    }

    /// Stop tracking an employee who left the studio
    pub fn remove_employee(&mut self, employee: EmployeeId) {
        self.arcs.forget(employee);
    }

    pub fn export_arc_states(&self) -> ArcSnapshot {
        self.arcs.snapshot()
    }

    pub fn import_arc_states(&mut self, snapshot: ArcSnapshot) {
        self.arcs.restore(snapshot);
    }

    /// Arc states as JSON, for save files
    pub fn export_arc_states_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.arcs.snapshot())?)
    }

    pub fn import_arc_states_json(&mut self, json: &str) -> Result<()> {
        let snapshot: ArcSnapshot = serde_json::from_str(json)?;
        self.arcs.restore(snapshot);
        Ok(())
    }
}

fn resolve<'c>(catalog: &'c TraitCatalog, id: &str) -> Option<&'c TraitDefinition> {
    let found = catalog.get(id);
    if found.is_none() {
        tracing::debug!("Unknown trait id '{}' skipped", id);
    }
    found
}

fn resolve_all<'c, S: AsRef<str>>(catalog: &'c TraitCatalog, ids: &[S]) -> Vec<&'c TraitDefinition> {
    ids.iter()
        .filter_map(|id| resolve(catalog, id.as_ref()))
        .collect()
}

/// Arc stage modifiers are added after stacking, at full value
fn fold_arc_modifiers(
    stats: &mut StatMap,
    modifiers: &[Modifier],
    ctx: &EmployeeConditionContext,
    epsilon: f32,
) {
    for modifier in modifiers {
        if modifier.condition_met_with(ctx, epsilon) {
            *stats.entry(modifier.stat).or_insert(0.0) += modifier.value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arcs::definition::{ArcDefinition, ArcStage};
    use crate::traits::definition::{TraitCategory, TraitRarity, TraitTier};
    use crate::traits::modifier::Stat;
    use crate::traits::synergy::SynergyRule;

    fn small_system() -> TraitSystem {
        let traits = vec![
            TraitDefinition::new(
                "grinder",
                TraitTier::Major,
                TraitCategory::Work,
                TraitRarity::Common,
                vec![TraitTag::Speed],
            )
            .with_modifier(Modifier::new(Stat::Productivity, 0.10))
            .with_arc("crash"),
            TraitDefinition::new(
                "caffeinated",
                TraitTier::Minor,
                TraitCategory::Health,
                TraitRarity::Common,
                vec![TraitTag::Speed],
            )
            .with_modifier(Modifier::new(Stat::Productivity, 0.05)),
            TraitDefinition::new(
                "tidy",
                TraitTier::Minor,
                TraitCategory::Work,
                TraitRarity::Common,
                vec![TraitTag::Quality],
            ),
        ];
        let arcs = vec![ArcDefinition::new("crash", 1.0)
            .with_stage(
                ArcStage::new("Slump", 1, 3)
                    .with_modifier(Modifier::new(Stat::Productivity, -0.30))
                    .with_modifier(
                        Modifier::new(Stat::EventWeight, 0.5)
                            .with_event_category(EventCategory::Negative),
                    ),
            )
            .with_cooldown(10, 0.5, 10)];
        let synergies = SynergyRuleSet::from_rules(vec![SynergyRule::new("Quick Hands", TraitTag::Speed, 2)
            .with_modifier(Modifier::new(Stat::TeamProductivity, 0.05))]);

        TraitSystem::new(
            TraitCatalog::from_content(traits, arcs),
            synergies,
            EngineConfig::default(),
            42,
        )
        .unwrap()
    }

    #[test]
    fn test_arc_modifiers_added_after_stacking() {
        let mut system = small_system();
        let employee = EmployeeId::new();
        let ctx = EmployeeConditionContext::default();
        system.advance_day();

        let before = system.evaluate_traits_only("grinder", &["caffeinated"], &ctx);
        assert!((before[&Stat::Productivity] - (0.10 + 0.05 * 0.6)).abs() < 1e-6);
        assert!((before[&Stat::TeamProductivity] - 0.05).abs() < 1e-6);

        // Start chance is 1.0, so the arc is running after this call
        let stats = system.evaluate_employee_traits(employee, "grinder", &["caffeinated"], &ctx);
        assert!((stats[&Stat::Productivity] - (0.13 - 0.30)).abs() < 1e-6);
        assert!(system.arcs().active_arc(employee).is_some());
    }

    #[test]
    fn test_unknown_ids_are_skipped() {
        let mut system = small_system();
        let employee = EmployeeId::new();
        let stats = system.evaluate_employee_traits(
            employee,
            "no_such_major",
            &["caffeinated", "no_such_minor"],
            &EmployeeConditionContext::default(),
        );
        assert!((stats[&Stat::Productivity] - 0.05).abs() < 1e-6);
        assert!(system.arcs().active_arc(employee).is_none());
    }

    #[test]
    fn test_event_weight_includes_running_arc() {
        let mut system = small_system();
        let employee = EmployeeId::new();
        let ctx = EmployeeConditionContext::default();
        let minors: [&str; 0] = [];

        assert_eq!(
            system.event_weight_for(employee, "grinder", &minors, &ctx, EventCategory::Negative),
            1.0
        );
        system.process_daily_arcs(employee, "grinder", &ctx);
        assert!(
            (system.event_weight_for(employee, "grinder", &minors, &ctx, EventCategory::Negative) - 1.5)
                .abs()
                < 1e-6
        );
        assert_eq!(
            system.event_weight_for(employee, "grinder", &minors, &ctx, EventCategory::Positive),
            1.0
        );
    }

    #[test]
    fn test_count_tags_resolves_ids() {
        let system = small_system();
        let tags = system.count_tags(&["grinder", "caffeinated", "tidy", "ghost"]);
        assert_eq!(tags[&TraitTag::Speed], 2);
        assert_eq!(tags[&TraitTag::Quality], 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig {
            stacking_weights: Vec::new(),
            ..Default::default()
        };
        let result = TraitSystem::new(TraitCatalog::new(), SynergyRuleSet::new(), config, 1);
        assert!(matches!(result, Err(TraitError::InvalidConfig(_))));
    }

    #[test]
    fn test_arc_state_json_round_trip() {
        let mut system = small_system();
        let employee = EmployeeId::new();
        system.process_daily_arcs(employee, "grinder", &EmployeeConditionContext::default());

        let json = system.export_arc_states_json().unwrap();
        let mut other = small_system();
        other.import_arc_states_json(&json).unwrap();
        assert_eq!(other.arc_state(employee), system.arc_state(employee));
    }

    #[test]
    fn test_same_seed_same_generation() {
        let mut a = small_system();
        let mut b = small_system();
        for _ in 0..10 {
            assert_eq!(a.generate_traits().unwrap(), b.generate_traits().unwrap());
        }
    }
}
