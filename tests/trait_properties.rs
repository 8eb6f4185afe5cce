//! Property-based tests for conditions, stacking, generation and arcs

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use studio_traits::arcs::{ArcDefinition, ArcHistory, ArcStage};
use studio_traits::content::ContentPack;
use studio_traits::traits::evaluator::{clamp_event_weight, stack_diminishing};
use studio_traits::traits::generator::{pick_with_fallback, sample_rarity};
use studio_traits::traits::{
    CompareOp, Condition, ContextField, ContextFlag, EmployeeConditionContext, ProjectPhase,
    TraitCatalog, TraitCategory, TraitDefinition, TraitGenerator, TraitRarity, TraitTag, TraitTier,
};
use studio_traits::{EngineConfig, TraitError};

// =============================================================================
// Strategies
// =============================================================================

fn arb_phase() -> impl Strategy<Value = ProjectPhase> {
    prop_oneof![
        Just(ProjectPhase::None),
        Just(ProjectPhase::Planning),
        Just(ProjectPhase::Development),
        Just(ProjectPhase::Polish),
        Just(ProjectPhase::Crunch),
        Just(ProjectPhase::Release),
        Just(ProjectPhase::Maintenance),
    ]
}

fn arb_context() -> impl Strategy<Value = EmployeeConditionContext> {
    (
        (0.0f32..=1.0, 0.0f32..=1.0, 0.0f32..=1.0, 0.0f32..=1.0),
        arb_phase(),
        (0u32..20, 0u32..2000, 0u32..30),
        any::<[bool; 4]>(),
    )
        .prop_map(
            |((morale, stress, energy, progress), phase, (team_size, tenure_days, crunch_days), flags)| {
                EmployeeConditionContext {
                    morale,
                    stress,
                    energy,
                    deadline_remaining: 1.0 - progress,
                    project_progress: progress,
                    project_phase: phase,
                    team_size,
                    tenure_days,
                    crunch_days,
                    using_new_tech: flags[0],
                    using_legacy_tech: flags[1],
                    is_project_lead: flags[2],
                    is_mentoring: flags[3],
                    ..Default::default()
                }
            },
        )
}

fn arb_leaf() -> impl Strategy<Value = Condition> {
    let field = prop::sample::select(ContextField::ALL.to_vec());
    let op = prop_oneof![
        Just(CompareOp::Lt),
        Just(CompareOp::Lte),
        Just(CompareOp::Gt),
        Just(CompareOp::Gte),
        Just(CompareOp::Eq),
    ];
    let flag = prop_oneof![
        Just(ContextFlag::UsingNewTech),
        Just(ContextFlag::IsCrunching),
        Just(ContextFlag::OnProject),
        Just(ContextFlag::IsSolo),
    ];
    prop_oneof![
        Just(Condition::Always),
        (field, op, 0.0f32..=1.0).prop_map(|(f, o, v)| Condition::compare(f, o, v)),
        (flag, any::<bool>()).prop_map(|(f, e)| Condition::flag(f, e)),
        arb_phase().prop_map(|phase| Condition::Phase { phase }),
    ]
}

fn arb_condition() -> impl Strategy<Value = Condition> {
    arb_leaf().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Condition::all),
            prop::collection::vec(inner, 0..4).prop_map(Condition::any),
        ]
    })
}

fn arb_rarity() -> impl Strategy<Value = TraitRarity> {
    prop::sample::select(TraitRarity::ALL.to_vec())
}

// =============================================================================
// Conditions
// =============================================================================

proptest! {
    #[test]
    fn condition_evaluation_is_pure(condition in arb_condition(), ctx in arb_context()) {
        let before = ctx.clone();
        let first = condition.evaluate(&ctx);
        let second = condition.evaluate(&ctx);
        prop_assert_eq!(first, second);
        prop_assert_eq!(ctx, before);
    }

    #[test]
    fn empty_combinators_never_hold(ctx in arb_context()) {
        prop_assert!(!Condition::all(vec![]).evaluate(&ctx));
        prop_assert!(!Condition::any(vec![]).evaluate(&ctx));
    }
}

// =============================================================================
// Stacking and event weights
// =============================================================================

proptest! {
    #[test]
    fn stacking_ignores_input_order(mut values in prop::collection::vec(-1.0f32..1.0, 0..8)) {
        let config = EngineConfig::default();
        let forward = stack_diminishing(values.clone(), &config);
        values.reverse();
        let backward = stack_diminishing(values, &config);
        prop_assert!((forward - backward).abs() < 1e-5);
    }

    #[test]
    fn stacking_never_exceeds_plain_sum(values in prop::collection::vec(0.0f32..1.0, 1..8)) {
        let config = EngineConfig::default();
        let stacked = stack_diminishing(values.clone(), &config);
        let sum: f32 = values.iter().sum();
        prop_assert!(stacked <= sum + 1e-5);
    }

    #[test]
    fn event_weight_stays_in_bounds(modifier in prop::num::f32::ANY) {
        let config = EngineConfig::default();
        let weight = clamp_event_weight(modifier, &config);
        prop_assert!((0.1..=3.0).contains(&weight));
    }
}

// =============================================================================
// Generation
// =============================================================================

proptest! {
    #[test]
    fn minor_pairs_are_distinct(seed in any::<u64>()) {
        let (catalog, _) = ContentPack::builtin().unwrap().into_parts();
        let mut generator = TraitGenerator::new(&EngineConfig::default(), seed);
        let rolled = generator.generate(&catalog).unwrap();
        prop_assert_eq!(rolled.minors.len(), 2);
        prop_assert_ne!(&rolled.minors[0], &rolled.minors[1]);
    }

    #[test]
    fn minor_rolls_never_legendary(draw in 0.0f32..1.0) {
        let config = EngineConfig::default();
        prop_assert_ne!(sample_rarity(&config.minor_rarity_weights, draw), TraitRarity::Legendary);
    }

    #[test]
    fn fallback_never_goes_up(rolled in arb_rarity(), seed in any::<u64>()) {
        let (catalog, _) = ContentPack::builtin().unwrap().into_parts();
        let majors = catalog.by_tier(TraitTier::Major);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        if let Some(pick) = pick_with_fallback(&majors, rolled, &mut rng) {
            prop_assert!(pick.rarity <= rolled);
        }
    }

    #[test]
    fn generated_major_never_rarer_than_roll(seed in any::<u64>()) {
        let catalog = TraitCatalog::from_content(
            vec![
                TraitDefinition::new("visionary", TraitTier::Major, TraitCategory::Work, TraitRarity::Legendary, vec![TraitTag::Creative]),
                TraitDefinition::new("chatty", TraitTier::Minor, TraitCategory::Social, TraitRarity::Common, vec![TraitTag::Social]),
                TraitDefinition::new("punctual", TraitTier::Minor, TraitCategory::Work, TraitRarity::Common, vec![TraitTag::Speed]),
            ],
            vec![],
        );
        let mut generator = TraitGenerator::new(&EngineConfig::default(), seed);
        match generator.generate(&catalog) {
            Ok(rolled) => prop_assert_eq!(rolled.major.as_str(), "visionary"),
            Err(TraitError::NoMajorAtOrBelow(rarity)) => prop_assert!(rarity < TraitRarity::Legendary),
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}

// =============================================================================
// Arc history
// =============================================================================

proptest! {
    #[test]
    fn multiplier_reaches_baseline_on_schedule(
        cooldown in 0u32..60,
        multiplier in 0.0f32..0.9,
        recovery in 1u32..120,
    ) {
        let arc = ArcDefinition::new("spiral", 0.1)
            .with_stage(ArcStage::new("Doubt", 1, 3))
            .with_cooldown(cooldown, multiplier, recovery);
        let mut history = ArcHistory::on_completion(&arc, None);

        for _ in 0..(cooldown + recovery - 1) {
            history.decay_one_day();
            prop_assert!(history.retrigger_multiplier < 1.0);
        }
        history.decay_one_day();
        prop_assert_eq!(history.retrigger_multiplier, 1.0);
    }
}
