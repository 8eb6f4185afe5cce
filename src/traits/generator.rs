//! Rarity-weighted trait rolls for new hires
//!
//! Every employee gets exactly one major trait and two distinct minor traits.
//! Rarity is rolled per pick from the tier's weight table; an empty rarity
//! bucket falls back toward Common, never toward Legendary.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::EngineConfig;
use crate::core::error::{Result, TraitError};
use crate::core::types::TraitId;
use crate::traits::catalog::TraitCatalog;
use crate::traits::definition::{TraitDefinition, TraitRarity, TraitTier};

/// Minor traits rolled per employee
pub const MINOR_TRAITS_PER_EMPLOYEE: usize = 2;

/// Trait ids rolled for one employee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedTraits {
    pub major: TraitId,
    pub minors: Vec<TraitId>,
}

/// Pick a rarity bucket for a draw in [0, 1)
///
/// Walks the cumulative weights in Common..Legendary order and returns the
/// first non-empty bucket whose running total reaches the draw. Weights that
/// don't sum to 1.0 are scaled.
pub fn sample_rarity(weights: &[f32; 4], draw: f32) -> TraitRarity {
    let total: f32 = weights.iter().sum();
    let target = draw * total;
    let mut cumulative = 0.0;
    let mut last_nonzero = TraitRarity::Common;

    for rarity in TraitRarity::ALL {
        let weight = weights[rarity.index()];
        if weight <= 0.0 {
            continue;
        }
        last_nonzero = rarity;
        cumulative += weight;
        if cumulative >= target {
            return rarity;
        }
    }

    // Rounding can leave the draw just past the final bucket
    last_nonzero
}

/// Uniform pick from `pool` at `rarity`, falling back to lower rarities
pub fn pick_with_fallback<'a>(
    pool: &[&'a TraitDefinition],
    rarity: TraitRarity,
    rng: &mut impl Rng,
) -> Option<&'a TraitDefinition> {
    let mut current = Some(rarity);
    while let Some(r) = current {
        let bucket: Vec<&TraitDefinition> = pool.iter().copied().filter(|t| t.rarity == r).collect();
        if let Some(pick) = bucket.choose(rng) {
            return Some(*pick);
        }
        current = r.lower();
    }
    None
}

/// Seeded trait roller
#[derive(Debug, Clone)]
pub struct TraitGenerator {
    rng: ChaCha8Rng,
    major_weights: [f32; 4],
    minor_weights: [f32; 4],
}

impl TraitGenerator {
    pub fn new(config: &EngineConfig, seed: u64) -> Self {
        Self::from_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_rng(config: &EngineConfig, rng: ChaCha8Rng) -> Self {
        Self {
            rng,
            major_weights: config.major_rarity_weights,
            minor_weights: config.minor_rarity_weights,
        }
    }

    /// Roll a rarity from the tier's weight table
    pub fn roll_rarity(&mut self, tier: TraitTier) -> TraitRarity {
        let draw: f32 = self.rng.gen();
        match tier {
            TraitTier::Major => sample_rarity(&self.major_weights, draw),
            TraitTier::Minor => sample_rarity(&self.minor_weights, draw),
        }
    }

    /// Roll one major and two distinct minor traits
    ///
    /// Fails when the catalog has no major traits, or none at or below the
    /// rolled rarity. A catalog with fewer than two minors yields as many as
    /// it has.
    pub fn generate(&mut self, catalog: &TraitCatalog) -> Result<GeneratedTraits> {
        let major = self.pick_major(catalog)?;
        let minors = self.pick_minors(catalog);

        Ok(GeneratedTraits {
            major: major.id.clone(),
            minors: minors.into_iter().map(|t| t.id.clone()).collect(),
        })
    }

    fn pick_major<'a>(&mut self, catalog: &'a TraitCatalog) -> Result<&'a TraitDefinition> {
        let majors = catalog.by_tier(TraitTier::Major);
        if majors.is_empty() {
            return Err(TraitError::NoMajorTraits);
        }

        let rarity = self.roll_rarity(TraitTier::Major);
        pick_with_fallback(&majors, rarity, &mut self.rng).ok_or_else(|| {
            tracing::warn!("No major trait at or below {:?}", rarity);
            TraitError::NoMajorAtOrBelow(rarity)
        })
    }

    fn pick_minors<'a>(&mut self, catalog: &'a TraitCatalog) -> Vec<&'a TraitDefinition> {
        let mut remaining = catalog.by_tier(TraitTier::Minor);
        let mut picked = Vec::with_capacity(MINOR_TRAITS_PER_EMPLOYEE);

        while picked.len() < MINOR_TRAITS_PER_EMPLOYEE {
            if remaining.is_empty() {
                tracing::warn!(
                    "Only {} minor trait(s) available, wanted {}",
                    picked.len(),
                    MINOR_TRAITS_PER_EMPLOYEE
                );
                break;
            }

            let rarity = self.roll_rarity(TraitTier::Minor);
            let pick = match pick_with_fallback(&remaining, rarity, &mut self.rng) {
                Some(pick) => pick,
                None => match remaining.choose(&mut self.rng) {
                    Some(pick) => *pick,
                    None => break,
                },
            };

            remaining.retain(|t| t.id != pick.id);
            picked.push(pick);
        }

        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::definition::{TraitCategory, TraitTag};

    fn def(id: &str, tier: TraitTier, rarity: TraitRarity) -> TraitDefinition {
        TraitDefinition::new(id, tier, TraitCategory::Work, rarity, vec![TraitTag::Speed])
    }

    fn full_catalog() -> TraitCatalog {
        TraitCatalog::from_content(
            vec![
                def("grinder", TraitTier::Major, TraitRarity::Common),
                def("hacker", TraitTier::Major, TraitRarity::Uncommon),
                def("perfectionist", TraitTier::Major, TraitRarity::Rare),
                def("visionary", TraitTier::Major, TraitRarity::Legendary),
                def("chatty", TraitTier::Minor, TraitRarity::Common),
                def("punctual", TraitTier::Minor, TraitRarity::Common),
                def("night_owl", TraitTier::Minor, TraitRarity::Uncommon),
                def("polyglot", TraitTier::Minor, TraitRarity::Rare),
            ],
            vec![],
        )
    }

    #[test]
    fn test_sample_rarity_walks_cumulative_weights() {
        let weights = [0.40, 0.30, 0.25, 0.05];
        assert_eq!(sample_rarity(&weights, 0.0), TraitRarity::Common);
        assert_eq!(sample_rarity(&weights, 0.39), TraitRarity::Common);
        assert_eq!(sample_rarity(&weights, 0.41), TraitRarity::Uncommon);
        assert_eq!(sample_rarity(&weights, 0.70), TraitRarity::Uncommon);
        assert_eq!(sample_rarity(&weights, 0.80), TraitRarity::Rare);
        assert_eq!(sample_rarity(&weights, 0.96), TraitRarity::Legendary);
    }

    #[test]
    fn test_minor_table_never_yields_legendary() {
        let weights = [0.55, 0.30, 0.15, 0.00];
        assert_eq!(sample_rarity(&weights, 0.9999), TraitRarity::Rare);
    }

    #[test]
    fn test_generates_one_major_two_distinct_minors() {
        let catalog = full_catalog();
        let mut generator = TraitGenerator::new(&EngineConfig::default(), 7);

        for _ in 0..200 {
            let rolled = generator.generate(&catalog).unwrap();
            let major = catalog.get(rolled.major.as_str()).unwrap();
            assert_eq!(major.tier, TraitTier::Major);
            assert_eq!(rolled.minors.len(), 2);
            assert_ne!(rolled.minors[0], rolled.minors[1]);
            for id in &rolled.minors {
                assert_eq!(catalog.get(id.as_str()).unwrap().tier, TraitTier::Minor);
            }
        }
    }

    #[test]
    fn test_same_seed_same_rolls() {
        let catalog = full_catalog();
        let mut a = TraitGenerator::new(&EngineConfig::default(), 99);
        let mut b = TraitGenerator::new(&EngineConfig::default(), 99);
        for _ in 0..20 {
            assert_eq!(a.generate(&catalog).unwrap(), b.generate(&catalog).unwrap());
        }
    }

    #[test]
    fn test_no_majors_is_an_error() {
        let catalog = TraitCatalog::from_content(
            vec![def("chatty", TraitTier::Minor, TraitRarity::Common)],
            vec![],
        );
        let mut generator = TraitGenerator::new(&EngineConfig::default(), 1);
        assert!(matches!(generator.generate(&catalog), Err(TraitError::NoMajorTraits)));
    }

    #[test]
    fn test_fallback_goes_down_not_up() {
        let catalog = TraitCatalog::from_content(
            vec![
                def("grinder", TraitTier::Major, TraitRarity::Common),
                def("hacker", TraitTier::Major, TraitRarity::Uncommon),
                def("visionary_only_rare_up", TraitTier::Major, TraitRarity::Legendary),
            ],
            vec![],
        );
        let majors = catalog.by_tier(TraitTier::Major);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for _ in 0..50 {
            let pick = pick_with_fallback(&majors, TraitRarity::Rare, &mut rng).unwrap();
            assert_eq!(pick.rarity, TraitRarity::Uncommon);
        }
    }

    #[test]
    fn test_fallback_exhausted_returns_none() {
        let catalog = TraitCatalog::from_content(
            vec![def("visionary", TraitTier::Major, TraitRarity::Legendary)],
            vec![],
        );
        let majors = catalog.by_tier(TraitTier::Major);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!(pick_with_fallback(&majors, TraitRarity::Rare, &mut rng).is_none());
    }

    #[test]
    fn test_major_roll_never_lands_above_rolled_rarity() {
        let catalog = TraitCatalog::from_content(
            vec![
                def("visionary", TraitTier::Major, TraitRarity::Legendary),
                def("chatty", TraitTier::Minor, TraitRarity::Common),
                def("punctual", TraitTier::Minor, TraitRarity::Common),
            ],
            vec![],
        );
        let mut generator = TraitGenerator::new(&EngineConfig::default(), 1);

        let mut legendary = 0;
        let mut refused = 0;
        for _ in 0..100 {
            match generator.generate(&catalog) {
                Ok(rolled) => {
                    assert_eq!(rolled.major, TraitId::new("visionary"));
                    legendary += 1;
                }
                Err(TraitError::NoMajorAtOrBelow(rarity)) => {
                    assert!(rarity < TraitRarity::Legendary);
                    refused += 1;
                }
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(legendary + refused, 100);
        assert!(refused > legendary);
    }

    #[test]
    fn test_short_minor_pool_yields_what_exists() {
        let catalog = TraitCatalog::from_content(
            vec![
                def("grinder", TraitTier::Major, TraitRarity::Common),
                def("chatty", TraitTier::Minor, TraitRarity::Rare),
            ],
            vec![],
        );
        let mut generator = TraitGenerator::new(&EngineConfig::default(), 11);
        let rolled = generator.generate(&catalog).unwrap();
        assert_eq!(rolled.minors, vec![TraitId::new("chatty")]);
    }
}
