//! Tag synergies
//!
//! When an employee's traits carry the same tag twice, the tag's tier-1 rule
//! applies. Three or more copies switch to the tier-2 rule instead. The two
//! tiers of one tag are never combined.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::traits::definition::{TraitDefinition, TraitTag};
use crate::traits::modifier::Modifier;

/// Tag count that unlocks tier-1
pub const TIER_ONE_COUNT: u32 = 2;
/// Tag count that unlocks tier-2
pub const TIER_TWO_COUNT: u32 = 3;

/// Bonus modifiers unlocked by a tag count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyRule {
    pub name: String,
    pub tag: TraitTag,
    /// 2 for tier-1, 3 for tier-2
    pub required_count: u32,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
}

impl SynergyRule {
    pub fn new(name: impl Into<String>, tag: TraitTag, required_count: u32) -> Self {
        Self {
            name: name.into(),
            tag,
            required_count,
            modifiers: Vec::new(),
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }
}

/// Count tag occurrences across a set of traits
///
/// A trait contributes once per tag entry it lists.
pub fn count_tags<'a>(traits: impl IntoIterator<Item = &'a TraitDefinition>) -> AHashMap<TraitTag, u32> {
    let mut counts = AHashMap::new();
    for definition in traits {
        for tag in &definition.tags {
            *counts.entry(*tag).or_insert(0) += 1;
        }
    }
    counts
}

/// All synergy rules, at most one per (tag, tier)
#[derive(Debug, Clone, Default)]
pub struct SynergyRuleSet {
    rules: Vec<SynergyRule>,
}

impl SynergyRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: Vec<SynergyRule>) -> Self {
        let mut set = Self::new();
        for rule in rules {
            set.insert(rule);
        }
        set
    }

    /// Add a rule. Returns false for unsupported counts or a taken (tag, tier).
    pub fn insert(&mut self, rule: SynergyRule) -> bool {
        if rule.required_count != TIER_ONE_COUNT && rule.required_count != TIER_TWO_COUNT {
            tracing::warn!(
                "Synergy '{}' requires {} tags; only {} or {} are supported",
                rule.name,
                rule.required_count,
                TIER_ONE_COUNT,
                TIER_TWO_COUNT
            );
            return false;
        }
        if self.rule_for(rule.tag, rule.required_count).is_some() {
            tracing::warn!(
                "Duplicate synergy for {:?} x{} ('{}') ignored",
                rule.tag,
                rule.required_count,
                rule.name
            );
            return false;
        }
        self.rules.push(rule);
        true
    }

    pub fn rule_for(&self, tag: TraitTag, required_count: u32) -> Option<&SynergyRule> {
        self.rules
            .iter()
            .find(|r| r.tag == tag && r.required_count == required_count)
    }

    /// Rules unlocked by the given tag counts, in rule-set order
    pub fn applicable(&self, tag_counts: &AHashMap<TraitTag, u32>) -> Vec<&SynergyRule> {
        self.rules
            .iter()
            .filter(|rule| {
                let count = tag_counts.get(&rule.tag).copied().unwrap_or(0);
                if count >= TIER_TWO_COUNT {
                    rule.required_count == TIER_TWO_COUNT
                } else if count >= TIER_ONE_COUNT {
                    rule.required_count == TIER_ONE_COUNT
                } else {
                    false
                }
            })
            .collect()
    }

    pub fn rules(&self) -> &[SynergyRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
