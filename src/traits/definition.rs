//! Authored trait definitions
//!
//! Definitions are static content: loaded once into a catalog and never
//! mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::core::types::{ArcId, TraitId};
use crate::traits::modifier::Modifier;

/// Major traits define an employee; minor traits flavor them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraitTier {
    Major,
    Minor,
}

/// Rarity bucket, ordered from most to least common
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraitRarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl TraitRarity {
    pub const ALL: [TraitRarity; 4] = [
        TraitRarity::Common,
        TraitRarity::Uncommon,
        TraitRarity::Rare,
        TraitRarity::Legendary,
    ];

    /// Position in weight tables
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Next more common rarity, `None` below Common
    pub fn lower(&self) -> Option<TraitRarity> {
        match self {
            TraitRarity::Common => None,
            TraitRarity::Uncommon => Some(TraitRarity::Common),
            TraitRarity::Rare => Some(TraitRarity::Uncommon),
            TraitRarity::Legendary => Some(TraitRarity::Rare),
        }
    }
}

/// Broad grouping used by summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraitCategory {
    Work,
    Social,
    Personality,
    Technical,
    Health,
}

/// Labels counted for synergy detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraitTag {
    Speed,
    Quality,
    Creative,
    Social,
    Technical,
    Leadership,
    Resilient,
    Volatile,
    Learner,
    Focus,
}

/// A named bundle of tags and modifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitDefinition {
    pub id: TraitId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub tier: TraitTier,
    pub category: TraitCategory,
    pub rarity: TraitRarity,
    pub tags: Vec<TraitTag>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    /// Arc unlocked by this trait (major traits only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arc: Option<ArcId>,
}

impl TraitDefinition {
    pub fn new(
        id: impl Into<String>,
        tier: TraitTier,
        category: TraitCategory,
        rarity: TraitRarity,
        tags: Vec<TraitTag>,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id: TraitId(id),
            description: String::new(),
            tier,
            category,
            rarity,
            tags,
            modifiers: Vec::new(),
            arc: None,
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_arc(mut self, arc: impl Into<String>) -> Self {
        self.arc = Some(ArcId(arc.into()));
        self
    }

    pub fn has_arc(&self) -> bool {
        self.arc.is_some()
    }

    pub fn has_tag(&self, tag: TraitTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Content problems with this definition, empty when well-formed
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.tier == TraitTier::Minor && self.rarity == TraitRarity::Legendary {
            problems.push(format!("{}: minor trait marked Legendary", self.id));
        }
        if self.tags.is_empty() || self.tags.len() > 3 {
            problems.push(format!(
                "{}: expected 1-3 tags, found {}",
                self.id,
                self.tags.len()
            ));
        }
        if self.tier == TraitTier::Minor && self.arc.is_some() {
            problems.push(format!("{}: minor traits cannot unlock arcs", self.id));
        }
        problems
    }
}
