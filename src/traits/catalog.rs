//! Trait catalog: the single owner of all authored trait and arc content
//!
//! Content is registered once at load time. Duplicate ids are rejected with a
//! warning and the first registration is kept.

use ahash::AHashMap;

use crate::arcs::definition::ArcDefinition;
use crate::core::types::{ArcId, TraitId};
use crate::traits::definition::{TraitDefinition, TraitRarity, TraitTier};

/// Lookup of trait and arc definitions
#[derive(Debug, Clone, Default)]
pub struct TraitCatalog {
    traits: Vec<TraitDefinition>,
    by_id: AHashMap<TraitId, usize>,
    arcs: Vec<ArcDefinition>,
    arcs_by_id: AHashMap<ArcId, usize>,
}

impl TraitCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from loaded content, warning about any problems
    pub fn from_content(traits: Vec<TraitDefinition>, arcs: Vec<ArcDefinition>) -> Self {
        let mut catalog = Self::new();
        for arc in arcs {
            catalog.register_arc(arc);
        }
        for definition in traits {
            catalog.register(definition);
        }
        if let Err(problems) = catalog.validate() {
            for problem in &problems {
                tracing::warn!("Trait content: {}", problem);
            }
        }
        tracing::info!(
            "Loaded trait catalog: {} traits, {} arcs",
            catalog.traits.len(),
            catalog.arcs.len()
        );
        catalog
    }

    /// Register a trait. Returns false if the id was already taken.
    pub fn register(&mut self, definition: TraitDefinition) -> bool {
        if self.by_id.contains_key(&definition.id) {
            tracing::warn!("Duplicate trait id '{}' ignored", definition.id);
            return false;
        }
        self.by_id.insert(definition.id.clone(), self.traits.len());
        self.traits.push(definition);
        true
    }

    /// Register an arc. Returns false if the id was already taken.
    pub fn register_arc(&mut self, arc: ArcDefinition) -> bool {
        if self.arcs_by_id.contains_key(&arc.id) {
            tracing::warn!("Duplicate arc id '{}' ignored", arc.id);
            return false;
        }
        if !arc.is_runnable() {
            tracing::warn!("Arc '{}' has no stages and will never start", arc.id);
        }
        self.arcs_by_id.insert(arc.id.clone(), self.arcs.len());
        self.arcs.push(arc);
        true
    }

    /// Get a trait by id
    pub fn get(&self, id: &str) -> Option<&TraitDefinition> {
        self.by_id.get(id).map(|&i| &self.traits[i])
    }

    /// Get an arc by id
    pub fn arc(&self, id: &str) -> Option<&ArcDefinition> {
        self.arcs_by_id.get(id).map(|&i| &self.arcs[i])
    }

    /// The runnable arc unlocked by a trait, if any
    ///
    /// Traits pointing at unknown or stage-less arcs are not arc-capable.
    pub fn arc_for(&self, definition: &TraitDefinition) -> Option<&ArcDefinition> {
        if definition.tier != TraitTier::Major {
            return None;
        }
        definition
            .arc
            .as_ref()
            .and_then(|id| self.arc(id.as_str()))
            .filter(|arc| arc.is_runnable())
    }

    /// All traits of a tier, in registration order
    pub fn by_tier(&self, tier: TraitTier) -> Vec<&TraitDefinition> {
        self.traits.iter().filter(|t| t.tier == tier).collect()
    }

    /// All traits of a tier and rarity, in registration order
    pub fn by_rarity_and_tier(&self, rarity: TraitRarity, tier: TraitTier) -> Vec<&TraitDefinition> {
        self.traits
            .iter()
            .filter(|t| t.tier == tier && t.rarity == rarity)
            .collect()
    }

    pub fn traits(&self) -> &[TraitDefinition] {
        &self.traits
    }

    pub fn arcs(&self) -> &[ArcDefinition] {
        &self.arcs
    }

    pub fn len(&self) -> usize {
        self.traits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }

    /// Check content consistency
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for definition in &self.traits {
            errors.extend(definition.problems());
            if let Some(arc_id) = &definition.arc {
                match self.arc(arc_id.as_str()) {
                    None => errors.push(format!(
                        "{}: references unknown arc '{}'",
                        definition.id, arc_id
                    )),
                    Some(arc) if !arc.is_runnable() => errors.push(format!(
                        "{}: references arc '{}' which has no stages",
                        definition.id, arc_id
                    )),
                    Some(_) => {}
                }
            }
        }
        for arc in &self.arcs {
            errors.extend(arc.problems());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
