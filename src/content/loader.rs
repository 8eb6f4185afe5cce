//! Load trait content from TOML files
//!
//! A content directory holds up to three files. Each is optional; a missing
//! file contributes nothing.
//!
//! - `traits.toml`: `[[traits]]` tables
//! - `arcs.toml`: `[[arcs]]` tables with `[[arcs.stages]]`
//! - `synergies.toml`: `[[synergies]]` tables

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::arcs::definition::ArcDefinition;
use crate::core::error::{Result, TraitError};
use crate::traits::catalog::TraitCatalog;
use crate::traits::definition::TraitDefinition;
use crate::traits::synergy::{SynergyRule, SynergyRuleSet};

pub const TRAITS_FILE: &str = "traits.toml";
pub const ARCS_FILE: &str = "arcs.toml";
pub const SYNERGIES_FILE: &str = "synergies.toml";

const BUILTIN_TRAITS: &str = include_str!("../../data/traits.toml");
const BUILTIN_ARCS: &str = include_str!("../../data/arcs.toml");
const BUILTIN_SYNERGIES: &str = include_str!("../../data/synergies.toml");

#[derive(Deserialize)]
struct TraitsFile {
    #[serde(default)]
    traits: Vec<TraitDefinition>,
}

#[derive(Deserialize)]
struct ArcsFile {
    #[serde(default)]
    arcs: Vec<ArcDefinition>,
}

#[derive(Deserialize)]
struct SynergiesFile {
    #[serde(default)]
    synergies: Vec<SynergyRule>,
}

pub fn parse_traits(content: &str) -> Result<Vec<TraitDefinition>> {
    let file: TraitsFile = toml::from_str(content)
        .map_err(|e| TraitError::InvalidContent(format!("{}: {}", TRAITS_FILE, e)))?;
    Ok(file.traits)
}

pub fn parse_arcs(content: &str) -> Result<Vec<ArcDefinition>> {
    let file: ArcsFile = toml::from_str(content)
        .map_err(|e| TraitError::InvalidContent(format!("{}: {}", ARCS_FILE, e)))?;
    Ok(file.arcs)
}

pub fn parse_synergies(content: &str) -> Result<Vec<SynergyRule>> {
    let file: SynergiesFile = toml::from_str(content)
        .map_err(|e| TraitError::InvalidContent(format!("{}: {}", SYNERGIES_FILE, e)))?;
    Ok(file.synergies)
}

/// Parsed content, not yet indexed
#[derive(Debug, Clone, Default)]
pub struct ContentPack {
    pub traits: Vec<TraitDefinition>,
    pub arcs: Vec<ArcDefinition>,
    pub synergies: Vec<SynergyRule>,
}

impl ContentPack {
    /// Content compiled into the crate
    pub fn builtin() -> Result<Self> {
        Ok(Self {
            traits: parse_traits(BUILTIN_TRAITS)?,
            arcs: parse_arcs(BUILTIN_ARCS)?,
            synergies: parse_synergies(BUILTIN_SYNERGIES)?,
        })
    }

    /// Load whichever content files exist in `dir`
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut pack = Self::default();

        if let Some(content) = read_if_exists(dir, TRAITS_FILE)? {
            pack.traits = parse_traits(&content)?;
        }
        if let Some(content) = read_if_exists(dir, ARCS_FILE)? {
            pack.arcs = parse_arcs(&content)?;
        }
        if let Some(content) = read_if_exists(dir, SYNERGIES_FILE)? {
            pack.synergies = parse_synergies(&content)?;
        }

        if pack.traits.is_empty() {
            tracing::warn!("No traits found in {}", dir.display());
        }
        Ok(pack)
    }

    /// Index the content into a catalog and a synergy rule set
    pub fn into_parts(self) -> (TraitCatalog, SynergyRuleSet) {
        let catalog = TraitCatalog::from_content(self.traits, self.arcs);
        let synergies = SynergyRuleSet::from_rules(self.synergies);
        tracing::info!("Loaded {} synergy rules", synergies.len());
        (catalog, synergies)
    }
}

fn read_if_exists(dir: &Path, filename: &str) -> Result<Option<String>> {
    let path = dir.join(filename);
    if !path.exists() {
        return Ok(None);
    }
    Ok(Some(fs::read_to_string(&path)?))
}
