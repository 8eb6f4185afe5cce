//! Engine configuration with documented constants
//!
//! All tuning numbers for the trait engine live here, with notes on how they
//! interact. The config is constructed once per session and handed to the
//! components that need it.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TraitError};

/// Tunable constants for trait evaluation and generation
///
/// The defaults reproduce the shipped balance. Changing them shifts how
/// strongly stacked traits dominate an employee's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === STACKING ===
    /// Weight applied to modifiers on the same statistic, by rank after
    /// sorting by magnitude (largest first)
    ///
    /// Rank 1 keeps its full value; every rank past the end of the list
    /// reuses the final entry. At [1.0, 0.6, 0.35, 0.2], five +10% sources
    /// stack to +23.5% rather than +50%.
    pub stacking_weights: Vec<f32>,

    // === GENERATION ===
    /// Rarity weights for major traits, in Common/Uncommon/Rare/Legendary order
    pub major_rarity_weights: [f32; 4],

    /// Rarity weights for minor traits, in Common/Uncommon/Rare/Legendary order
    ///
    /// Legendary is zero: minor traits are never legendary.
    pub minor_rarity_weights: [f32; 4],

    // === EVENT WEIGHTS ===
    /// Lower bound for an event weight multiplier
    ///
    /// Keeps even strongly suppressed events possible.
    pub event_weight_min: f32,

    /// Upper bound for an event weight multiplier
    pub event_weight_max: f32,

    // === CONDITIONS ===
    /// Tolerance for `==` comparisons in conditions
    pub float_epsilon: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stacking_weights: vec![1.0, 0.6, 0.35, 0.2],

            major_rarity_weights: [0.40, 0.30, 0.25, 0.05],
            minor_rarity_weights: [0.55, 0.30, 0.15, 0.00],

            event_weight_min: 0.1,
            event_weight_max: 3.0,

            float_epsilon: 1e-4,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate().map_err(TraitError::InvalidConfig)?;
        Ok(config)
    }

    /// Load a config file, or the defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}; using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Stacking weight for a zero-based rank
    pub fn stacking_weight(&self, rank: usize) -> f32 {
        match self.stacking_weights.get(rank) {
            Some(w) => *w,
            None => self.stacking_weights.last().copied().unwrap_or(0.0),
        }
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.stacking_weights.is_empty() {
            return Err("stacking_weights must not be empty".into());
        }

        // Later ranks must never count more than earlier ones
        if self.stacking_weights.windows(2).any(|w| w[1] > w[0]) {
            return Err(format!(
                "stacking_weights must be non-increasing: {:?}",
                self.stacking_weights
            ));
        }

        for (name, table) in [
            ("major_rarity_weights", &self.major_rarity_weights),
            ("minor_rarity_weights", &self.minor_rarity_weights),
        ] {
            if table.iter().any(|w| *w < 0.0) {
                return Err(format!("{} must not contain negative weights", name));
            }
            if table.iter().sum::<f32>() <= 0.0 {
                return Err(format!("{} must have a positive total", name));
            }
        }

        if self.minor_rarity_weights[3] > 0.0 {
            return Err("minor traits cannot roll Legendary rarity".into());
        }

        if self.event_weight_min <= 0.0 || self.event_weight_min >= self.event_weight_max {
            return Err(format!(
                "event weight bounds invalid: [{}, {}]",
                self.event_weight_min, self.event_weight_max
            ));
        }

        if self.float_epsilon < 0.0 {
            return Err("float_epsilon must not be negative".into());
        }

        Ok(())
    }
}
