//! Authored content: trait, arc and synergy files

mod loader;

pub use loader::{parse_arcs, parse_synergies, parse_traits, ContentPack, ARCS_FILE, SYNERGIES_FILE, TRAITS_FILE};
