use thiserror::Error;

use crate::traits::definition::TraitRarity;

#[derive(Error, Debug)]
pub enum TraitError {
    #[error("No major traits defined in catalog")]
    NoMajorTraits,

    #[error("No major trait at or below {0:?} rarity")]
    NoMajorAtOrBelow(TraitRarity),

    #[error("Unknown trait: {0}")]
    UnknownTrait(String),

    #[error("Invalid content: {0}")]
    InvalidContent(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TraitError>;
