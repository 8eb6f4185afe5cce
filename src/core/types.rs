//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for employees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeId(pub Uuid);

impl EmployeeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EmployeeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Simulated calendar day counter
pub type Day = u64;

/// Stable string key for a trait definition
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitId(pub String);

impl TraitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TraitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

impl std::borrow::Borrow<str> for TraitId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TraitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TraitId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Stable string key for an arc definition
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArcId(pub String);

impl ArcId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ArcId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

impl std::borrow::Borrow<str> for ArcId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ArcId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_ids_are_unique() {
        let a = EmployeeId::new();
        let b = EmployeeId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_employee_id_hash() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        let id = EmployeeId::new();
        map.insert(id, "lead");
        assert_eq!(map.get(&id), Some(&"lead"));
    }

    #[test]
    fn test_trait_id_serializes_as_plain_string() {
        let id = TraitId::new("night_owl");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"night_owl\"");
    }
}
