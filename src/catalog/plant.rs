use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a plant variant, e.g. `"wheat"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlantId(String);

impl PlantId {
    pub fn new(id: impl Into<String>) -> Self {
        PlantId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlantId {
    fn from(s: &str) -> Self {
        PlantId(s.to_string())
    }
}

impl From<String> for PlantId {
    fn from(s: String) -> Self {
        PlantId(s)
    }
}

/// One species or genetic line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantVariant {
    pub id: PlantId,
    pub name: String,
}

impl PlantVariant {
    pub fn new(id: impl Into<PlantId>, name: impl Into<String>) -> Self {
        PlantVariant {
            id: id.into(),
            name: name.into(),
        }
    }

    /// A variant whose display name is its id.
    pub fn unnamed(id: impl Into<PlantId>) -> Self {
        let id = id.into();
        let name = id.as_str().to_string();
        PlantVariant { id, name }
    }
}
