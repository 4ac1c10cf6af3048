pub mod plant;

use std::collections::HashMap;

pub use plant::{PlantId, PlantVariant};

/// Errors raised while registering plant variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    DuplicateVariant(PlantId),
    EmptyId,
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::DuplicateVariant(id) => {
                write!(f, "Plant variant '{}' is already registered", id)
            }
            CatalogError::EmptyId => write!(f, "Plant variant id must not be empty"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Registered plant variants, kept in registration order.
#[derive(Debug, Clone, Default)]
pub struct PlantCatalog {
    variants: Vec<PlantVariant>,
    index: HashMap<PlantId, usize>,
}

impl PlantCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, variant: PlantVariant) -> Result<PlantId, CatalogError> {
        if variant.id.as_str().trim().is_empty() {
            return Err(CatalogError::EmptyId);
        }
        if self.index.contains_key(&variant.id) {
            return Err(CatalogError::DuplicateVariant(variant.id));
        }

        let id = variant.id.clone();
        self.index.insert(id.clone(), self.variants.len());
        self.variants.push(variant);
        Ok(id)
    }

    pub fn variant_exists(&self, id: &PlantId) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &PlantId) -> Option<&PlantVariant> {
        self.index.get(id).map(|&i| &self.variants[i])
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlantVariant> {
        self.variants.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_variant_exists() {
        let mut catalog = PlantCatalog::new();
        let id = catalog.register(PlantVariant::new("wheat", "Wheat")).unwrap();

        assert!(catalog.variant_exists(&id));
        assert!(!catalog.variant_exists(&PlantId::from("carrot")));
        assert_eq!(catalog.get(&id).unwrap().name, "Wheat");
    }

    #[test]
    fn duplicate_variant_rejected() {
        let mut catalog = PlantCatalog::new();
        catalog.register(PlantVariant::unnamed("wheat")).unwrap();

        let err = catalog
            .register(PlantVariant::new("wheat", "Other Wheat"))
            .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateVariant(PlantId::from("wheat")));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(&PlantId::from("wheat")).unwrap().name, "wheat");
    }

    #[test]
    fn empty_id_rejected() {
        let mut catalog = PlantCatalog::new();
        assert_eq!(
            catalog.register(PlantVariant::unnamed("  ")).unwrap_err(),
            CatalogError::EmptyId
        );
        assert!(catalog.is_empty());
    }

    #[test]
    fn iteration_follows_registration_order() {
        let mut catalog = PlantCatalog::new();
        for id in ["potato", "wheat", "carrot"] {
            catalog.register(PlantVariant::unnamed(id)).unwrap();
        }

        let ids: Vec<&str> = catalog.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["potato", "wheat", "carrot"]);
    }
}
