use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::catalog::{PlantCatalog, PlantId, PlantVariant};
use crate::mutation::{BuiltinTrigger, MutationError, MutationRegistry, MutationRule, RuleId};

/// A plant declared in a rule book.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlantEntry {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A mutation declared in a rule book.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MutationEntry {
    pub child: String,
    pub parents: Vec<String>,
    pub chance: f64,
    #[serde(default)]
    pub triggers: Vec<BuiltinTrigger>,
}

/// Plants and mutations read from a TOML file.
///
/// ```toml
/// [[plant]]
/// id = "wheat"
/// name = "Wheat"
///
/// [[mutation]]
/// child = "hybrid"
/// parents = ["wheat", "carrot"]
/// chance = 0.25
/// triggers = [{ kind = "light", min = 10, max = 15 }]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RuleBook {
    #[serde(default, rename = "plant")]
    pub plants: Vec<PlantEntry>,
    #[serde(default, rename = "mutation")]
    pub mutations: Vec<MutationEntry>,
}

/// A mutation entry that failed registration.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRule {
    /// Position of the entry in the rule book, starting at 0.
    pub index: usize,
    pub child: String,
    pub reason: String,
}

/// Summary of loading a rule book.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub plants: usize,
    pub skipped_plants: Vec<String>,
    pub registered: Vec<RuleId>,
    pub rejected: Vec<RejectedRule>,
}

impl RuleBook {
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
        Self::from_toml_str(&content, path)
    }

    pub fn from_toml_str(content: &str, source_path: &Path) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("{}: {}", source_path.display(), e))
    }

    /// Register every plant, then every mutation, and seal the registry.
    ///
    /// Bad entries are logged and skipped; the rest of the book still loads.
    pub fn load(&self) -> (PlantCatalog, MutationRegistry, LoadReport) {
        let mut catalog = PlantCatalog::new();
        let mut registry = MutationRegistry::new();
        let mut report = LoadReport::default();

        for entry in &self.plants {
            let variant = match &entry.name {
                Some(name) => PlantVariant::new(entry.id.as_str(), name.as_str()),
                None => PlantVariant::unnamed(entry.id.as_str()),
            };
            match catalog.register(variant) {
                Ok(_) => report.plants += 1,
                Err(e) => {
                    warn!(plant = %entry.id, error = %e, "Plant skipped");
                    report.skipped_plants.push(entry.id.clone());
                }
            }
        }

        for (index, entry) in self.mutations.iter().enumerate() {
            let result = entry
                .to_rule(&catalog)
                .and_then(|rule| registry.register(&catalog, rule));
            match result {
                Ok(id) => report.registered.push(id),
                Err(e) => {
                    warn!(index, child = %entry.child, error = %e, "Mutation rejected");
                    report.rejected.push(RejectedRule {
                        index,
                        child: entry.child.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        registry.seal();
        info!(
            plants = report.plants,
            mutations = report.registered.len(),
            rejected = report.rejected.len(),
            "Rule book loaded"
        );

        (catalog, registry, report)
    }
}

impl MutationEntry {
    /// Build the rule, checking trigger parameters and plant references first.
    fn to_rule(&self, catalog: &PlantCatalog) -> Result<MutationRule, MutationError> {
        let parents = self.parents.iter().map(|p| PlantId::from(p.as_str())).collect();
        let mut rule = MutationRule::new(self.child.as_str(), parents, self.chance);

        for trigger in &self.triggers {
            trigger.validate().map_err(MutationError::invalid)?;
            if let BuiltinTrigger::NeighborCount { plant, .. } = trigger {
                if !catalog.variant_exists(plant) {
                    return Err(MutationError::invalid(format!(
                        "neighbor_count trigger references unknown plant '{}'",
                        plant
                    )));
                }
            }
            rule = rule.with_shared_trigger(Arc::new(trigger.clone()));
        }

        Ok(rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutation::TriggerResult;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn test_path() -> PathBuf {
        PathBuf::from("test-rules.toml")
    }

    const BOOK: &str = r#"
        [[plant]]
        id = "wheat"
        name = "Wheat"

        [[plant]]
        id = "carrot"

        [[plant]]
        id = "hybrid"
        name = "Wheat x Carrot Hybrid"

        [[mutation]]
        child = "hybrid"
        parents = ["wheat", "carrot"]
        chance = 0.25
        triggers = [
            { kind = "light", min = 10, max = 15 },
            { kind = "neighbor_count", plant = "carrot", at_least = 3, result = "force" },
        ]
    "#;

    #[test]
    fn parses_plants_and_mutations() {
        let book = RuleBook::from_toml_str(BOOK, &test_path()).unwrap();
        assert_eq!(book.plants.len(), 3);
        assert_eq!(book.plants[1].name, None);
        assert_eq!(book.mutations.len(), 1);
        assert_eq!(book.mutations[0].chance, 0.25);
        assert_eq!(
            book.mutations[0].triggers[1],
            BuiltinTrigger::NeighborCount {
                plant: PlantId::from("carrot"),
                at_least: 3,
                result: TriggerResult::Force,
            }
        );
    }

    #[test]
    fn load_registers_and_seals() {
        let book = RuleBook::from_toml_str(BOOK, &test_path()).unwrap();
        let (catalog, registry, report) = book.load();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(&PlantId::from("carrot")).unwrap().name, "carrot");
        assert_eq!(registry.len(), 1);
        assert!(registry.is_sealed());
        assert_eq!(report.registered, vec![RuleId(0)]);
        assert!(report.rejected.is_empty());
        assert_eq!(registry.get(RuleId(0)).unwrap().triggers().len(), 2);
    }

    #[test]
    fn bad_mutations_skipped_not_fatal() {
        let toml = r#"
            [[plant]]
            id = "wheat"
            [[plant]]
            id = "carrot"
            [[plant]]
            id = "wheat"

            [[mutation]]
            child = "carrot"
            parents = []
            chance = 0.5

            [[mutation]]
            child = "carrot"
            parents = ["wheat"]
            chance = 2.0

            [[mutation]]
            child = "melon"
            parents = ["wheat"]
            chance = 0.5

            [[mutation]]
            child = "carrot"
            parents = ["wheat"]
            chance = 0.5
            triggers = [{ kind = "light", min = 12, max = 3 }]

            [[mutation]]
            child = "carrot"
            parents = ["wheat"]
            chance = 0.5
            triggers = [{ kind = "neighbor_count", plant = "melon", at_least = 1, result = "forbid" }]

            [[mutation]]
            child = "carrot"
            parents = ["wheat", "wheat"]
            chance = 0.5
        "#;
        let book = RuleBook::from_toml_str(toml, &test_path()).unwrap();
        let (catalog, registry, report) = book.load();

        assert_eq!(catalog.len(), 2);
        assert_eq!(report.skipped_plants, vec!["wheat".to_string()]);
        assert_eq!(registry.len(), 1);
        assert_eq!(report.registered, vec![RuleId(0)]);

        let rejected: Vec<usize> = report.rejected.iter().map(|r| r.index).collect();
        assert_eq!(rejected, vec![0, 1, 2, 3, 4]);
        assert!(report.rejected[0].reason.contains("no parents"));
        assert!(report.rejected[2].reason.contains("melon"));
        assert!(report.rejected[3].reason.contains("light"));
    }

    #[test]
    fn unknown_trigger_kind_is_a_parse_error() {
        let toml = r#"
            [[mutation]]
            child = "carrot"
            parents = ["wheat"]
            chance = 0.5
            triggers = [{ kind = "moon_phase" }]
        "#;
        let err = RuleBook::from_toml_str(toml, &test_path()).unwrap_err();
        assert!(err.contains("test-rules.toml"));
    }

    #[test]
    fn empty_book_loads() {
        let book = RuleBook::from_toml_str("", &test_path()).unwrap();
        let (catalog, registry, report) = book.load();
        assert!(catalog.is_empty());
        assert!(registry.is_empty());
        assert!(registry.is_sealed());
        assert_eq!(report, LoadReport::default());
    }

    #[test]
    fn from_file_reads_book() {
        let mut tmp = NamedTempFile::new().unwrap();
        use std::io::Write;
        write!(tmp, "{}", BOOK).unwrap();
        let book = RuleBook::from_file(tmp.path()).unwrap();
        assert_eq!(book.plants.len(), 3);
    }

    #[test]
    fn from_file_missing_file_error() {
        let err = RuleBook::from_file(Path::new("/nonexistent/rules.toml")).unwrap_err();
        assert!(err.contains("Cannot read"));
    }
}
