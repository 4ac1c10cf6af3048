use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::catalog::{PlantCatalog, PlantId};
use crate::mutation::MutationError;
use crate::mutation::context::{Crop, NeighborSet};
use crate::mutation::trigger::{MutationTrigger, TriggerResult};

/// Position of a rule in its registry. Lower ids were registered earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(pub usize);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A relation between required neighboring parents and the child they can produce.
///
/// Built before registration and never changed afterwards; there are no setters.
#[derive(Debug, Clone)]
pub struct MutationRule {
    probability: f64,
    child: PlantId,
    parents: Vec<PlantId>,
    triggers: Vec<Arc<dyn MutationTrigger>>,
}

impl MutationRule {
    pub fn new(child: impl Into<PlantId>, parents: Vec<PlantId>, probability: f64) -> Self {
        MutationRule {
            probability,
            child: child.into(),
            parents,
            triggers: Vec::new(),
        }
    }

    /// Append a trigger. Triggers run in the order they were added.
    pub fn with_trigger(self, trigger: impl MutationTrigger + 'static) -> Self {
        self.with_shared_trigger(Arc::new(trigger))
    }

    pub fn with_shared_trigger(mut self, trigger: Arc<dyn MutationTrigger>) -> Self {
        self.triggers.push(trigger);
        self
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn child(&self) -> &PlantId {
        &self.child
    }

    pub fn parents(&self) -> &[PlantId] {
        &self.parents
    }

    pub fn triggers(&self) -> &[Arc<dyn MutationTrigger>] {
        &self.triggers
    }

    pub fn has_child(&self, plant: &PlantId) -> bool {
        &self.child == plant
    }

    pub fn has_parent(&self, plant: &PlantId) -> bool {
        self.parents.contains(plant)
    }

    /// True when every plant in `plants` appears among the parents.
    pub fn has_parents(&self, plants: &[PlantId]) -> bool {
        plants.iter().all(|p| self.has_parent(p))
    }

    /// True when every parent appears in `plants`, ignoring multiplicity.
    pub fn parents_in(&self, plants: &[PlantId]) -> bool {
        self.parents.iter().all(|p| plants.contains(p))
    }

    /// How many of each parent variant the rule needs.
    pub fn parent_counts(&self) -> BTreeMap<&PlantId, u32> {
        let mut counts = BTreeMap::new();
        for parent in &self.parents {
            *counts.entry(parent).or_insert(0) += 1;
        }
        counts
    }

    /// True when `neighbors` holds at least as many of each parent as the rule needs.
    pub fn is_satisfied_by(&self, neighbors: &NeighborSet) -> bool {
        self.parent_counts()
            .into_iter()
            .all(|(parent, needed)| neighbors.count(parent) >= needed)
    }

    /// Run every trigger in order and fold the verdicts.
    ///
    /// No short-circuit: a Forbid late in the list still overrides an earlier Force.
    pub fn evaluate_triggers(&self, crop: &Crop, neighbors: &NeighborSet) -> TriggerResult {
        self.triggers
            .iter()
            .map(|t| t.evaluate(crop, neighbors, self))
            .fold(TriggerResult::Ignore, TriggerResult::combine)
    }

    /// Check the structural constraints a registry enforces.
    pub fn validate(&self, catalog: &PlantCatalog) -> Result<(), MutationError> {
        if self.parents.is_empty() {
            return Err(MutationError::invalid(format!(
                "mutation to '{}' has no parents",
                self.child
            )));
        }
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(MutationError::invalid(format!(
                "mutation to '{}' has probability {}, expected 0.0-1.0",
                self.child, self.probability
            )));
        }
        if !catalog.variant_exists(&self.child) {
            return Err(MutationError::invalid(format!(
                "child '{}' is not a registered plant",
                self.child
            )));
        }
        if let Some(unknown) = self.parents.iter().find(|p| !catalog.variant_exists(p)) {
            return Err(MutationError::invalid(format!(
                "parent '{}' of mutation to '{}' is not a registered plant",
                unknown, self.child
            )));
        }
        Ok(())
    }
}

impl fmt::Display for MutationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parents: Vec<&str> = self.parents.iter().map(|p| p.as_str()).collect();
        write!(
            f,
            "{} -> {} ({:.1}%",
            parents.join(" + "),
            self.child,
            self.probability * 100.0
        )?;
        if !self.triggers.is_empty() {
            let names: Vec<&str> = self.triggers.iter().map(|t| t.name()).collect();
            write!(f, ", triggers: {}", names.join(", "))?;
        }
        write!(f, ")")
    }
}
