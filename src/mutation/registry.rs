use std::collections::HashMap;
use tracing::debug;

use crate::catalog::{PlantCatalog, PlantId};
use crate::mutation::MutationError;
use crate::mutation::context::NeighborSet;
use crate::mutation::rule::{MutationRule, RuleId};

/// Every registered mutation rule, indexed for lookup.
///
/// Rules are appended during the registration phase and never removed or
/// changed. Once [`seal`](Self::seal) is called the registry is read-only and
/// can be shared across threads without locking.
#[derive(Debug, Default)]
pub struct MutationRegistry {
    rules: Vec<MutationRule>,
    by_child: HashMap<PlantId, Vec<RuleId>>,
    by_parent: HashMap<PlantId, Vec<RuleId>>,
    // Each rule is filed under its first parent only; a rule can match a
    // neighbor set only if that parent is present.
    by_key_parent: HashMap<PlantId, Vec<RuleId>>,
    sealed: bool,
}

impl MutationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append a rule.
    ///
    /// A rejected rule leaves every index untouched, so the caller can log it
    /// and keep registering the rest of a batch.
    pub fn register(
        &mut self,
        catalog: &PlantCatalog,
        rule: MutationRule,
    ) -> Result<RuleId, MutationError> {
        if self.sealed {
            return Err(MutationError::RegistrationClosed);
        }
        rule.validate(catalog)?;

        let id = RuleId(self.rules.len());
        self.by_child.entry(rule.child().clone()).or_default().push(id);

        let mut seen: Vec<&PlantId> = Vec::with_capacity(rule.parents().len());
        for parent in rule.parents() {
            if !seen.contains(&parent) {
                seen.push(parent);
                self.by_parent.entry(parent.clone()).or_default().push(id);
            }
        }
        // validate() guarantees at least one parent
        self.by_key_parent
            .entry(rule.parents()[0].clone())
            .or_default()
            .push(id);

        debug!(rule = %id, mutation = %rule, "Mutation registered");
        self.rules.push(rule);
        Ok(id)
    }

    /// Close the registration phase. Further `register` calls fail.
    pub fn seal(&mut self) {
        if !self.sealed {
            debug!(rules = self.rules.len(), "Mutation registry sealed");
        }
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, id: RuleId) -> Option<&MutationRule> {
        self.rules.get(id.0)
    }

    /// All rules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (RuleId, &MutationRule)> {
        self.rules.iter().enumerate().map(|(i, r)| (RuleId(i), r))
    }

    /// Rules producing `child`, in registration order.
    pub fn rules_for_child<'a>(
        &'a self,
        child: &PlantId,
    ) -> impl Iterator<Item = (RuleId, &'a MutationRule)> + 'a {
        self.indexed(self.by_child.get(child))
    }

    /// Rules requiring `parent` at least once, in registration order.
    pub fn rules_with_parent<'a>(
        &'a self,
        parent: &PlantId,
    ) -> impl Iterator<Item = (RuleId, &'a MutationRule)> + 'a {
        self.indexed(self.by_parent.get(parent))
    }

    /// Rules whose parent multiset is covered by `neighbors`, in registration order.
    pub fn candidates_for<'a>(
        &'a self,
        neighbors: &'a NeighborSet,
    ) -> impl Iterator<Item = (RuleId, &'a MutationRule)> + 'a {
        let mut ids: Vec<RuleId> = neighbors
            .distinct()
            .filter_map(|(plant, _)| self.by_key_parent.get(plant))
            .flatten()
            .copied()
            .collect();
        // Every rule sits under exactly one key, so the ids are already unique.
        ids.sort_unstable();

        ids.into_iter()
            .map(move |id| (id, &self.rules[id.0]))
            .filter(move |(_, rule)| rule.is_satisfied_by(neighbors))
    }

    fn indexed<'a>(
        &'a self,
        ids: Option<&'a Vec<RuleId>>,
    ) -> impl Iterator<Item = (RuleId, &'a MutationRule)> + 'a {
        ids.into_iter()
            .flatten()
            .map(move |&id| (id, &self.rules[id.0]))
    }
}
