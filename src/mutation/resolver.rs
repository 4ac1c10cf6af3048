use serde::Serialize;
use tracing::{debug, trace};

use crate::catalog::{PlantCatalog, PlantId};
use crate::mutation::MutationError;
use crate::mutation::context::{Crop, NeighborSet};
use crate::mutation::registry::MutationRegistry;
use crate::mutation::rule::{MutationRule, RuleId};
use crate::mutation::trigger::TriggerResult;
use crate::rng::RandomSource;

/// Knobs that change which rules are considered for a crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverPolicy {
    /// Whether a rule may produce the crop's own variant.
    pub allow_self_mutation: bool,
    /// Whether the crop's own variant counts toward the parents a rule needs.
    pub crop_counts_as_parent: bool,
}

impl Default for ResolverPolicy {
    fn default() -> Self {
        ResolverPolicy {
            allow_self_mutation: true,
            crop_counts_as_parent: true,
        }
    }
}

/// The rule that fired and the child it produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationResult {
    pub rule: RuleId,
    pub child: PlantId,
    /// True when a trigger forced the rule and no roll was made.
    pub forced: bool,
}

/// Result of one resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    NoMutation,
    Mutation(MutationResult),
}

impl Outcome {
    pub fn child(&self) -> Option<&PlantId> {
        match self {
            Outcome::NoMutation => None,
            Outcome::Mutation(result) => Some(&result.child),
        }
    }

    pub fn is_mutation(&self) -> bool {
        matches!(self, Outcome::Mutation(_))
    }
}

/// Picks at most one mutation for a crop and its neighbors.
///
/// Holds shared borrows only, so any number of resolvers can run in parallel
/// over the same sealed registry.
#[derive(Debug, Clone, Copy)]
pub struct MutationResolver<'a> {
    catalog: &'a PlantCatalog,
    registry: &'a MutationRegistry,
    policy: ResolverPolicy,
}

impl<'a> MutationResolver<'a> {
    pub fn new(
        catalog: &'a PlantCatalog,
        registry: &'a MutationRegistry,
        policy: ResolverPolicy,
    ) -> Result<Self, MutationError> {
        if !registry.is_sealed() {
            return Err(MutationError::RegistrationOpen);
        }
        Ok(MutationResolver {
            catalog,
            registry,
            policy,
        })
    }

    pub fn policy(&self) -> ResolverPolicy {
        self.policy
    }

    /// Decide whether `crop` mutates, given its neighbors and a random source.
    ///
    /// Candidates are visited in registration order. Any Forbid verdict drops
    /// a rule; the first rule with a Force verdict wins outright without
    /// consuming samples. Otherwise each remaining rule draws one sample in
    /// turn and the first whose sample falls below its probability wins.
    pub fn resolve<R: RandomSource + ?Sized>(
        &self,
        crop: &Crop,
        neighbors: &NeighborSet,
        rng: &mut R,
    ) -> Result<Outcome, MutationError> {
        if !self.catalog.variant_exists(&crop.variant) {
            return Err(MutationError::UnknownVariant(crop.variant.clone()));
        }

        let pool;
        let parents = if self.policy.crop_counts_as_parent {
            pool = neighbors.with(crop.variant.clone());
            &pool
        } else {
            neighbors
        };

        let mut forced: Option<(RuleId, &MutationRule)> = None;
        let mut probabilistic: Vec<(RuleId, &MutationRule)> = Vec::new();

        for (id, rule) in self.registry.candidates_for(parents) {
            if !self.policy.allow_self_mutation && rule.has_child(&crop.variant) {
                trace!(rule = %id, crop = %crop.variant, "Self mutation skipped");
                continue;
            }
            match rule.evaluate_triggers(crop, neighbors) {
                TriggerResult::Forbid => {
                    debug!(rule = %id, crop = %crop.variant, "Mutation forbidden by trigger");
                }
                TriggerResult::Force => {
                    trace!(rule = %id, crop = %crop.variant, "Mutation forced by trigger");
                    forced.get_or_insert((id, rule));
                }
                TriggerResult::Ignore => probabilistic.push((id, rule)),
            }
        }

        if let Some((id, rule)) = forced {
            debug!(rule = %id, crop = %crop.variant, child = %rule.child(), "Forced mutation selected");
            return Ok(Outcome::Mutation(MutationResult {
                rule: id,
                child: rule.child().clone(),
                forced: true,
            }));
        }

        for (id, rule) in probabilistic {
            let sample = rng.next_unit();
            if sample < rule.probability() {
                debug!(
                    rule = %id,
                    crop = %crop.variant,
                    child = %rule.child(),
                    sample,
                    "Mutation roll succeeded"
                );
                return Ok(Outcome::Mutation(MutationResult {
                    rule: id,
                    child: rule.child().clone(),
                    forced: false,
                }));
            }
        }

        Ok(Outcome::NoMutation)
    }
}
