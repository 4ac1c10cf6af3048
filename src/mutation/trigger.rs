use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::PlantId;
use crate::mutation::context::{Crop, DAY_LENGTH, MAX_LIGHT, NeighborSet};
use crate::mutation::rule::MutationRule;

/// Verdict of a single trigger on a single rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerResult {
    /// Default mutation logic applies.
    Ignore,
    /// The mutation happens without a probability roll.
    Force,
    /// The mutation cannot happen. Overrules `Force`.
    Forbid,
}

impl TriggerResult {
    /// Fold two verdicts: Forbid dominates Force dominates Ignore.
    pub fn combine(self, other: TriggerResult) -> TriggerResult {
        match (self, other) {
            (TriggerResult::Forbid, _) | (_, TriggerResult::Forbid) => TriggerResult::Forbid,
            (TriggerResult::Force, _) | (_, TriggerResult::Force) => TriggerResult::Force,
            _ => TriggerResult::Ignore,
        }
    }
}

/// An override condition attached to a mutation rule.
///
/// Implementations may read world state carried by the crop, but must not
/// change anything: the resolver calls every trigger of every candidate rule,
/// in order, on each resolution.
pub trait MutationTrigger: Send + Sync + fmt::Debug {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Classify the rule for this crop.
    ///
    /// `neighbors` are the plants adjacent to the crop, excluding the crop itself.
    fn evaluate(&self, crop: &Crop, neighbors: &NeighborSet, rule: &MutationRule)
    -> TriggerResult;
}

/// Trigger kinds that rule books can declare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BuiltinTrigger {
    /// Fires when at least `at_least` neighbors are `plant`.
    NeighborCount {
        plant: PlantId,
        at_least: u32,
        result: TriggerResult,
    },
    /// Forbids the mutation outside the light range `[min, max]`.
    Light { min: u8, max: u8 },
    /// Fires while the time of day lies in `[from, to)`, wrapping past midnight
    /// when `from > to`.
    TimeOfDay {
        from: u32,
        to: u32,
        result: TriggerResult,
    },
    /// Fires when the crop was last worked with `tool`.
    Tool { tool: String, result: TriggerResult },
    Fixed { result: TriggerResult },
}

impl BuiltinTrigger {
    /// Check parameter ranges, returning a message naming the offending field.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            BuiltinTrigger::NeighborCount { at_least, .. } if *at_least == 0 => {
                Err("neighbor_count.at_least must be > 0".to_string())
            }
            BuiltinTrigger::Light { min, max } if min > max || *max > MAX_LIGHT => Err(format!(
                "light range must satisfy min <= max <= {}, got {}..={}",
                MAX_LIGHT, min, max
            )),
            BuiltinTrigger::TimeOfDay { from, to, .. }
                if *from >= DAY_LENGTH || *to > DAY_LENGTH || from == to =>
            {
                Err(format!(
                    "time_of_day window must be a non-empty range within 0..{}, got {}..{}",
                    DAY_LENGTH, from, to
                ))
            }
            BuiltinTrigger::Tool { tool, .. } if tool.trim().is_empty() => {
                Err("tool.tool must not be empty".to_string())
            }
            _ => Ok(()),
        }
    }
}

impl MutationTrigger for BuiltinTrigger {
    fn name(&self) -> &str {
        match self {
            BuiltinTrigger::NeighborCount { .. } => "neighbor_count",
            BuiltinTrigger::Light { .. } => "light",
            BuiltinTrigger::TimeOfDay { .. } => "time_of_day",
            BuiltinTrigger::Tool { .. } => "tool",
            BuiltinTrigger::Fixed { .. } => "fixed",
        }
    }

    fn evaluate(
        &self,
        crop: &Crop,
        neighbors: &NeighborSet,
        _rule: &MutationRule,
    ) -> TriggerResult {
        match self {
            BuiltinTrigger::NeighborCount {
                plant,
                at_least,
                result,
            } => {
                if neighbors.count(plant) >= *at_least {
                    *result
                } else {
                    TriggerResult::Ignore
                }
            }
            BuiltinTrigger::Light { min, max } => {
                if (*min..=*max).contains(&crop.light_level) {
                    TriggerResult::Ignore
                } else {
                    TriggerResult::Forbid
                }
            }
            BuiltinTrigger::TimeOfDay { from, to, result } => {
                let t = crop.time_of_day % DAY_LENGTH;
                let inside = if from < to {
                    (*from..*to).contains(&t)
                } else {
                    t >= *from || t < *to
                };
                if inside { *result } else { TriggerResult::Ignore }
            }
            BuiltinTrigger::Tool { tool, result } => match &crop.applied_tool {
                Some(applied) if applied == tool => *result,
                _ => TriggerResult::Ignore,
            },
            BuiltinTrigger::Fixed { result } => *result,
        }
    }
}
