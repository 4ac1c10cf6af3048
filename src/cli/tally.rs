use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::catalog::PlantId;
use crate::mutation::{Crop, MutationError, MutationResolver, NeighborSet, Outcome};
use crate::rng::{seeded_rng, trial_seed};

/// Aggregate outcome counts over a batch of resolution trials.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrialTally {
    pub seed: u64,
    pub trials: u32,
    pub no_mutation: u32,
    pub forced: u32,
    pub by_child: BTreeMap<PlantId, u32>,
}

impl TrialTally {
    pub fn mutations(&self) -> u32 {
        self.trials - self.no_mutation
    }

    /// Fraction of trials that produced a child, 0 for an empty batch.
    pub fn mutation_rate(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.mutations() as f64 / self.trials as f64
    }

    fn record(&mut self, outcome: &Outcome) {
        self.trials += 1;
        match outcome {
            Outcome::NoMutation => self.no_mutation += 1,
            Outcome::Mutation(result) => {
                if result.forced {
                    self.forced += 1;
                }
                *self.by_child.entry(result.child.clone()).or_insert(0) += 1;
            }
        }
    }
}

/// Resolve the same crop `trials` times in parallel.
///
/// Each trial owns a generator seeded from `seed` and its index, so the
/// tally is identical across runs and thread counts.
pub fn run_trials(
    resolver: &MutationResolver<'_>,
    crop: &Crop,
    neighbors: &NeighborSet,
    trials: u32,
    seed: u64,
) -> Result<TrialTally, MutationError> {
    let outcomes: Vec<Outcome> = (0..trials)
        .into_par_iter()
        .map(|i| {
            let mut rng = seeded_rng(trial_seed(seed, i as u64));
            resolver.resolve(crop, neighbors, &mut rng)
        })
        .collect::<Result<_, _>>()?;

    let mut tally = TrialTally {
        seed,
        ..TrialTally::default()
    };
    for outcome in &outcomes {
        tally.record(outcome);
    }
    Ok(tally)
}
