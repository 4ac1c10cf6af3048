pub mod catalog;
pub mod cli;
pub mod config;
pub mod mutation;
pub mod rng;
pub mod rulebook;

pub use catalog::{CatalogError, PlantCatalog, PlantId, PlantVariant};
pub use mutation::{
    Crop, MutationError, MutationRegistry, MutationResolver, MutationResult, MutationRule,
    MutationTrigger, NeighborSet, Outcome, ResolverPolicy, RuleId, TriggerResult,
};
pub use rng::{FixedDraws, RandomSource};
