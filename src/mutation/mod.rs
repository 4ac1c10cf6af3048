pub mod context;
pub mod registry;
pub mod resolver;
pub mod rule;
pub mod trigger;

use crate::catalog::PlantId;

pub use context::{Crop, NeighborSet};
pub use registry::MutationRegistry;
pub use resolver::{MutationResolver, MutationResult, Outcome, ResolverPolicy};
pub use rule::{MutationRule, RuleId};
pub use trigger::{BuiltinTrigger, MutationTrigger, TriggerResult};

/// Errors raised while registering or resolving mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// The rule is structurally invalid and was not registered.
    InvalidRule { reason: String },
    /// The registry was sealed before this registration.
    RegistrationClosed,
    /// A resolver was requested while the registry still accepts rules.
    RegistrationOpen,
    /// The crop's own variant is not in the plant catalog.
    UnknownVariant(PlantId),
}

impl MutationError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        MutationError::InvalidRule {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for MutationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MutationError::InvalidRule { reason } => write!(f, "Invalid mutation: {}", reason),
            MutationError::RegistrationClosed => {
                write!(f, "Mutation registry is sealed; no further rules can be registered")
            }
            MutationError::RegistrationOpen => {
                write!(f, "Mutation registry must be sealed before resolving mutations")
            }
            MutationError::UnknownVariant(id) => write!(f, "Unknown plant variant '{}'", id),
        }
    }
}

impl std::error::Error for MutationError {}
