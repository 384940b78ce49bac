//! Error types for the `bayworks-bays` crate.
//!
//! All fallible bay, slot, and roster operations return [`BayError`].
//! Economy failures raised underneath (energy draws, resource bills) are
//! wrapped unchanged and keep their [`ErrorKind`].

use bayworks_economy::EconomyError;
use bayworks_types::{CitizenId, ErrorKind, KnowledgeId, RecipeId};

/// Errors that can occur while operating bays and their stations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BayError {
    /// A bank, cluster, or grid operation failed.
    #[error(transparent)]
    Economy(#[from] EconomyError),

    /// A roster (seats, occupants, researchers) is already at its limit.
    #[error("roster is full ({limit})")]
    RosterFull {
        /// Maximum number of members.
        limit: usize,
    },

    /// The citizen is already on the roster.
    #[error("citizen {0} is already present")]
    AlreadyPresent(CitizenId),

    /// The citizen is not on the roster.
    #[error("citizen {0} is not present")]
    NotPresent(CitizenId),

    /// A roster position past the end was requested.
    #[error("roster index {index} out of range ({len} members)")]
    RosterIndexOutOfRange {
        /// The requested position.
        index: usize,
        /// Number of members on the roster.
        len: usize,
    },

    /// The citizen id is not registered in the colony.
    #[error("citizen {0} not found")]
    CitizenNotFound(CitizenId),

    /// The bay already has its maximum number of production stations.
    #[error("production station limit reached ({limit})")]
    StationLimitReached {
        /// Maximum number of stations.
        limit: usize,
    },

    /// No production station exists at the given index.
    #[error("production station {0} not found")]
    StationNotFound(usize),

    /// The bay has no production station to place work on.
    #[error("no production station available")]
    NoStationAvailable,

    /// No queued recipe exists at the given lineup position.
    #[error("lineup entry {0} not found")]
    LineupEntryNotFound(usize),

    /// The recipe is not in the bay's supported set.
    #[error("recipe {0} is not supported by this bay")]
    UnsupportedRecipe(RecipeId),

    /// The knowledge item is not in the bay's supported set.
    #[error("knowledge {0} is not supported by this bay")]
    UnsupportedKnowledge(KnowledgeId),

    /// There is no active recipe to finish.
    #[error("no active recipe")]
    NoActiveRecipe,

    /// The active recipe still has incomplete ingredients.
    #[error("recipe {0} is not yet complete")]
    RecipeIncomplete(RecipeId),

    /// Another knowledge item is already being researched.
    #[error("research already in progress: {0}")]
    ResearchInProgress(KnowledgeId),

    /// The knowledge item is already in the bay's repository.
    #[error("knowledge {0} is already researched")]
    AlreadyResearched(KnowledgeId),
}

impl BayError {
    /// The section of the error taxonomy this error belongs to.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Economy(inner) => inner.kind(),
            Self::RosterFull { .. }
            | Self::StationLimitReached { .. }
            | Self::NoStationAvailable => ErrorKind::CapacityExceeded,
            Self::NotPresent(_)
            | Self::RosterIndexOutOfRange { .. }
            | Self::CitizenNotFound(_)
            | Self::StationNotFound(_)
            | Self::LineupEntryNotFound(_) => ErrorKind::NotFound,
            Self::UnsupportedRecipe(_) | Self::UnsupportedKnowledge(_) => {
                ErrorKind::UnsupportedOperation
            }
            Self::AlreadyPresent(_)
            | Self::NoActiveRecipe
            | Self::RecipeIncomplete(_)
            | Self::ResearchInProgress(_)
            | Self::AlreadyResearched(_) => ErrorKind::InvalidState,
        }
    }
}
