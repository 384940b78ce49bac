//! Error types for the `bayworks-economy` crate.
//!
//! All fallible operations in this crate return [`EconomyError`]. Failed
//! operations leave the bank, cluster, or grid they were called on
//! untouched.

use bayworks_types::{ErrorKind, PowerSourceId, ResourceId};

/// Errors that can occur while mutating banks, cells, and grids.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EconomyError {
    /// An energy draw or decay asked for more than the source holds.
    #[error("not enough energy: requested {requested}, available {available}")]
    NotEnoughEnergy {
        /// The amount the caller asked for.
        requested: u32,
        /// The amount that was actually available.
        available: u32,
    },

    /// Adding a resource would overflow the bank's volume capacity.
    #[error(
        "volume exceeded adding {resource}: needs {volume}, used {used} of {capacity}"
    )]
    VolumeExceeded {
        /// The resource being added.
        resource: ResourceId,
        /// Volume the addition would occupy.
        volume: u32,
        /// Volume already occupied.
        used: u32,
        /// Volume capacity of the bank.
        capacity: u32,
    },

    /// Attempted to remove more of a resource than the bank holds.
    #[error("not enough of {resource}: requested {requested}, held {held}")]
    NotEnoughOfKind {
        /// The resource being removed.
        resource: ResourceId,
        /// The amount the caller asked for.
        requested: u32,
        /// The amount the bank holds.
        held: u32,
    },

    /// A required resource is absent or short for a pre-flight check.
    #[error("lacking {resource}: requires {required}, held {held}")]
    LackingResource {
        /// The missing resource.
        resource: ResourceId,
        /// The amount required.
        required: u32,
        /// The amount held.
        held: u32,
    },

    /// A power cell cluster is already at its cell limit.
    #[error("cell limit reached ({limit})")]
    CellLimitReached {
        /// Maximum number of cells.
        limit: usize,
    },

    /// A power source id is not registered on the grid.
    #[error("power source not found: {0}")]
    PowerSourceNotFound(PowerSourceId),

    /// Checked arithmetic on a running aggregate overflowed.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// What was being computed.
        context: &'static str,
    },
}

impl EconomyError {
    /// The section of the error taxonomy this error belongs to.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotEnoughEnergy { .. }
            | Self::NotEnoughOfKind { .. }
            | Self::LackingResource { .. } => ErrorKind::InsufficientResource,
            Self::VolumeExceeded { .. } | Self::CellLimitReached { .. } => {
                ErrorKind::CapacityExceeded
            }
            Self::PowerSourceNotFound(_) => ErrorKind::NotFound,
            Self::ArithmeticOverflow { .. } => ErrorKind::InvalidState,
        }
    }
}
