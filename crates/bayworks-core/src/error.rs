//! Error types for colony assembly and the tick driver.

use bayworks_bays::BayError;
use bayworks_economy::EconomyError;
use bayworks_types::ErrorKind;

/// Errors raised while building or advancing a [`Colony`](crate::colony::Colony).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColonyError {
    /// A config section names something no other section defines.
    #[error("unknown {kind} '{name}'")]
    UnknownReference {
        /// What was being looked up (`resource`, `skill`, `bay`, ...).
        kind: &'static str,
        /// The name that did not resolve.
        name: String,
    },

    /// Two catalog entries or bays share a name or catalog number.
    #[error("duplicate {kind} '{name}'")]
    Duplicate {
        /// What was duplicated.
        kind: &'static str,
        /// The repeated name or number.
        name: String,
    },

    /// No bay exists at the given index.
    #[error("{kind} bay {index} not found")]
    BayNotFound {
        /// `production` or `research`.
        kind: &'static str,
        /// The requested index.
        index: usize,
    },

    /// A bay operation failed.
    #[error(transparent)]
    Bay(#[from] BayError),

    /// A bank, cluster, or grid operation failed.
    #[error(transparent)]
    Economy(#[from] EconomyError),

    /// The tick counter cannot advance further.
    #[error("tick counter overflow")]
    TickOverflow,
}

impl ColonyError {
    /// The section of the error taxonomy this error belongs to.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownReference { .. } | Self::BayNotFound { .. } => ErrorKind::NotFound,
            Self::Duplicate { .. } | Self::TickOverflow => ErrorKind::InvalidState,
            Self::Bay(inner) => inner.kind(),
            Self::Economy(inner) => inner.kind(),
        }
    }

    pub(crate) fn unknown(kind: &'static str, name: &str) -> Self {
        Self::UnknownReference {
            kind,
            name: name.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_the_wrapped_error() {
        let bay = ColonyError::from(BayError::NoStationAvailable);
        assert_eq!(bay.kind(), ErrorKind::CapacityExceeded);
        let economy = ColonyError::from(EconomyError::CellLimitReached { limit: 2 });
        assert_eq!(economy.kind(), ErrorKind::CapacityExceeded);
        assert_eq!(ColonyError::unknown("skill", "Welding").kind(), ErrorKind::NotFound);
    }

    #[test]
    fn unknown_reference_names_the_culprit() {
        let err = ColonyError::unknown("resource", "Unobtainium");
        assert_eq!(err.to_string(), "unknown resource 'Unobtainium'");
    }
}
