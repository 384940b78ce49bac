//! The error taxonomy shared by every fallible core operation.
//!
//! Each crate defines its own concrete error enum; every variant maps onto
//! exactly one [`ErrorKind`] so a caller can decide whether a failure is
//! fatal or recoverable without matching on crate-specific variants.

use serde::{Deserialize, Serialize};

/// The category a failed operation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A population, volume, station, cell, or seat limit was reached.
    CapacityExceeded,
    /// Energy or material shortfall on a draw or consume.
    InsufficientResource,
    /// The recipe or knowledge is not in the bay's supported set.
    UnsupportedOperation,
    /// The operation does not apply in the current state.
    InvalidState,
    /// The referenced worker, researcher, or slot does not exist.
    NotFound,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::CapacityExceeded => "capacity exceeded",
            Self::InsufficientResource => "insufficient resource",
            Self::UnsupportedOperation => "unsupported operation",
            Self::InvalidState => "invalid state",
            Self::NotFound => "not found",
        };
        f.write_str(label)
    }
}
