//! Energy banks with per-tick decay and regeneration rates.
//!
//! [`RegeneratingBank`] wraps a [`Bank`] and adds a `decay_rate` and a
//! `regen_rate`. Decay is all-or-nothing: asking to remove more than is
//! held fails and leaves the bank untouched. Regeneration never fails; it
//! simply stops at the maximum. Both are safe to call every tick at either
//! boundary.

use serde::{Deserialize, Serialize};

use crate::bank::Bank;
use crate::error::EconomyError;

/// A [`Bank`] with default decay and regeneration amounts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegeneratingBank {
    bank: Bank,
    decay_rate: u32,
    regen_rate: u32,
}

/// Construction parameters for a [`RegeneratingBank`], as read from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellSpec {
    /// Maximum charge.
    pub capacity: u32,
    /// Starting charge (clamped to `capacity`).
    #[serde(default)]
    pub start: u32,
    /// Default decay per tick.
    #[serde(default)]
    pub decay: u32,
    /// Default regeneration per tick.
    #[serde(default)]
    pub regen: u32,
}

impl CellSpec {
    /// Build a spec from its four parts.
    pub const fn new(capacity: u32, start: u32, decay: u32, regen: u32) -> Self {
        Self {
            capacity,
            start,
            decay,
            regen,
        }
    }
}

impl From<CellSpec> for RegeneratingBank {
    fn from(spec: CellSpec) -> Self {
        Self::new(spec.start, spec.capacity).with_rates(spec.decay, spec.regen)
    }
}

impl RegeneratingBank {
    /// A bank holding `quantity` (clamped to `maximum`) with zero rates.
    pub const fn new(quantity: u32, maximum: u32) -> Self {
        Self {
            bank: Bank::new(quantity, maximum),
            decay_rate: 0,
            regen_rate: 0,
        }
    }

    /// Set the default decay and regeneration rates.
    #[must_use]
    pub const fn with_rates(mut self, decay_rate: u32, regen_rate: u32) -> Self {
        self.decay_rate = decay_rate;
        self.regen_rate = regen_rate;
        self
    }

    /// The underlying capped quantity.
    pub const fn bank(&self) -> &Bank {
        &self.bank
    }

    /// Current charge.
    pub const fn quantity(&self) -> u32 {
        self.bank.quantity()
    }

    /// Maximum charge.
    pub const fn maximum(&self) -> u32 {
        self.bank.maximum()
    }

    /// Store `quantity`, clamped to the maximum.
    pub const fn set_quantity(&mut self, quantity: u32) {
        self.bank.set_quantity(quantity);
    }

    /// Default decay per tick.
    pub const fn decay_rate(&self) -> u32 {
        self.decay_rate
    }

    /// Default regeneration per tick.
    pub const fn regen_rate(&self) -> u32 {
        self.regen_rate
    }

    /// Whether the charge equals the maximum.
    pub const fn is_full(&self) -> bool {
        self.bank.is_full()
    }

    /// Whether the charge is zero.
    pub const fn is_empty(&self) -> bool {
        self.bank.is_empty()
    }

    /// Whether the bank holds at least `amount`.
    pub const fn has_enough_for(&self, amount: u32) -> bool {
        self.bank.has_enough_for(amount)
    }

    /// Room left before the bank is full.
    pub const fn headroom(&self) -> u32 {
        self.bank.headroom()
    }

    /// Decay by the default rate.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::NotEnoughEnergy`] if the charge is below the
    /// decay rate.
    pub fn decay(&mut self) -> Result<(), EconomyError> {
        self.decay_by(self.decay_rate)
    }

    /// Remove exactly `amount`.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::NotEnoughEnergy`] if the charge is below
    /// `amount`. The bank is unchanged on failure.
    pub fn decay_by(&mut self, amount: u32) -> Result<(), EconomyError> {
        self.bank.take(amount)
    }

    /// Remove up to the default decay rate, stopping at zero.
    ///
    /// Returns the amount actually removed.
    pub fn decay_clamped(&mut self) -> u32 {
        self.bank.drain(self.decay_rate)
    }

    /// Regenerate by the default rate. Returns the amount actually added.
    pub fn regen(&mut self) -> u32 {
        self.bank.fill(self.regen_rate)
    }

    /// Regenerate by `amount`, stopping at the maximum. Returns the amount
    /// actually added.
    pub fn regen_by(&mut self, amount: u32) -> u32 {
        self.bank.fill(amount)
    }
}
