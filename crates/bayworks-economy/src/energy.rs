//! Pool and reserve: the two energy banks every working bay draws from.
//!
//! Draws take from the pool first and spill any shortfall onto the
//! reserve. A draw the two banks cannot cover together fails without
//! touching either. Top-ups run the same order: pool, then reserve.

use crate::error::EconomyError;
use crate::regenerating::RegeneratingBank;

/// A bay's pool and reserve energy banks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnergyStore {
    pool: RegeneratingBank,
    reserve: RegeneratingBank,
}

impl EnergyStore {
    /// A store built from its two banks.
    pub const fn new(pool: RegeneratingBank, reserve: RegeneratingBank) -> Self {
        Self { pool, reserve }
    }

    /// The bank drawn from first.
    pub const fn pool(&self) -> &RegeneratingBank {
        &self.pool
    }

    /// The bank drawn from once the pool is exhausted.
    pub const fn reserve(&self) -> &RegeneratingBank {
        &self.reserve
    }

    /// Energy held across both banks.
    pub const fn available(&self) -> u32 {
        self.pool.quantity().saturating_add(self.reserve.quantity())
    }

    /// Energy needed to fill both banks.
    pub const fn headroom(&self) -> u32 {
        self.pool.headroom().saturating_add(self.reserve.headroom())
    }

    /// Draw exactly `amount`, pool first.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::NotEnoughEnergy`] if pool and reserve hold
    /// less than `amount` combined. Neither bank changes on failure.
    pub fn draw(&mut self, amount: u32) -> Result<(), EconomyError> {
        let available = self.available();
        if available < amount {
            return Err(EconomyError::NotEnoughEnergy {
                requested: amount,
                available,
            });
        }
        let from_pool = amount.min(self.pool.quantity());
        self.pool.decay_by(from_pool)?;
        self.reserve.decay_by(amount.saturating_sub(from_pool))?;
        Ok(())
    }

    /// Add up to `amount`, filling the pool before the reserve. Returns the
    /// energy actually stored.
    pub fn top_up(&mut self, amount: u32) -> u32 {
        let to_pool = self.pool.regen_by(amount);
        let to_reserve = self.reserve.regen_by(amount.saturating_sub(to_pool));
        to_pool.saturating_add(to_reserve)
    }
}
