//! Capped quantities.
//!
//! A [`Bank`] holds a `u32` quantity clamped to `[0, maximum]`. Setting a
//! quantity above the maximum stores the maximum instead; taking more than
//! is held is rejected rather than wrapped. The maximum defaults to
//! `u32::MAX`, so an unconfigured bank is effectively unbounded.

use crate::error::EconomyError;

/// A quantity clamped to a maximum capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bank {
    /// Current amount, always `<= maximum`.
    quantity: u32,
    /// Capacity ceiling.
    maximum: u32,
}

impl Default for Bank {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl Bank {
    /// An empty bank with no practical ceiling.
    pub const fn unbounded() -> Self {
        Self {
            quantity: 0,
            maximum: u32::MAX,
        }
    }

    /// An empty bank capped at `maximum`.
    pub const fn with_maximum(maximum: u32) -> Self {
        Self {
            quantity: 0,
            maximum,
        }
    }

    /// A bank holding `quantity`, clamped to `maximum`.
    pub const fn new(quantity: u32, maximum: u32) -> Self {
        let quantity = if quantity > maximum { maximum } else { quantity };
        Self { quantity, maximum }
    }

    /// Current amount held.
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Capacity ceiling.
    pub const fn maximum(&self) -> u32 {
        self.maximum
    }

    /// Store `quantity`, clamped to the maximum.
    pub const fn set_quantity(&mut self, quantity: u32) {
        self.quantity = if quantity > self.maximum {
            self.maximum
        } else {
            quantity
        };
    }

    /// Change the ceiling. The held quantity is re-clamped.
    pub const fn set_maximum(&mut self, maximum: u32) {
        self.maximum = maximum;
        if self.quantity > maximum {
            self.quantity = maximum;
        }
    }

    /// Whether the bank has reached its capacity.
    pub const fn is_full(&self) -> bool {
        self.quantity == self.maximum
    }

    /// Whether the bank holds nothing.
    pub const fn is_empty(&self) -> bool {
        self.quantity == 0
    }

    /// Whether the bank holds at least `amount`.
    pub const fn has_enough_for(&self, amount: u32) -> bool {
        self.quantity >= amount
    }

    /// Room left before the bank is full.
    pub const fn headroom(&self) -> u32 {
        self.maximum.saturating_sub(self.quantity)
    }

    /// Add up to `amount`, stopping at the maximum. Returns what was added.
    pub fn fill(&mut self, amount: u32) -> u32 {
        let added = amount.min(self.headroom());
        self.quantity = self.quantity.saturating_add(added);
        added
    }

    /// Remove exactly `amount`.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::NotEnoughEnergy`] if the bank holds less
    /// than `amount`. The bank is unchanged on failure.
    pub fn take(&mut self, amount: u32) -> Result<(), EconomyError> {
        self.quantity = self
            .quantity
            .checked_sub(amount)
            .ok_or(EconomyError::NotEnoughEnergy {
                requested: amount,
                available: self.quantity,
            })?;
        Ok(())
    }

    /// Remove up to `amount`, stopping at zero. Returns what was removed.
    pub fn drain(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.quantity);
        self.quantity = self.quantity.saturating_sub(removed);
        removed
    }

    /// Merge another bank's maximum and quantity into this one.
    pub fn absorb(&mut self, other: &Self) {
        self.maximum = self.maximum.saturating_add(other.maximum);
        self.set_quantity(self.quantity.saturating_add(other.quantity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty_and_unbounded() {
        let bank = Bank::default();
        assert_eq!(bank.quantity(), 0);
        assert_eq!(bank.maximum(), u32::MAX);
        assert!(bank.is_empty());
    }

    #[test]
    fn setter_clamps_to_maximum() {
        for (q, m) in [(0, 0), (5, 10), (10, 10), (11, 10), (u32::MAX, 3)] {
            let mut bank = Bank::with_maximum(m);
            bank.set_quantity(q);
            assert_eq!(bank.quantity(), q.min(m), "q={q} m={m}");
            assert_eq!(Bank::new(q, m).quantity(), q.min(m));
        }
    }

    #[test]
    fn full_iff_quantity_equals_maximum() {
        let mut bank = Bank::new(9, 10);
        assert!(!bank.is_full());
        bank.fill(1);
        assert!(bank.is_full());
    }

    #[test]
    fn fill_stops_at_maximum() {
        let mut bank = Bank::new(8, 10);
        assert_eq!(bank.fill(5), 2);
        assert_eq!(bank.quantity(), 10);
        assert_eq!(bank.fill(5), 0);
    }

    #[test]
    fn take_rejects_shortfall_without_mutation() {
        let mut bank = Bank::new(4, 10);
        let result = bank.take(5);
        assert_eq!(
            result,
            Err(EconomyError::NotEnoughEnergy {
                requested: 5,
                available: 4
            })
        );
        assert_eq!(bank.quantity(), 4);
        assert!(bank.take(4).is_ok());
        assert!(bank.is_empty());
    }

    #[test]
    fn has_enough_for_boundary() {
        let bank = Bank::new(4, 10);
        assert!(bank.has_enough_for(4));
        assert!(!bank.has_enough_for(5));
        assert!(bank.has_enough_for(0));
    }

    #[test]
    fn lowering_maximum_reclamps() {
        let mut bank = Bank::new(50, 100);
        bank.set_maximum(20);
        assert_eq!(bank.quantity(), 20);
        assert!(bank.is_full());
    }

    #[test]
    fn absorb_merges_both_fields() {
        let mut a = Bank::new(3, 10);
        a.absorb(&Bank::new(4, 5));
        assert_eq!(a.maximum(), 15);
        assert_eq!(a.quantity(), 7);
    }

    #[test]
    fn drain_stops_at_zero() {
        let mut bank = Bank::new(3, 10);
        assert_eq!(bank.drain(5), 3);
        assert!(bank.is_empty());
    }
}
