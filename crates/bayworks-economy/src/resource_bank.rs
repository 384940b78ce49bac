//! Volume-capped storage for heterogeneous resources.
//!
//! A [`ResourceBank`] tracks one stack per resource kind, in insertion
//! order, and a [`Bank`] whose quantity is the volume those stacks occupy.
//! After every call the occupied volume equals the sum of
//! `amount * resource.volume` over all stacks.

use std::collections::BTreeMap;

use bayworks_types::{Quantified, Resource, ResourceId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bank::Bank;
use crate::error::EconomyError;

/// One resource kind and the amount of it held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceStack {
    /// The resource kind.
    pub resource: Resource,
    /// Units held, never zero while the stack exists.
    pub amount: u32,
}

/// Resource storage capped by total volume.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourceBank {
    volume: Bank,
    stacks: Vec<ResourceStack>,
}

impl ResourceBank {
    /// An empty bank with no practical volume ceiling.
    pub const fn unbounded() -> Self {
        Self {
            volume: Bank::unbounded(),
            stacks: Vec::new(),
        }
    }

    /// An empty bank holding at most `capacity` volume.
    pub const fn with_capacity(capacity: u32) -> Self {
        Self {
            volume: Bank::with_maximum(capacity),
            stacks: Vec::new(),
        }
    }

    /// Volume currently occupied.
    pub const fn volume_used(&self) -> u32 {
        self.volume.quantity()
    }

    /// Volume ceiling.
    pub const fn volume_capacity(&self) -> u32 {
        self.volume.maximum()
    }

    /// Whether no resources are held.
    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    /// Stacks in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceStack> {
        self.stacks.iter()
    }

    /// Units held of `resource`, zero if absent.
    pub fn amount_of(&self, resource: ResourceId) -> u32 {
        self.stacks
            .iter()
            .find(|s| s.resource.id == resource)
            .map_or(0, |s| s.amount)
    }

    /// Whether at least `amount` of `resource` is held.
    pub fn contains(&self, resource: ResourceId, amount: u32) -> bool {
        self.amount_of(resource) >= amount
    }

    /// Whether every listed requirement is covered. Requirements naming the
    /// same resource more than once are summed first.
    pub fn contains_all(&self, requirements: &[Quantified<Resource>]) -> bool {
        self.first_shortfall(requirements).is_none()
    }

    fn first_shortfall(&self, requirements: &[Quantified<Resource>]) -> Option<EconomyError> {
        let mut totals: BTreeMap<ResourceId, u32> = BTreeMap::new();
        for req in requirements {
            let entry = totals.entry(req.item.id).or_insert(0);
            *entry = entry.saturating_add(req.quantity);
        }
        totals.into_iter().find_map(|(resource, required)| {
            let held = self.amount_of(resource);
            (held < required).then_some(EconomyError::LackingResource {
                resource,
                required,
                held,
            })
        })
    }

    /// Whether `amount` of `resource` would fit in the remaining volume.
    pub fn has_space_for(&self, resource: &Resource, amount: u32) -> bool {
        resource
            .volume
            .checked_mul(amount)
            .is_some_and(|needed| needed <= self.volume.headroom())
    }

    /// Store `amount` of `resource`, merging into an existing stack.
    ///
    /// Adding zero is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::VolumeExceeded`] if the volume cap would be
    /// exceeded, or [`EconomyError::ArithmeticOverflow`] if the stack amount
    /// would not fit in a `u32`. Nothing changes on failure.
    pub fn add(&mut self, resource: &Resource, amount: u32) -> Result<(), EconomyError> {
        if amount == 0 {
            return Ok(());
        }
        let exceeded = || EconomyError::VolumeExceeded {
            resource: resource.id,
            volume: resource.volume.saturating_mul(amount),
            used: self.volume.quantity(),
            capacity: self.volume.maximum(),
        };
        let needed = resource.volume.checked_mul(amount).ok_or_else(exceeded)?;
        if needed > self.volume.headroom() {
            return Err(exceeded());
        }
        match self.stacks.iter_mut().find(|s| s.resource.id == resource.id) {
            Some(stack) => {
                stack.amount = stack.amount.checked_add(amount).ok_or(
                    EconomyError::ArithmeticOverflow {
                        context: "resource stack amount",
                    },
                )?;
            }
            None => self.stacks.push(ResourceStack {
                resource: resource.clone(),
                amount,
            }),
        }
        self.volume.fill(needed);
        debug!(resource = %resource.id, amount, used = self.volume.quantity(), "resource stored");
        Ok(())
    }

    /// Remove `amount` of `resource`, dropping the stack when it empties.
    ///
    /// Removing a resource that is not held is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::NotEnoughOfKind`] if fewer than `amount` units
    /// are held. Nothing changes on failure.
    pub fn remove(&mut self, resource: ResourceId, amount: u32) -> Result<(), EconomyError> {
        let Some(index) = self.stacks.iter().position(|s| s.resource.id == resource) else {
            return Ok(());
        };
        let Some(stack) = self.stacks.get_mut(index) else {
            return Ok(());
        };
        let remaining = stack
            .amount
            .checked_sub(amount)
            .ok_or(EconomyError::NotEnoughOfKind {
                resource,
                requested: amount,
                held: stack.amount,
            })?;
        let freed = stack.resource.volume.saturating_mul(amount);
        stack.amount = remaining;
        if remaining == 0 {
            self.stacks.remove(index);
        }
        self.volume.drain(freed);
        Ok(())
    }

    /// Remove every listed requirement, or nothing at all.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::LackingResource`] for the first resource that
    /// is short. Nothing is removed on failure.
    pub fn remove_all(&mut self, requirements: &[Quantified<Resource>]) -> Result<(), EconomyError> {
        if let Some(shortfall) = self.first_shortfall(requirements) {
            return Err(shortfall);
        }
        for req in requirements {
            self.remove(req.item.id, req.quantity)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    fn scrap() -> Resource {
        Resource::new(1, "Scrap", 1)
    }

    fn plate() -> Resource {
        Resource::new(2, "Plate", 3)
    }

    fn occupied(bank: &ResourceBank) -> u32 {
        bank.iter()
            .map(|s| s.amount * s.resource.volume)
            .sum()
    }

    #[test]
    fn add_merges_into_existing_stack() {
        let mut bank = ResourceBank::unbounded();
        assert!(bank.add(&scrap(), 4).is_ok());
        assert!(bank.add(&scrap(), 6).is_ok());
        assert_eq!(bank.amount_of(scrap().id), 10);
        assert_eq!(bank.iter().count(), 1);
        assert_eq!(bank.volume_used(), 10);
    }

    #[test]
    fn third_add_exceeds_volume() {
        let mut bank = ResourceBank::with_capacity(2);
        assert!(bank.add(&scrap(), 1).is_ok());
        assert!(bank.add(&scrap(), 1).is_ok());
        let result = bank.add(&scrap(), 1);
        assert!(matches!(result, Err(EconomyError::VolumeExceeded { .. })));
        assert_eq!(bank.amount_of(scrap().id), 2);
    }

    #[test]
    fn add_zero_is_noop() {
        let mut bank = ResourceBank::with_capacity(0);
        assert!(bank.add(&scrap(), 0).is_ok());
        assert!(bank.is_empty());
    }

    #[test]
    fn remove_deletes_empty_stack() {
        let mut bank = ResourceBank::unbounded();
        assert!(bank.add(&plate(), 2).is_ok());
        assert!(bank.remove(plate().id, 2).is_ok());
        assert!(bank.is_empty());
        assert_eq!(bank.volume_used(), 0);
    }

    #[test]
    fn remove_too_much_fails() {
        let mut bank = ResourceBank::unbounded();
        assert!(bank.add(&plate(), 2).is_ok());
        let result = bank.remove(plate().id, 3);
        assert_eq!(
            result,
            Err(EconomyError::NotEnoughOfKind {
                resource: plate().id,
                requested: 3,
                held: 2
            })
        );
        assert_eq!(bank.volume_used(), 6);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut bank = ResourceBank::unbounded();
        assert!(bank.remove(scrap().id, 5).is_ok());
    }

    #[test]
    fn contains_all_sums_repeated_entries() {
        let mut bank = ResourceBank::unbounded();
        assert!(bank.add(&scrap(), 5).is_ok());
        let twice = [Quantified::new(scrap(), 3), Quantified::new(scrap(), 3)];
        assert!(!bank.contains_all(&twice));
        assert!(bank.contains_all(&[Quantified::new(scrap(), 5)]));
        assert!(bank.contains_all(&[]));
    }

    #[test]
    fn remove_all_is_all_or_nothing() {
        let mut bank = ResourceBank::unbounded();
        assert!(bank.add(&scrap(), 5).is_ok());
        assert!(bank.add(&plate(), 1).is_ok());
        let reqs = [Quantified::new(scrap(), 2), Quantified::new(plate(), 2)];
        assert!(matches!(
            bank.remove_all(&reqs),
            Err(EconomyError::LackingResource { .. })
        ));
        assert_eq!(bank.amount_of(scrap().id), 5);
        let reqs = [Quantified::new(scrap(), 2), Quantified::new(plate(), 1)];
        assert!(bank.remove_all(&reqs).is_ok());
        assert_eq!(bank.amount_of(scrap().id), 3);
        assert_eq!(bank.amount_of(plate().id), 0);
    }

    #[test]
    fn volume_matches_stacks_after_every_call() {
        let mut bank = ResourceBank::with_capacity(40);
        for step in 0_u32..24 {
            let resource = if step % 2 == 0 { scrap() } else { plate() };
            if step % 3 == 0 {
                let _ = bank.remove(resource.id, step % 5);
            } else {
                let _ = bank.add(&resource, step % 7);
            }
            assert_eq!(bank.volume_used(), occupied(&bank));
            assert!(bank.volume_used() <= bank.volume_capacity());
        }
    }
}
