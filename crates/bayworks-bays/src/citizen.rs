//! Citizens and the registry that owns them.
//!
//! Bays and stations never hold a [`Citizen`] directly; they hold its
//! [`CitizenId`] and look it up in the colony's [`CitizenRegistry`] during
//! a tick. One citizen therefore has exactly one energy bank no matter
//! how many rosters list them.
//!
//! # Fatigue thresholds
//!
//! - **Needs rest**: energy below 8% of maximum
//! - **Rested**: energy above 45% of maximum
//!
//! Between the two a citizen keeps doing whatever they were doing.

use std::collections::{BTreeMap, BTreeSet};

use bayworks_economy::{Bank, EconomyError};
use bayworks_types::{CitizenId, SkillId};

/// Percentage of maximum energy below which a citizen must stop working.
pub const NEEDS_REST_PERCENT: u64 = 8;

/// Percentage of maximum energy above which a citizen may start working.
pub const RESTED_PERCENT: u64 = 45;

/// A colonist who can staff stations and research.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citizen {
    id: CitizenId,
    name: String,
    energy: Bank,
    skills: BTreeSet<SkillId>,
}

impl Citizen {
    /// A citizen with full energy and no skills.
    pub fn new(name: impl Into<String>, max_energy: u32) -> Self {
        Self {
            id: CitizenId::new(),
            name: name.into(),
            energy: Bank::new(max_energy, max_energy),
            skills: BTreeSet::new(),
        }
    }

    /// Set the current energy, clamped to the maximum.
    #[must_use]
    pub const fn with_energy(mut self, energy: u32) -> Self {
        self.energy.set_quantity(energy);
        self
    }

    /// Grant a skill at construction.
    #[must_use]
    pub fn with_skill(mut self, skill: SkillId) -> Self {
        self.skills.insert(skill);
        self
    }

    /// Unique identifier.
    pub const fn id(&self) -> CitizenId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current and maximum energy.
    pub const fn energy(&self) -> &Bank {
        &self.energy
    }

    /// Skills held.
    pub const fn skills(&self) -> &BTreeSet<SkillId> {
        &self.skills
    }

    /// Whether the citizen holds `skill`.
    pub fn has_skill(&self, skill: SkillId) -> bool {
        self.skills.contains(&skill)
    }

    /// Add a skill. Returns `false` if it was already held.
    pub fn grant_skill(&mut self, skill: SkillId) -> bool {
        self.skills.insert(skill)
    }

    /// Whether the citizen has at least `amount` energy to spend.
    pub const fn can_afford(&self, amount: u32) -> bool {
        self.energy.has_enough_for(amount)
    }

    /// Spend exactly `amount` energy.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::NotEnoughEnergy`] if the citizen holds less
    /// than `amount`.
    pub fn spend_energy(&mut self, amount: u32) -> Result<(), EconomyError> {
        self.energy.take(amount)
    }

    /// Recover up to `amount` energy. Returns the energy actually regained.
    pub fn rest(&mut self, amount: u32) -> u32 {
        self.energy.fill(amount)
    }

    /// Energy has dropped below the rest threshold.
    pub fn needs_rest(&self) -> bool {
        u64::from(self.energy.quantity()).saturating_mul(100)
            < u64::from(self.energy.maximum()).saturating_mul(NEEDS_REST_PERCENT)
    }

    /// Energy is above the rested threshold.
    pub fn is_rested(&self) -> bool {
        u64::from(self.energy.quantity()).saturating_mul(100)
            > u64::from(self.energy.maximum()).saturating_mul(RESTED_PERCENT)
    }
}

/// Every citizen in the colony, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct CitizenRegistry {
    citizens: BTreeMap<CitizenId, Citizen>,
}

impl CitizenRegistry {
    /// An empty registry.
    pub const fn new() -> Self {
        Self {
            citizens: BTreeMap::new(),
        }
    }

    /// Register a citizen and return their id.
    pub fn insert(&mut self, citizen: Citizen) -> CitizenId {
        let id = citizen.id();
        self.citizens.insert(id, citizen);
        id
    }

    /// Look up a citizen.
    pub fn get(&self, id: CitizenId) -> Option<&Citizen> {
        self.citizens.get(&id)
    }

    /// Look up a citizen for mutation.
    pub fn get_mut(&mut self, id: CitizenId) -> Option<&mut Citizen> {
        self.citizens.get_mut(&id)
    }

    /// Remove a citizen from the colony.
    pub fn remove(&mut self, id: CitizenId) -> Option<Citizen> {
        self.citizens.remove(&id)
    }

    /// Whether the id is registered.
    pub fn contains(&self, id: CitizenId) -> bool {
        self.citizens.contains_key(&id)
    }

    /// Number of registered citizens.
    pub fn len(&self) -> usize {
        self.citizens.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.citizens.is_empty()
    }

    /// Citizens in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Citizen> {
        self.citizens.values()
    }

    /// Citizens in id order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Citizen> {
        self.citizens.values_mut()
    }
}
