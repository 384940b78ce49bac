//! Researchable knowledge items.
//!
//! A [`Knowledge`] item is what a research bay works on: a single progress
//! counter fed by researcher labor, a resource bill paid up front, and the
//! skill granted to qualified researchers when it completes.

use std::collections::BTreeSet;

use bayworks_types::{KnowledgeId, Quantified, Resource, SkillId};

use crate::bank::Bank;

/// A unit of research that unlocks a skill when complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Knowledge {
    /// Catalog identifier.
    pub id: KnowledgeId,
    /// Display name.
    pub name: String,
    /// Skills a researcher must hold to contribute.
    pub required_skills: BTreeSet<SkillId>,
    /// Resources debited when research starts.
    pub resource_requirements: Vec<Quantified<Resource>>,
    /// Researcher energy spent, and progress gained, per researcher-tick.
    pub worker_cost: u32,
    /// Station energy spent per tick while the item is active.
    pub station_cost: u32,
    /// Skill granted on completion.
    pub unlocks: SkillId,
    progress: Bank,
}

impl Knowledge {
    /// An item needing `total_work` units of labor that unlocks `unlocks`.
    /// Costs default to one worker unit and zero station energy.
    pub fn new(
        id: impl Into<KnowledgeId>,
        name: impl Into<String>,
        total_work: u32,
        unlocks: SkillId,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            required_skills: BTreeSet::new(),
            resource_requirements: Vec::new(),
            worker_cost: 1,
            station_cost: 0,
            unlocks,
            progress: Bank::with_maximum(total_work),
        }
    }

    /// Set per-tick worker and station costs.
    #[must_use]
    pub const fn with_costs(mut self, worker_cost: u32, station_cost: u32) -> Self {
        self.worker_cost = worker_cost;
        self.station_cost = station_cost;
        self
    }

    /// Require researchers to hold `skill`.
    #[must_use]
    pub fn requiring_skill(mut self, skill: SkillId) -> Self {
        self.required_skills.insert(skill);
        self
    }

    /// Debit `quantity` of `resource` when research starts.
    #[must_use]
    pub fn requiring_resource(mut self, resource: Resource, quantity: u32) -> Self {
        self.resource_requirements
            .push(Quantified::new(resource, quantity));
        self
    }

    /// Labor applied so far against the total required.
    pub const fn progress(&self) -> &Bank {
        &self.progress
    }

    /// Whether all required labor has been applied.
    pub const fn is_complete(&self) -> bool {
        self.progress.is_full()
    }

    /// Apply `researcher_count` researcher-ticks. Returns progress gained.
    pub fn process(&mut self, researcher_count: u32) -> u32 {
        self.progress
            .fill(self.worker_cost.saturating_mul(researcher_count))
    }

    /// Whether `skills` covers every requirement.
    pub fn meets_requirements(&self, skills: &BTreeSet<SkillId>) -> bool {
        self.required_skills.is_subset(skills)
    }

    /// A copy of this item with no progress.
    #[must_use]
    pub fn instantiate(&self) -> Self {
        Self {
            progress: Bank::with_maximum(self.progress.maximum()),
            ..self.clone()
        }
    }
}
