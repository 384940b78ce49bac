//! Research bays: one knowledge item at a time.
//!
//! A [`ResearchBay`] works on at most one [`Knowledge`] item. Starting an
//! item debits its resource bill up front. Each tick the bay:
//!
//! 1. tops its pool and reserve up from the grid,
//! 2. finalizes the active item if it is complete, moving it into the
//!    repository and granting its skill to every qualified researcher,
//! 3. otherwise pays the item's station cost, and
//! 4. lets each qualified researcher who is not recovering convert their
//!    own energy into progress.
//!
//! A researcher who drops below the rest threshold is marked recovering
//! and stays out of work until they are rested again.

use std::collections::BTreeSet;

use bayworks_economy::{EnergyStore, Knowledge, PowerGrid, ResourceBank};
use bayworks_types::{CitizenId, KnowledgeId};
use tracing::{debug, info, warn};

use crate::citizen::{Citizen, CitizenRegistry};
use crate::error::BayError;
use crate::occupancy::Roster;
use crate::powerable::{PowerLink, Powerable};
use crate::thinkable::{Thinkable, TickContext};

/// What one research bay tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResearchTickReport {
    /// Energy pulled from the grid into pool and reserve.
    pub energy_received: u32,
    /// Progress applied to the active item.
    pub progress: u32,
    /// Whether the station cost could not be paid.
    pub stalled: bool,
    /// Item moved into the repository this tick.
    pub completed: Option<KnowledgeId>,
}

/// A bay that turns researcher labor into unlocked skills.
#[derive(Debug, Clone)]
pub struct ResearchBay {
    name: String,
    occupants: Roster,
    researchers: Roster,
    energy: EnergyStore,
    resources: ResourceBank,
    supported: BTreeSet<KnowledgeId>,
    repository: Vec<Knowledge>,
    active: Option<Knowledge>,
    recovering: BTreeSet<CitizenId>,
    power: PowerLink,
}

impl ResearchBay {
    /// A bay with nothing supported and no grid link.
    pub fn new(
        name: impl Into<String>,
        occupant_limit: usize,
        researcher_limit: usize,
        energy: EnergyStore,
        resources: ResourceBank,
    ) -> Self {
        Self {
            name: name.into(),
            occupants: Roster::new(occupant_limit),
            researchers: Roster::new(researcher_limit),
            energy,
            resources,
            supported: BTreeSet::new(),
            repository: Vec::new(),
            active: None,
            recovering: BTreeSet::new(),
            power: PowerLink::default(),
        }
    }

    /// Allow `knowledge` to be researched here.
    #[must_use]
    pub fn supporting(mut self, knowledge: KnowledgeId) -> Self {
        self.supported.insert(knowledge);
        self
    }

    /// Connect the bay to the grid.
    #[must_use]
    pub fn with_power(mut self, power: PowerLink) -> Self {
        self.power = power;
        self
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Citizens inside the bay.
    pub const fn occupants(&self) -> &Roster {
        &self.occupants
    }

    /// Citizens inside the bay, mutably.
    pub const fn occupants_mut(&mut self) -> &mut Roster {
        &mut self.occupants
    }

    /// Researchers assigned to the bay, in roster order.
    pub const fn researchers(&self) -> &Roster {
        &self.researchers
    }

    /// Pool and reserve.
    pub const fn energy(&self) -> &EnergyStore {
        &self.energy
    }

    /// Resource storage research bills are paid from.
    pub const fn resources(&self) -> &ResourceBank {
        &self.resources
    }

    /// Resource storage, mutably.
    pub const fn resources_mut(&mut self) -> &mut ResourceBank {
        &mut self.resources
    }

    /// The item being researched.
    pub const fn active(&self) -> Option<&Knowledge> {
        self.active.as_ref()
    }

    /// Completed items, oldest first.
    pub fn repository(&self) -> &[Knowledge] {
        &self.repository
    }

    /// Whether `knowledge` is in the repository.
    pub fn is_researched(&self, knowledge: KnowledgeId) -> bool {
        self.repository.iter().any(|k| k.id == knowledge)
    }

    /// Whether `knowledge` is in the supported set.
    pub fn can_research(&self, knowledge: KnowledgeId) -> bool {
        self.supported.contains(&knowledge)
    }

    /// Whether `citizen` is on the researcher roster.
    pub fn has_researcher(&self, citizen: CitizenId) -> bool {
        self.researchers.contains(citizen)
    }

    /// Whether `citizen` holds every skill the active item requires. False
    /// when nothing is active.
    pub fn is_qualified(&self, citizen: &Citizen) -> bool {
        self.active
            .as_ref()
            .is_some_and(|item| item.meets_requirements(citizen.skills()))
    }

    /// Whether `citizen` is sitting out until rested.
    pub fn is_recovering(&self, citizen: CitizenId) -> bool {
        self.recovering.contains(&citizen)
    }

    /// Start researching a fresh copy of `knowledge`, paying its resource
    /// bill now.
    ///
    /// # Errors
    ///
    /// Returns [`BayError::ResearchInProgress`] if an item is active,
    /// [`BayError::UnsupportedKnowledge`] if the bay does not support it,
    /// [`BayError::AlreadyResearched`] if it is in the repository, or
    /// [`BayError::Economy`] if the resource bill cannot be paid. Nothing
    /// is debited on failure.
    pub fn research(&mut self, knowledge: &Knowledge) -> Result<(), BayError> {
        if let Some(active) = &self.active {
            return Err(BayError::ResearchInProgress(active.id));
        }
        if !self.can_research(knowledge.id) {
            return Err(BayError::UnsupportedKnowledge(knowledge.id));
        }
        if self.is_researched(knowledge.id) {
            return Err(BayError::AlreadyResearched(knowledge.id));
        }
        self.resources.remove_all(&knowledge.resource_requirements)?;
        info!(bay = %self.name, knowledge = %knowledge.id, name = %knowledge.name, "research started");
        self.active = Some(knowledge.instantiate());
        Ok(())
    }

    /// Abandon the active item. Its resource bill is not refunded.
    pub fn cancel(&mut self) -> Option<Knowledge> {
        let cancelled = self.active.take();
        if let Some(item) = &cancelled {
            info!(bay = %self.name, knowledge = %item.id, "research cancelled");
        }
        cancelled
    }

    /// Assign a researcher.
    ///
    /// # Errors
    ///
    /// Returns [`BayError::RosterFull`] at the researcher limit or
    /// [`BayError::AlreadyPresent`] for a duplicate.
    pub fn add_researcher(&mut self, citizen: CitizenId) -> Result<(), BayError> {
        self.researchers.add(citizen)
    }

    /// Unassign a researcher.
    ///
    /// # Errors
    ///
    /// Returns [`BayError::NotPresent`] if they are not assigned here.
    pub fn remove_researcher(&mut self, citizen: CitizenId) -> Result<(), BayError> {
        self.researchers.remove(citizen)?;
        self.recovering.remove(&citizen);
        Ok(())
    }

    /// Unassign the researcher at roster position `index`.
    ///
    /// # Errors
    ///
    /// Returns [`BayError::RosterIndexOutOfRange`] past the end.
    pub fn remove_researcher_at(&mut self, index: usize) -> Result<CitizenId, BayError> {
        let citizen = self.researchers.remove_at(index)?;
        self.recovering.remove(&citizen);
        Ok(citizen)
    }

    /// Top pool and then reserve up from the grid. Returns the energy
    /// stored.
    ///
    /// # Errors
    ///
    /// Returns [`BayError::Economy`] if a linked source is missing from
    /// the grid.
    pub fn regenerate_power(&mut self, grid: &mut PowerGrid) -> Result<u32, BayError> {
        let wanted = self
            .energy
            .headroom()
            .min(self.power.max_draw())
            .min(self.power_available(grid)?);
        let drawn = self.draw_energy(grid, wanted)?;
        Ok(self.energy.top_up(drawn))
    }

    fn finalize(&mut self, citizens: &mut CitizenRegistry) -> Option<KnowledgeId> {
        let item = self.active.take()?;
        for researcher in self.researchers.iter() {
            let Some(citizen) = citizens.get_mut(*researcher) else {
                continue;
            };
            if item.meets_requirements(citizen.skills()) && citizen.grant_skill(item.unlocks) {
                debug!(%researcher, skill = %item.unlocks, "skill granted");
            }
        }
        info!(bay = %self.name, knowledge = %item.id, "research completed");
        let id = item.id;
        self.repository.push(item);
        Some(id)
    }

    fn update_recovering(&mut self, citizens: &CitizenRegistry) {
        for researcher in self.researchers.iter() {
            let Some(citizen) = citizens.get(*researcher) else {
                continue;
            };
            if citizen.needs_rest() {
                self.recovering.insert(*researcher);
            } else if citizen.is_rested() {
                self.recovering.remove(researcher);
            }
        }
    }
}

impl Powerable for ResearchBay {
    fn power_link(&self) -> &PowerLink {
        &self.power
    }

    fn power_link_mut(&mut self) -> &mut PowerLink {
        &mut self.power
    }
}

impl Thinkable for ResearchBay {
    type Report = ResearchTickReport;

    fn think(&mut self, ctx: &mut TickContext<'_>) -> ResearchTickReport {
        let mut report = ResearchTickReport::default();
        match self.regenerate_power(ctx.grid) {
            Ok(received) => report.energy_received = received,
            Err(err) => warn!(bay = %self.name, error = %err, "grid top-up failed"),
        }
        let Some(active) = &self.active else {
            return report;
        };
        if active.is_complete() {
            report.completed = self.finalize(ctx.citizens);
            return report;
        }
        if let Err(err) = self.energy.draw(active.station_cost) {
            debug!(bay = %self.name, error = %err, "research station energy short");
            report.stalled = true;
            return report;
        }
        self.update_recovering(ctx.citizens);
        let Some(active) = self.active.as_mut() else {
            return report;
        };
        for researcher in self.researchers.iter() {
            if self.recovering.contains(researcher) {
                continue;
            }
            let Some(citizen) = ctx.citizens.get_mut(*researcher) else {
                continue;
            };
            if !active.meets_requirements(citizen.skills())
                || citizen.spend_energy(active.worker_cost).is_err()
            {
                continue;
            }
            report.progress = report.progress.saturating_add(active.process(1));
        }
        report
    }
}
