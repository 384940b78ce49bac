//! The colony aggregate and its tick driver.
//!
//! A [`Colony`] owns every citizen, the power grid, and every bay. One call
//! to [`Colony::tick`] advances the whole colony by one tick in a fixed
//! order:
//!
//! 1. **Grid** -- every power source regenerates, then decays.
//! 2. **Production** -- each production bay tops up from the grid, then
//!    each of its stations thinks, in bay order.
//! 3. **Research** -- each research bay tops up from the grid, then
//!    advances its active item, in bay order.
//!
//! The tick is deterministic given the same starting colony.

use std::collections::BTreeMap;

use bayworks_bays::{
    BayError, Citizen, CitizenRegistry, PowerLink, PowerProducingBay, ProductionBay, ResearchBay,
    Roster, Thinkable, TickContext,
};
use bayworks_economy::{EnergyStore, GridTickReport, PowerGrid, ResourceBank};
use bayworks_types::{CitizenId, KnowledgeId, PowerSourceId, ResourceId};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::config::{
    CargoConfig, CitizenConfig, EnergyConfig, PowerBayConfig, ProductionBayConfig,
    ResearchBayConfig, SimulationConfig,
};
use crate::error::ColonyError;

/// Summary of a single tick's execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Energy the grid's sources regenerated and lost.
    pub grid: GridTickReport,
    /// Energy bays pulled from the grid.
    pub energy_received: u32,
    /// Worker-ticks of production labor.
    pub worker_ticks: u32,
    /// Production work steps skipped for lack of bay energy.
    pub stalled: u32,
    /// Output stored this tick, per resource.
    pub produced: BTreeMap<ResourceId, u32>,
    /// Research progress applied.
    pub research_progress: u32,
    /// Knowledge finalized this tick.
    pub completed_research: Vec<KnowledgeId>,
    /// Energy left on the grid after every bay drew.
    pub grid_available: u32,
}

/// Every citizen, bay, and power source in the simulation.
#[derive(Debug, Default)]
pub struct Colony {
    tick: u64,
    catalog: Catalog,
    citizens: CitizenRegistry,
    grid: PowerGrid,
    power_sources: BTreeMap<String, PowerSourceId>,
    production_bays: Vec<ProductionBay>,
    research_bays: Vec<ResearchBay>,
}

impl Colony {
    /// An empty colony using `catalog`.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    /// Build a colony from configuration.
    ///
    /// Sections are applied in order: catalog, power bays, production
    /// bays, research bays, citizens, then the starting craft and research
    /// requests (so staffed stations exist before work is queued).
    ///
    /// # Errors
    ///
    /// Returns [`ColonyError::UnknownReference`] or
    /// [`ColonyError::Duplicate`] for bad cross references, or the bay or
    /// economy error raised while placing a bay, citizen, or request.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, ColonyError> {
        let mut colony = Self::new(Catalog::from_config(config)?);

        for entry in &config.power {
            colony.build_power_bay(entry)?;
        }
        for entry in &config.production_bays {
            colony.build_production_bay(entry)?;
        }
        for entry in &config.research_bays {
            colony.build_research_bay(entry)?;
        }
        for entry in &config.citizens {
            colony.build_citizen(entry)?;
        }

        for (index, entry) in config.production_bays.iter().enumerate() {
            for craft in &entry.crafts {
                colony.craft(index, &craft.recipe, craft.station)?;
            }
        }
        for (index, entry) in config.research_bays.iter().enumerate() {
            if let Some(name) = &entry.research {
                colony.research(index, name)?;
            }
        }

        info!(
            citizens = colony.citizens.len(),
            power_sources = colony.grid.len(),
            production_bays = colony.production_bays.len(),
            research_bays = colony.research_bays.len(),
            "Colony built"
        );
        Ok(colony)
    }

    // -- accessors -----------------------------------------------------------

    /// Number of ticks executed so far.
    pub const fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Resolved catalog.
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Every citizen.
    pub const fn citizens(&self) -> &CitizenRegistry {
        &self.citizens
    }

    /// Every citizen, mutably.
    pub const fn citizens_mut(&mut self) -> &mut CitizenRegistry {
        &mut self.citizens
    }

    /// The power grid.
    pub const fn grid(&self) -> &PowerGrid {
        &self.grid
    }

    /// Grid id of the power bay registered under `name`.
    pub fn power_source(&self, name: &str) -> Option<PowerSourceId> {
        self.power_sources.get(name).copied()
    }

    /// Production bays in tick order.
    pub fn production_bays(&self) -> &[ProductionBay] {
        &self.production_bays
    }

    /// Research bays in tick order.
    pub fn research_bays(&self) -> &[ResearchBay] {
        &self.research_bays
    }

    /// The production bay at `index`, mutably.
    ///
    /// # Errors
    ///
    /// Returns [`ColonyError::BayNotFound`] past the end.
    pub fn production_bay_mut(&mut self, index: usize) -> Result<&mut ProductionBay, ColonyError> {
        self.production_bays
            .get_mut(index)
            .ok_or(ColonyError::BayNotFound {
                kind: "production",
                index,
            })
    }

    /// The research bay at `index`, mutably.
    ///
    /// # Errors
    ///
    /// Returns [`ColonyError::BayNotFound`] past the end.
    pub fn research_bay_mut(&mut self, index: usize) -> Result<&mut ResearchBay, ColonyError> {
        self.research_bays
            .get_mut(index)
            .ok_or(ColonyError::BayNotFound {
                kind: "research",
                index,
            })
    }

    // -- assembly ------------------------------------------------------------

    /// Register a power bay on the grid under its name.
    ///
    /// # Errors
    ///
    /// Returns [`ColonyError::Duplicate`] if the name is taken.
    pub fn add_power_bay(&mut self, bay: PowerProducingBay) -> Result<PowerSourceId, ColonyError> {
        let name = bay.name().to_owned();
        if self.power_sources.contains_key(&name) {
            return Err(ColonyError::Duplicate {
                kind: "power bay",
                name,
            });
        }
        let id = self.grid.register(Box::new(bay));
        debug!(%id, name = %name, "power bay registered");
        self.power_sources.insert(name, id);
        Ok(id)
    }

    /// Add a production bay. Returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`ColonyError::Duplicate`] if a bay with that name exists.
    pub fn add_production_bay(&mut self, bay: ProductionBay) -> Result<usize, ColonyError> {
        self.ensure_unique_bay(bay.name())?;
        self.production_bays.push(bay);
        Ok(self.production_bays.len().saturating_sub(1))
    }

    /// Add a research bay. Returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`ColonyError::Duplicate`] if a bay with that name exists.
    pub fn add_research_bay(&mut self, bay: ResearchBay) -> Result<usize, ColonyError> {
        self.ensure_unique_bay(bay.name())?;
        self.research_bays.push(bay);
        Ok(self.research_bays.len().saturating_sub(1))
    }

    /// Register a citizen.
    pub fn add_citizen(&mut self, citizen: Citizen) -> CitizenId {
        self.citizens.insert(citizen)
    }

    /// Start or queue the catalog recipe `recipe` on production bay `bay`.
    /// Returns the station index it landed on.
    ///
    /// # Errors
    ///
    /// Returns [`ColonyError::UnknownReference`] for an undefined recipe,
    /// [`ColonyError::BayNotFound`] for a bad bay index, or the bay's own
    /// craft error.
    pub fn craft(
        &mut self,
        bay: usize,
        recipe: &str,
        station: Option<usize>,
    ) -> Result<usize, ColonyError> {
        let recipe = self.catalog.recipe(recipe)?.clone();
        Ok(self.production_bay_mut(bay)?.craft(&recipe, station)?)
    }

    /// Start researching the catalog item `knowledge` in research bay `bay`.
    ///
    /// # Errors
    ///
    /// Returns [`ColonyError::UnknownReference`] for an undefined item,
    /// [`ColonyError::BayNotFound`] for a bad bay index, or the bay's own
    /// research error.
    pub fn research(&mut self, bay: usize, knowledge: &str) -> Result<(), ColonyError> {
        let item = self.catalog.knowledge(knowledge)?.clone();
        Ok(self.research_bay_mut(bay)?.research(&item)?)
    }

    // -- tick ----------------------------------------------------------------

    /// Advance the colony by one tick.
    ///
    /// # Errors
    ///
    /// Returns [`ColonyError::TickOverflow`] if the tick counter is
    /// exhausted. Failures inside a bay are logged by the bay and do not
    /// stop the tick.
    pub fn tick(&mut self) -> Result<TickSummary, ColonyError> {
        let tick = self.tick.checked_add(1).ok_or(ColonyError::TickOverflow)?;
        self.tick = tick;

        let mut summary = TickSummary {
            tick,
            grid: self.grid.think(),
            ..TickSummary::default()
        };

        let mut ctx = TickContext {
            citizens: &mut self.citizens,
            grid: &mut self.grid,
        };
        for bay in &mut self.production_bays {
            let report = bay.think(&mut ctx);
            summary.energy_received = summary.energy_received.saturating_add(report.energy_received);
            summary.worker_ticks = summary.worker_ticks.saturating_add(report.worker_ticks);
            summary.stalled = summary.stalled.saturating_add(report.stalled);
            for output in report.produced {
                let total = summary.produced.entry(output.item.id).or_insert(0);
                *total = total.saturating_add(output.quantity);
            }
        }
        for bay in &mut self.research_bays {
            let report = bay.think(&mut ctx);
            summary.energy_received = summary.energy_received.saturating_add(report.energy_received);
            summary.research_progress = summary.research_progress.saturating_add(report.progress);
            summary.completed_research.extend(report.completed);
        }
        summary.grid_available = self.grid.power_available();

        debug!(
            tick,
            worker_ticks = summary.worker_ticks,
            stalled = summary.stalled,
            research_progress = summary.research_progress,
            grid_available = summary.grid_available,
            "Tick complete"
        );
        Ok(summary)
    }

    // -- config helpers ------------------------------------------------------

    fn ensure_unique_bay(&self, name: &str) -> Result<(), ColonyError> {
        let taken = self.production_bays.iter().any(|b| b.name() == name)
            || self.research_bays.iter().any(|b| b.name() == name);
        if taken {
            return Err(ColonyError::Duplicate {
                kind: "bay",
                name: name.to_owned(),
            });
        }
        Ok(())
    }

    fn build_power_bay(&mut self, entry: &PowerBayConfig) -> Result<(), ColonyError> {
        let limit = entry.cell_limit.unwrap_or(entry.cells.len());
        let mut bay = PowerProducingBay::new(entry.name.as_str(), limit);
        for spec in &entry.cells {
            bay.add_cell(*spec)?;
        }
        self.add_power_bay(bay)?;
        Ok(())
    }

    fn power_link(&self, energy: &EnergyConfig) -> Result<PowerLink, ColonyError> {
        if energy.sources.is_empty() {
            return Ok(PowerLink::default());
        }
        let mut sources = Vec::with_capacity(energy.sources.len());
        for name in &energy.sources {
            let id = self
                .power_source(name)
                .ok_or_else(|| ColonyError::unknown("power bay", name))?;
            if sources.contains(&id) {
                return Err(ColonyError::Duplicate {
                    kind: "power source",
                    name: name.clone(),
                });
            }
            sources.push(id);
        }
        Ok(PowerLink::new(energy.max_draw, sources))
    }

    fn cargo(&self, cargo: &CargoConfig) -> Result<ResourceBank, ColonyError> {
        let mut bank = cargo
            .capacity
            .map_or_else(ResourceBank::unbounded, ResourceBank::with_capacity);
        for stock in self.catalog.amounts(&cargo.stock)? {
            bank.add(&stock.item, stock.quantity)?;
        }
        Ok(bank)
    }

    fn build_production_bay(&mut self, entry: &ProductionBayConfig) -> Result<(), ColonyError> {
        let mut bay = ProductionBay::new(
            entry.name.as_str(),
            entry.occupant_limit,
            energy_store(&entry.energy),
            self.cargo(&entry.cargo)?,
        )
        .with_station_limit(entry.station_limit.unwrap_or(entry.stations.len()))
        .with_power(self.power_link(&entry.energy)?);
        for name in &entry.recipes {
            bay = bay.supporting(self.catalog.recipe(name)?.id());
        }
        for seats in &entry.stations {
            bay.add_production_station(*seats)?;
        }
        self.add_production_bay(bay)?;
        Ok(())
    }

    fn build_research_bay(&mut self, entry: &ResearchBayConfig) -> Result<(), ColonyError> {
        let mut bay = ResearchBay::new(
            entry.name.as_str(),
            entry.occupant_limit,
            entry.researcher_limit,
            energy_store(&entry.energy),
            self.cargo(&entry.cargo)?,
        )
        .with_power(self.power_link(&entry.energy)?);
        for name in &entry.knowledge {
            bay = bay.supporting(self.catalog.knowledge(name)?.id);
        }
        self.add_research_bay(bay)?;
        Ok(())
    }

    fn build_citizen(&mut self, entry: &CitizenConfig) -> Result<(), ColonyError> {
        let mut citizen = Citizen::new(entry.name.as_str(), entry.max_energy);
        if let Some(energy) = entry.energy {
            citizen = citizen.with_energy(energy);
        }
        for skill in &entry.skills {
            citizen = citizen.with_skill(self.catalog.skill(skill)?.id);
        }
        let Some(workplace) = &entry.works_at else {
            self.add_citizen(citizen);
            return Ok(());
        };

        let production = self
            .production_bays
            .iter()
            .position(|b| b.name() == workplace.bay);
        let research = self
            .research_bays
            .iter()
            .position(|b| b.name() == workplace.bay);
        if production.is_none() && research.is_none() {
            return Err(ColonyError::unknown("bay", &workplace.bay));
        }

        // Check every seat before touching any roster or the registry.
        let id = citizen.id();
        if let Some(index) = production {
            let station = workplace.station.unwrap_or(0);
            let bay = self.production_bay_mut(index)?;
            let slot = bay.station(station).ok_or(BayError::StationNotFound(station))?;
            has_room(slot.workers())?;
            has_room(bay.occupants())?;
            bay.occupants_mut().add(id)?;
            bay.add_worker(id, station)?;
        } else if let Some(index) = research {
            let bay = self.research_bay_mut(index)?;
            has_room(bay.researchers())?;
            has_room(bay.occupants())?;
            bay.occupants_mut().add(id)?;
            bay.add_researcher(id)?;
        }
        self.add_citizen(citizen);
        Ok(())
    }
}

fn has_room(roster: &Roster) -> Result<(), BayError> {
    if roster.is_full() {
        return Err(BayError::RosterFull {
            limit: roster.limit(),
        });
    }
    Ok(())
}

fn energy_store(energy: &EnergyConfig) -> EnergyStore {
    EnergyStore::new(energy.pool.into(), energy.reserve.into())
}
