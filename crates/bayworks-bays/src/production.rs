//! Production bays: stations sharing one pool, reserve, and cargo hold.
//!
//! A [`ProductionBay`] owns its [`EnergyStore`] and [`ResourceBank`] and
//! lends both to each [`ProductionBaySlot`] in turn while it thinks. A
//! draw made by station 0 is therefore visible to station 1 in the same
//! tick. Before the stations run, the bay tops its pool and reserve up
//! from the grid through its [`PowerLink`].

use std::collections::BTreeSet;

use bayworks_economy::{EnergyStore, PowerGrid, ProductionRecipe, ResourceBank};
use bayworks_types::{CitizenId, Quantified, RecipeId, Resource};
use tracing::{debug, info, warn};

use crate::error::BayError;
use crate::occupancy::Roster;
use crate::powerable::{PowerLink, Powerable};
use crate::slot::{ProductionBaySlot, SlotContext};
use crate::thinkable::{Thinkable, TickContext};

/// What one production bay tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductionTickReport {
    /// Energy pulled from the grid into pool and reserve.
    pub energy_received: u32,
    /// Worker-ticks of labor applied across all stations.
    pub worker_ticks: u32,
    /// Work steps skipped for lack of station energy.
    pub stalled: u32,
    /// Outputs stored by recipes that finished this tick.
    pub produced: Vec<Quantified<Resource>>,
}

/// A bay that turns resources and labor into goods.
#[derive(Debug, Clone)]
pub struct ProductionBay {
    name: String,
    occupants: Roster,
    energy: EnergyStore,
    resources: ResourceBank,
    supported: BTreeSet<RecipeId>,
    stations: Vec<ProductionBaySlot>,
    station_limit: usize,
    power: PowerLink,
}

impl ProductionBay {
    /// A bay with no stations, no supported recipes, and no grid link.
    pub fn new(
        name: impl Into<String>,
        occupant_limit: usize,
        energy: EnergyStore,
        resources: ResourceBank,
    ) -> Self {
        Self {
            name: name.into(),
            occupants: Roster::new(occupant_limit),
            energy,
            resources,
            supported: BTreeSet::new(),
            stations: Vec::new(),
            station_limit: 1,
            power: PowerLink::default(),
        }
    }

    /// Allow `recipe` to be crafted here.
    #[must_use]
    pub fn supporting(mut self, recipe: RecipeId) -> Self {
        self.supported.insert(recipe);
        self
    }

    /// Cap the number of production stations.
    #[must_use]
    pub const fn with_station_limit(mut self, limit: usize) -> Self {
        self.station_limit = limit;
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

    /// Pool and reserve.
    pub const fn energy(&self) -> &EnergyStore {
        &self.energy
    }

    /// Cargo hold shared by every station.
    pub const fn resources(&self) -> &ResourceBank {
        &self.resources
    }

    /// Cargo hold, mutably, for stocking and unloading.
    pub const fn resources_mut(&mut self) -> &mut ResourceBank {
        &mut self.resources
    }

    /// Whether `recipe` may be crafted here.
    pub fn supports(&self, recipe: RecipeId) -> bool {
        self.supported.contains(&recipe)
    }

    /// Maximum number of stations.
    pub const fn station_limit(&self) -> usize {
        self.station_limit
    }

    /// Stations in index order.
    pub fn stations(&self) -> &[ProductionBaySlot] {
        &self.stations
    }

    /// The station at `index`.
    pub fn station(&self, index: usize) -> Option<&ProductionBaySlot> {
        self.stations.get(index)
    }

    fn station_mut(&mut self, index: usize) -> Result<&mut ProductionBaySlot, BayError> {
        self.stations
            .get_mut(index)
            .ok_or(BayError::StationNotFound(index))
    }

    /// Build a station with `seats` worker seats. Returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`BayError::StationLimitReached`] at the station limit.
    pub fn add_production_station(&mut self, seats: usize) -> Result<usize, BayError> {
        if self.stations.len() >= self.station_limit {
            return Err(BayError::StationLimitReached {
                limit: self.station_limit,
            });
        }
        self.stations.push(ProductionBaySlot::new(seats));
        let index = self.stations.len().saturating_sub(1);
        debug!(bay = %self.name, station = index, seats, "production station added");
        Ok(index)
    }

    /// Tear down the station at `index`, returning it. Later stations shift
    /// down by one.
    ///
    /// # Errors
    ///
    /// Returns [`BayError::StationNotFound`] past the end.
    pub fn destroy_production_station(
        &mut self,
        index: usize,
    ) -> Result<ProductionBaySlot, BayError> {
        if index >= self.stations.len() {
            return Err(BayError::StationNotFound(index));
        }
        Ok(self.stations.remove(index))
    }

    /// The station to give new work to: the first idle one, else the one
    /// with the shortest lineup. Ties go to the lowest index.
    pub fn first_available_station(&self) -> Option<usize> {
        self.stations
            .iter()
            .position(ProductionBaySlot::is_idle)
            .or_else(|| {
                self.stations
                    .iter()
                    .enumerate()
                    .min_by_key(|(index, slot)| (slot.lineup_len(), *index))
                    .map(|(index, _)| index)
            })
    }

    /// Start or queue a fresh copy of `recipe` on `station`, or on
    /// [`first_available_station`] when `None`. Returns the station index.
    ///
    /// # Errors
    ///
    /// Returns [`BayError::UnsupportedRecipe`] if the bay does not support
    /// the recipe, [`BayError::StationNotFound`] for a bad index, or
    /// [`BayError::NoStationAvailable`] if the bay has no stations.
    ///
    /// [`first_available_station`]: Self::first_available_station
    pub fn craft(
        &mut self,
        recipe: &ProductionRecipe,
        station: Option<usize>,
    ) -> Result<usize, BayError> {
        if !self.supports(recipe.id()) {
            return Err(BayError::UnsupportedRecipe(recipe.id()));
        }
        let index = match station {
            Some(index) => index,
            None => self
                .first_available_station()
                .ok_or(BayError::NoStationAvailable)?,
        };
        self.station_mut(index)?.enqueue(recipe);
        info!(bay = %self.name, recipe = %recipe.id(), station = index, "craft requested");
        Ok(index)
    }

    /// The station `citizen` is seated at, if any.
    pub fn station_of(&self, citizen: CitizenId) -> Option<usize> {
        self.stations
            .iter()
            .position(|slot| slot.workers().contains(citizen))
    }

    /// Seat `citizen` at `station`. A citizen holds at most one seat in the
    /// bay; use [`transfer_worker`](Self::transfer_worker) to move them.
    ///
    /// # Errors
    ///
    /// Returns [`BayError::StationNotFound`] for a bad index,
    /// [`BayError::AlreadyPresent`] if the citizen is seated at any station
    /// of this bay, or the station's roster error.
    pub fn add_worker(&mut self, citizen: CitizenId, station: usize) -> Result<(), BayError> {
        if station >= self.stations.len() {
            return Err(BayError::StationNotFound(station));
        }
        if self.station_of(citizen).is_some() {
            return Err(BayError::AlreadyPresent(citizen));
        }
        self.station_mut(station)?.add_worker(citizen)
    }

    /// Unseat `citizen` from `station`.
    ///
    /// # Errors
    ///
    /// Returns [`BayError::StationNotFound`] for a bad index or
    /// [`BayError::NotPresent`] if the citizen is not seated there.
    pub fn remove_worker(&mut self, citizen: CitizenId, station: usize) -> Result<(), BayError> {
        self.station_mut(station)?.remove_worker(citizen)
    }

    /// Move `citizen` from one station to another. Nothing changes unless
    /// both ends succeed.
    ///
    /// # Errors
    ///
    /// Returns [`BayError::StationNotFound`] for a bad index,
    /// [`BayError::NotPresent`] if the citizen is not at `from`, or
    /// [`BayError::RosterFull`] / [`BayError::AlreadyPresent`] from `to`.
    pub fn transfer_worker(
        &mut self,
        citizen: CitizenId,
        from: usize,
        to: usize,
    ) -> Result<(), BayError> {
        let source = self
            .stations
            .get(from)
            .ok_or(BayError::StationNotFound(from))?;
        if !source.workers().contains(citizen) {
            return Err(BayError::NotPresent(citizen));
        }
        let target = self.stations.get(to).ok_or(BayError::StationNotFound(to))?;
        if target.workers().contains(citizen) {
            return Err(BayError::AlreadyPresent(citizen));
        }
        if target.workers().is_full() {
            return Err(BayError::RosterFull {
                limit: target.seats(),
            });
        }
        self.station_mut(from)?.remove_worker(citizen)?;
        self.station_mut(to)?.add_worker(citizen)
    }

    /// Top pool and then reserve up from the grid, bounded by what they
    /// can hold, the link's `max_draw`, and what the grid can give.
    /// Returns the energy stored.
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
}

impl Powerable for ProductionBay {
    fn power_link(&self) -> &PowerLink {
        &self.power
    }

    fn power_link_mut(&mut self) -> &mut PowerLink {
        &mut self.power
    }
}

impl Thinkable for ProductionBay {
    type Report = ProductionTickReport;

    fn think(&mut self, ctx: &mut TickContext<'_>) -> ProductionTickReport {
        let mut report = ProductionTickReport::default();
        match self.regenerate_power(ctx.grid) {
            Ok(received) => report.energy_received = received,
            Err(err) => warn!(bay = %self.name, error = %err, "grid top-up failed"),
        }
        for station in &mut self.stations {
            let mut slot_ctx = SlotContext {
                energy: &mut self.energy,
                resources: &mut self.resources,
                citizens: &mut *ctx.citizens,
            };
            let slot_report = station.think(&mut slot_ctx);
            report.worker_ticks = report.worker_ticks.saturating_add(slot_report.worker_ticks);
            report.stalled = report.stalled.saturating_add(slot_report.stalled);
            if let Some(produced) = slot_report.completed {
                report.produced.push(produced);
            }
        }
        report
    }
}
