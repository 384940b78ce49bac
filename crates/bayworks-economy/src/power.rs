//! Power sources, cell clusters, and the grid that pools them.
//!
//! [`PowerSource`] is the capability every energy producer exposes to the
//! bays that draw from it. [`PowerCellCluster`] implements it over a
//! bounded list of [`RegeneratingBank`] cells, keeping `capacity` and
//! `available` as running totals so a tick never re-sums the cells. The
//! cells are private, so nothing can change a charge without the totals
//! following.
//!
//! [`PowerGrid`] owns every source in the colony in registration order and
//! serves first-fit draws across an ordered subset of them.

use std::collections::BTreeSet;

use bayworks_types::PowerSourceId;

use crate::error::EconomyError;
use crate::regenerating::{CellSpec, RegeneratingBank};

// ---------------------------------------------------------------------------
// PowerSource
// ---------------------------------------------------------------------------

/// Something that stores energy for the grid.
pub trait PowerSource: core::fmt::Debug {
    /// Total energy the source can hold.
    fn power_capacity(&self) -> u32;

    /// Energy currently held.
    fn power_available(&self) -> u32;

    /// Whether the source is charged to capacity.
    fn is_full(&self) -> bool {
        self.power_available() == self.power_capacity()
    }

    /// Whether the source holds no energy.
    fn is_empty(&self) -> bool {
        self.power_available() == 0
    }

    /// Remove exactly `amount` of energy.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::NotEnoughEnergy`] if less than `amount` is
    /// available. Nothing is drawn on failure.
    fn expend_energy(&mut self, amount: u32) -> Result<(), EconomyError>;

    /// Apply one tick of regeneration. Returns the energy actually gained.
    fn regen(&mut self) -> u32;

    /// Apply one tick of decay. Returns the energy actually lost.
    fn decay(&mut self) -> u32;
}

// ---------------------------------------------------------------------------
// PowerCellCluster
// ---------------------------------------------------------------------------

/// Read-only view of one cell in a [`PowerCellCluster`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellReading {
    /// Maximum charge of the cell.
    pub capacity: u32,
    /// Current charge of the cell.
    pub available: u32,
}

/// A capped collection of regenerating cells exposed as one power source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerCellCluster {
    cells: Vec<RegeneratingBank>,
    limit: usize,
    capacity: u32,
    available: u32,
}

impl PowerCellCluster {
    /// An empty cluster that can hold at most `limit` cells.
    pub const fn new(limit: usize) -> Self {
        Self {
            cells: Vec::new(),
            limit,
            capacity: 0,
            available: 0,
        }
    }

    /// A cluster pre-populated with `specs`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::CellLimitReached`] if `specs` has more
    /// entries than `limit`.
    pub fn with_cells(limit: usize, specs: &[CellSpec]) -> Result<Self, EconomyError> {
        let mut cluster = Self::new(limit);
        for spec in specs {
            cluster.add(*spec)?;
        }
        Ok(cluster)
    }

    /// Add a cell. Capacity and availability grow immediately by the
    /// cell's maximum and (clamped) starting charge.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::CellLimitReached`] if the cluster is full,
    /// or [`EconomyError::ArithmeticOverflow`] if the totals would not fit
    /// in a `u32`.
    pub fn add(&mut self, spec: CellSpec) -> Result<(), EconomyError> {
        if self.cells.len() >= self.limit {
            return Err(EconomyError::CellLimitReached { limit: self.limit });
        }
        let cell = RegeneratingBank::from(spec);
        let capacity = self.capacity.checked_add(cell.maximum()).ok_or(
            EconomyError::ArithmeticOverflow {
                context: "cluster capacity",
            },
        )?;
        let available = self.available.checked_add(cell.quantity()).ok_or(
            EconomyError::ArithmeticOverflow {
                context: "cluster availability",
            },
        )?;
        self.cells.push(cell);
        self.capacity = capacity;
        self.available = available;
        Ok(())
    }

    /// Number of cells in the cluster.
    pub const fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Maximum number of cells.
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Capacity and charge of the cell at `index`.
    pub fn cell(&self, index: usize) -> Option<CellReading> {
        self.cells.get(index).map(|cell| CellReading {
            capacity: cell.maximum(),
            available: cell.quantity(),
        })
    }

    /// Capacity and charge of every cell, in insertion order.
    pub fn readings(&self) -> impl Iterator<Item = CellReading> + '_ {
        self.cells.iter().map(|cell| CellReading {
            capacity: cell.maximum(),
            available: cell.quantity(),
        })
    }

    /// Whether at least `amount` is available across all cells.
    pub const fn has_enough_for(&self, amount: u32) -> bool {
        self.available >= amount
    }
}

impl PowerSource for PowerCellCluster {
    fn power_capacity(&self) -> u32 {
        self.capacity
    }

    fn power_available(&self) -> u32 {
        self.available
    }

    /// Drains cells in insertion order until `amount` is met.
    fn expend_energy(&mut self, amount: u32) -> Result<(), EconomyError> {
        if !self.has_enough_for(amount) {
            return Err(EconomyError::NotEnoughEnergy {
                requested: amount,
                available: self.available,
            });
        }
        let mut remaining = amount;
        for cell in &mut self.cells {
            if remaining == 0 {
                break;
            }
            let draw = remaining.min(cell.quantity());
            cell.decay_by(draw)?;
            remaining = remaining.saturating_sub(draw);
        }
        self.available = self.available.saturating_sub(amount);
        Ok(())
    }

    fn regen(&mut self) -> u32 {
        let mut gained: u32 = 0;
        for cell in &mut self.cells {
            gained = gained.saturating_add(cell.regen());
        }
        self.available = self.available.saturating_add(gained);
        gained
    }

    // Each cell loses at most what it holds, so an empty cell no longer
    // pulls the aggregate below the sum of its cells.
    fn decay(&mut self) -> u32 {
        let mut lost: u32 = 0;
        for cell in &mut self.cells {
            lost = lost.saturating_add(cell.decay_clamped());
        }
        self.available = self.available.saturating_sub(lost);
        lost
    }
}

// ---------------------------------------------------------------------------
// PowerGrid
// ---------------------------------------------------------------------------

/// Energy moved by one [`PowerGrid::think`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridTickReport {
    /// Energy gained across all sources.
    pub regenerated: u32,
    /// Energy lost across all sources.
    pub decayed: u32,
}

/// Every power source in the colony, in registration order.
#[derive(Debug, Default)]
pub struct PowerGrid {
    sources: Vec<(PowerSourceId, Box<dyn PowerSource>)>,
}

impl PowerGrid {
    /// An empty grid.
    pub const fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Register a source and return its new identifier.
    pub fn register(&mut self, source: Box<dyn PowerSource>) -> PowerSourceId {
        let id = PowerSourceId::new();
        self.sources.push((id, source));
        id
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether no sources are registered.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Identifiers of every source, in registration order.
    pub fn ids(&self) -> Vec<PowerSourceId> {
        self.sources.iter().map(|(id, _)| *id).collect()
    }

    /// Look up a source.
    pub fn get(&self, id: PowerSourceId) -> Option<&dyn PowerSource> {
        self.sources
            .iter()
            .find(|(sid, _)| *sid == id)
            .map(|(_, source)| source.as_ref())
    }

    fn get_mut(&mut self, id: PowerSourceId) -> Option<&mut Box<dyn PowerSource>> {
        self.sources
            .iter_mut()
            .find(|(sid, _)| *sid == id)
            .map(|(_, source)| source)
    }

    /// Energy available across every source.
    pub fn power_available(&self) -> u32 {
        self.sources
            .iter()
            .fold(0_u32, |acc, (_, s)| acc.saturating_add(s.power_available()))
    }

    /// Capacity across every source.
    pub fn power_capacity(&self) -> u32 {
        self.sources
            .iter()
            .fold(0_u32, |acc, (_, s)| acc.saturating_add(s.power_capacity()))
    }

    /// Energy available across the listed sources. A source listed more
    /// than once counts once.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::PowerSourceNotFound`] for an unknown id.
    pub fn power_available_in(&self, ids: &[PowerSourceId]) -> Result<u32, EconomyError> {
        let mut total: u32 = 0;
        for id in &unique(ids) {
            let source = self.get(*id).ok_or(EconomyError::PowerSourceNotFound(*id))?;
            total = total.saturating_add(source.power_available());
        }
        Ok(total)
    }

    /// The first listed source that alone holds at least `amount`.
    pub fn first_with_enough(&self, amount: u32, ids: &[PowerSourceId]) -> Option<PowerSourceId> {
        ids.iter().copied().find(|id| {
            self.get(*id)
                .is_some_and(|source| source.power_available() >= amount)
        })
    }

    /// Draw exactly `amount` from the listed sources, first-fit in list
    /// order. Repeated ids are tried once, at their first position.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::NotEnoughEnergy`] if the listed sources hold
    /// less than `amount` combined (nothing is drawn), or
    /// [`EconomyError::PowerSourceNotFound`] for an unknown id.
    pub fn draw_from_many(
        &mut self,
        amount: u32,
        ids: &[PowerSourceId],
    ) -> Result<u32, EconomyError> {
        let ids = unique(ids);
        let available = self.power_available_in(&ids)?;
        if available < amount {
            return Err(EconomyError::NotEnoughEnergy {
                requested: amount,
                available,
            });
        }
        let mut remaining = amount;
        for id in &ids {
            if remaining == 0 {
                break;
            }
            let source = self
                .get_mut(*id)
                .ok_or(EconomyError::PowerSourceNotFound(*id))?;
            let draw = remaining.min(source.power_available());
            source.expend_energy(draw)?;
            remaining = remaining.saturating_sub(draw);
        }
        if remaining > 0 {
            return Err(EconomyError::NotEnoughEnergy {
                requested: amount,
                available: amount.saturating_sub(remaining),
            });
        }
        Ok(amount)
    }

    /// Regenerate then decay every source once.
    pub fn think(&mut self) -> GridTickReport {
        let mut report = GridTickReport::default();
        for (_, source) in &mut self.sources {
            report.regenerated = report.regenerated.saturating_add(source.regen());
            report.decayed = report.decayed.saturating_add(source.decay());
        }
        report
    }
}

/// `ids` with repeats removed, first occurrence kept.
fn unique(ids: &[PowerSourceId]) -> Vec<PowerSourceId> {
    let mut seen = BTreeSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
