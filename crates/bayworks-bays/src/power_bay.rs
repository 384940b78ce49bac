//! Power-producing bays.
//!
//! A [`PowerProducingBay`] is a named bay wrapped around a
//! [`PowerCellCluster`]. It is a [`PowerSource`] by delegation, so the
//! colony registers it on the [`PowerGrid`](bayworks_economy::PowerGrid)
//! like any other source.

use bayworks_economy::{
    CellReading, CellSpec, EconomyError, GridTickReport, PowerCellCluster, PowerSource,
};

use crate::thinkable::{Thinkable, TickContext};

/// A bay whose only job is to store and regenerate energy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerProducingBay {
    name: String,
    cells: PowerCellCluster,
}

impl PowerProducingBay {
    /// A bay with room for `cell_limit` cells and none installed.
    pub fn new(name: impl Into<String>, cell_limit: usize) -> Self {
        Self {
            name: name.into(),
            cells: PowerCellCluster::new(cell_limit),
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Install a cell.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::CellLimitReached`] when every cell slot is
    /// taken.
    pub fn add_cell(&mut self, spec: CellSpec) -> Result<(), EconomyError> {
        self.cells.add(spec)
    }

    /// Number of installed cells.
    pub const fn cell_count(&self) -> usize {
        self.cells.cell_count()
    }

    /// Capacity and charge of the cell at `index`.
    pub fn cell(&self, index: usize) -> Option<CellReading> {
        self.cells.cell(index)
    }
}

impl PowerSource for PowerProducingBay {
    fn power_capacity(&self) -> u32 {
        self.cells.power_capacity()
    }

    fn power_available(&self) -> u32 {
        self.cells.power_available()
    }

    fn expend_energy(&mut self, amount: u32) -> Result<(), EconomyError> {
        self.cells.expend_energy(amount)
    }

    fn regen(&mut self) -> u32 {
        self.cells.regen()
    }

    fn decay(&mut self) -> u32 {
        self.cells.decay()
    }
}

impl Thinkable for PowerProducingBay {
    type Report = GridTickReport;

    fn think(&mut self, _ctx: &mut TickContext<'_>) -> GridTickReport {
        GridTickReport {
            regenerated: self.regen(),
            decayed: self.decay(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bayworks_economy::PowerGrid;

    use super::*;
    use crate::citizen::CitizenRegistry;

    fn bay(count: usize, spec: CellSpec) -> PowerProducingBay {
        let mut bay = PowerProducingBay::new("Reactor", count);
        for _ in 0..count {
            bay.add_cell(spec).unwrap();
        }
        bay
    }

    fn think(bay: &mut PowerProducingBay) -> GridTickReport {
        let mut citizens = CitizenRegistry::new();
        let mut grid = PowerGrid::new();
        let mut ctx = TickContext {
            citizens: &mut citizens,
            grid: &mut grid,
        };
        bay.think(&mut ctx)
    }

    #[test]
    fn expend_empties_cells_in_order() {
        let mut bay = bay(10, CellSpec::new(1000, 1000, 0, 10));
        bay.expend_energy(4300).unwrap();
        for index in 0..4 {
            assert_eq!(bay.cell(index).map(|c| c.available), Some(0));
        }
        assert_eq!(bay.cell(4).map(|c| c.available), Some(700));
    }

    #[test]
    fn think_regens_then_decays() {
        let mut bay = bay(5, CellSpec::new(1000, 1000, 0, 10));
        bay.expend_energy(2500).unwrap();
        let report = think(&mut bay);
        assert_eq!(report.regenerated, 30);
        assert_eq!(bay.cell(0).map(|c| c.available), Some(10));
        assert_eq!(bay.cell(1).map(|c| c.available), Some(10));
        assert_eq!(bay.cell(2).map(|c| c.available), Some(510));
    }

    #[test]
    fn think_decays_full_cells() {
        let mut bay = bay(10, CellSpec::new(100, 100, 10, 0));
        let report = think(&mut bay);
        assert_eq!(report.decayed, 100);
        for index in 0..10 {
            assert_eq!(bay.cell(index).map(|c| c.available), Some(90));
        }
    }

    #[test]
    fn cell_limit_is_enforced() {
        let mut bay = bay(2, CellSpec::new(10, 10, 0, 0));
        assert!(bay.add_cell(CellSpec::new(10, 10, 0, 0)).is_err());
        assert_eq!(bay.cell_count(), 2);
        assert!(bay.is_full());
    }
}
