//! The `Thinkable` capability: anything advanced once per simulation tick.

use bayworks_economy::PowerGrid;

use crate::citizen::CitizenRegistry;

/// Colony state a bay may touch while it thinks.
#[derive(Debug)]
pub struct TickContext<'a> {
    /// Every citizen in the colony.
    pub citizens: &'a mut CitizenRegistry,
    /// Every power source in the colony.
    pub grid: &'a mut PowerGrid,
}

/// Advanced by the colony driver once per tick.
///
/// `think` runs to completion and never fails as a whole. Individual
/// steps that cannot proceed (an empty pool, a short resource bill) are
/// skipped for that tick and show up in the returned report.
pub trait Thinkable {
    /// What one tick did.
    type Report;

    /// Run one tick.
    fn think(&mut self, ctx: &mut TickContext<'_>) -> Self::Report;
}
