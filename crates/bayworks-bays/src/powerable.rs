//! The `Powerable` capability: bays that draw from the power grid.
//!
//! A powerable bay carries a [`PowerLink`]: an on/off switch, a per-call
//! draw limit, and an ordered list of grid sources. Draws go through
//! [`PowerGrid::draw_from_many`], so they are first-fit across the listed
//! sources and all-or-nothing as a whole.

use bayworks_economy::PowerGrid;
use bayworks_types::PowerSourceId;
use tracing::debug;

use crate::error::BayError;

/// A bay's connection to the power grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PowerLink {
    switch_on: bool,
    max_draw: u32,
    sources: Vec<PowerSourceId>,
}

impl PowerLink {
    /// A switched-on link drawing at most `max_draw` per call from
    /// `sources`, tried in order. Repeated sources are kept once, at their
    /// first position.
    pub fn new(max_draw: u32, sources: Vec<PowerSourceId>) -> Self {
        let mut link = Self {
            switch_on: true,
            max_draw,
            sources: Vec::with_capacity(sources.len()),
        };
        for source in sources {
            link.connect(source);
        }
        link
    }

    /// Whether the switch is on.
    pub const fn is_on(&self) -> bool {
        self.switch_on
    }

    /// Flip the switch.
    pub const fn set_switch(&mut self, on: bool) {
        self.switch_on = on;
    }

    /// Upper bound on a single draw.
    pub const fn max_draw(&self) -> u32 {
        self.max_draw
    }

    /// Change the draw limit.
    pub const fn set_max_draw(&mut self, max_draw: u32) {
        self.max_draw = max_draw;
    }

    /// Sources in draw order.
    pub fn sources(&self) -> &[PowerSourceId] {
        &self.sources
    }

    /// Append a source to the end of the draw order.
    pub fn connect(&mut self, source: PowerSourceId) {
        if !self.sources.contains(&source) {
            self.sources.push(source);
        }
    }
}

/// A bay that can pull energy off the grid.
pub trait Powerable {
    /// The bay's grid connection.
    fn power_link(&self) -> &PowerLink;

    /// The bay's grid connection, mutably.
    fn power_link_mut(&mut self) -> &mut PowerLink;

    /// Whether the bay is switched on.
    fn energy_switch(&self) -> bool {
        self.power_link().is_on()
    }

    /// Switch the bay on or off.
    fn set_energy_switch(&mut self, on: bool) {
        self.power_link_mut().set_switch(on);
    }

    /// Energy available to this bay across its sources.
    ///
    /// # Errors
    ///
    /// Returns [`BayError::Economy`] if a listed source is not on the grid.
    fn power_available(&self, grid: &PowerGrid) -> Result<u32, BayError> {
        Ok(grid.power_available_in(self.power_link().sources())?)
    }

    /// Draw `amount` from the bay's sources, capped at the link's
    /// `max_draw`. Returns the energy drawn, which is zero when the switch
    /// is off.
    ///
    /// # Errors
    ///
    /// Returns [`BayError::Economy`] if the sources cannot cover the capped
    /// amount. Nothing is drawn on failure.
    fn draw_energy(&self, grid: &mut PowerGrid, amount: u32) -> Result<u32, BayError> {
        let link = self.power_link();
        if !link.is_on() {
            return Ok(0);
        }
        let request = amount.min(link.max_draw());
        if request == 0 {
            return Ok(0);
        }
        let drawn = grid.draw_from_many(request, link.sources())?;
        debug!(requested = amount, drawn, "drew energy from grid");
        Ok(drawn)
    }
}
