//! Bays, stations, and citizens for the Bayworks colony simulation.
//!
//! This crate is where labor meets the economy. Production and research
//! bays own their energy and cargo, seat citizens by id, and advance their
//! work once per tick through the [`Thinkable`] capability. Power bays feed
//! the grid that the others draw from through [`Powerable`].
//!
//! # Modules
//!
//! - [`citizen`] -- [`Citizen`] fatigue and skills, and the [`CitizenRegistry`]
//! - [`occupancy`] -- [`Roster`], the capped ordered list behind every seat
//! - [`powerable`] -- [`Powerable`] and the [`PowerLink`] grid connection
//! - [`thinkable`] -- [`Thinkable`] and the [`TickContext`] it receives
//! - [`slot`] -- [`ProductionBaySlot`], the per-tick worker scheduler
//! - [`production`] -- [`ProductionBay`]
//! - [`research`] -- [`ResearchBay`]
//! - [`power_bay`] -- [`PowerProducingBay`]
//! - [`error`] -- Error types for all bay operations ([`BayError`])

pub mod citizen;
pub mod error;
pub mod occupancy;
pub mod power_bay;
pub mod powerable;
pub mod production;
pub mod research;
pub mod slot;
pub mod thinkable;

// Re-export primary types at crate root for convenience.
pub use citizen::{Citizen, CitizenRegistry, NEEDS_REST_PERCENT, RESTED_PERCENT};
pub use error::BayError;
pub use occupancy::Roster;
pub use power_bay::PowerProducingBay;
pub use powerable::{PowerLink, Powerable};
pub use production::{ProductionBay, ProductionTickReport};
pub use research::{ResearchBay, ResearchTickReport};
pub use slot::{ProductionBaySlot, SlotContext, SlotState, SlotTickReport};
pub use thinkable::{Thinkable, TickContext};
