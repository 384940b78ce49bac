//! Banks, power, resource storage, and progress for the Bayworks colony
//! simulation.
//!
//! Everything in this crate is plain state plus checked arithmetic. It
//! knows nothing about citizens or bays; those live in `bayworks-bays` and
//! drive these types once per tick.
//!
//! # Modules
//!
//! - [`bank`] -- [`Bank`], a quantity clamped to a maximum
//! - [`regenerating`] -- [`RegeneratingBank`] with decay and regen rates, and
//!   the [`CellSpec`] used to configure one
//! - [`power`] -- The [`PowerSource`] trait, [`PowerCellCluster`], and the
//!   colony-wide [`PowerGrid`]
//! - [`energy`] -- [`EnergyStore`], the pool-then-reserve draw rule
//! - [`resource_bank`] -- [`ResourceBank`], volume-capped resource storage
//! - [`recipe`] -- [`Ingredient`] and [`Recipe`] progress model
//! - [`knowledge`] -- [`Knowledge`] items worked on by research bays
//! - [`error`] -- Error types for all economy operations ([`EconomyError`])

pub mod bank;
pub mod energy;
pub mod error;
pub mod knowledge;
pub mod power;
pub mod recipe;
pub mod regenerating;
pub mod resource_bank;

// Re-export primary types at crate root for convenience.
pub use bank::Bank;
pub use energy::EnergyStore;
pub use error::EconomyError;
pub use knowledge::Knowledge;
pub use power::{CellReading, GridTickReport, PowerCellCluster, PowerGrid, PowerSource};
pub use recipe::{Ingredient, ProductionRecipe, Recipe};
pub use regenerating::{CellSpec, RegeneratingBank};
pub use resource_bank::{ResourceBank, ResourceStack};
