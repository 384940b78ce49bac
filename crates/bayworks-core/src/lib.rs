//! Configuration, colony assembly, and the tick driver for the Bayworks simulation.
//!
//! This crate turns a `bayworks-config.yaml` document into a running
//! [`Colony`](colony::Colony) and advances it tick by tick: grid first,
//! then production bays, then research bays.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `bayworks-config.yaml` into
//!   strongly-typed structs.
//! - [`catalog`] -- Name-indexed resources, skills, recipes, and knowledge.
//! - [`colony`] -- The [`Colony`](colony::Colony) aggregate and its
//!   per-tick [`TickSummary`](colony::TickSummary).
//! - [`runner`] -- Bounded simulation loop.
//! - [`error`] -- [`ColonyError`](error::ColonyError).

pub mod catalog;
pub mod colony;
pub mod config;
pub mod error;
pub mod runner;
