//! Shared type definitions for the Bayworks colony simulation.
//!
//! This crate is the single source of truth for identifiers and catalog
//! value types used across the workspace.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe identifiers for runtime entities and catalog entries
//! - [`catalog`] -- Resources, skills, and quantified amounts
//! - [`kind`] -- The [`ErrorKind`] taxonomy every crate error maps onto

pub mod catalog;
pub mod ids;
pub mod kind;

// Re-export all public types at crate root for convenience.
pub use catalog::{Quantified, Resource, Skill};
pub use ids::{CitizenId, KnowledgeId, PowerSourceId, RecipeId, ResourceId, SkillId};
pub use kind::ErrorKind;
