//! Configuration loading and typed config structures for the Bayworks simulation.
//!
//! The canonical configuration lives in `bayworks-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads the file. Cross references
//! between sections are plain names; they are resolved (and rejected when
//! unknown) when a [`Colony`](crate::colony::Colony) is built.

use std::path::Path;

use bayworks_economy::CellSpec;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `bayworks-config.yaml`. Every section may be
/// omitted; an empty document yields an empty colony that runs for the
/// default number of ticks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Run boundaries.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Resource catalog.
    #[serde(default)]
    pub resources: Vec<ResourceConfig>,

    /// Skill catalog.
    #[serde(default)]
    pub skills: Vec<SkillConfig>,

    /// Production recipe catalog.
    #[serde(default)]
    pub recipes: Vec<RecipeConfig>,

    /// Research catalog.
    #[serde(default)]
    pub knowledge: Vec<KnowledgeConfig>,

    /// Power-producing bays feeding the grid.
    #[serde(default)]
    pub power: Vec<PowerBayConfig>,

    /// Production bays.
    #[serde(default)]
    pub production_bays: Vec<ProductionBayConfig>,

    /// Research bays.
    #[serde(default)]
    pub research_bays: Vec<ResearchBayConfig>,

    /// Starting citizens and where they work.
    #[serde(default)]
    pub citizens: Vec<CitizenConfig>,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

// =============================================================================
// Run boundaries
// =============================================================================

/// Simulation boundary configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Number of ticks to run before stopping.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
        }
    }
}

// =============================================================================
// Catalogs
// =============================================================================

/// A resource type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResourceConfig {
    /// Catalog number.
    pub id: u32,
    /// Unique name used by every other section.
    pub name: String,
    /// Storage volume per unit.
    #[serde(default = "default_one")]
    pub volume: u32,
    /// Mass per unit.
    #[serde(default)]
    pub mass: u32,
}

/// A skill type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SkillConfig {
    /// Catalog number.
    pub id: u32,
    /// Unique name used by every other section.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

/// A named resource and an amount of it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResourceAmountConfig {
    /// Resource name.
    pub resource: String,
    /// Units.
    pub quantity: u32,
}

/// One ingredient of a production recipe.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IngredientConfig {
    /// Resource consumed when the ingredient is first worked.
    pub resource: String,
    /// Units consumed.
    pub quantity: u32,
    /// Worker-ticks of labor needed.
    pub work: u32,
    /// Energy each worker spends per tick of labor.
    #[serde(default = "default_one")]
    pub worker_cost: u32,
    /// Energy the bay spends per tick of labor.
    #[serde(default = "default_one")]
    pub station_cost: u32,
}

/// A production recipe.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecipeConfig {
    /// Catalog number.
    pub id: u32,
    /// Unique name used by bays and crafting queues.
    pub name: String,
    /// Name of the resource produced.
    pub output: String,
    /// Units produced per completion.
    #[serde(default = "default_one")]
    pub quantity: u32,
    /// Skills every worker must hold.
    #[serde(default)]
    pub required_skills: Vec<String>,
    /// Ingredients in work order.
    #[serde(default)]
    pub ingredients: Vec<IngredientConfig>,
}

/// A research item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KnowledgeConfig {
    /// Catalog number.
    pub id: u32,
    /// Unique name used by bays.
    pub name: String,
    /// Researcher-ticks of labor needed.
    pub work: u32,
    /// Skill granted to qualified researchers on completion.
    pub unlocks: String,
    /// Skills every researcher must hold.
    #[serde(default)]
    pub required_skills: Vec<String>,
    /// Resources debited when research starts.
    #[serde(default)]
    pub resources: Vec<ResourceAmountConfig>,
    /// Energy each researcher spends per tick.
    #[serde(default = "default_one")]
    pub worker_cost: u32,
    /// Energy the bay spends per tick.
    #[serde(default)]
    pub station_cost: u32,
}

// =============================================================================
// Bays
// =============================================================================

/// A power-producing bay and its cells.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PowerBayConfig {
    /// Unique name used by other bays' `sources`.
    pub name: String,
    /// Maximum number of cells. Defaults to the number listed.
    #[serde(default)]
    pub cell_limit: Option<usize>,
    /// Cells in draw order.
    #[serde(default)]
    pub cells: Vec<CellSpec>,
}

/// A bay's pool, reserve, and grid connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EnergyConfig {
    /// Energy spent first.
    #[serde(default)]
    pub pool: CellSpec,
    /// Energy spent once the pool cannot cover a draw.
    #[serde(default)]
    pub reserve: CellSpec,
    /// Most energy pulled from the grid per tick.
    #[serde(default)]
    pub max_draw: u32,
    /// Power bay names to draw from, in order. Empty leaves the bay
    /// disconnected.
    #[serde(default)]
    pub sources: Vec<String>,
}

/// Cargo hold settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CargoConfig {
    /// Volume limit. Unbounded when absent.
    #[serde(default)]
    pub capacity: Option<u32>,
    /// Starting stock.
    #[serde(default)]
    pub stock: Vec<ResourceAmountConfig>,
}

/// A craft request placed when the colony is built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CraftConfig {
    /// Recipe name.
    pub recipe: String,
    /// Station index. The first available station when absent.
    #[serde(default)]
    pub station: Option<usize>,
}

/// A production bay.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductionBayConfig {
    /// Unique bay name.
    pub name: String,
    /// Maximum occupants.
    #[serde(default = "default_occupant_limit")]
    pub occupant_limit: usize,
    /// Maximum stations. Defaults to the number listed in `stations`.
    #[serde(default)]
    pub station_limit: Option<usize>,
    /// Seats per station, one entry per station.
    #[serde(default)]
    pub stations: Vec<usize>,
    /// Names of recipes this bay may craft.
    #[serde(default)]
    pub recipes: Vec<String>,
    /// Pool, reserve, and grid link.
    #[serde(default)]
    pub energy: EnergyConfig,
    /// Cargo hold.
    #[serde(default)]
    pub cargo: CargoConfig,
    /// Craft requests placed at start, in order.
    #[serde(default)]
    pub crafts: Vec<CraftConfig>,
}

/// A research bay.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResearchBayConfig {
    /// Unique bay name.
    pub name: String,
    /// Maximum occupants.
    #[serde(default = "default_occupant_limit")]
    pub occupant_limit: usize,
    /// Maximum researchers.
    #[serde(default = "default_researcher_limit")]
    pub researcher_limit: usize,
    /// Names of knowledge this bay may research.
    #[serde(default)]
    pub knowledge: Vec<String>,
    /// Pool, reserve, and grid link.
    #[serde(default)]
    pub energy: EnergyConfig,
    /// Cargo hold.
    #[serde(default)]
    pub cargo: CargoConfig,
    /// Knowledge to start researching.
    #[serde(default)]
    pub research: Option<String>,
}

// =============================================================================
// Citizens
// =============================================================================

/// A starting citizen.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CitizenConfig {
    /// Display name. Need not be unique.
    pub name: String,
    /// Energy ceiling.
    #[serde(default = "default_max_energy")]
    pub max_energy: u32,
    /// Starting energy. Full when absent.
    #[serde(default)]
    pub energy: Option<u32>,
    /// Names of skills held at start.
    #[serde(default)]
    pub skills: Vec<String>,
    /// Where the citizen works, if anywhere.
    #[serde(default)]
    pub works_at: Option<WorkplaceConfig>,
}

/// A citizen's starting workplace.
///
/// Naming a production bay seats the citizen at `station` (station 0 by
/// default). Naming a research bay adds them as a researcher. Either way
/// they become an occupant of that bay.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkplaceConfig {
    /// Bay name.
    pub bay: String,
    /// Production station index.
    #[serde(default)]
    pub station: Option<usize>,
}

// =============================================================================
// Default value functions
// =============================================================================

const fn default_max_ticks() -> u64 {
    100
}

const fn default_one() -> u32 {
    1
}

const fn default_occupant_limit() -> usize {
    10
}

const fn default_researcher_limit() -> usize {
    4
}

const fn default_max_energy() -> u32 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_empty() {
        let config = SimulationConfig::default();
        assert_eq!(config.simulation.max_ticks, 100);
        assert!(config.resources.is_empty());
        assert!(config.production_bays.is_empty());
    }

    #[test]
    fn empty_yaml_uses_defaults() {
        let config = SimulationConfig::parse("{}");
        assert_eq!(config.ok(), Some(SimulationConfig::default()));
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
simulation:
  max_ticks: 25

resources:
  - { id: 1, name: Scrap }
  - { id: 2, name: Plating, volume: 2, mass: 5 }

skills:
  - { id: 1, name: Welding, description: Joins metal }

recipes:
  - id: 1
    name: Plating
    output: Plating
    required_skills: [Welding]
    ingredients:
      - { resource: Scrap, quantity: 4, work: 10 }

knowledge:
  - { id: 1, name: Metallurgy, work: 20, unlocks: Welding, station_cost: 2 }

power:
  - name: Reactor
    cells:
      - { capacity: 1000, start: 500, regen: 10 }

production_bays:
  - name: Works
    stations: [4, 2]
    recipes: [Plating]
    energy:
      pool: { capacity: 100 }
      max_draw: 50
      sources: [Reactor]
    cargo:
      capacity: 500
      stock:
        - { resource: Scrap, quantity: 100 }
    crafts:
      - { recipe: Plating }

research_bays:
  - name: Lab
    knowledge: [Metallurgy]
    research: Metallurgy

citizens:
  - name: Ada
    skills: [Welding]
    works_at: { bay: Works, station: 1 }
  - name: Bo
    max_energy: 50
    energy: 20
";
        let config = SimulationConfig::parse(yaml).ok();
        assert!(config.is_some());
        let Some(config) = config else { return };

        assert_eq!(config.simulation.max_ticks, 25);
        assert_eq!(config.resources.len(), 2);
        assert_eq!(config.resources.first().map(|r| r.volume), Some(1));
        assert_eq!(config.skills.first().map(|s| s.name.as_str()), Some("Welding"));

        let recipe = config.recipes.first();
        assert_eq!(recipe.map(|r| r.quantity), Some(1));
        let ingredient = recipe.and_then(|r| r.ingredients.first());
        assert_eq!(ingredient.map(|i| (i.worker_cost, i.station_cost)), Some((1, 1)));

        let knowledge = config.knowledge.first();
        assert_eq!(knowledge.map(|k| (k.worker_cost, k.station_cost)), Some((1, 2)));

        let reactor = config.power.first();
        assert_eq!(reactor.and_then(|p| p.cell_limit), None);
        assert_eq!(
            reactor.and_then(|p| p.cells.first().copied()),
            Some(CellSpec::new(1000, 500, 0, 10))
        );

        let works = config.production_bays.first();
        assert_eq!(works.map(|b| b.stations.clone()), Some(vec![4, 2]));
        assert_eq!(works.map(|b| b.occupant_limit), Some(10));
        assert_eq!(works.map(|b| b.energy.max_draw), Some(50));
        assert_eq!(works.and_then(|b| b.cargo.capacity), Some(500));

        let lab = config.research_bays.first();
        assert_eq!(lab.map(|b| b.researcher_limit), Some(4));
        assert_eq!(lab.and_then(|b| b.research.clone()), Some("Metallurgy".to_owned()));

        let ada = config.citizens.first();
        assert_eq!(ada.map(|c| c.max_energy), Some(100));
        assert_eq!(ada.and_then(|c| c.works_at.as_ref()).and_then(|w| w.station), Some(1));
        let bo = config.citizens.get(1);
        assert_eq!(bo.and_then(|c| c.energy), Some(20));
    }

    #[test]
    fn invalid_yaml_is_rejected() {
        let result = SimulationConfig::parse("resources: [ { id: one } ]");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = SimulationConfig::from_file(Path::new("/nonexistent/bayworks.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
