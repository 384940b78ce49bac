//! Name-indexed catalog of resources, skills, recipes, and knowledge.
//!
//! Config sections refer to each other by name. The [`Catalog`] resolves
//! those names once, when the colony is built, into the typed values the
//! bays work with.

use std::collections::BTreeMap;

use bayworks_economy::{Ingredient, Knowledge, ProductionRecipe, Recipe};
use bayworks_types::{Quantified, Resource, Skill, SkillId};

use crate::config::{ResourceAmountConfig, SimulationConfig};
use crate::error::ColonyError;

/// Every catalog entry, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    resources: BTreeMap<String, Resource>,
    skills: BTreeMap<String, Skill>,
    recipes: BTreeMap<String, ProductionRecipe>,
    knowledge: BTreeMap<String, Knowledge>,
}

impl Catalog {
    /// Resolve the catalog sections of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ColonyError::Duplicate`] for a repeated name or catalog
    /// number, or [`ColonyError::UnknownReference`] when a recipe or
    /// knowledge item names an undefined resource or skill.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, ColonyError> {
        let mut catalog = Self::default();

        for entry in &config.resources {
            let mut resource = Resource::new(entry.id, entry.name.as_str(), entry.volume);
            resource.mass = entry.mass;
            catalog.insert_resource(resource)?;
        }

        for entry in &config.skills {
            catalog.insert_skill(Skill {
                id: SkillId::from(entry.id),
                name: entry.name.clone(),
                description: entry.description.clone(),
            })?;
        }

        for entry in &config.recipes {
            let output = catalog.resource(&entry.output)?.clone();
            let mut recipe = Recipe::new(
                entry.id,
                entry.name.as_str(),
                Quantified::new(output, entry.quantity),
            );
            for ingredient in &entry.ingredients {
                let resource = catalog.resource(&ingredient.resource)?.clone();
                recipe = recipe.with_ingredient(Ingredient::new(
                    Quantified::new(resource, ingredient.quantity),
                    ingredient.work,
                    ingredient.worker_cost,
                    ingredient.station_cost,
                ));
            }
            for skill in &entry.required_skills {
                recipe = recipe.requiring(catalog.skill(skill)?.id);
            }
            catalog.insert_recipe(recipe)?;
        }

        for entry in &config.knowledge {
            let unlocks = catalog.skill(&entry.unlocks)?.id;
            let mut item = Knowledge::new(entry.id, entry.name.as_str(), entry.work, unlocks)
                .with_costs(entry.worker_cost, entry.station_cost);
            for skill in &entry.required_skills {
                item = item.requiring_skill(catalog.skill(skill)?.id);
            }
            for amount in &entry.resources {
                let resource = catalog.resource(&amount.resource)?.clone();
                item = item.requiring_resource(resource, amount.quantity);
            }
            catalog.insert_knowledge(item)?;
        }

        Ok(catalog)
    }

    /// Add a resource.
    ///
    /// # Errors
    ///
    /// Returns [`ColonyError::Duplicate`] if the name or id is taken.
    pub fn insert_resource(&mut self, resource: Resource) -> Result<(), ColonyError> {
        if self.resources.values().any(|r| r.id == resource.id) {
            return Err(duplicate("resource", resource.id.to_string()));
        }
        insert_unique(&mut self.resources, "resource", resource.name.clone(), resource)
    }

    /// Add a skill.
    ///
    /// # Errors
    ///
    /// Returns [`ColonyError::Duplicate`] if the name or id is taken.
    pub fn insert_skill(&mut self, skill: Skill) -> Result<(), ColonyError> {
        if self.skills.values().any(|s| s.id == skill.id) {
            return Err(duplicate("skill", skill.id.to_string()));
        }
        insert_unique(&mut self.skills, "skill", skill.name.clone(), skill)
    }

    /// Add a recipe.
    ///
    /// # Errors
    ///
    /// Returns [`ColonyError::Duplicate`] if the name or id is taken.
    pub fn insert_recipe(&mut self, recipe: ProductionRecipe) -> Result<(), ColonyError> {
        if self.recipes.values().any(|r| r.id() == recipe.id()) {
            return Err(duplicate("recipe", recipe.id().to_string()));
        }
        insert_unique(&mut self.recipes, "recipe", recipe.name().to_owned(), recipe)
    }

    /// Add a knowledge item.
    ///
    /// # Errors
    ///
    /// Returns [`ColonyError::Duplicate`] if the name or id is taken.
    pub fn insert_knowledge(&mut self, item: Knowledge) -> Result<(), ColonyError> {
        if self.knowledge.values().any(|k| k.id == item.id) {
            return Err(duplicate("knowledge", item.id.to_string()));
        }
        insert_unique(&mut self.knowledge, "knowledge", item.name.clone(), item)
    }

    /// Look up a resource by name.
    ///
    /// # Errors
    ///
    /// Returns [`ColonyError::UnknownReference`] if no resource has that name.
    pub fn resource(&self, name: &str) -> Result<&Resource, ColonyError> {
        self.resources
            .get(name)
            .ok_or_else(|| ColonyError::unknown("resource", name))
    }

    /// Look up a skill by name.
    ///
    /// # Errors
    ///
    /// Returns [`ColonyError::UnknownReference`] if no skill has that name.
    pub fn skill(&self, name: &str) -> Result<&Skill, ColonyError> {
        self.skills
            .get(name)
            .ok_or_else(|| ColonyError::unknown("skill", name))
    }

    /// Look up a recipe by name.
    ///
    /// # Errors
    ///
    /// Returns [`ColonyError::UnknownReference`] if no recipe has that name.
    pub fn recipe(&self, name: &str) -> Result<&ProductionRecipe, ColonyError> {
        self.recipes
            .get(name)
            .ok_or_else(|| ColonyError::unknown("recipe", name))
    }

    /// Look up a knowledge item by name.
    ///
    /// # Errors
    ///
    /// Returns [`ColonyError::UnknownReference`] if no item has that name.
    pub fn knowledge(&self, name: &str) -> Result<&Knowledge, ColonyError> {
        self.knowledge
            .get(name)
            .ok_or_else(|| ColonyError::unknown("knowledge", name))
    }

    /// Resolve a list of named amounts into quantified resources.
    ///
    /// # Errors
    ///
    /// Returns [`ColonyError::UnknownReference`] for an undefined resource.
    pub fn amounts(
        &self,
        amounts: &[ResourceAmountConfig],
    ) -> Result<Vec<Quantified<Resource>>, ColonyError> {
        amounts
            .iter()
            .map(|a| Ok(Quantified::new(self.resource(&a.resource)?.clone(), a.quantity)))
            .collect()
    }

    /// Resources in name order.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    /// Number of recipes.
    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    /// Number of knowledge items.
    pub fn knowledge_count(&self) -> usize {
        self.knowledge.len()
    }
}

fn duplicate(kind: &'static str, name: String) -> ColonyError {
    ColonyError::Duplicate { kind, name }
}

fn insert_unique<T>(
    map: &mut BTreeMap<String, T>,
    kind: &'static str,
    name: String,
    value: T,
) -> Result<(), ColonyError> {
    if map.contains_key(&name) {
        return Err(duplicate(kind, name));
    }
    map.insert(name, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(yaml: &str) -> SimulationConfig {
        SimulationConfig::parse(yaml).unwrap_or_default()
    }

    #[test]
    fn resolves_recipe_references() {
        let catalog = Catalog::from_config(&config(
            r"
resources:
  - { id: 1, name: Scrap }
  - { id: 2, name: Gear, volume: 3 }
skills:
  - { id: 4, name: Machining }
recipes:
  - id: 9
    name: Gear
    output: Gear
    quantity: 2
    required_skills: [Machining]
    ingredients:
      - { resource: Scrap, quantity: 5, work: 8, worker_cost: 2 }
",
        ));
        assert!(catalog.is_ok());
        let Ok(catalog) = catalog else { return };
        let recipe = catalog.recipe("Gear");
        assert!(recipe.is_ok());
        let Ok(recipe) = recipe else { return };
        assert_eq!(recipe.produces().quantity, 2);
        assert_eq!(recipe.produces().item.volume, 3);
        assert_eq!(recipe.ingredients().len(), 1);
        assert_eq!(recipe.ingredient(0).map(Ingredient::worker_cost), Some(2));
        assert!(recipe.skill_requirements().contains(&SkillId::from(4)));
    }

    #[test]
    fn unknown_resource_is_reported() {
        let result = Catalog::from_config(&config(
            r"
recipes:
  - { id: 1, name: Gear, output: Gear }
",
        ));
        assert_eq!(result, Err(ColonyError::unknown("resource", "Gear")));
    }

    #[test]
    fn unknown_skill_is_reported() {
        let result = Catalog::from_config(&config(
            r"
knowledge:
  - { id: 1, name: Optics, work: 5, unlocks: Lensmaking }
",
        ));
        assert_eq!(result, Err(ColonyError::unknown("skill", "Lensmaking")));
    }

    #[test]
    fn duplicate_names_and_ids_are_rejected() {
        let by_name = Catalog::from_config(&config(
            r"
resources:
  - { id: 1, name: Scrap }
  - { id: 2, name: Scrap }
",
        ));
        assert!(matches!(by_name, Err(ColonyError::Duplicate { kind: "resource", .. })));

        let by_id = Catalog::from_config(&config(
            r"
skills:
  - { id: 1, name: Welding }
  - { id: 1, name: Optics }
",
        ));
        assert!(matches!(by_id, Err(ColonyError::Duplicate { kind: "skill", .. })));
    }

    #[test]
    fn knowledge_costs_and_bills_resolve() {
        let catalog = Catalog::from_config(&config(
            r"
resources:
  - { id: 1, name: Glass }
skills:
  - { id: 1, name: Optics }
knowledge:
  - id: 3
    name: Lenses
    work: 12
    unlocks: Optics
    worker_cost: 2
    station_cost: 5
    resources:
      - { resource: Glass, quantity: 4 }
",
        ));
        let item = catalog.as_ref().ok().and_then(|c| c.knowledge("Lenses").ok());
        assert_eq!(item.map(|k| (k.worker_cost, k.station_cost)), Some((2, 5)));
        assert_eq!(item.map(|k| k.progress().maximum()), Some(12));
        assert_eq!(item.map(|k| k.resource_requirements.len()), Some(1));
    }
}
