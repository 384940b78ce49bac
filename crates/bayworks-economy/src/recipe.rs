//! Ingredients and recipes: the labor/energy progress model.
//!
//! An [`Ingredient`] is one component of a [`Recipe`]. Each carries its own
//! progress [`Bank`] whose maximum is the total labor the ingredient
//! requires; [`Ingredient::process`] is the only way that progress moves,
//! and it only moves up. A recipe is complete when every ingredient is.
//!
//! Recipes held in catalogs act as templates. Work always happens on a
//! fresh copy obtained with [`Recipe::instantiate`], so one definition can
//! be crafted any number of times.

use std::collections::BTreeSet;

use bayworks_types::{Quantified, RecipeId, Resource, SkillId};

use crate::bank::Bank;

/// A recipe whose ingredients and output are catalog resources.
pub type ProductionRecipe = Recipe<Resource, Resource>;

// ---------------------------------------------------------------------------
// Ingredient
// ---------------------------------------------------------------------------

/// One component of a recipe with its own cost and progress counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient<T> {
    requirement: Quantified<T>,
    worker_cost: u32,
    station_cost: u32,
    progress: Bank,
}

impl<T> Ingredient<T> {
    /// An ingredient consuming `requirement` when work on it starts and
    /// needing `total_work` units of labor to complete.
    ///
    /// `worker_cost` is drawn from the worker's energy and `station_cost`
    /// from the station's pool or reserve, both per worker-tick.
    pub const fn new(
        requirement: Quantified<T>,
        total_work: u32,
        worker_cost: u32,
        station_cost: u32,
    ) -> Self {
        Self {
            requirement,
            worker_cost,
            station_cost,
            progress: Bank::with_maximum(total_work),
        }
    }

    /// What starting work on this ingredient consumes.
    pub const fn requirement(&self) -> &Quantified<T> {
        &self.requirement
    }

    /// Worker energy spent, and progress gained, per worker-tick.
    pub const fn worker_cost(&self) -> u32 {
        self.worker_cost
    }

    /// Station energy spent per worker-tick.
    pub const fn station_cost(&self) -> u32 {
        self.station_cost
    }

    /// Labor applied so far against the total required.
    pub const fn progress(&self) -> &Bank {
        &self.progress
    }

    /// Whether all required labor has been applied.
    pub const fn is_complete(&self) -> bool {
        self.progress.is_full()
    }

    /// Apply `worker_count` worker-ticks of labor. Returns the progress
    /// actually gained, which stops at the ingredient's maximum.
    pub fn process(&mut self, worker_count: u32) -> u32 {
        self.progress
            .fill(self.worker_cost.saturating_mul(worker_count))
    }
}

impl<T: Clone> Ingredient<T> {
    /// A copy of this ingredient with no progress.
    #[must_use]
    pub fn instantiate(&self) -> Self {
        Self {
            requirement: self.requirement.clone(),
            worker_cost: self.worker_cost,
            station_cost: self.station_cost,
            progress: Bank::with_maximum(self.progress.maximum()),
        }
    }
}

// ---------------------------------------------------------------------------
// Recipe
// ---------------------------------------------------------------------------

/// An ordered set of ingredients plus skill requirements that yields a
/// quantified product once every ingredient is complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe<I, P> {
    id: RecipeId,
    name: String,
    ingredients: Vec<Ingredient<I>>,
    skill_requirements: BTreeSet<SkillId>,
    produces: Quantified<P>,
}

impl<I, P> Recipe<I, P> {
    /// A recipe with no ingredients and no skill requirements.
    pub fn new(id: impl Into<RecipeId>, name: impl Into<String>, produces: Quantified<P>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ingredients: Vec::new(),
            skill_requirements: BTreeSet::new(),
            produces,
        }
    }

    /// Append an ingredient. Declaration order is work order.
    #[must_use]
    pub fn with_ingredient(mut self, ingredient: Ingredient<I>) -> Self {
        self.ingredients.push(ingredient);
        self
    }

    /// Require workers to hold `skill`.
    #[must_use]
    pub fn requiring(mut self, skill: SkillId) -> Self {
        self.skill_requirements.insert(skill);
        self
    }

    /// Catalog identifier.
    pub const fn id(&self) -> RecipeId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The output and how many units one completion yields.
    pub const fn produces(&self) -> &Quantified<P> {
        &self.produces
    }

    /// Skills a worker must hold to work on this recipe.
    pub const fn skill_requirements(&self) -> &BTreeSet<SkillId> {
        &self.skill_requirements
    }

    /// Ingredients in declaration order.
    pub fn ingredients(&self) -> &[Ingredient<I>] {
        &self.ingredients
    }

    /// The ingredient at `index`.
    pub fn ingredient(&self, index: usize) -> Option<&Ingredient<I>> {
        self.ingredients.get(index)
    }

    /// Mutable access to the ingredient at `index`.
    pub fn ingredient_mut(&mut self, index: usize) -> Option<&mut Ingredient<I>> {
        self.ingredients.get_mut(index)
    }

    /// Aggregate progress: the sum of every ingredient's progress against
    /// the sum of their maxima.
    pub fn progress(&self) -> Bank {
        let (done, total) = self.ingredients.iter().fold((0_u32, 0_u32), |(d, t), i| {
            (
                d.saturating_add(i.progress().quantity()),
                t.saturating_add(i.progress().maximum()),
            )
        });
        Bank::new(done, total)
    }

    /// Whether every ingredient is complete.
    pub fn is_complete(&self) -> bool {
        self.ingredients.iter().all(Ingredient::is_complete)
    }

    /// Whether `skills` covers every requirement. Vacuously true when the
    /// recipe requires nothing.
    pub fn meets_requirements(&self, skills: &BTreeSet<SkillId>) -> bool {
        self.skill_requirements.is_subset(skills)
    }
}

impl<I: Clone, P: Clone> Recipe<I, P> {
    /// A copy of this recipe with every ingredient's progress reset.
    #[must_use]
    pub fn instantiate(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            ingredients: self.ingredients.iter().map(Ingredient::instantiate).collect(),
            skill_requirements: self.skill_requirements.clone(),
            produces: self.produces.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scrap() -> Resource {
        Resource::new(1, "Scrap", 1)
    }

    fn beam_recipe() -> ProductionRecipe {
        Recipe::new(10, "Beam", Quantified::new(Resource::new(2, "Beam", 2), 1))
            .with_ingredient(Ingredient::new(Quantified::new(scrap(), 4), 10, 1, 1))
            .with_ingredient(Ingredient::new(Quantified::new(scrap(), 2), 6, 2, 1))
    }

    #[test]
    fn process_adds_worker_cost_per_worker() {
        let mut ingredient = Ingredient::new(Quantified::new(scrap(), 1), 10, 3, 0);
        assert_eq!(ingredient.process(2), 6);
        assert_eq!(ingredient.progress().quantity(), 6);
        assert_eq!(ingredient.process(1), 3);
        assert_eq!(ingredient.process(1), 1);
        assert!(ingredient.is_complete());
        assert_eq!(ingredient.process(1), 0);
    }

    #[test]
    fn recipe_progress_sums_ingredients() {
        let mut recipe = beam_recipe();
        assert_eq!(recipe.progress(), Bank::new(0, 16));
        recipe.ingredient_mut(1).unwrap().process(3);
        assert_eq!(recipe.progress(), Bank::new(6, 16));
        assert!(!recipe.is_complete());
    }

    #[test]
    fn complete_only_when_every_ingredient_is() {
        let mut recipe = beam_recipe();
        recipe.ingredient_mut(0).unwrap().process(10);
        assert!(!recipe.is_complete());
        recipe.ingredient_mut(1).unwrap().process(3);
        assert!(recipe.is_complete());
        assert!(recipe.progress().is_full());
    }

    #[test]
    fn instantiate_resets_progress() {
        let mut recipe = beam_recipe();
        recipe.ingredient_mut(0).unwrap().process(10);
        let fresh = recipe.instantiate();
        assert_eq!(fresh.progress().quantity(), 0);
        assert_eq!(fresh.progress().maximum(), 16);
        assert_eq!(fresh.id(), recipe.id());
        assert_eq!(recipe.progress().quantity(), 10);
    }

    #[test]
    fn requirements_are_subset_check() {
        let recipe = beam_recipe().requiring(SkillId::from(1));
        let mut skills = BTreeSet::new();
        assert!(!recipe.meets_requirements(&skills));
        skills.insert(SkillId::from(1));
        skills.insert(SkillId::from(2));
        assert!(recipe.meets_requirements(&skills));
        assert!(beam_recipe().meets_requirements(&BTreeSet::new()));
    }
}
