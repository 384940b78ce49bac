//! Production stations: the per-tick worker scheduler.
//!
//! A [`ProductionBaySlot`] holds at most one active recipe, a lineup of
//! queued recipes, a capped roster of worker seats, and the current
//! worker-to-ingredient pairings. It owns no energy or resources; the bay
//! lends it its [`EnergyStore`] and [`ResourceBank`] for the duration of
//! each call through a [`SlotContext`], so every station in a bay sees the
//! same banks.
//!
//! # Tick phases
//!
//! [`ProductionBaySlot::think`] runs four phases in a fixed order:
//!
//! 1. **Admission** -- workers who need rest are released from their
//!    ingredient; rested, qualified workers are marked available.
//! 2. **Assignment** -- each available worker claims the first ingredient,
//!    in declaration order, that is neither complete nor held by someone
//!    else. The ingredient's resource bill is paid the first time it is
//!    claimed.
//! 3. **Work** -- each assigned worker draws the station cost from the
//!    pool (then reserve), spends their own worker cost, and applies one
//!    unit of labor.
//! 4. **Completion** -- a finished recipe's output is stored and the next
//!    recipe in the lineup is activated in the same call.
//!
//! Workers and ingredients are both visited in stable order: roster order
//! for workers, declaration order for ingredients.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use bayworks_economy::{EnergyStore, Ingredient, ProductionRecipe, ResourceBank};
use bayworks_types::{CitizenId, Quantified, Resource};
use tracing::{debug, info, warn};

use crate::citizen::CitizenRegistry;
use crate::error::BayError;
use crate::occupancy::Roster;

// ---------------------------------------------------------------------------
// Context and reports
// ---------------------------------------------------------------------------

/// The bay-owned state a station borrows while it thinks.
#[derive(Debug)]
pub struct SlotContext<'a> {
    /// The bay's pool and reserve.
    pub energy: &'a mut EnergyStore,
    /// The bay's resource storage.
    pub resources: &'a mut ResourceBank,
    /// Every citizen in the colony.
    pub citizens: &'a mut CitizenRegistry,
}

/// Coarse state of a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// No active recipe.
    Idle,
    /// A recipe is active but nobody is bound to an ingredient.
    ActiveUnstaffed,
    /// At least one worker is bound to an ingredient.
    ActiveWorking,
}

/// What one station tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotTickReport {
    /// Worker-ticks of labor applied.
    pub worker_ticks: u32,
    /// Work steps skipped because the station could not pay its energy.
    pub stalled: u32,
    /// Output stored by a recipe that finished this tick.
    pub completed: Option<Quantified<Resource>>,
}

// ---------------------------------------------------------------------------
// ProductionBaySlot
// ---------------------------------------------------------------------------

/// One production station inside a bay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductionBaySlot {
    active: Option<ProductionRecipe>,
    lineup: VecDeque<ProductionRecipe>,
    workers: Roster,
    /// Worker -> index of the ingredient they hold, `None` while waiting.
    pairings: BTreeMap<CitizenId, Option<usize>>,
    /// Ingredients of the active recipe whose resource bill has been paid.
    /// A bill is paid once per ingredient per recipe run; handing a
    /// half-done ingredient to another worker does not charge it again.
    /// Cleared when a new recipe is installed.
    charged: BTreeSet<usize>,
}

impl ProductionBaySlot {
    /// An idle station with `seats` worker seats.
    pub const fn new(seats: usize) -> Self {
        Self {
            active: None,
            lineup: VecDeque::new(),
            workers: Roster::new(seats),
            pairings: BTreeMap::new(),
            charged: BTreeSet::new(),
        }
    }

    /// Number of worker seats.
    pub const fn seats(&self) -> usize {
        self.workers.limit()
    }

    /// Workers seated at this station, in roster order.
    pub const fn workers(&self) -> &Roster {
        &self.workers
    }

    /// The recipe being worked on.
    pub const fn active(&self) -> Option<&ProductionRecipe> {
        self.active.as_ref()
    }

    /// Queued recipes, next first.
    pub fn lineup(&self) -> impl Iterator<Item = &ProductionRecipe> {
        self.lineup.iter()
    }

    /// Number of queued recipes.
    pub fn lineup_len(&self) -> usize {
        self.lineup.len()
    }

    /// Whether there is no active recipe.
    pub const fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    /// Coarse state of the station.
    pub fn state(&self) -> SlotState {
        if self.active.is_none() {
            SlotState::Idle
        } else if self.pairings.values().any(Option::is_some) {
            SlotState::ActiveWorking
        } else {
            SlotState::ActiveUnstaffed
        }
    }

    /// Whether `citizen` currently has a pairing, bound or waiting.
    pub fn is_paired(&self, citizen: CitizenId) -> bool {
        self.pairings.contains_key(&citizen)
    }

    /// Index of the active recipe's ingredient `citizen` is bound to.
    pub fn assignment(&self, citizen: CitizenId) -> Option<usize> {
        self.pairings.get(&citizen).copied().flatten()
    }

    /// Every `(worker, ingredient index)` binding, in worker id order.
    pub fn assignments(&self) -> impl Iterator<Item = (CitizenId, usize)> + '_ {
        self.pairings
            .iter()
            .filter_map(|(worker, index)| index.map(|i| (*worker, i)))
    }

    // -- roster ------------------------------------------------------------

    /// Seat a worker.
    ///
    /// # Errors
    ///
    /// Returns [`BayError::RosterFull`] when every seat is taken, or
    /// [`BayError::AlreadyPresent`] if the worker is already seated.
    pub fn add_worker(&mut self, citizen: CitizenId) -> Result<(), BayError> {
        self.workers.add(citizen)
    }

    /// Unseat a worker. Progress they applied stays with the ingredient.
    ///
    /// # Errors
    ///
    /// Returns [`BayError::NotPresent`] if the worker is not seated here.
    pub fn remove_worker(&mut self, citizen: CitizenId) -> Result<(), BayError> {
        self.workers.remove(citizen)?;
        self.pairings.remove(&citizen);
        Ok(())
    }

    /// Unseat the worker at roster position `index`.
    ///
    /// # Errors
    ///
    /// Returns [`BayError::RosterIndexOutOfRange`] past the end.
    pub fn remove_worker_at(&mut self, index: usize) -> Result<CitizenId, BayError> {
        let citizen = self.workers.remove_at(index)?;
        self.pairings.remove(&citizen);
        Ok(citizen)
    }

    // -- recipes -------------------------------------------------------------

    /// Install a fresh copy of `recipe` as the active recipe, discarding
    /// any current one and every pairing.
    pub fn activate(&mut self, recipe: &ProductionRecipe) {
        self.install(recipe.instantiate());
    }

    fn install(&mut self, recipe: ProductionRecipe) {
        self.clear_active();
        info!(recipe = %recipe.id(), name = recipe.name(), "recipe activated");
        self.active = Some(recipe);
    }

    /// Activate `recipe` now if the station is idle, otherwise queue it.
    pub fn enqueue(&mut self, recipe: &ProductionRecipe) {
        if self.active.is_none() {
            self.activate(recipe);
        } else {
            debug!(recipe = %recipe.id(), queued = self.lineup.len(), "recipe queued");
            self.lineup.push_back(recipe.instantiate());
        }
    }

    /// Move lineup entry `index` into the active position.
    ///
    /// # Errors
    ///
    /// Returns [`BayError::LineupEntryNotFound`] past the end of the lineup.
    pub fn activate_from_lineup(&mut self, index: usize) -> Result<(), BayError> {
        let recipe = self
            .lineup
            .remove(index)
            .ok_or(BayError::LineupEntryNotFound(index))?;
        self.install(recipe);
        Ok(())
    }

    /// Drop the active recipe and every pairing.
    pub fn clear_active(&mut self) {
        self.active = None;
        self.pairings.clear();
        self.charged.clear();
    }

    /// Store the active recipe's output in `resources` and clear it.
    ///
    /// # Errors
    ///
    /// Returns [`BayError::NoActiveRecipe`] when idle,
    /// [`BayError::RecipeIncomplete`] before every ingredient is done, or
    /// [`BayError::Economy`] if the output does not fit. The recipe stays
    /// active on any failure.
    pub fn finish_recipe(
        &mut self,
        resources: &mut ResourceBank,
    ) -> Result<Quantified<Resource>, BayError> {
        let active = self.active.as_ref().ok_or(BayError::NoActiveRecipe)?;
        if !active.is_complete() {
            return Err(BayError::RecipeIncomplete(active.id()));
        }
        let produced = active.produces().clone();
        resources.add(&produced.item, produced.quantity)?;
        info!(
            recipe = %active.id(),
            output = %produced.item.id,
            quantity = produced.quantity,
            "recipe finished"
        );
        self.clear_active();
        Ok(produced)
    }

    /// Pay an ingredient's resource bill from `resources`.
    ///
    /// # Errors
    ///
    /// Returns [`BayError::Economy`] if the bill cannot be covered. Nothing
    /// is removed on failure.
    pub fn expend_ingredient(
        ingredient: &Ingredient<Resource>,
        resources: &mut ResourceBank,
    ) -> Result<(), BayError> {
        resources.remove_all(core::slice::from_ref(ingredient.requirement()))?;
        Ok(())
    }

    // -- tick ----------------------------------------------------------------

    /// Run admission, assignment, work, and completion once.
    pub fn think(&mut self, ctx: &mut SlotContext<'_>) -> SlotTickReport {
        let mut report = SlotTickReport::default();
        self.admit_workers(ctx.citizens);
        self.assign_ingredients(ctx.resources);
        self.work(ctx, &mut report);
        self.complete(ctx.resources, &mut report);
        report
    }

    fn admit_workers(&mut self, citizens: &CitizenRegistry) {
        for worker in self.workers.iter() {
            let Some(citizen) = citizens.get(*worker) else {
                continue;
            };
            if let Some(active) = &self.active
                && !active.meets_requirements(citizen.skills())
            {
                continue;
            }
            let paired = self.pairings.contains_key(worker);
            if paired && citizen.needs_rest() {
                self.pairings.remove(worker);
                debug!(%worker, "worker released to rest");
            } else if !paired && citizen.is_rested() {
                self.pairings.insert(*worker, None);
            }
        }
    }

    fn assign_ingredients(&mut self, resources: &mut ResourceBank) {
        let Some(active) = self.active.as_ref() else {
            return;
        };
        for worker in self.workers.iter() {
            let Some(current) = self.pairings.get(worker).copied() else {
                continue;
            };
            let needs_work = current
                .is_none_or(|index| active.ingredient(index).is_none_or(Ingredient::is_complete));
            if !needs_work {
                continue;
            }
            let claimed: BTreeSet<usize> = self.pairings.values().filter_map(|i| *i).collect();
            let next = active
                .ingredients()
                .iter()
                .enumerate()
                .find(|(index, ingredient)| !ingredient.is_complete() && !claimed.contains(index));
            let Some((index, ingredient)) = next else {
                self.pairings.insert(*worker, None);
                continue;
            };
            if !self.charged.contains(&index) {
                if let Err(err) = Self::expend_ingredient(ingredient, resources) {
                    debug!(%worker, ingredient = index, error = %err, "ingredient bill not covered");
                    continue;
                }
                self.charged.insert(index);
            }
            self.pairings.insert(*worker, Some(index));
            debug!(%worker, ingredient = index, "worker assigned");
        }
    }

    fn work(&mut self, ctx: &mut SlotContext<'_>, report: &mut SlotTickReport) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        for worker in self.workers.iter() {
            let Some(Some(index)) = self.pairings.get(worker).copied() else {
                continue;
            };
            let Some(ingredient) = active.ingredient_mut(index) else {
                continue;
            };
            if ingredient.is_complete() {
                continue;
            }
            let Some(citizen) = ctx.citizens.get_mut(*worker) else {
                continue;
            };
            if !citizen.can_afford(ingredient.worker_cost()) {
                continue;
            }
            if let Err(err) = ctx.energy.draw(ingredient.station_cost()) {
                debug!(%worker, ingredient = index, error = %err, "station energy short");
                report.stalled = report.stalled.saturating_add(1);
                continue;
            }
            if citizen.spend_energy(ingredient.worker_cost()).is_err() {
                continue;
            }
            ingredient.process(1);
            report.worker_ticks = report.worker_ticks.saturating_add(1);
        }
    }

    fn complete(&mut self, resources: &mut ResourceBank, report: &mut SlotTickReport) {
        if let Some(active) = &self.active {
            if !active.is_complete() {
                return;
            }
            match self.finish_recipe(resources) {
                Ok(produced) => report.completed = Some(produced),
                Err(err) => {
                    warn!(error = %err, "finished recipe could not be stored, retrying next tick");
                    return;
                }
            }
        }
        if let Some(next) = self.lineup.pop_front() {
            self.install(next);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bayworks_economy::{Recipe, RegeneratingBank};
    use bayworks_types::SkillId;

    use super::*;
    use crate::citizen::Citizen;

    fn scrap() -> Resource {
        Resource::new(1, "Scrap", 1)
    }

    fn gear() -> Resource {
        Resource::new(2, "Gear", 1)
    }

    fn two_part_recipe() -> ProductionRecipe {
        Recipe::new(1, "Gear", Quantified::new(gear(), 1))
            .with_ingredient(Ingredient::new(Quantified::new(scrap(), 2), 3, 1, 1))
            .with_ingredient(Ingredient::new(Quantified::new(scrap(), 2), 3, 1, 1))
    }

    struct Bench {
        slot: ProductionBaySlot,
        energy: EnergyStore,
        resources: ResourceBank,
        citizens: CitizenRegistry,
    }

    impl Bench {
        fn new(seats: usize) -> Self {
            let mut resources = ResourceBank::unbounded();
            resources.add(&scrap(), 100).unwrap();
            Self {
                slot: ProductionBaySlot::new(seats),
                energy: EnergyStore::new(
                    RegeneratingBank::new(1000, 1000),
                    RegeneratingBank::new(100, 100),
                ),
                resources,
                citizens: CitizenRegistry::new(),
            }
        }

        fn seat(&mut self, citizen: Citizen) -> CitizenId {
            let id = self.citizens.insert(citizen);
            self.slot.add_worker(id).unwrap();
            id
        }

        fn tick(&mut self) -> SlotTickReport {
            let mut ctx = SlotContext {
                energy: &mut self.energy,
                resources: &mut self.resources,
                citizens: &mut self.citizens,
            };
            self.slot.think(&mut ctx)
        }
    }

    #[test]
    fn enqueue_activates_when_idle_then_queues() {
        let mut slot = ProductionBaySlot::new(1);
        assert_eq!(slot.state(), SlotState::Idle);
        slot.enqueue(&two_part_recipe());
        assert!(slot.active().is_some());
        assert_eq!(slot.lineup_len(), 0);
        slot.enqueue(&two_part_recipe());
        assert_eq!(slot.lineup_len(), 1);
        assert_eq!(slot.state(), SlotState::ActiveUnstaffed);
    }

    #[test]
    fn admitted_worker_is_assigned_and_works_same_tick() {
        let mut bench = Bench::new(2);
        let ada = bench.seat(Citizen::new("Ada", 100));
        bench.slot.enqueue(&two_part_recipe());
        let report = bench.tick();
        assert_eq!(bench.slot.assignment(ada), Some(0));
        assert_eq!(report.worker_ticks, 1);
        assert_eq!(bench.slot.state(), SlotState::ActiveWorking);
        assert_eq!(bench.resources.amount_of(scrap().id), 98);
        assert_eq!(bench.energy.pool().quantity(), 999);
        assert_eq!(
            bench.citizens.get(ada).map(|c| c.energy().quantity()),
            Some(99)
        );
    }

    #[test]
    fn workers_take_distinct_ingredients() {
        let mut bench = Bench::new(3);
        let a = bench.seat(Citizen::new("A", 100));
        let b = bench.seat(Citizen::new("B", 100));
        let c = bench.seat(Citizen::new("C", 100));
        bench.slot.enqueue(&two_part_recipe());
        bench.tick();
        assert_eq!(bench.slot.assignment(a), Some(0));
        assert_eq!(bench.slot.assignment(b), Some(1));
        assert_eq!(bench.slot.assignment(c), None);
        assert!(bench.slot.is_paired(c));
    }

    #[test]
    fn tired_worker_is_released_and_progress_kept() {
        let mut bench = Bench::new(1);
        let ada = bench.seat(Citizen::new("Ada", 100));
        bench.slot.enqueue(&two_part_recipe());
        bench.tick();
        bench.citizens.get_mut(ada).unwrap().spend_energy(95).unwrap();
        bench.tick();
        assert!(!bench.slot.is_paired(ada));
        let progress = bench.slot.active().map(|r| r.progress().quantity());
        assert_eq!(progress, Some(1));
    }

    #[test]
    fn unqualified_worker_is_skipped() {
        let mut bench = Bench::new(1);
        let ada = bench.seat(Citizen::new("Ada", 100));
        bench
            .slot
            .enqueue(&two_part_recipe().requiring(SkillId::from(7)));
        let report = bench.tick();
        assert!(!bench.slot.is_paired(ada));
        assert_eq!(report.worker_ticks, 0);
    }

    #[test]
    fn station_energy_failure_skips_work_only() {
        let mut bench = Bench::new(1);
        bench.energy = EnergyStore::default();
        let ada = bench.seat(Citizen::new("Ada", 100));
        bench.slot.enqueue(&two_part_recipe());
        let report = bench.tick();
        assert_eq!(report.stalled, 1);
        assert_eq!(report.worker_ticks, 0);
        assert_eq!(bench.slot.assignment(ada), Some(0));
        assert_eq!(
            bench.citizens.get(ada).map(|c| c.energy().quantity()),
            Some(100)
        );
    }

    #[test]
    fn lacking_resources_leaves_worker_waiting() {
        let mut bench = Bench::new(1);
        bench.resources = ResourceBank::unbounded();
        let ada = bench.seat(Citizen::new("Ada", 100));
        bench.slot.enqueue(&two_part_recipe());
        bench.tick();
        assert!(bench.slot.is_paired(ada));
        assert_eq!(bench.slot.assignment(ada), None);
    }

    #[test]
    fn finish_requires_active_and_complete() {
        let mut slot = ProductionBaySlot::new(1);
        let mut resources = ResourceBank::unbounded();
        assert_eq!(
            slot.finish_recipe(&mut resources),
            Err(BayError::NoActiveRecipe)
        );
        slot.enqueue(&two_part_recipe());
        assert_eq!(
            slot.finish_recipe(&mut resources),
            Err(BayError::RecipeIncomplete(two_part_recipe().id()))
        );
    }

    #[test]
    fn activate_from_lineup_bounds() {
        let mut slot = ProductionBaySlot::new(1);
        assert_eq!(
            slot.activate_from_lineup(0),
            Err(BayError::LineupEntryNotFound(0))
        );
        slot.enqueue(&two_part_recipe());
        slot.enqueue(&two_part_recipe());
        assert!(slot.activate_from_lineup(0).is_ok());
        assert_eq!(slot.lineup_len(), 0);
    }

    #[test]
    fn handed_over_ingredient_is_not_billed_twice() {
        let mut bench = Bench::new(1);
        let ada = bench.seat(Citizen::new("Ada", 100));
        bench.slot.enqueue(&two_part_recipe());
        bench.tick();
        assert_eq!(bench.resources.amount_of(scrap().id), 98);

        bench.slot.remove_worker(ada).unwrap();
        let bo = bench.seat(Citizen::new("Bo", 100));
        bench.tick();
        assert_eq!(bench.slot.assignment(bo), Some(0));
        assert_eq!(bench.resources.amount_of(scrap().id), 98);
        let progress = bench.slot.active().map(|r| r.progress().quantity());
        assert_eq!(progress, Some(2));
    }

    #[test]
    fn remove_worker_drops_pairing() {
        let mut bench = Bench::new(1);
        let ada = bench.seat(Citizen::new("Ada", 100));
        bench.slot.enqueue(&two_part_recipe());
        bench.tick();
        assert!(bench.slot.remove_worker(ada).is_ok());
        assert!(!bench.slot.is_paired(ada));
        assert_eq!(bench.slot.state(), SlotState::ActiveUnstaffed);
        assert_eq!(
            bench.slot.remove_worker(ada),
            Err(BayError::NotPresent(ada))
        );
    }
}
