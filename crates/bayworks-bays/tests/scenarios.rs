//! End-to-end station and bay scenarios.
//!
//! Each test builds a small bay from scratch, drives it tick by tick, and
//! checks the observable state afterward: cargo, energy banks, rosters,
//! and worker assignments.

// Integration tests use unwrap extensively for clarity -- panicking on
// failure is the correct behavior in test code.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use std::collections::BTreeSet;

use bayworks_bays::{
    BayError, Citizen, CitizenRegistry, ProductionBay, ProductionBaySlot, SlotContext, SlotState,
    Thinkable, TickContext,
};
use bayworks_economy::{
    EnergyStore, Ingredient, PowerGrid, ProductionRecipe, Recipe, RegeneratingBank, ResourceBank,
};
use bayworks_types::{CitizenId, ErrorKind, Quantified, Resource};

// =============================================================================
// Fixtures
// =============================================================================

fn scrap() -> Resource {
    Resource::new(1, "Scrap", 1)
}

fn plating() -> Resource {
    Resource::new(2, "Plating", 1)
}

fn plating_recipe() -> ProductionRecipe {
    Recipe::new(1, "Plating", Quantified::new(plating(), 1))
        .with_ingredient(Ingredient::new(Quantified::new(scrap(), 4), 10, 1, 1))
}

struct Station {
    slot: ProductionBaySlot,
    energy: EnergyStore,
    resources: ResourceBank,
    citizens: CitizenRegistry,
}

impl Station {
    fn new(seats: usize, pool: u32, reserve: u32) -> Self {
        let mut resources = ResourceBank::unbounded();
        resources.add(&scrap(), 1000).unwrap();
        Self {
            slot: ProductionBaySlot::new(seats),
            energy: EnergyStore::new(
                RegeneratingBank::new(pool, pool),
                RegeneratingBank::new(reserve, reserve),
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

    fn seat_rested(&mut self, count: usize) -> Vec<CitizenId> {
        (0..count)
            .map(|n| self.seat(Citizen::new(format!("Worker {n}"), 1000)))
            .collect()
    }

    fn tick(&mut self) -> bayworks_bays::SlotTickReport {
        let mut ctx = SlotContext {
            energy: &mut self.energy,
            resources: &mut self.resources,
            citizens: &mut self.citizens,
        };
        self.slot.think(&mut ctx)
    }
}

// =============================================================================
// Production cycle
// =============================================================================

#[test]
fn full_production_cycle_yields_exactly_one_output() {
    let mut station = Station::new(4, 1000, 100);
    station.seat_rested(4);
    station.slot.enqueue(&plating_recipe());

    let mut finished_at = None;
    for tick in 1..=50 {
        if station.tick().completed.is_some() {
            finished_at = Some(tick);
        }
    }

    assert_eq!(finished_at, Some(10));
    assert_eq!(station.resources.amount_of(plating().id), 1);
    assert_eq!(station.resources.amount_of(scrap().id), 996);
    assert!(station.energy.pool().quantity() < 1000);
    assert_eq!(station.energy.pool().quantity(), 990);
    assert_eq!(station.energy.reserve().quantity(), 100);
    assert_eq!(station.slot.state(), SlotState::Idle);
}

#[test]
fn station_energy_spills_from_pool_into_reserve() {
    let mut station = Station::new(1, 4, 100);
    station.seat_rested(1);
    station.slot.enqueue(&plating_recipe());
    for _ in 0..10 {
        station.tick();
    }
    assert_eq!(station.resources.amount_of(plating().id), 1);
    assert_eq!(station.energy.pool().quantity(), 0);
    assert_eq!(station.energy.reserve().quantity(), 94);
}

#[test]
fn output_waits_when_cargo_is_full() {
    let mut station = Station::new(1, 1000, 0);
    station.resources = ResourceBank::with_capacity(4);
    station.resources.add(&scrap(), 4).unwrap();
    station.seat_rested(1);
    station.slot.enqueue(&plating_recipe());
    station.tick();
    // the bill emptied the hold; refill it so the output has nowhere to go
    station.resources.add(&scrap(), 4).unwrap();
    for _ in 1..12 {
        assert!(station.tick().completed.is_none());
    }
    assert!(station.slot.active().is_some_and(Recipe::is_complete));
    station.resources.remove(scrap().id, 1).unwrap();
    assert!(station.tick().completed.is_some());
    assert_eq!(station.resources.amount_of(plating().id), 1);
}

// =============================================================================
// Rosters and requests
// =============================================================================

#[test]
fn eleventh_worker_is_rejected() {
    let mut station = Station::new(10, 0, 0);
    station.seat_rested(10);
    let extra = station.citizens.insert(Citizen::new("Extra", 1000));
    let result = station.slot.add_worker(extra);
    assert_eq!(result, Err(BayError::RosterFull { limit: 10 }));
    assert_eq!(result.unwrap_err().kind(), ErrorKind::CapacityExceeded);
    assert_eq!(station.slot.workers().len(), 10);
}

#[test]
fn unsupported_recipe_is_not_crafted() {
    let mut bay = ProductionBay::new(
        "Smelter",
        4,
        EnergyStore::default(),
        ResourceBank::unbounded(),
    )
    .with_station_limit(2);
    bay.add_production_station(2).unwrap();
    let result = bay.craft(&plating_recipe(), None);
    assert_eq!(result, Err(BayError::UnsupportedRecipe(plating_recipe().id())));
    assert_eq!(result.unwrap_err().kind(), ErrorKind::UnsupportedOperation);
    assert!(bay.station(0).unwrap().active().is_none());
    assert_eq!(bay.station(0).unwrap().lineup_len(), 0);
}

// =============================================================================
// State machine
// =============================================================================

#[test]
fn lineup_chains_in_the_same_call() {
    let instant = Recipe::new(2, "Instant", Quantified::new(plating(), 3))
        .with_ingredient(Ingredient::new(Quantified::new(scrap(), 0), 0, 1, 0));
    let mut station = Station::new(1, 0, 0);
    station.slot.enqueue(&instant);
    station.slot.enqueue(&plating_recipe());
    assert_eq!(station.slot.lineup_len(), 1);

    let report = station.tick();

    assert_eq!(report.completed.map(|q| q.quantity), Some(3));
    assert_eq!(station.slot.lineup_len(), 0);
    assert_eq!(
        station.slot.active().map(Recipe::id),
        Some(plating_recipe().id())
    );
    assert_eq!(station.resources.amount_of(plating().id), 3);
}

#[test]
fn idle_station_picks_up_lineup_head() {
    let mut station = Station::new(1, 1000, 0);
    station.slot.enqueue(&plating_recipe());
    station.slot.enqueue(&plating_recipe());
    station.slot.clear_active();
    assert_eq!(station.slot.state(), SlotState::Idle);
    station.tick();
    assert!(station.slot.active().is_some());
    assert_eq!(station.slot.lineup_len(), 0);
}

#[test]
fn finishing_twice_is_invalid_state() {
    let instant = Recipe::new(2, "Instant", Quantified::new(plating(), 1))
        .with_ingredient(Ingredient::new(Quantified::new(scrap(), 0), 0, 1, 0));
    let mut slot = ProductionBaySlot::new(1);
    let mut resources = ResourceBank::unbounded();
    slot.enqueue(&instant);
    assert!(slot.finish_recipe(&mut resources).is_ok());
    let second = slot.finish_recipe(&mut resources);
    assert_eq!(second, Err(BayError::NoActiveRecipe));
    assert_eq!(second.unwrap_err().kind(), ErrorKind::InvalidState);
    assert_eq!(resources.amount_of(plating().id), 1);
}

#[test]
fn no_ingredient_is_ever_shared_and_progress_never_drops() {
    let recipe = Recipe::new(3, "Frame", Quantified::new(plating(), 1))
        .with_ingredient(Ingredient::new(Quantified::new(scrap(), 1), 40, 1, 1))
        .with_ingredient(Ingredient::new(Quantified::new(scrap(), 1), 30, 1, 1))
        .with_ingredient(Ingredient::new(Quantified::new(scrap(), 1), 20, 2, 1));
    let mut station = Station::new(5, 10_000, 0);
    // uneven energy so workers drop out and come back at different times
    let workers: Vec<CitizenId> = (0..5u32)
        .map(|n| station.seat(Citizen::new("Worker", 100).with_energy(60 - 3 * n)))
        .collect();
    station.slot.enqueue(&recipe);

    let mut last: Vec<u32> = vec![0; 3];
    for _ in 0..200 {
        station.tick();
        let Some(active) = station.slot.active() else {
            break;
        };

        let claimed: Vec<usize> = station.slot.assignments().map(|(_, i)| i).collect();
        let unique: BTreeSet<usize> = claimed.iter().copied().collect();
        assert_eq!(claimed.len(), unique.len(), "ingredient claimed twice");

        for (index, ingredient) in active.ingredients().iter().enumerate() {
            let now = ingredient.progress().quantity();
            assert!(now >= last[index], "progress dropped on ingredient {index}");
            last[index] = now;
        }

        for id in &workers {
            if !station.slot.is_paired(*id) {
                station.citizens.get_mut(*id).unwrap().rest(10);
            }
        }
    }
    assert!(station.slot.is_idle(), "recipe never finished");
    assert_eq!(station.resources.amount_of(plating().id), 1);
}

// =============================================================================
// Bay-level tick
// =============================================================================

#[test]
fn stations_share_the_bay_pool() {
    let mut bay = ProductionBay::new(
        "Works",
        8,
        EnergyStore::new(RegeneratingBank::new(1, 1), RegeneratingBank::new(0, 0)),
        ResourceBank::unbounded(),
    )
    .supporting(plating_recipe().id())
    .with_station_limit(2);
    bay.resources_mut().add(&scrap(), 100).unwrap();
    bay.add_production_station(1).unwrap();
    bay.add_production_station(1).unwrap();

    let mut citizens = CitizenRegistry::new();
    for station in 0..2 {
        let id = citizens.insert(Citizen::new("Worker", 1000));
        bay.add_worker(id, station).unwrap();
        bay.craft(&plating_recipe(), Some(station)).unwrap();
    }

    let mut grid = PowerGrid::new();
    let mut ctx = TickContext {
        citizens: &mut citizens,
        grid: &mut grid,
    };
    let report = bay.think(&mut ctx);

    // one unit of pool energy: station 0 spends it, station 1 stalls
    assert_eq!(report.worker_ticks, 1);
    assert_eq!(report.stalled, 1);
    assert_eq!(bay.energy().available(), 0);
}

#[test]
fn citizen_works_one_station_per_tick() {
    let mut bay = ProductionBay::new(
        "Works",
        8,
        EnergyStore::new(RegeneratingBank::new(10, 10), RegeneratingBank::new(0, 0)),
        ResourceBank::unbounded(),
    )
    .supporting(plating_recipe().id())
    .with_station_limit(2);
    bay.resources_mut().add(&scrap(), 100).unwrap();
    bay.add_production_station(2).unwrap();
    bay.add_production_station(2).unwrap();

    let mut citizens = CitizenRegistry::new();
    let ada = citizens.insert(Citizen::new("Ada", 100));
    bay.add_worker(ada, 0).unwrap();
    let err = bay.add_worker(ada, 1).unwrap_err();
    assert_eq!(err, BayError::AlreadyPresent(ada));
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    for station in 0..2 {
        bay.craft(&plating_recipe(), Some(station)).unwrap();
    }

    let mut grid = PowerGrid::new();
    let mut ctx = TickContext {
        citizens: &mut citizens,
        grid: &mut grid,
    };
    let report = bay.think(&mut ctx);

    assert_eq!(report.worker_ticks, 1);
    assert_eq!(citizens.get(ada).map(|c| c.energy().quantity()), Some(99));
}
