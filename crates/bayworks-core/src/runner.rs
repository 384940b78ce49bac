//! Bounded simulation loop.
//!
//! [`run_simulation`] drives [`Colony::tick`] a fixed number of times and
//! accumulates what the colony produced and learned along the way. Ticks
//! run back to back; pacing is left to the caller.

use std::collections::BTreeMap;

use bayworks_types::{KnowledgeId, ResourceId};
use tracing::{info, warn};

use crate::colony::{Colony, TickSummary};
use crate::error::ColonyError;

/// Result of a simulation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationResult {
    /// Total number of ticks executed.
    pub total_ticks: u64,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Output stored over the whole run, per resource.
    pub produced: BTreeMap<ResourceId, u32>,
    /// Knowledge finalized over the whole run, in completion order.
    pub researched: Vec<KnowledgeId>,
    /// Production work steps skipped for lack of bay energy.
    pub stalled: u32,
}

impl SimulationResult {
    fn record(&mut self, summary: TickSummary) {
        self.total_ticks = self.total_ticks.saturating_add(1);
        self.stalled = self.stalled.saturating_add(summary.stalled);
        for (resource, quantity) in &summary.produced {
            let total = self.produced.entry(*resource).or_insert(0);
            *total = total.saturating_add(*quantity);
        }
        self.researched
            .extend(summary.completed_research.iter().copied());
        self.final_summary = Some(summary);
    }
}

/// Run `colony` for `max_ticks` ticks.
///
/// # Errors
///
/// Returns [`ColonyError`] if a tick cannot be executed.
pub fn run_simulation(colony: &mut Colony, max_ticks: u64) -> Result<SimulationResult, ColonyError> {
    let mut result = SimulationResult::default();

    info!(
        max_ticks,
        start_tick = colony.tick_count(),
        "Simulation starting"
    );

    for _ in 0..max_ticks {
        let summary = colony.tick()?;
        for (resource, quantity) in &summary.produced {
            info!(tick = summary.tick, %resource, quantity, "Output stored");
        }
        for knowledge in &summary.completed_research {
            info!(tick = summary.tick, %knowledge, "Research completed");
        }
        result.record(summary);
    }

    Ok(result)
}

/// Log the outcome of a run.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        stalled = result.stalled,
        researched = result.researched.len(),
        "Simulation ended"
    );

    for (resource, quantity) in &result.produced {
        info!(%resource, quantity, "Total output");
    }

    if let Some(ref summary) = result.final_summary {
        info!(
            tick = summary.tick,
            grid_available = summary.grid_available,
            worker_ticks = summary.worker_ticks,
            "Final tick summary"
        );
    } else {
        warn!("Simulation ended with no ticks executed");
    }
}
