//! Headless reporter.
//!
//! Without a terminal the run is observed through logs: every
//! `summary_every_ticks` ticks a territory summary is logged and kept as a
//! sample. When the run ends, the samples and final counts can be written
//! as a JSON report.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use territory_core::operator::SimulationEndReason;
use territory_core::runner::{SimulationResult, TickCallback};
use territory_core::tick::{SimulationState, TickSummary};
use tracing::info;

use crate::error::EngineError;

/// Tick callback logging periodic summaries.
#[derive(Debug)]
pub struct HeadlessReporter {
    every: u64,
    names: Vec<String>,
    samples: Vec<TickSummary>,
}

impl HeadlessReporter {
    /// Reporter sampling every `every` ticks (0 disables sampling).
    pub fn new(every: u64, state: &SimulationState) -> Self {
        Self {
            every,
            names: state.roster.iter().map(|agent| agent.name().to_owned()).collect(),
            samples: Vec::new(),
        }
    }

    /// Summaries recorded so far.
    #[cfg(test)]
    pub fn samples(&self) -> &[TickSummary] {
        &self.samples
    }

    /// Build the end-of-run report.
    pub fn report(
        &self,
        seed: u64,
        state: &SimulationState,
        result: &SimulationResult,
    ) -> RunReport {
        let size = state.grid.size();
        let territory = state.grid.territory_counts(state.roster.len());
        let agents = state
            .roster
            .iter()
            .enumerate()
            .map(|(index, agent)| AgentReport {
                name: agent.name().to_owned(),
                symbol: agent.symbol(),
                territory: territory.owned_by(index),
                avatar: (agent.position().x, agent.position().y),
            })
            .collect();

        RunReport {
            generated_at: Utc::now(),
            seed,
            width: size.width,
            height: size.height,
            end_reason: result.end_reason,
            total_ticks: result.total_ticks,
            unowned: territory.unowned,
            agents,
            samples: self.samples.clone(),
        }
    }
}

impl TickCallback for HeadlessReporter {
    fn on_tick(&mut self, summary: &TickSummary, _state: &SimulationState) {
        if self.every > 0 && summary.tick.checked_rem(self.every) == Some(0) {
            let territory: Vec<String> = self
                .names
                .iter()
                .enumerate()
                .map(|(index, name)| format!("{name}={}", summary.territory.owned_by(index)))
                .collect();
            info!(
                tick = summary.tick,
                territory = territory.join(" "),
                unowned = summary.territory.unowned,
                changed = summary.changed_cells,
                "Tick summary"
            );
            self.samples.push(summary.clone());
        }
    }
}

/// Per-agent line of a [`RunReport`].
#[derive(Debug, Clone, Serialize)]
pub struct AgentReport {
    /// Agent name.
    pub name: String,
    /// Symbol painted on owned cells.
    pub symbol: char,
    /// Cells owned at the end of the run.
    pub territory: usize,
    /// Final avatar position.
    pub avatar: (i32, i32),
}

/// JSON report written at the end of a headless run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
    /// World seed of the run.
    pub seed: u64,
    /// Grid width.
    pub width: u32,
    /// Grid height.
    pub height: u32,
    /// Why the run ended.
    pub end_reason: SimulationEndReason,
    /// Ticks executed.
    pub total_ticks: u64,
    /// Unowned cells at the end of the run.
    pub unowned: usize,
    /// Final standing per agent, in registration order.
    pub agents: Vec<AgentReport>,
    /// Periodic tick summaries.
    pub samples: Vec<TickSummary>,
}

impl RunReport {
    /// Write the report as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<(), EngineError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| EngineError::ReportWrite {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), "Run report written");
        Ok(())
    }
}
