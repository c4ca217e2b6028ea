//! The influence model: who is likely to own a cell next.
//!
//! Given the 3x3 snapshot around a cell and every agent's avatar position,
//! [`Distribution::compute`] produces a normalized probability distribution
//! over {each agent, unowned}:
//!
//! 1. An agent is *near* when its avatar's Manhattan distance to the cell is
//!    strictly below `proximity_threshold`.
//! 2. Each of the nine samples (center included) adds 1.0 to its owner's
//!    bucket, or to the unowned bucket. Samples vote independently.
//! 3. Each sample owned by a near agent adds `proximity_bonus` more.
//! 4. The unowned bucket is multiplied by `unowned_damping`.
//! 5. Every bucket is divided by the total. A zero total is degenerate and
//!    resolves to unowned.
//!
//! [`Distribution::select`] maps the buckets onto contiguous sub-intervals of
//! `[0, 1)` in agent registration order, unowned last, and returns the
//! bucket containing a uniform sample.
//!
//! # Full Surround
//!
//! The unowned bucket only ever receives weight from unowned samples. When
//! all nine samples are owned, its weight is exactly zero and the takeover
//! is certain; no extra flooring is applied.

use serde::{Deserialize, Serialize};
use territory_types::{AgentId, Owner, Point};
use territory_world::Neighborhood;

/// Probability that a cell keeps its owner in a given tick.
pub const DEFAULT_STABILITY: f64 = 0.90;
/// Avatars strictly closer than this (Manhattan) reinforce their claims.
pub const DEFAULT_PROXIMITY_THRESHOLD: u32 = 8;
/// Extra weight per sample owned by a near agent.
pub const DEFAULT_PROXIMITY_BONUS: f64 = 7.0;
/// Multiplier applied to the unowned bucket.
pub const DEFAULT_UNOWNED_DAMPING: f64 = 0.05;

/// Weight contributed by every sample regardless of owner.
const BASE_WEIGHT: f64 = 1.0;

/// Tunable constants of the influence model and the transition rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InfluenceParams {
    /// Probability of the inertia branch (`stability` draw below this).
    #[serde(default = "default_stability")]
    pub stability: f64,

    /// Manhattan distance below which an agent counts as near.
    #[serde(default = "default_proximity_threshold")]
    pub proximity_threshold: u32,

    /// Extra weight per sample owned by a near agent.
    #[serde(default = "default_proximity_bonus")]
    pub proximity_bonus: f64,

    /// Multiplier applied to the accumulated unowned weight.
    #[serde(default = "default_unowned_damping")]
    pub unowned_damping: f64,
}

impl Default for InfluenceParams {
    fn default() -> Self {
        Self {
            stability: DEFAULT_STABILITY,
            proximity_threshold: DEFAULT_PROXIMITY_THRESHOLD,
            proximity_bonus: DEFAULT_PROXIMITY_BONUS,
            unowned_damping: DEFAULT_UNOWNED_DAMPING,
        }
    }
}

const fn default_stability() -> f64 {
    DEFAULT_STABILITY
}

const fn default_proximity_threshold() -> u32 {
    DEFAULT_PROXIMITY_THRESHOLD
}

const fn default_proximity_bonus() -> f64 {
    DEFAULT_PROXIMITY_BONUS
}

const fn default_unowned_damping() -> f64 {
    DEFAULT_UNOWNED_DAMPING
}

/// Normalized next-owner probabilities for one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    /// Probability per agent, in registration order.
    agents: Vec<f64>,
    /// Probability of becoming (or staying) unowned.
    unowned: f64,
}

impl Distribution {
    /// Compute the distribution for the cell at `cell`.
    ///
    /// `positions` holds every agent's avatar position in registration
    /// order. Samples owned by an agent missing from `positions` carry no
    /// weight.
    pub fn compute(
        neighborhood: &Neighborhood,
        cell: Point,
        positions: &[Point],
        params: &InfluenceParams,
    ) -> Self {
        let near: Vec<bool> = positions
            .iter()
            .map(|avatar| avatar.manhattan(cell) < params.proximity_threshold)
            .collect();

        let mut agents = vec![0.0; positions.len()];
        let mut unowned = 0.0;

        for owner in neighborhood.iter() {
            match owner {
                Some(agent) => {
                    let index = agent.index();
                    if let Some(weight) = agents.get_mut(index) {
                        *weight += BASE_WEIGHT;
                        if near.get(index).copied().unwrap_or(false) {
                            *weight += params.proximity_bonus;
                        }
                    }
                }
                None => unowned += BASE_WEIGHT,
            }
        }
        unowned *= params.unowned_damping;

        Self::normalized(agents, unowned)
    }

    /// A distribution that resolves to unowned with certainty.
    pub fn degenerate(agent_count: usize) -> Self {
        Self {
            agents: vec![0.0; agent_count],
            unowned: 1.0,
        }
    }

    /// Build from raw bucket weights, normalizing by their sum.
    ///
    /// Negative and non-finite weights count as zero. A zero total yields
    /// [`Distribution::degenerate`].
    pub fn normalized(mut agents: Vec<f64>, unowned: f64) -> Self {
        let sanitize = |weight: f64| if weight.is_finite() && weight > 0.0 { weight } else { 0.0 };
        for weight in &mut agents {
            *weight = sanitize(*weight);
        }
        let unowned = sanitize(unowned);
        let total = agents.iter().sum::<f64>() + unowned;
        if total <= 0.0 || !total.is_finite() {
            return Self::degenerate(agents.len());
        }
        for weight in &mut agents {
            *weight /= total;
        }
        Self {
            agents,
            unowned: unowned / total,
        }
    }

    /// Probability per agent, in registration order.
    pub fn agent_probabilities(&self) -> &[f64] {
        &self.agents
    }

    /// Probability of unowned.
    pub const fn unowned_probability(&self) -> f64 {
        self.unowned
    }

    /// Probability of a specific outcome.
    pub fn probability(&self, owner: Owner) -> f64 {
        owner.map_or(self.unowned, |agent| {
            self.agents.get(agent.index()).copied().unwrap_or(0.0)
        })
    }

    /// Whether every bit of weight sits on unowned.
    pub fn is_degenerate(&self) -> bool {
        self.agents.iter().all(|weight| *weight <= 0.0)
    }

    /// The `[start, end)` interval assigned to an outcome.
    ///
    /// Agents occupy consecutive intervals in registration order starting
    /// at 0; unowned fills the remainder up to 1.
    pub fn interval(&self, owner: Owner) -> (f64, f64) {
        match owner {
            Some(agent) => {
                let index = agent.index();
                let start: f64 = self.agents.iter().take(index).sum();
                let width = self.agents.get(index).copied().unwrap_or(0.0);
                (start, start + width)
            }
            None => (self.agents.iter().sum(), 1.0),
        }
    }

    /// Pick the outcome whose interval contains `z`, a uniform sample from
    /// `[0, 1)`.
    ///
    /// If the unowned bucket is empty, the rounding remainder at the top of
    /// the unit interval goes to the last agent with weight, so an outcome
    /// of probability zero is never returned.
    pub fn select(&self, z: f64) -> Owner {
        let mut upper = 0.0;
        let mut last_weighted = None;
        for (index, weight) in self.agents.iter().enumerate() {
            if *weight <= 0.0 {
                continue;
            }
            upper += *weight;
            last_weighted = AgentId::from_index(index);
            if z < upper {
                return last_weighted;
            }
        }
        if self.unowned > 0.0 { None } else { last_weighted }
    }
}
