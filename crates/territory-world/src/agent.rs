//! Agents: identity plus an independently moving avatar.
//!
//! An agent's avatar position has nothing to do with the cells it owns. The
//! avatar only matters to the influence model, which reinforces an agent's
//! claims near its avatar. Avatar positions are always inside the grid:
//! every update goes through [`Agent::set_avatar_position`], which validates
//! each axis on its own.

use territory_types::{AgentColor, AgentId, Direction, GridSize, Point};
use tracing::debug;

use crate::error::WorldError;

/// A competing agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    id: AgentId,
    name: String,
    symbol: char,
    color: AgentColor,
    position: Point,
}

impl Agent {
    /// Registration-order identifier.
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Unique human-readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Symbol painted on owned cells.
    pub const fn symbol(&self) -> char {
        self.symbol
    }

    /// Color painted on owned cells.
    pub const fn color(&self) -> AgentColor {
        self.color
    }

    /// Current avatar position.
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Move the avatar, validating each axis independently.
    ///
    /// An in-bounds `x` is applied even if `y` is rejected, and vice versa.
    /// Rejected axes are silently ignored.
    pub fn set_avatar_position(&mut self, x: i32, y: i32, bounds: GridSize) {
        if bounds.contains_x(x) {
            self.position.x = x;
        }
        if bounds.contains_y(y) {
            self.position.y = y;
        }
    }

    /// Step the avatar one cell; a step off the grid leaves it in place.
    pub fn apply_move(&mut self, direction: Direction, bounds: GridSize) {
        if let Some(target) = self.position.step(direction) {
            self.set_avatar_position(target.x, target.y, bounds);
        }
    }

    /// Manhattan distance from the avatar to a cell.
    pub const fn distance_to(&self, cell: Point) -> u32 {
        self.position.manhattan(cell)
    }
}

/// All agents of a game, in registration order.
///
/// Registration order fixes both the agents' identifiers and the order of
/// their probability intervals in the influence model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRoster {
    bounds: GridSize,
    agents: Vec<Agent>,
}

impl AgentRoster {
    /// Create an empty roster for a grid of the given size.
    pub const fn new(bounds: GridSize) -> Self {
        Self {
            bounds,
            agents: Vec::new(),
        }
    }

    /// Register a new agent and return its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateAgentName`] if the name is taken,
    /// [`WorldError::OutOfBounds`] if `start` is outside the grid, or
    /// [`WorldError::TooManyAgents`] if no identifier is left.
    pub fn register(
        &mut self,
        name: &str,
        symbol: char,
        color: AgentColor,
        start: Point,
    ) -> Result<AgentId, WorldError> {
        if self.agents.iter().any(|agent| agent.name == name) {
            return Err(WorldError::DuplicateAgentName(name.to_owned()));
        }
        if !self.bounds.contains(start) {
            return Err(WorldError::OutOfBounds(start));
        }
        let id = AgentId::from_index(self.agents.len()).ok_or(WorldError::TooManyAgents)?;
        self.agents.push(Agent {
            id,
            name: name.to_owned(),
            symbol,
            color,
            position: start,
        });
        debug!(agent = %id, name, %start, "agent registered");
        Ok(id)
    }

    /// Grid bounds every avatar is confined to.
    pub const fn bounds(&self) -> GridSize {
        self.bounds
    }

    /// Look up an agent.
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.index())
    }

    /// Move an agent's avatar one cell and return its new position.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::AgentNotFound`] if `id` is not registered.
    pub fn move_agent(&mut self, id: AgentId, direction: Direction) -> Result<Point, WorldError> {
        let bounds = self.bounds;
        let agent = self
            .agents
            .get_mut(id.index())
            .ok_or(WorldError::AgentNotFound(id))?;
        agent.apply_move(direction, bounds);
        Ok(agent.position)
    }

    /// Place an agent's avatar, validating each axis independently.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::AgentNotFound`] if `id` is not registered.
    pub fn set_avatar_position(
        &mut self,
        id: AgentId,
        x: i32,
        y: i32,
    ) -> Result<Point, WorldError> {
        let bounds = self.bounds;
        let agent = self
            .agents
            .get_mut(id.index())
            .ok_or(WorldError::AgentNotFound(id))?;
        agent.set_avatar_position(x, y, bounds);
        Ok(agent.position)
    }

    /// Avatar positions in registration order.
    pub fn positions(&self) -> Vec<Point> {
        self.agents.iter().map(Agent::position).collect()
    }

    /// Iterate the agents in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    /// Number of registered agents.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether no agents are registered.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
