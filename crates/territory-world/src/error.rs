//! Error types for the `territory-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`]. None of them
//! fire during a tick: out-of-bounds reads are unowned and out-of-bounds
//! avatar moves are ignored per axis. These errors only guard construction
//! and seeding.

use territory_types::{AgentId, Point};

/// Errors that can occur during grid and roster operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The grid dimensions are zero or too large to address.
    #[error("invalid grid size {width}x{height}")]
    InvalidGridSize {
        /// Requested column count.
        width: u32,
        /// Requested row count.
        height: u32,
    },

    /// A coordinate that must be inside the grid was not.
    #[error("point {0} is outside the grid")]
    OutOfBounds(Point),

    /// Two agents were registered under the same name.
    #[error("duplicate agent name: {0}")]
    DuplicateAgentName(String),

    /// No agent is registered under this identifier.
    #[error("agent not found: {0}")]
    AgentNotFound(AgentId),

    /// The roster cannot address any more agents.
    #[error("too many agents registered")]
    TooManyAgents,
}
