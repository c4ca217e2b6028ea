//! Ownership grid, neighborhood sampling, and agents for the Territory simulation.
//!
//! This crate models the physical state of a game: the double-buffered grid
//! that records who owns which cell, the 3x3 neighborhood snapshots the
//! transition rule reads, and the roster of agents with their avatars.
//!
//! # Modules
//!
//! - [`agent`] -- [`Agent`] identity and avatar, and the ordered
//!   [`AgentRoster`].
//! - [`error`] -- Error types for grid and roster operations.
//! - [`grid`] -- The double-buffered [`OwnershipGrid`] and its read-only
//!   [`GridView`].
//! - [`neighborhood`] -- The 9-sample [`Neighborhood`] snapshot.
//! - [`seeding`] -- Initial territory claims applied to both buffers.

pub mod agent;
pub mod error;
pub mod grid;
pub mod neighborhood;
pub mod seeding;

// Re-export primary types at crate root.
pub use agent::{Agent, AgentRoster};
pub use error::WorldError;
pub use grid::{BufferRole, GridView, OwnershipGrid, TerritoryCounts};
pub use neighborhood::Neighborhood;
pub use seeding::{SeedReport, SeedSpec, seed_grid};
