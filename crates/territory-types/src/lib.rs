//! Shared type definitions for the Territory simulation.
//!
//! This crate is the single source of truth for the small value types that
//! cross crate boundaries: agent identifiers, grid geometry, display colors,
//! and the input events produced by the keyboard poller.
//!
//! # Modules
//!
//! - [`ids`] -- Index-based [`AgentId`] in registration order.
//! - [`geometry`] -- [`Point`], [`GridSize`], and cardinal [`Direction`].
//! - [`enums`] -- Presentation enums such as [`AgentColor`].
//! - [`input`] -- [`InputEvent`] delivered from the input task to the loop.

pub mod enums;
pub mod geometry;
pub mod ids;
pub mod input;

pub use enums::AgentColor;
pub use geometry::{Direction, GridSize, Point};
pub use ids::{AgentId, Owner};
pub use input::InputEvent;
