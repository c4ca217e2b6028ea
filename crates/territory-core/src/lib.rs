//! Influence model, transition rule, and tick cycle for the Territory simulation.
//!
//! This crate owns the territory transition engine and the loop that drives
//! it at a fixed cadence.
//!
//! # Modules
//!
//! - [`clock`] -- Tick counter with checked advancement.
//! - [`config`] -- Configuration loading from `territory-config.yaml` into
//!   strongly-typed structs.
//! - [`draws`] -- [`DrawSource`] trait supplying each cell's uniform draws,
//!   with the seeded production source and fixed test sources.
//! - [`influence`] -- Neighbor- and proximity-weighted ownership
//!   distribution for one cell.
//! - [`operator`] -- Shared stop flag and run bounds.
//! - [`runner`] -- The async simulation loop: input draining, ticking,
//!   presenting, sleeping.
//! - [`setup`] -- Assembling a [`SimulationState`] from configuration.
//! - [`tick`] -- The tick driver: every cell, one snapshot, one swap.
//! - [`transition`] -- The per-cell transition rule.
//!
//! [`DrawSource`]: draws::DrawSource
//! [`SimulationState`]: tick::SimulationState

pub mod clock;
pub mod config;
pub mod draws;
pub mod influence;
pub mod operator;
pub mod runner;
pub mod setup;
pub mod tick;
pub mod transition;
