//! Configuration loading and typed config structures for the Territory simulation.
//!
//! The canonical configuration lives in `territory-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror the
//! YAML structure, a loader that reads the file, and [`SimulationConfig::validate`]
//! which rejects values the engine cannot start with.
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! classic two-agent 70x40 game.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use territory_types::{AgentColor, GridSize, Point};

use crate::influence::InfluenceParams;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value is syntactically fine but unusable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `territory-config.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Grid size, seed, and cadence.
    #[serde(default)]
    pub world: WorldConfig,

    /// Influence model and transition rule constants.
    #[serde(default)]
    pub influence: InfluenceParams,

    /// Competing agents in registration order. The first one is controlled
    /// by the keyboard.
    #[serde(default = "default_agents")]
    pub agents: Vec<AgentConfig>,

    /// Run boundaries.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Front-end settings.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            influence: InfluenceParams::default(),
            agents: default_agents(),
            simulation: SimulationBoundsConfig::default(),
            display: DisplayConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `TERRITORY_SEED` overrides `world.seed`
    /// - `TERRITORY_HEADLESS` overrides `display.headless`
    /// - `TERRITORY_MAX_TICKS` overrides `simulation.max_ticks`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string. No environment overrides
    /// are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup. Unparseable values are
    /// ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(seed) = lookup("TERRITORY_SEED").and_then(|raw| raw.trim().parse().ok()) {
            self.world.seed = Some(seed);
        }
        if let Some(raw) = lookup("TERRITORY_HEADLESS") {
            match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => self.display.headless = true,
                "0" | "false" | "no" => self.display.headless = false,
                _ => {}
            }
        }
        if let Some(max) = lookup("TERRITORY_MAX_TICKS").and_then(|raw| raw.trim().parse().ok()) {
            self.simulation.max_ticks = max;
        }
    }

    /// Grid dimensions as a [`GridSize`].
    pub const fn grid_size(&self) -> GridSize {
        GridSize::new(self.world.width, self.world.height)
    }

    /// Check every value the engine depends on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| Err(ConfigError::Invalid { reason });

        if self.world.width == 0 || self.world.height == 0 {
            return invalid(format!(
                "grid must be at least 1x1, got {}x{}",
                self.world.width, self.world.height
            ));
        }

        let influence = &self.influence;
        for (name, value) in [
            ("influence.stability", influence.stability),
            ("influence.unowned_damping", influence.unowned_damping),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return invalid(format!("{name} must be within [0, 1], got {value}"));
            }
        }
        if !influence.proximity_bonus.is_finite() || influence.proximity_bonus < 0.0 {
            return invalid(format!(
                "influence.proximity_bonus must be a non-negative number, got {}",
                influence.proximity_bonus
            ));
        }

        if self.agents.is_empty() {
            return invalid("at least one agent must be configured".to_owned());
        }
        let size = self.grid_size();
        let mut names = BTreeSet::new();
        for agent in &self.agents {
            if agent.name.trim().is_empty() {
                return invalid("agent names must not be empty".to_owned());
            }
            if !names.insert(agent.name.as_str()) {
                return invalid(format!("duplicate agent name: {}", agent.name));
            }
            if !size.contains(agent.start) {
                return invalid(format!(
                    "agent {} starts at {} outside the {}x{} grid",
                    agent.name, agent.start, size.width, size.height
                ));
            }
            if let Some(cell) = agent.seed_cells.iter().find(|cell| !size.contains(**cell)) {
                return invalid(format!(
                    "agent {} seed cell {cell} is outside the grid",
                    agent.name
                ));
            }
        }

        Ok(())
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Number of columns.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Number of rows.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Random seed for reproducibility. `None` draws one from entropy at
    /// startup.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Real-time milliseconds per tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            seed: None,
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// One competing agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Unique human-readable name.
    pub name: String,

    /// Symbol painted on owned cells.
    pub symbol: char,

    /// Color painted on owned cells.
    pub color: AgentColor,

    /// Initial avatar position.
    #[serde(default)]
    pub start: Point,

    /// Cells claimed at fixed coordinates.
    #[serde(default)]
    pub seed_cells: Vec<Point>,

    /// Cells claimed at random unowned coordinates.
    #[serde(default = "default_random_seeds")]
    pub random_seeds: u32,
}

/// Simulation boundary configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Stop after this many ticks (0 = unlimited).
    #[serde(default)]
    pub max_ticks: u64,

    /// Stop after this many wall-clock seconds (0 = unlimited).
    #[serde(default)]
    pub max_real_time_seconds: u64,
}

/// Front-end configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Run without a terminal UI.
    #[serde(default)]
    pub headless: bool,

    /// Where to write a JSON run report in headless mode.
    #[serde(default)]
    pub report_path: Option<String>,

    /// Log a tick summary every this many ticks in headless mode.
    #[serde(default = "default_summary_every_ticks")]
    pub summary_every_ticks: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            headless: false,
            report_path: None,
            summary_every_ticks: default_summary_every_ticks(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

const fn default_width() -> u32 {
    70
}

const fn default_height() -> u32 {
    40
}

const fn default_tick_interval_ms() -> u64 {
    1000
}

const fn default_random_seeds() -> u32 {
    2
}

const fn default_summary_every_ticks() -> u64 {
    10
}

fn default_log_filter() -> String {
    "info".to_owned()
}

fn default_agents() -> Vec<AgentConfig> {
    vec![
        AgentConfig {
            name: "david".to_owned(),
            symbol: 'B',
            color: AgentColor::Green,
            start: Point::new(0, 0),
            seed_cells: Vec::new(),
            random_seeds: default_random_seeds(),
        },
        AgentConfig {
            name: "enemy".to_owned(),
            symbol: 'T',
            color: AgentColor::Blue,
            start: Point::new(20, 20),
            seed_cells: Vec::new(),
            random_seeds: default_random_seeds(),
        },
    ]
}
