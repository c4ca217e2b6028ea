//! Presentation enums.
//!
//! None of these values influence the simulation outcome; they exist so the
//! configuration file and the renderer agree on how agents are displayed.

use serde::{Deserialize, Serialize};

/// Display color of an agent's territory.
///
/// The palette is the eight basic terminal colors, which every terminal the
/// renderer targets can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentColor {
    /// Black.
    Black,
    /// Red.
    Red,
    /// Green.
    Green,
    /// Yellow.
    Yellow,
    /// Blue.
    Blue,
    /// Magenta.
    Magenta,
    /// Cyan.
    Cyan,
    /// White.
    White,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn colors_parse_from_snake_case() {
        let color: AgentColor = serde_yml::from_str("magenta").unwrap();
        assert_eq!(color, AgentColor::Magenta);
        assert!(serde_yml::from_str::<AgentColor>("mauve").is_err());
    }
}
