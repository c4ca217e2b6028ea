//! Input events produced by the keyboard poller.
//!
//! The poller runs as its own task and never touches the grid. It only
//! enqueues these events; the simulation loop drains at most one per tick.

use serde::{Deserialize, Serialize};

use crate::geometry::Direction;

/// A discrete command delivered from the input task to the simulation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputEvent {
    /// Move the controlled agent's avatar one cell.
    Move(Direction),
    /// Stop the input task and end the simulation loop.
    Terminate,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_as_tagged_values() {
        let json = serde_json::to_string(&InputEvent::Move(Direction::Left)).unwrap();
        assert_eq!(json, r#"{"move":"left"}"#);
        let json = serde_json::to_string(&InputEvent::Terminate).unwrap();
        assert_eq!(json, r#""terminate""#);
    }
}
