//! Index-based agent identifiers.
//!
//! Agents are registered once at game start and never removed, so an agent's
//! position in the registration order is a stable identity for the lifetime
//! of the process. Influence weight buckets and grid cells both key on this
//! index rather than on memory identity, which keeps ownership unambiguous
//! across buffer swaps.

use serde::{Deserialize, Serialize};

/// Unique identifier for an agent: its zero-based registration index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl AgentId {
    /// Build an identifier from a registration index.
    ///
    /// Returns `None` if the index does not fit the identifier width.
    pub fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }

    /// Return the registration index as a `usize` for slice lookups.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl core::fmt::Display for AgentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

/// The owner of a grid cell: exactly one agent, or `None` for unowned.
///
/// A cell holds a single slot, so ownership is mutually exclusive by
/// construction.
pub type Owner = Option<AgentId>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips_through_from_index() {
        let id = AgentId::from_index(3).unwrap();
        assert_eq!(id, AgentId(3));
        assert_eq!(id.index(), 3);
    }

    #[test]
    fn display_is_human_readable() {
        assert_eq!(AgentId(7).to_string(), "agent#7");
    }

    #[test]
    fn ordering_follows_registration() {
        assert!(AgentId(0) < AgentId(1));
    }
}
