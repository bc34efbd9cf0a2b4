// ABOUTME: Identifier of the slot a deployment run targets, used as a URL path segment.
// ABOUTME: Every phase call is addressed to exactly one DeployId.

use std::fmt;

use super::Slot;

/// Identifier of the slot a deployment run targets.
///
/// Only built from a [`Slot`], so it is always safe as a single path segment
/// and the orchestrator never has to escape it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeployId(String);

impl DeployId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Slot> for DeployId {
    fn from(slot: Slot) -> Self {
        Self(slot.as_str().to_string())
    }
}

impl fmt::Display for DeployId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_converts_to_its_name() {
        assert_eq!(DeployId::from(Slot::Blue).as_str(), "blue");
        assert_eq!(DeployId::from(Slot::Green).to_string(), "green");
    }

    #[test]
    fn ids_are_path_safe() {
        for slot in [Slot::Blue, Slot::Green] {
            let id = DeployId::from(slot);
            assert!(id.as_str().chars().all(|c| c.is_ascii_lowercase()));
        }
    }
}
