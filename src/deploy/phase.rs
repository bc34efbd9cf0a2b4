// ABOUTME: The ordered phases of a deployment run.
// ABOUTME: Begin, Secrets, Function, Statics, Activate; always executed in this order.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    Begin,
    Secrets,
    Function,
    Statics,
    Activate,
}

impl Phase {
    /// All phases in execution order.
    pub const ALL: [Phase; 5] = [
        Phase::Begin,
        Phase::Secrets,
        Phase::Function,
        Phase::Statics,
        Phase::Activate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Begin => "begin",
            Phase::Secrets => "secrets",
            Phase::Function => "function",
            Phase::Statics => "statics",
            Phase::Activate => "activate",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_matches_execution_order() {
        let mut sorted = Phase::ALL;
        sorted.sort();
        assert_eq!(sorted, Phase::ALL);
        assert!(Phase::Begin < Phase::Activate);
    }
}
