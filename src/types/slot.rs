// ABOUTME: Blue/green slot names and their strict two-value alternation.
// ABOUTME: Parsing rejects anything that is not exactly one of the two names.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized slot: {0:?}")]
pub struct SlotParseError(pub String);

/// One of the two alternating deployment environments on the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Blue,
    Green,
}

impl Slot {
    /// The slot a new deployment goes to when `self` is live.
    pub fn next(self) -> Self {
        match self {
            Slot::Blue => Slot::Green,
            Slot::Green => Slot::Blue,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Slot::Blue => "blue",
            Slot::Green => "green",
        }
    }
}

impl FromStr for Slot {
    type Err = SlotParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blue" => Ok(Slot::Blue),
            "green" => Ok(Slot::Green),
            other => Err(SlotParseError(other.to_string())),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_alternates() {
        assert_eq!(Slot::Blue.next(), Slot::Green);
        assert_eq!(Slot::Green.next(), Slot::Blue);
        assert_eq!(Slot::Blue.next().next(), Slot::Blue);
    }

    #[test]
    fn parse_is_exact() {
        assert_eq!("blue".parse::<Slot>(), Ok(Slot::Blue));
        assert_eq!("green".parse::<Slot>(), Ok(Slot::Green));
        assert!("Blue".parse::<Slot>().is_err());
        assert!(" green".parse::<Slot>().is_err());
        assert!("".parse::<Slot>().is_err());
        assert!("purple".parse::<Slot>().is_err());
    }
}
