//! Load generation tracking
//!
//! Every environment selection advances the generation. Completions carry the
//! generation they were requested under and are only accepted while it is
//! still the latest one.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Token identifying one environment selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(u64);

impl Generation {
    /// Raw counter value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen#{}", self.0)
    }
}

/// Counter issuing [`Generation`] tokens.
#[derive(Debug, Default)]
pub struct LoadGeneration {
    current: Generation,
}

impl LoadGeneration {
    /// Create a counter at generation zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new selection, invalidating every earlier token.
    pub fn advance(&mut self) -> Generation {
        self.current = Generation(self.current.0 + 1);
        self.current
    }

    /// Latest issued token
    pub fn current(&self) -> Generation {
        self.current
    }

    /// Whether a completion for `generation` should still be applied.
    pub fn is_current(&self, generation: Generation) -> bool {
        generation == self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_invalidates_previous() {
        let mut counter = LoadGeneration::new();
        let first = counter.advance();
        assert!(counter.is_current(first));

        let second = counter.advance();
        assert!(second > first);
        assert!(!counter.is_current(first));
        assert!(counter.is_current(second));
    }

    #[test]
    fn test_initial_generation_is_not_issued() {
        let mut counter = LoadGeneration::new();
        let initial = counter.current();
        let issued = counter.advance();
        assert_ne!(initial, issued);
        assert_eq!(issued.get(), 1);
        assert_eq!(issued.to_string(), "gen#1");
    }
}
