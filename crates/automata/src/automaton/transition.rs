//! Transition triples.

use crate::automaton::state::StateId;
use crate::automaton::symbol::{Label, display_label};
use std::fmt;

/// A single edge `source -label-> target`. A `None` label is an epsilon move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transition {
    pub source: StateId,
    pub symbol: Label,
    pub target: StateId,
}

impl Transition {
    pub fn new(source: StateId, symbol: Label, target: StateId) -> Self {
        Self {
            source,
            symbol,
            target,
        }
    }

    pub fn epsilon(source: StateId, target: StateId) -> Self {
        Self::new(source, None, target)
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -{}-> {}",
            self.source,
            display_label(self.symbol),
            self.target
        )
    }
}
