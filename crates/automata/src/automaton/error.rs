//! Error types shared by the automaton modules.

use crate::automaton::state::StateId;
use crate::automaton::symbol::Symbol;
use thiserror::Error;

/// A violation of the automaton invariants, raised when building an automaton.
///
/// Construction is atomic: when one of these is returned, no automaton exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
    #[error("initial state {0} is not a state of the automaton")]
    UnknownInitialState(StateId),

    #[error("state id {0} is declared more than once")]
    DuplicateState(StateId),

    #[error("transition from state {from} references unknown state {state}")]
    UnknownState { from: StateId, state: StateId },

    #[error("transition from state {from} uses symbol {symbol:?} which is not in the alphabet")]
    SymbolNotInAlphabet { from: StateId, symbol: Symbol },

    #[error("state {state} has an epsilon transition, the automaton is not deterministic")]
    EpsilonTransition { state: StateId },

    #[error("state {state} has more than one transition on {symbol:?}")]
    NondeterministicTransition { state: StateId, symbol: Symbol },
}

/// Failure while running an input through an automaton.
///
/// Rejection is not an error: this only reports symbols the automaton
/// cannot consume at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("symbol {0:?} is not in the alphabet of the automaton")]
    InvalidSymbol(Symbol),
}
