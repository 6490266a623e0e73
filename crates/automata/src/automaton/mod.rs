//! Finite automata over `char` alphabets.
//!
//! This module provides:
//! - a general automaton with epsilon and nondeterministic transitions
//! - epsilon and symbol closures
//! - subset construction (automaton to DFA conversion)
//! - DFA minimization by partition refinement
//! - a step-by-step evaluator

mod dfa;
mod error;
mod evaluator;
mod finite_automaton;
mod state;
mod subset_construction;
mod symbol;
mod transition;

pub use dfa::{Dfa, GraphEdge};
pub use error::{AutomatonError, EvaluationError};
pub use evaluator::Evaluator;
pub use finite_automaton::FiniteAutomaton;
pub use state::{State, StateId, StateSet};
pub use subset_construction::subset_construction;
pub use symbol::{EPSILON, EPSILON_DISPLAY, Label, Symbol, display_label, is_epsilon};
pub use transition::Transition;
