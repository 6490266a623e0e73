//! Finite automata over `char` alphabets: construction from regular
//! expressions, subset construction, minimization and evaluation.
//!
//! ```
//! use automata::regex;
//!
//! let automaton = regex::compile("a(b|c)*").unwrap();
//! let minimized = automaton.to_minimized();
//! assert_eq!(minimized.accepts("abcb"), Ok(true));
//! assert_eq!(minimized.accepts("ba"), Ok(false));
//! ```

pub mod automaton;
pub mod dot;
pub mod format;
pub mod regex;

pub use automaton::{
    AutomatonError, Dfa, EvaluationError, Evaluator, FiniteAutomaton, State, StateId, StateSet,
    Symbol, Transition,
};
pub use format::FormatError;
pub use regex::RegexError;

#[cfg(test)]
mod tests;
