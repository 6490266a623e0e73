//! Regular expressions in Kleene syntax, compiled with the Thompson
//! construction.

mod builder;
mod parser;

pub use builder::RegexBuilder;
pub use parser::{EMPTY_LANGUAGE, EMPTY_STRING, RegexError, RegexParser};

use crate::automaton::FiniteAutomaton;

/// Compile `pattern` into an automaton with epsilon transitions.
pub fn compile(pattern: &str) -> Result<FiniteAutomaton, RegexError> {
    RegexParser::new().create_automaton(pattern)
}
