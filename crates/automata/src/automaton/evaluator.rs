//! Step-by-step evaluation of strings against any automaton.

use crate::automaton::error::EvaluationError;
use crate::automaton::finite_automaton::FiniteAutomaton;
use crate::automaton::state::StateSet;
use crate::automaton::symbol::Symbol;

/// Tracks the set of states an automaton can be in after the symbols fed so
/// far.
///
/// Each step replaces the current set with a fresh one, so a cloned
/// evaluator can branch off and continue independently.
#[derive(Debug, Clone)]
pub struct Evaluator<'a> {
    automaton: &'a FiniteAutomaton,
    current_states: StateSet,
}

impl<'a> Evaluator<'a> {
    pub fn new(automaton: &'a FiniteAutomaton) -> Self {
        Self {
            automaton,
            current_states: automaton.initial_closure(),
        }
    }

    pub fn automaton(&self) -> &'a FiniteAutomaton {
        self.automaton
    }

    pub fn current_states(&self) -> &StateSet {
        &self.current_states
    }

    /// Go back to the epsilon closure of the initial state.
    pub fn reset(&mut self) {
        self.current_states = self.automaton.initial_closure();
    }

    /// Consume one symbol, following any number of epsilon moves afterwards.
    pub fn process_symbol(&mut self, symbol: Symbol) -> Result<(), EvaluationError> {
        if !self.automaton.alphabet().contains(&symbol) {
            return Err(EvaluationError::InvalidSymbol(symbol));
        }
        self.current_states = self.automaton.symbol_closure(&self.current_states, symbol);
        log::trace!("{symbol:?} -> {:?}", self.current_states);
        Ok(())
    }

    /// Whether the input processed so far is accepted.
    pub fn is_accepting(&self) -> bool {
        self.automaton.contains_final(&self.current_states)
    }

    /// Evaluate a whole string from the initial state.
    pub fn accepts(&mut self, input: &str) -> Result<bool, EvaluationError> {
        self.reset();
        for symbol in input.chars() {
            self.process_symbol(symbol)?;
        }
        Ok(self.is_accepting())
    }
}
