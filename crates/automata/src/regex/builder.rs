//! Thompson construction of automata from primitive pieces.

use crate::automaton::{EPSILON, FiniteAutomaton, State, StateId, Symbol};
use std::collections::{BTreeMap, BTreeSet};

/// Thompson construction of automata, bottom-up.
///
/// Every state gets a fresh id from a counter shared by all automata built
/// through the same builder. Composite operations take their operands by
/// value: the operand states move into the result, and operand final
/// states become internal states with an epsilon move to the new final
/// state. Operands holding ids this builder never handed out are
/// renumbered into fresh ids first, so the counter only grows with the
/// number of states actually built.
#[derive(Debug, Default)]
pub struct RegexBuilder {
    state_counter: StateId,
}

impl RegexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_state(&mut self, is_final: bool) -> State {
        let id = self.state_counter;
        self.state_counter += 1;
        State::new(id, id.to_string(), is_final)
    }

    /// Accepts nothing: two states, no transitions.
    pub fn empty(&mut self) -> FiniteAutomaton {
        let start = self.next_state(false);
        let end = self.next_state(true);
        assemble(start, end, BTreeMap::new(), BTreeSet::new())
    }

    /// Accepts only the empty string.
    pub fn lambda(&mut self) -> FiniteAutomaton {
        let mut start = self.next_state(false);
        let end = self.next_state(true);
        start.add_transition(EPSILON, end.id());
        assemble(start, end, BTreeMap::new(), BTreeSet::new())
    }

    /// Accepts exactly the one-symbol string `symbol`.
    pub fn symbol(&mut self, symbol: Symbol) -> FiniteAutomaton {
        let mut start = self.next_state(false);
        let end = self.next_state(true);
        start.add_transition(Some(symbol), end.id());
        assemble(start, end, BTreeMap::new(), BTreeSet::from([symbol]))
    }

    /// Kleene star of `automaton`.
    pub fn star(&mut self, automaton: FiniteAutomaton) -> FiniteAutomaton {
        let automaton = self.adopt(automaton);
        let (inner_initial, mut states, alphabet) = automaton.into_parts();

        let mut start = self.next_state(false);
        let mut end = self.next_state(true);
        start.add_transition(EPSILON, end.id());
        start.add_transition(EPSILON, inner_initial);
        end.add_transition(EPSILON, start.id());
        retire_final_states(&mut states, end.id());

        assemble(start, end, states, alphabet)
    }

    /// Strings accepted by `first` or by `second`.
    pub fn union(&mut self, first: FiniteAutomaton, second: FiniteAutomaton) -> FiniteAutomaton {
        let first = self.adopt(first);
        let second = self.separate(&first, second);
        let (first_initial, mut states, mut alphabet) = first.into_parts();
        let (second_initial, second_states, second_alphabet) = second.into_parts();
        states.extend(second_states);
        alphabet.extend(second_alphabet);

        let mut start = self.next_state(false);
        let end = self.next_state(true);
        start.add_transition(EPSILON, first_initial);
        start.add_transition(EPSILON, second_initial);
        retire_final_states(&mut states, end.id());

        assemble(start, end, states, alphabet)
    }

    /// Strings made of a string of `first` followed by a string of `second`.
    pub fn concat(&mut self, first: FiniteAutomaton, second: FiniteAutomaton) -> FiniteAutomaton {
        let first = self.adopt(first);
        let second = self.separate(&first, second);
        let (first_initial, mut states, mut alphabet) = first.into_parts();
        let (second_initial, mut second_states, second_alphabet) = second.into_parts();
        alphabet.extend(second_alphabet);

        let mut start = self.next_state(false);
        let end = self.next_state(true);
        start.add_transition(EPSILON, first_initial);
        retire_final_states(&mut states, second_initial);
        retire_final_states(&mut second_states, end.id());
        states.extend(second_states);

        assemble(start, end, states, alphabet)
    }

    /// Renumber `automaton` into fresh ids unless all of its ids were
    /// handed out by this builder.
    fn adopt(&mut self, automaton: FiniteAutomaton) -> FiniteAutomaton {
        let foreign = automaton
            .states()
            .any(|state| state.id() >= self.state_counter);
        if foreign {
            self.renumber(automaton)
        } else {
            automaton
        }
    }

    /// Operands built by another builder may reuse ids; renumber `second`
    /// when it clashes with `first`.
    fn separate(&mut self, first: &FiniteAutomaton, second: FiniteAutomaton) -> FiniteAutomaton {
        let second = self.adopt(second);
        let clashes = second.states().any(|state| first.state(state.id()).is_some());
        if clashes {
            self.renumber(second)
        } else {
            second
        }
    }

    fn renumber(&mut self, automaton: FiniteAutomaton) -> FiniteAutomaton {
        let first_id = self.state_counter;
        self.state_counter += automaton.num_states() as StateId;
        automaton.renumbered(first_id)
    }
}

/// Clear the final flag of every state and link it to `target` instead.
fn retire_final_states(states: &mut BTreeMap<StateId, State>, target: StateId) {
    for state in states.values_mut().filter(|state| state.is_final()) {
        state.set_final(false);
        state.add_transition(EPSILON, target);
    }
}

fn assemble(
    start: State,
    end: State,
    mut states: BTreeMap<StateId, State>,
    alphabet: BTreeSet<Symbol>,
) -> FiniteAutomaton {
    let initial = start.id();
    states.insert(start.id(), start);
    states.insert(end.id(), end);
    FiniteAutomaton::from_parts(initial, states, alphabet)
}
