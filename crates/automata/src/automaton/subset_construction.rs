//! Subset construction algorithm for converting an automaton with epsilon
//! and nondeterministic moves into a deterministic one.

use crate::automaton::dfa::Dfa;
use crate::automaton::finite_automaton::FiniteAutomaton;
use crate::automaton::state::{StateId, StateSet};
use indexmap::IndexMap;
use std::collections::{HashMap, VecDeque};

/// Convert an automaton to an equivalent DFA using the powerset construction.
///
/// Subsets that turn out empty are never materialized: the resulting DFA
/// simply has no transition on that symbol. The number of states is not
/// capped and may reach `2^n` in the worst case.
pub fn subset_construction(automaton: &FiniteAutomaton) -> Dfa {
    // Each DFA state corresponds to a set of original states, keyed by the
    // sorted id vector
    let mut state_mapping: IndexMap<Vec<StateId>, StateId> = IndexMap::new();
    let mut dfa = Dfa::new(automaton.alphabet().clone());
    let mut worklist: VecDeque<StateSet> = VecDeque::new();

    let initial_set = automaton.initial_closure();
    let initial_dfa_state = dfa.add_state(&subset_name(automaton, &initial_set));
    dfa.set_start_state(initial_dfa_state);
    if automaton.contains_final(&initial_set) {
        dfa.add_final_state(initial_dfa_state);
    }
    state_mapping.insert(initial_set.to_vec(), initial_dfa_state);
    worklist.push_back(initial_set);

    while let Some(current_set) = worklist.pop_front() {
        let current_dfa_state = state_mapping[&current_set.to_vec()];

        for &symbol in automaton.alphabet() {
            let next_set = automaton.symbol_closure(&current_set, symbol);

            if next_set.is_empty() {
                continue;
            }

            let next_vec = next_set.to_vec();
            let next_dfa_state = if let Some(&existing) = state_mapping.get(&next_vec) {
                existing
            } else {
                let new_state = dfa.add_state(&subset_name(automaton, &next_set));
                if automaton.contains_final(&next_set) {
                    dfa.add_final_state(new_state);
                }
                state_mapping.insert(next_vec, new_state);
                worklist.push_back(next_set);
                new_state
            };

            dfa.add_transition(current_dfa_state, symbol, next_dfa_state);
        }
    }

    log::debug!(
        "subset construction: {} states -> {} deterministic states",
        automaton.num_states(),
        dfa.num_states()
    );

    // Keep track of which original states each DFA state stands for
    let inverse_mapping: HashMap<StateId, Vec<StateId>> = state_mapping
        .into_iter()
        .map(|(states, dfa_state)| (dfa_state, states))
        .collect();
    dfa.set_state_mapping(inverse_mapping);

    dfa
}

/// `q` for a single state, `{q1,q2}` for a larger subset.
fn subset_name(automaton: &FiniteAutomaton, subset: &StateSet) -> String {
    let names: Vec<&str> = subset
        .iter()
        .filter_map(|id| automaton.state(id).map(|state| state.name()))
        .collect();
    match names.as_slice() {
        [single] => (*single).to_string(),
        _ => format!("{{{}}}", names.join(",")),
    }
}
