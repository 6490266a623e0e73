//! Finite automata with nondeterministic and epsilon transitions.

use crate::automaton::dfa::Dfa;
use crate::automaton::error::AutomatonError;
use crate::automaton::state::{State, StateId, StateSet};
use crate::automaton::subset_construction::subset_construction;
use crate::automaton::symbol::{Symbol, is_epsilon};
use crate::automaton::transition::Transition;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// A finite automaton that may contain epsilon moves and several targets
/// per (state, symbol).
///
/// Once built the automaton is immutable; transformations return new
/// automata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiniteAutomaton {
    initial_state: StateId,
    states: BTreeMap<StateId, State>,
    /// All symbols the automaton may consume (never epsilon)
    alphabet: BTreeSet<Symbol>,
}

impl FiniteAutomaton {
    /// Build and validate an automaton.
    ///
    /// `states` may already carry edges; `transitions` are added on top of
    /// them. Fails if the initial state or a transition endpoint is not in
    /// `states`, a state id repeats, or a transition symbol is outside
    /// `symbols`. Errors report the ids as given.
    ///
    /// Ids are then renumbered densely from 0, keeping their relative order,
    /// so state sets stay proportional to the number of states. Names are
    /// kept.
    pub fn new(
        initial_state: StateId,
        states: impl IntoIterator<Item = State>,
        symbols: impl IntoIterator<Item = Symbol>,
        transitions: impl IntoIterator<Item = Transition>,
    ) -> Result<Self, AutomatonError> {
        let mut by_id = BTreeMap::new();
        for state in states {
            let id = state.id();
            if by_id.insert(id, state).is_some() {
                return Err(AutomatonError::DuplicateState(id));
            }
        }

        if !by_id.contains_key(&initial_state) {
            return Err(AutomatonError::UnknownInitialState(initial_state));
        }

        for transition in transitions {
            if !by_id.contains_key(&transition.target) {
                return Err(AutomatonError::UnknownState {
                    from: transition.source,
                    state: transition.target,
                });
            }
            match by_id.get_mut(&transition.source) {
                Some(state) => state.add_transition(transition.symbol, transition.target),
                None => {
                    return Err(AutomatonError::UnknownState {
                        from: transition.source,
                        state: transition.source,
                    });
                }
            }
        }

        let automaton = Self {
            initial_state,
            states: by_id,
            alphabet: symbols.into_iter().collect(),
        };
        automaton.validate_edges()?;

        let dense = automaton
            .states
            .last_key_value()
            .is_none_or(|(&last, _)| last as usize + 1 == automaton.states.len());
        if dense {
            Ok(automaton)
        } else {
            Ok(automaton.renumbered(0))
        }
    }

    /// Assemble an automaton from parts that are valid by construction.
    pub(crate) fn from_parts(
        initial_state: StateId,
        states: BTreeMap<StateId, State>,
        alphabet: BTreeSet<Symbol>,
    ) -> Self {
        let automaton = Self {
            initial_state,
            states,
            alphabet,
        };
        debug_assert!(automaton.states.contains_key(&automaton.initial_state));
        debug_assert!(automaton.validate_edges().is_ok());
        automaton
    }

    pub(crate) fn into_parts(self) -> (StateId, BTreeMap<StateId, State>, BTreeSet<Symbol>) {
        (self.initial_state, self.states, self.alphabet)
    }

    /// Map the ids, in increasing order, onto `first_id`, `first_id + 1`, ...
    ///
    /// The caller makes sure the new range fits in a `StateId`.
    pub(crate) fn renumbered(self, first_id: StateId) -> Self {
        let mapping: BTreeMap<StateId, StateId> = self
            .states
            .keys()
            .zip(first_id..)
            .map(|(&old, new)| (old, new))
            .collect();

        let states = self
            .states
            .into_values()
            .map(|mut state| {
                let id = mapping[&state.id()];
                state.set_id(id);
                for targets in state.edges_mut() {
                    *targets = targets.iter().map(|target| mapping[&target]).collect();
                }
                (id, state)
            })
            .collect();

        Self {
            initial_state: mapping[&self.initial_state],
            states,
            alphabet: self.alphabet,
        }
    }

    fn validate_edges(&self) -> Result<(), AutomatonError> {
        for state in self.states.values() {
            for (label, targets) in state.edges() {
                if let Some(symbol) = label {
                    if !self.alphabet.contains(&symbol) {
                        return Err(AutomatonError::SymbolNotInAlphabet {
                            from: state.id(),
                            symbol,
                        });
                    }
                }
                if let Some(target) = targets.iter().find(|t| !self.states.contains_key(t)) {
                    return Err(AutomatonError::UnknownState {
                        from: state.id(),
                        state: target,
                    });
                }
            }
        }
        Ok(())
    }

    /// Id of the state every run starts from.
    pub fn initial_state(&self) -> StateId {
        self.initial_state
    }

    /// Look a state up by id.
    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(&id)
    }

    /// Look a state up by its display name.
    pub fn state_by_name(&self, name: &str) -> Option<&State> {
        self.states.values().find(|state| state.name() == name)
    }

    /// All states in increasing id order.
    pub fn states(&self) -> impl Iterator<Item = &State> + '_ {
        self.states.values()
    }

    /// Number of states, reachable or not.
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Symbols the automaton may consume, in increasing order.
    pub fn alphabet(&self) -> &BTreeSet<Symbol> {
        &self.alphabet
    }

    /// Ids of the accepting states.
    pub fn final_states(&self) -> StateSet {
        self.states
            .values()
            .filter(|state| state.is_final())
            .map(State::id)
            .collect()
    }

    /// All transitions, ordered by source, then label, then target.
    pub fn transitions(&self) -> impl Iterator<Item = Transition> + '_ {
        self.states.values().flat_map(|state| {
            state.edges().flat_map(move |(label, targets)| {
                targets
                    .iter()
                    .map(move |target| Transition::new(state.id(), label, target))
            })
        })
    }

    /// Get the epsilon closure of a set of states.
    pub fn epsilon_closure(&self, states: &StateSet) -> StateSet {
        let mut closure = StateSet::with_capacity(self.id_capacity());
        let mut stack: Vec<StateId> = states.iter().collect();

        while let Some(s) = stack.pop() {
            if !closure.insert(s) {
                continue;
            }

            if let Some(destinations) = self.states.get(&s).and_then(State::epsilon_targets) {
                stack.extend(destinations.iter().filter(|dest| !closure.contains(*dest)));
            }
        }

        closure
    }

    /// Get the states reachable from a set of states on a given symbol.
    /// Returns the epsilon closure of the reached states.
    pub fn symbol_closure(&self, states: &StateSet, symbol: Symbol) -> StateSet {
        let mut reached = StateSet::with_capacity(self.id_capacity());

        for state in states.iter() {
            if let Some(destinations) = self
                .states
                .get(&state)
                .and_then(|s| s.transitions(Some(symbol)))
            {
                reached.union_with(destinations);
            }
        }

        self.epsilon_closure(&reached)
    }

    /// Check if any state of the set is final.
    pub fn contains_final(&self, states: &StateSet) -> bool {
        states
            .iter()
            .any(|s| self.states.get(&s).is_some_and(State::is_final))
    }

    /// Epsilon closure of the initial state: where every run starts.
    pub fn initial_closure(&self) -> StateSet {
        self.epsilon_closure(&StateSet::singleton(self.initial_state))
    }

    /// True if there are no epsilon moves and at most one target per
    /// (state, symbol).
    pub fn is_deterministic(&self) -> bool {
        self.states.values().all(|state| {
            state
                .edges()
                .all(|(label, targets)| !is_epsilon(label) && targets.len() <= 1)
        })
    }

    /// Check if the automaton accepts no string at all.
    /// Uses BFS from the initial closure following every edge.
    pub fn is_empty(&self) -> bool {
        let mut visited = StateSet::with_capacity(self.id_capacity());
        let mut queue: VecDeque<StateId> = VecDeque::new();
        queue.push_back(self.initial_state);

        while let Some(state_id) = queue.pop_front() {
            if !visited.insert(state_id) {
                continue;
            }
            let Some(state) = self.states.get(&state_id) else {
                continue;
            };
            if state.is_final() {
                return false;
            }
            for (_, destinations) in state.edges() {
                queue.extend(destinations.iter().filter(|dest| !visited.contains(*dest)));
            }
        }

        true
    }

    /// Equivalent deterministic automaton (subset construction).
    pub fn to_deterministic(&self) -> Dfa {
        subset_construction(self)
    }

    /// Minimal deterministic automaton accepting the same language.
    pub fn to_minimized(&self) -> Dfa {
        self.to_deterministic().minimize()
    }

    fn id_capacity(&self) -> usize {
        self.states
            .last_key_value()
            .map_or(0, |(&id, _)| id as usize + 1)
    }
}

impl From<&Dfa> for FiniteAutomaton {
    fn from(dfa: &Dfa) -> Self {
        let mut states: BTreeMap<StateId, State> = (0..dfa.num_states())
            .map(|id| (id, State::new(id, dfa.state_name(id), dfa.is_final(id))))
            .collect();
        for (source, symbol, target) in dfa.transitions() {
            if let Some(state) = states.get_mut(&source) {
                state.add_transition(Some(symbol), target);
            }
        }
        Self::from_parts(dfa.start_state(), states, dfa.alphabet().clone())
    }
}

impl TryFrom<&FiniteAutomaton> for Dfa {
    type Error = AutomatonError;

    /// Reinterpret an automaton that is already deterministic. Ids are
    /// renumbered densely in increasing order.
    fn try_from(automaton: &FiniteAutomaton) -> Result<Self, Self::Error> {
        let dense: BTreeMap<StateId, StateId> = automaton
            .states
            .keys()
            .enumerate()
            .map(|(dense_id, &id)| (id, dense_id as StateId))
            .collect();

        let mut dfa = Dfa::new(automaton.alphabet.clone());
        for state in automaton.states.values() {
            let id = dfa.add_state(state.name());
            if state.is_final() {
                dfa.add_final_state(id);
            }
        }
        dfa.set_start_state(dense[&automaton.initial_state]);

        for state in automaton.states.values() {
            for (label, targets) in state.edges() {
                let Some(symbol) = label else {
                    return Err(AutomatonError::EpsilonTransition { state: state.id() });
                };
                if targets.len() > 1 {
                    return Err(AutomatonError::NondeterministicTransition {
                        state: state.id(),
                        symbol,
                    });
                }
                for target in targets.iter() {
                    dfa.add_transition(dense[&state.id()], symbol, dense[&target]);
                }
            }
        }

        dfa.set_state_mapping(
            dense
                .iter()
                .map(|(&original, &dense_id)| (dense_id, vec![original]))
                .collect(),
        );
        Ok(dfa)
    }
}
