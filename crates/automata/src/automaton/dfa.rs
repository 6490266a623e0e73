//! Deterministic Finite Automaton (DFA) implementation with partition
//! refinement minimization.

use crate::automaton::error::EvaluationError;
use crate::automaton::state::{StateId, StateSet};
use crate::automaton::symbol::Symbol;
use indexmap::IndexSet;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

/// A labeled edge in the graph representation: (source, destination, label).
pub type GraphEdge = (StateId, StateId, Symbol);

/// A Deterministic Finite Automaton.
///
/// States are numbered densely `0..num_states()`. There is at most one
/// transition per (state, symbol); a missing transition rejects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    /// Start state, always one of the states
    start_state: StateId,
    /// Display name of every state, indexed by id
    state_names: Vec<String>,
    /// Final (accepting) states
    final_states: StateSet,
    /// Transitions: (source, symbol) -> destination
    transitions: BTreeMap<(StateId, Symbol), StateId>,
    /// Symbols the DFA may consume, including ones without transitions
    alphabet: BTreeSet<Symbol>,
    /// Mapping from DFA states to the states of the automaton they were
    /// derived from
    state_mapping: Option<HashMap<StateId, Vec<StateId>>>,
}

impl Dfa {
    /// Create a DFA without states. Callers add the start state before
    /// handing the DFA out.
    pub(crate) fn new(alphabet: BTreeSet<Symbol>) -> Self {
        Self {
            start_state: 0,
            state_names: Vec::new(),
            final_states: StateSet::new(),
            transitions: BTreeMap::new(),
            alphabet,
            state_mapping: None,
        }
    }

    /// Add a new state and return its ID.
    pub(crate) fn add_state(&mut self, name: &str) -> StateId {
        let id = self.state_names.len() as StateId;
        self.state_names.push(name.to_string());
        id
    }

    pub(crate) fn set_start_state(&mut self, state: StateId) {
        self.start_state = state;
    }

    pub(crate) fn add_final_state(&mut self, state: StateId) {
        self.final_states.insert(state);
    }

    pub(crate) fn add_transition(&mut self, source: StateId, symbol: Symbol, destination: StateId) {
        debug_assert!(self.alphabet.contains(&symbol));
        self.transitions.insert((source, symbol), destination);
    }

    pub(crate) fn set_state_mapping(&mut self, mapping: HashMap<StateId, Vec<StateId>>) {
        self.state_mapping = Some(mapping);
    }

    /// Get the transition from a state on a symbol.
    pub fn transition(&self, source: StateId, symbol: Symbol) -> Option<StateId> {
        self.transitions.get(&(source, symbol)).copied()
    }

    pub fn num_states(&self) -> StateId {
        self.state_names.len() as StateId
    }

    pub fn start_state(&self) -> StateId {
        self.start_state
    }

    pub fn final_states(&self) -> &StateSet {
        &self.final_states
    }

    pub fn is_final(&self, state: StateId) -> bool {
        self.final_states.contains(state)
    }

    pub fn state_name(&self, state: StateId) -> &str {
        self.state_names
            .get(state as usize)
            .map_or("", String::as_str)
    }

    pub fn alphabet(&self) -> &BTreeSet<Symbol> {
        &self.alphabet
    }

    /// Which states of the source automaton each state stands for, when the
    /// DFA was derived from another automaton.
    pub fn state_mapping(&self) -> Option<&HashMap<StateId, Vec<StateId>>> {
        self.state_mapping.as_ref()
    }

    /// All transitions ordered by source then symbol.
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, Symbol, StateId)> + '_ {
        self.transitions
            .iter()
            .map(|(&(src, sym), &dst)| (src, sym, dst))
    }

    /// Run `input` from the start state.
    ///
    /// A symbol outside the alphabet is an error even after the run has
    /// already fallen off the automaton.
    pub fn accepts(&self, input: &str) -> Result<bool, EvaluationError> {
        let mut current = Some(self.start_state);
        for symbol in input.chars() {
            if !self.alphabet.contains(&symbol) {
                return Err(EvaluationError::InvalidSymbol(symbol));
            }
            current = current.and_then(|state| self.transition(state, symbol));
        }
        Ok(current.is_some_and(|state| self.is_final(state)))
    }

    /// Check if the DFA is empty (accepts no strings).
    pub fn is_empty(&self) -> bool {
        if self.final_states.is_empty() {
            return true;
        }
        !self
            .find_reachable_states()
            .iter()
            .any(|&state| self.is_final(state))
    }

    /// Minimize the DFA by partition refinement.
    /// Returns a new minimized DFA; `self` is left untouched.
    ///
    /// Unreachable states are pruned once, then classes are split until a
    /// fixed point is reached. A missing transition counts as a move into
    /// the class of the dead states (reachable states that cannot reach a
    /// final state). Without dead states it counts as a move into a shared
    /// implicit class of its own.
    pub fn minimize(&self) -> Dfa {
        let reachable = self.find_reachable_states();
        let dead = self.find_dead_states(&reachable);

        // Initial partition: final states and non-final states
        let mut class_of: Vec<Option<usize>> = vec![None; self.state_names.len()];
        let mut initial_classes: IndexSet<bool> = IndexSet::new();
        for &state in &reachable {
            let (class, _) = initial_classes.insert_full(self.is_final(state));
            class_of[state as usize] = Some(class);
        }
        let mut num_classes = initial_classes.len();

        let mut rounds = 0;
        loop {
            rounds += 1;
            let mut signatures: IndexSet<(usize, Vec<Option<usize>>)> = IndexSet::new();
            let mut refined: Vec<Option<usize>> = vec![None; self.state_names.len()];
            // Dead states never get split apart, any one of them stands for all
            let missing = dead.iter().next().and_then(|state| class_of[state as usize]);

            for &state in &reachable {
                let current = class_of[state as usize].unwrap_or_default();
                let moves: Vec<Option<usize>> = self
                    .alphabet
                    .iter()
                    .map(|&symbol| match self.transition(state, symbol) {
                        Some(dest) => class_of[dest as usize],
                        None => missing,
                    })
                    .collect();
                let (class, _) = signatures.insert_full((current, moves));
                refined[state as usize] = Some(class);
            }

            // Refinement only ever splits, so an unchanged class count means
            // an unchanged partition
            let split = signatures.len() != num_classes;
            num_classes = signatures.len();
            class_of = refined;
            if !split {
                break;
            }
        }

        log::debug!(
            "minimization: {} states, {} reachable, {} classes after {} rounds",
            self.num_states(),
            reachable.len(),
            num_classes,
            rounds
        );

        let mut partitions: Vec<Vec<StateId>> = vec![Vec::new(); num_classes];
        for &state in &reachable {
            if let Some(class) = class_of[state as usize] {
                partitions[class].push(state);
            }
        }

        self.build_minimized_dfa(&partitions, &class_of)
    }

    /// Find all states reachable from the start state, in BFS order.
    fn find_reachable_states(&self) -> Vec<StateId> {
        let mut reachable = Vec::new();
        let mut seen = StateSet::with_capacity(self.state_names.len());

        let mut queue = VecDeque::new();
        queue.push_back(self.start_state);

        while let Some(state) = queue.pop_front() {
            if !seen.insert(state) {
                continue;
            }
            reachable.push(state);

            for &symbol in &self.alphabet {
                if let Some(next) = self.transition(state, symbol) {
                    if !seen.contains(next) {
                        queue.push_back(next);
                    }
                }
            }
        }

        reachable
    }

    /// Reachable states from which no final state can be reached.
    fn find_dead_states(&self, reachable: &[StateId]) -> StateSet {
        let mut predecessors: HashMap<StateId, Vec<StateId>> = HashMap::new();
        for &state in reachable {
            for &symbol in &self.alphabet {
                if let Some(next) = self.transition(state, symbol) {
                    predecessors.entry(next).or_default().push(state);
                }
            }
        }

        let mut live = StateSet::with_capacity(self.state_names.len());
        let mut stack: Vec<StateId> = reachable
            .iter()
            .copied()
            .filter(|&state| self.is_final(state))
            .collect();
        while let Some(state) = stack.pop() {
            if !live.insert(state) {
                continue;
            }
            if let Some(sources) = predecessors.get(&state) {
                stack.extend(sources.iter().copied().filter(|&s| !live.contains(s)));
            }
        }

        reachable
            .iter()
            .copied()
            .filter(|&state| !live.contains(state))
            .collect()
    }

    /// Build the quotient DFA: one state per partition.
    fn build_minimized_dfa(&self, partitions: &[Vec<StateId>], class_of: &[Option<usize>]) -> Dfa {
        let mut minimized = Dfa::new(self.alphabet.clone());

        for partition in partitions {
            let names: Vec<&str> = partition.iter().map(|&s| self.state_name(s)).collect();
            let name = match names.as_slice() {
                [single] => (*single).to_string(),
                _ => format!("{{{}}}", names.join(",")),
            };
            let id = minimized.add_state(&name);
            if partition.iter().any(|&s| self.is_final(s)) {
                minimized.add_final_state(id);
            }
        }

        if let Some(start) = class_of[self.start_state as usize] {
            minimized.set_start_state(start as StateId);
        }

        // Members agree on the target class, but some may lack the move into
        // the dead class: take the first member that has the transition
        for (part_idx, partition) in partitions.iter().enumerate() {
            for &symbol in &self.alphabet {
                let new_dest = partition
                    .iter()
                    .find_map(|&state| self.transition(state, symbol))
                    .and_then(|dest| class_of[dest as usize]);
                if let Some(new_dest) = new_dest {
                    minimized.add_transition(part_idx as StateId, symbol, new_dest as StateId);
                }
            }
        }

        // Build state mapping from minimized states to original states
        let mut new_mapping: HashMap<StateId, Vec<StateId>> = HashMap::new();
        for (part_idx, partition) in partitions.iter().enumerate() {
            let mut states: Vec<StateId> = match &self.state_mapping {
                Some(orig_mapping) => partition
                    .iter()
                    .filter_map(|s| orig_mapping.get(s))
                    .flatten()
                    .copied()
                    .collect(),
                None => partition.clone(),
            };
            states.sort_unstable();
            states.dedup();
            new_mapping.insert(part_idx as StateId, states);
        }
        minimized.state_mapping = Some(new_mapping);

        minimized
    }

    /// Find a bijection between the states of two DFAs that preserves the
    /// start state, finality and every transition.
    ///
    /// Returns the mapping from states of `self` to states of `other`, or
    /// `None` if the automata are not isomorphic.
    pub fn isomorphism(&self, other: &Dfa) -> Option<HashMap<StateId, StateId>> {
        if self.alphabet != other.alphabet || self.num_states() != other.num_states() {
            return None;
        }

        let mut forward: HashMap<StateId, StateId> = HashMap::new();
        let mut backward: HashMap<StateId, StateId> = HashMap::new();
        let mut queue = VecDeque::new();
        queue.push_back((self.start_state, other.start_state));

        while let Some((ours, theirs)) = queue.pop_front() {
            match (forward.get(&ours), backward.get(&theirs)) {
                (Some(&mapped), _) if mapped == theirs => continue,
                (None, None) => {}
                _ => return None,
            }
            if self.is_final(ours) != other.is_final(theirs) {
                return None;
            }
            forward.insert(ours, theirs);
            backward.insert(theirs, ours);

            for &symbol in &self.alphabet {
                match (self.transition(ours, symbol), other.transition(theirs, symbol)) {
                    (Some(a), Some(b)) => queue.push_back((a, b)),
                    (None, None) => {}
                    _ => return None,
                }
            }
        }

        // Unreachable leftovers cannot be matched structurally
        if forward.len() != self.state_names.len() {
            return None;
        }
        Some(forward)
    }

    /// Convert to a graph representation.
    /// Returns: (nodes, edges) where edges are (src, dst, label)
    pub fn to_graph(&self) -> (Vec<StateId>, Vec<GraphEdge>) {
        let nodes: Vec<StateId> = (0..self.num_states()).collect();
        let edges = self
            .transitions()
            .map(|(src, symbol, dst)| (src, dst, symbol))
            .collect();

        (nodes, edges)
    }
}
