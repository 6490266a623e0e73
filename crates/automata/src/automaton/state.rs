//! States and state sets.

use crate::automaton::symbol::{EPSILON, Label};
use fixedbitset::FixedBitSet;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A state identifier, unique within one automaton.
pub type StateId = u32;

/// A set of states backed by a growable bit set.
///
/// Equality and hashing only look at the members, so two sets built with
/// different capacities compare equal when they hold the same states.
#[derive(Clone, Default)]
pub struct StateSet {
    bits: FixedBitSet,
}

impl StateSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty state set with room for ids below `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(capacity),
        }
    }

    /// Create a state set containing a single state.
    pub fn singleton(state: StateId) -> Self {
        let mut set = Self::with_capacity(state as usize + 1);
        set.insert(state);
        set
    }

    /// Insert a state, returning `true` if it was not present yet.
    pub fn insert(&mut self, state: StateId) -> bool {
        let idx = state as usize;
        if idx >= self.bits.len() {
            self.bits.grow(idx + 1);
        }
        !self.bits.put(idx)
    }

    /// Whether `state` is a member. Ids past the capacity are never members.
    pub fn contains(&self, state: StateId) -> bool {
        self.bits.contains(state as usize)
    }

    /// True when the set has no members.
    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Iterate over the members in increasing id order.
    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.bits.ones().map(|i| i as StateId)
    }

    /// Union this set with another, modifying self in place.
    pub fn union_with(&mut self, other: &StateSet) {
        if other.bits.len() > self.bits.len() {
            self.bits.grow(other.bits.len());
        }
        self.bits.union_with(&other.bits);
    }

    /// Whether every member of `self` is also in `other`.
    pub fn is_subset(&self, other: &StateSet) -> bool {
        self.iter().all(|state| other.contains(state))
    }

    /// Canonical, order-independent key: the members in increasing order.
    pub fn to_vec(&self) -> Vec<StateId> {
        self.iter().collect()
    }
}

impl PartialEq for StateSet {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for StateSet {}

impl Hash for StateSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for member in self.iter() {
            member.hash(state);
        }
    }
}

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<StateId> for StateSet {
    fn from_iter<I: IntoIterator<Item = StateId>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<StateId> for StateSet {
    fn extend<I: IntoIterator<Item = StateId>>(&mut self, iter: I) {
        for state in iter {
            self.insert(state);
        }
    }
}

/// A state of an automaton together with its outgoing edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    id: StateId,
    name: String,
    is_final: bool,
    /// label -> targets; epsilon edges live under `None`
    transitions: BTreeMap<Label, StateSet>,
}

impl State {
    pub fn new(id: StateId, name: impl Into<String>, is_final: bool) -> Self {
        Self {
            id,
            name: name.into(),
            is_final,
            transitions: BTreeMap::new(),
        }
    }

    /// Identifier, unique within the owning automaton.
    pub fn id(&self) -> StateId {
        self.id
    }

    /// Display name; not required to be unique.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the state accepts.
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    pub(crate) fn set_final(&mut self, is_final: bool) {
        self.is_final = is_final;
    }

    pub(crate) fn set_id(&mut self, id: StateId) {
        self.id = id;
    }

    /// Add an outgoing edge. Use [`EPSILON`] as the label for an epsilon move.
    pub fn add_transition(&mut self, label: Label, target: StateId) {
        self.transitions.entry(label).or_default().insert(target);
    }

    /// Targets reachable on `label` in one step.
    pub fn transitions(&self, label: Label) -> Option<&StateSet> {
        self.transitions.get(&label)
    }

    pub fn epsilon_targets(&self) -> Option<&StateSet> {
        self.transitions(EPSILON)
    }

    /// All outgoing edges grouped by label, epsilon first.
    pub fn edges(&self) -> impl Iterator<Item = (Label, &StateSet)> + '_ {
        self.transitions.iter().map(|(&label, targets)| (label, targets))
    }

    pub(crate) fn edges_mut(&mut self) -> impl Iterator<Item = &mut StateSet> + '_ {
        self.transitions.values_mut()
    }
}
