//! Graphviz export.

use crate::automaton::{FiniteAutomaton, StateId, display_label};
use indexmap::IndexMap;

/// Rendering options for [`write_dot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotOptions {
    /// Graph identifier after `digraph`
    pub name: String,
    /// Lay the graph out left to right instead of top to bottom
    pub left_to_right: bool,
}

impl Default for DotOptions {
    fn default() -> Self {
        Self {
            name: "automaton".to_string(),
            left_to_right: true,
        }
    }
}

/// Render `automaton` in the DOT language.
///
/// Final states are drawn as double circles and the initial state is marked
/// by an arrow from an invisible node. Parallel edges between two states are
/// merged into one edge whose label lists every symbol.
pub fn write_dot(automaton: &FiniteAutomaton, options: &DotOptions) -> String {
    let mut edges: IndexMap<(StateId, StateId), Vec<String>> = IndexMap::new();
    for transition in automaton.transitions() {
        edges
            .entry((transition.source, transition.target))
            .or_default()
            .push(display_label(transition.symbol));
    }

    let mut out = format!("digraph {} {{\n", quote(&options.name));
    if options.left_to_right {
        out.push_str("    rankdir=LR;\n");
    }
    out.push_str("    start [shape=point style=invis];\n");

    for state in automaton.states() {
        let shape = if state.is_final() { "doublecircle" } else { "circle" };
        out.push_str(&format!(
            "    node_{} [label={} shape={shape}];\n",
            state.id(),
            quote(state.name())
        ));
    }

    out.push_str(&format!("    start -> node_{};\n", automaton.initial_state()));
    for ((source, target), labels) in &edges {
        out.push_str(&format!(
            "    node_{source} -> node_{target} [label={}];\n",
            quote(&labels.join(","))
        ));
    }
    out.push_str("}\n");
    out
}

fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
