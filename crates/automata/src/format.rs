//! Plain text description of automata.
//!
//! ```text
//! Automaton:
//!     Symbols: 01
//!     q0 final
//!     q1
//!     --> q0
//!     q0 -0-> q1
//!     q1 --> q0
//! ```
//!
//! A state line is a name, optionally followed by `final`. `--> name` marks
//! the initial state. Transitions use `-->` for epsilon moves and `-x->` for
//! a move on symbol `x`. State ids follow the declaration order. When the
//! `Symbols:` line is missing, the alphabet is the set of symbols used by
//! the transitions.

use crate::automaton::{AutomatonError, EPSILON, FiniteAutomaton, Label, State, StateId, Transition};
use std::collections::{BTreeSet, HashMap, HashSet};
use thiserror::Error;

const HEADER: &str = "Automaton:";
const SYMBOLS: &str = "Symbols:";
const FINAL: &str = "final";
const EPSILON_ARROW: &str = "-->";

/// Errors raised while reading an automaton description. Line numbers
/// start at 1.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("expected an \"Automaton:\" header")]
    MissingHeader,

    #[error("line {line}: cannot parse {content:?}")]
    InvalidLine { line: usize, content: String },

    #[error("line {line}: state {name:?} is declared twice")]
    DuplicateState { line: usize, name: String },

    #[error("line {line}: unknown state {name:?}")]
    UnknownState { line: usize, name: String },

    #[error("no initial state given")]
    MissingInitialState,

    #[error("line {line}: initial state given more than once")]
    MultipleInitialStates { line: usize },

    #[error(transparent)]
    Malformed(#[from] AutomatonError),
}

/// Transition line before its endpoints are resolved.
struct PendingTransition<'a> {
    line: usize,
    source: &'a str,
    label: Label,
    target: &'a str,
}

/// Parse an automaton description.
pub fn read(text: &str) -> Result<FiniteAutomaton, FormatError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    match lines.next() {
        Some((_, HEADER)) => {}
        _ => return Err(FormatError::MissingHeader),
    }

    let mut symbols: Option<BTreeSet<char>> = None;
    let mut states = Vec::new();
    let mut ids: HashMap<&str, StateId> = HashMap::new();
    let mut initial: Option<(usize, &str)> = None;
    let mut pending = Vec::new();

    for (line, content) in lines {
        if let Some(rest) = content.strip_prefix(SYMBOLS) {
            symbols
                .get_or_insert_with(BTreeSet::new)
                .extend(rest.chars().filter(|c| !c.is_whitespace()));
            continue;
        }

        let tokens: Vec<&str> = content.split_whitespace().collect();
        match tokens[..] {
            [EPSILON_ARROW, name] => {
                if initial.is_some() {
                    return Err(FormatError::MultipleInitialStates { line });
                }
                initial = Some((line, name));
            }
            [name] => declare(&mut states, &mut ids, line, name, false)?,
            [name, FINAL] => declare(&mut states, &mut ids, line, name, true)?,
            [source, arrow, target] => {
                let Some(label) = parse_arrow(arrow) else {
                    return Err(invalid_line(line, content));
                };
                pending.push(PendingTransition {
                    line,
                    source,
                    label,
                    target,
                });
            }
            _ => return Err(invalid_line(line, content)),
        }
    }

    let resolve = |line: usize, name: &str| {
        ids.get(name).copied().ok_or_else(|| FormatError::UnknownState {
            line,
            name: name.to_string(),
        })
    };

    let (initial_line, initial_name) = initial.ok_or(FormatError::MissingInitialState)?;
    let initial = resolve(initial_line, initial_name)?;

    let transitions = pending
        .iter()
        .map(|t| {
            Ok(Transition::new(
                resolve(t.line, t.source)?,
                t.label,
                resolve(t.line, t.target)?,
            ))
        })
        .collect::<Result<Vec<_>, FormatError>>()?;

    let symbols = symbols.unwrap_or_else(|| transitions.iter().filter_map(|t| t.symbol).collect());

    log::debug!(
        "read automaton with {} states, {} transitions and alphabet {:?}",
        states.len(),
        transitions.len(),
        symbols
    );
    Ok(FiniteAutomaton::new(initial, states, symbols, transitions)?)
}

fn declare<'a>(
    states: &mut Vec<State>,
    ids: &mut HashMap<&'a str, StateId>,
    line: usize,
    name: &'a str,
    is_final: bool,
) -> Result<(), FormatError> {
    let id = states.len() as StateId;
    if ids.insert(name, id).is_some() {
        return Err(FormatError::DuplicateState {
            line,
            name: name.to_string(),
        });
    }
    states.push(State::new(id, name, is_final));
    Ok(())
}

/// `-->` is an epsilon move, `-x->` a move on `x`.
fn parse_arrow(arrow: &str) -> Option<Label> {
    if arrow == EPSILON_ARROW {
        return Some(EPSILON);
    }
    match arrow.chars().collect::<Vec<_>>().as_slice() {
        ['-', symbol, '-', '>'] => Some(Some(*symbol)),
        _ => None,
    }
}

fn invalid_line(line: usize, content: &str) -> FormatError {
    FormatError::InvalidLine {
        line,
        content: content.to_string(),
    }
}

/// Describe `automaton` in the format accepted by [`read`].
///
/// State names are kept when they can be read back unambiguously; otherwise
/// every state is written as `q<id>`.
pub fn write(automaton: &FiniteAutomaton) -> String {
    let names: HashMap<StateId, String> = if has_readable_names(automaton) {
        automaton
            .states()
            .map(|state| (state.id(), state.name().to_string()))
            .collect()
    } else {
        automaton
            .states()
            .map(|state| (state.id(), format!("q{}", state.id())))
            .collect()
    };

    let symbols: String = automaton.alphabet().iter().collect();
    let mut lines = vec![
        HEADER.to_string(),
        format!("    {SYMBOLS} {symbols}").trim_end().to_string(),
    ];

    for state in automaton.states() {
        let name = &names[&state.id()];
        if state.is_final() {
            lines.push(format!("    {name} {FINAL}"));
        } else {
            lines.push(format!("    {name}"));
        }
    }

    lines.push(format!("    {EPSILON_ARROW} {}", names[&automaton.initial_state()]));

    for transition in automaton.transitions() {
        let source = &names[&transition.source];
        let target = &names[&transition.target];
        let arrow = match transition.symbol {
            Some(symbol) => format!("-{symbol}->"),
            None => EPSILON_ARROW.to_string(),
        };
        lines.push(format!("    {source} {arrow} {target}"));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn has_readable_names(automaton: &FiniteAutomaton) -> bool {
    let mut seen = HashSet::new();
    automaton.states().all(|state| {
        let name = state.name();
        !name.is_empty()
            && !name.chars().any(char::is_whitespace)
            && name != EPSILON_ARROW
            && name != HEADER
            && !name.starts_with(SYMBOLS)
            && seen.insert(name)
    })
}
