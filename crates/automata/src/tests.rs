//! Properties of the whole pipeline and end-to-end scenarios.

use crate::automaton::{
    Dfa, EPSILON, EvaluationError, Evaluator, FiniteAutomaton, Label, State, StateId, StateSet,
    Transition,
};
use crate::{format, regex};
use proptest::prelude::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Every string over `symbols` of length at most `max_len`.
fn all_strings(symbols: &[char], max_len: usize) -> Vec<String> {
    let mut strings = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..max_len {
        frontier = frontier
            .iter()
            .flat_map(|prefix| {
                symbols.iter().map(move |&symbol| {
                    let mut next = prefix.clone();
                    next.push(symbol);
                    next
                })
            })
            .collect();
        strings.extend(frontier.iter().cloned());
    }
    strings
}

fn nfa_accepts(automaton: &FiniteAutomaton, input: &str) -> bool {
    Evaluator::new(automaton).accepts(input).unwrap()
}

fn arb_automaton() -> impl Strategy<Value = FiniteAutomaton> {
    let label = prop::sample::select(vec![EPSILON, Some('a'), Some('b')]);
    (1..=5u32)
        .prop_flat_map(move |n| {
            (
                prop::collection::vec(any::<bool>(), n as usize),
                prop::collection::vec((0..n, label.clone(), 0..n), 0..14),
            )
        })
        .prop_map(|(finals, edges)| {
            let states = finals
                .iter()
                .enumerate()
                .map(|(id, &is_final)| State::new(id as StateId, format!("s{id}"), is_final));
            let transitions = edges
                .into_iter()
                .map(|(source, label, target): (StateId, Label, StateId)| {
                    Transition::new(source, label, target)
                });
            FiniteAutomaton::new(0, states, ['a', 'b'], transitions).unwrap()
        })
}

proptest! {
    #[test]
    fn determinize_preserves_language(automaton in arb_automaton()) {
        let dfa = automaton.to_deterministic();
        for input in all_strings(&['a', 'b'], 6) {
            let expected = nfa_accepts(&automaton, &input);
            prop_assert_eq!(dfa.accepts(&input), Ok(expected), "{:?}", input);
        }
    }

    #[test]
    fn determinize_output_is_deterministic(automaton in arb_automaton()) {
        let dfa = automaton.to_deterministic();
        let as_automaton = FiniteAutomaton::from(&dfa);
        prop_assert!(as_automaton.is_deterministic());
        prop_assert!(Dfa::try_from(&as_automaton).is_ok());
    }

    #[test]
    fn minimize_preserves_language_and_never_grows(automaton in arb_automaton()) {
        let dfa = automaton.to_deterministic();
        let minimized = dfa.minimize();
        prop_assert!(minimized.num_states() <= dfa.num_states());
        for input in all_strings(&['a', 'b'], 6) {
            prop_assert_eq!(minimized.accepts(&input), dfa.accepts(&input), "{:?}", input);
        }
    }

    #[test]
    fn minimize_is_idempotent(automaton in arb_automaton()) {
        let minimized = automaton.to_minimized();
        prop_assert!(minimized.minimize().isomorphism(&minimized).is_some());
    }

    #[test]
    fn determinize_is_idempotent(automaton in arb_automaton()) {
        let dfa = automaton.to_deterministic();
        let again = FiniteAutomaton::from(&dfa).to_deterministic();
        prop_assert!(again.isomorphism(&dfa).is_some());
    }

    #[test]
    fn epsilon_closure_is_closed(
        automaton in arb_automaton(),
        seeds in prop::collection::vec(0..5u32, 0..4),
    ) {
        let seeds: StateSet = seeds
            .into_iter()
            .filter(|&id| automaton.state(id).is_some())
            .collect();
        let closure = automaton.epsilon_closure(&seeds);

        prop_assert!(seeds.is_subset(&closure));
        prop_assert_eq!(&automaton.epsilon_closure(&closure), &closure);
        for id in closure.iter() {
            if let Some(targets) = automaton.state(id).and_then(State::epsilon_targets) {
                prop_assert!(targets.is_subset(&closure));
            }
        }
    }
}

/// Residues modulo 6 of binary numerals read most significant bit first.
/// Accepts multiples of 3, with twice as many states as needed.
fn residues_mod_6() -> FiniteAutomaton {
    let states = (0..6).map(|r| State::new(r, format!("r{r}"), r % 3 == 0));
    let transitions = (0..6).flat_map(|r| {
        [('0', 0), ('1', 1)]
            .map(|(symbol, bit)| Transition::new(r, Some(symbol), (2 * r + bit) % 6))
    });
    FiniteAutomaton::new(0, states, ['0', '1'], transitions).unwrap()
}

fn divisible_by_three(input: &str) -> bool {
    input
        .chars()
        .fold(0, |r, bit| (2 * r + u32::from(bit == '1')) % 3)
        == 0
}

#[test]
fn test_binary_multiples_of_three_minimize_to_three_states() {
    init_logging();
    let automaton = residues_mod_6();
    let dfa = Dfa::try_from(&automaton).unwrap();
    assert_eq!(dfa.num_states(), 6);

    let minimized = dfa.minimize();
    assert_eq!(minimized.num_states(), 3);
    assert_eq!(minimized.state_name(minimized.start_state()), "{r0,r3}");
    for input in all_strings(&['0', '1'], 8) {
        assert_eq!(minimized.accepts(&input), Ok(divisible_by_three(&input)), "{input:?}");
    }

    let expected = format::read("
        Automaton:
            Symbols: 01
            zero final
            one
            two
            --> zero
            zero -0-> zero
            zero -1-> one
            one -0-> two
            one -1-> zero
            two -0-> one
            two -1-> two
    ")
    .unwrap();
    assert!(minimized.isomorphism(&Dfa::try_from(&expected).unwrap()).is_some());
}

#[test]
fn test_nondeterministic_multiples_of_three() {
    init_logging();
    // Epsilon moves tie r and r + 3 together, which also forms epsilon cycles
    let automaton = residues_mod_6();
    let (initial, mut states, alphabet) = automaton.into_parts();
    for r in 0..3 {
        if let Some(state) = states.get_mut(&r) {
            state.add_transition(EPSILON, r + 3);
        }
        if let Some(state) = states.get_mut(&(r + 3)) {
            state.add_transition(EPSILON, r);
        }
    }
    let automaton = FiniteAutomaton::from_parts(initial, states, alphabet);
    assert!(!automaton.is_deterministic());

    let dfa = automaton.to_deterministic();
    assert_eq!(dfa.num_states(), 3);
    assert_eq!(automaton.to_minimized().num_states(), 3);
    for input in all_strings(&['0', '1'], 6) {
        assert_eq!(dfa.accepts(&input), Ok(divisible_by_three(&input)), "{input:?}");
    }
}

#[test]
fn test_regex_a_then_b_or_c_repeated() {
    init_logging();
    let automaton = regex::compile("a(b|c)*").unwrap();
    let dfa = automaton.to_deterministic();
    let minimized = dfa.minimize();

    for input in ["a", "ab", "ac", "abbcbc"] {
        assert!(nfa_accepts(&automaton, input), "{input:?}");
        assert_eq!(dfa.accepts(input), Ok(true), "{input:?}");
        assert_eq!(minimized.accepts(input), Ok(true), "{input:?}");
    }
    for input in ["", "b", "ba"] {
        assert!(!nfa_accepts(&automaton, input), "{input:?}");
        assert_eq!(dfa.accepts(input), Ok(false), "{input:?}");
        assert_eq!(minimized.accepts(input), Ok(false), "{input:?}");
    }
    assert_eq!(minimized.num_states(), 2);
}

#[test]
fn test_epsilon_cycle_and_unreachable_state() {
    init_logging();
    let automaton = format::read("
        Automaton:
            Symbols: ab
            s0
            s1
            s2 final
            lost
            --> s0
            s0 --> s1
            s1 --> s0
            s1 -a-> s2
            s2 -b-> s0
            lost -a-> s2
            lost -b-> lost
    ")
    .unwrap();

    let dfa = automaton.to_deterministic();
    assert_eq!(dfa.num_states(), 2);
    assert_eq!(dfa.state_name(dfa.start_state()), "{s0,s1}");

    let minimized = automaton.to_minimized();
    let lost = automaton.state_by_name("lost").map(State::id).unwrap();
    let mapping = minimized.state_mapping().unwrap();
    assert!(mapping.values().flatten().all(|&id| id != lost));
    for input in ["a", "aba", "ababa"] {
        assert_eq!(minimized.accepts(input), Ok(true), "{input:?}");
    }
    for input in ["", "b", "ab", "aa"] {
        assert_eq!(minimized.accepts(input), Ok(false), "{input:?}");
    }
}

#[test]
fn test_epsilon_chain_with_empty_alphabet() {
    init_logging();
    let automaton = format::read("
        Automaton:
            Symbols:
            s0
            s1
            s2 final
            --> s0
            s0 --> s1
            s1 --> s2
    ")
    .unwrap();

    let mut evaluator = Evaluator::new(&automaton);
    assert_eq!(evaluator.accepts(""), Ok(true));
    for symbol in ['a', '0', 'λ'] {
        assert_eq!(
            evaluator.process_symbol(symbol),
            Err(EvaluationError::InvalidSymbol(symbol))
        );
    }

    let minimized = automaton.to_minimized();
    assert_eq!(minimized.num_states(), 1);
    assert_eq!(minimized.accepts(""), Ok(true));
}

#[test]
fn test_text_round_trip_of_minimized_automaton() {
    init_logging();
    let minimized = regex::compile("(0|1)*1").unwrap().to_minimized();
    let text = format::write(&FiniteAutomaton::from(&minimized));
    let reread = Dfa::try_from(&format::read(&text).unwrap()).unwrap();
    assert!(reread.isomorphism(&minimized).is_some());
}
