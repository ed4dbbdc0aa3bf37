//! Cross-cutting properties: agreement of the two NFA acceptance
//! strategies, language preservation under determinization and
//! minimization, and round-tripping through the textual form.

use std::collections::HashMap;

use fsalab::{Automaton, Grammar, Moore, DFA, NFA};
use lazy_static::lazy_static;

lazy_static! {
    /// Accepts exactly the 0/1 words ending in "01".
    static ref ZERO_ONE: NFA = "-> S -> 0 S | 0 A | 1 S \n\
                                   A -> 1 E             \n\
                                () E ->                   "
        .parse()
        .unwrap();

    /// The five-state "some letter doubled" example: S nondeterministically
    /// guesses where a letter repeats, A/B/C check the repeat, R absorbs.
    static ref DOUBLED_LETTER: NFA = NFA::from_parts(
        &"{S,A,B,C,R}".parse().unwrap(),
        &"{a,b,c}".parse().unwrap(),
        "S",
        &"{R}".parse().unwrap(),
        &[
            ("S", 'a', "{S,A}".parse().unwrap()),
            ("S", 'b', "{S,B}".parse().unwrap()),
            ("S", 'c', "{S,C}".parse().unwrap()),
            ("A", 'a', "{R}".parse().unwrap()),
            ("B", 'b', "{R}".parse().unwrap()),
            ("C", 'c', "{R}".parse().unwrap()),
            ("R", 'a', "{R}".parse().unwrap()),
            ("R", 'b', "{R}".parse().unwrap()),
            ("R", 'c', "{R}".parse().unwrap()),
        ],
    )
    .unwrap();
}

/// Every word over `alphabet` up to `max_len`, shortest first.
fn words(alphabet: &[char], max_len: usize) -> Vec<String> {
    let mut all = vec![String::new()];
    let mut layer = vec![String::new()];
    for _ in 0..max_len {
        let mut next = Vec::new();
        for w in &layer {
            for &c in alphabet {
                let mut w = w.clone();
                w.push(c);
                next.push(w);
            }
        }
        all.extend(next.iter().cloned());
        layer = next;
    }
    all
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn acceptance_strategies_agree() {
    init_logger();
    for w in words(&['0', '1'], 6) {
        assert_eq!(ZERO_ONE.accepts(&w), ZERO_ONE.accepts2(&w), "input {:?}", w);
    }
    for w in words(&['a', 'b', 'c'], 4) {
        assert_eq!(
            DOUBLED_LETTER.accepts(&w),
            DOUBLED_LETTER.accepts2(&w),
            "input {:?}",
            w
        );
    }
}

#[test]
fn doubled_letter_scenarios() {
    assert!(DOUBLED_LETTER.accepts("bbbbbbbbc"));
    assert!(DOUBLED_LETTER.accepts("cbbbbbbbbc"));
    assert!(DOUBLED_LETTER.accepts2("caaaaaaaac"));
    assert!(!DOUBLED_LETTER.accepts("aba"));
    assert!(!DOUBLED_LETTER.accepts("ab"));
}

#[test]
fn subset_construction_preserves_language() {
    init_logger();
    let dfa = DOUBLED_LETTER.dfa_of();
    for w in words(&['a', 'b', 'c'], 4) {
        assert_eq!(DOUBLED_LETTER.accepts(&w), dfa.accepts(&w), "input {:?}", w);
    }
}

#[test]
fn determinism_invariant() {
    let dfa = ZERO_ONE.dfa_of();
    for state in dfa.states().iter() {
        for &sy in dfa.alphabet().iter() {
            assert!(dfa.successors(state, sy).len() <= 1);
        }
    }
}

#[test]
fn minimization_preserves_language_and_is_idempotent() {
    init_logger();
    let dfa = DOUBLED_LETTER.dfa_of();
    let min = dfa.minimal_dfa_of();
    assert!(min.states().len() <= dfa.states().len());
    for w in words(&['a', 'b', 'c'], 4) {
        assert_eq!(dfa.accepts(&w), min.accepts(&w), "input {:?}", w);
    }
    assert_eq!(min.states().len(), min.minimal_dfa_of().states().len());
}

#[test]
fn dead_end_states_collapse() {
    let dfa: DFA = "-> S -> a P | b Q \n\
                 () P -> a D       \n\
                 () Q -> a E       \n\
                    D ->           \n\
                    E ->             "
        .parse()
        .unwrap();
    let min = dfa.minimal_dfa_of();
    assert_eq!(min.states().len(), 3);
    for w in words(&['a', 'b'], 3) {
        assert_eq!(dfa.accepts(&w), min.accepts(&w), "input {:?}", w);
    }
}

#[test]
fn parse_serialize_round_trip() {
    let text = ZERO_ONE.to_string();
    let back: NFA = text.parse().unwrap();
    for w in words(&['0', '1'], 5) {
        assert_eq!(ZERO_ONE.accepts(&w), back.accepts(&w), "input {:?}", w);
    }

    let dfa = DOUBLED_LETTER.dfa_of();
    let dfa_back: DFA = dfa.to_string().parse().unwrap();
    for w in words(&['a', 'b', 'c'], 4) {
        assert_eq!(dfa.accepts(&w), dfa_back.accepts(&w), "input {:?}", w);
    }
}

#[test]
fn grammar_conversion_end_to_end() {
    let g: Grammar = "G(S):              \n\
                      S -> a | a B | c C \n\
                      C -> a B           \n\
                      B -> b               "
        .parse()
        .unwrap();
    let nfa = g.nfa_of().unwrap();
    assert!(nfa.accepts("a"));
    assert!(nfa.accepts("ab"));
    assert!(!nfa.accepts(""));

    // The converted NFA behaves the same determinized and minimized.
    let min = nfa.dfa_of().minimal_dfa_of();
    for w in words(&['a', 'b', 'c'], 4) {
        assert_eq!(nfa.accepts(&w), min.accepts(&w), "input {:?}", w);
    }
}

#[test]
fn moore_transduction_tracks_consumed_input() {
    let dfa: DFA = "-> () E -> 0 O | 1 E \n\
                       O -> 0 E | 1 O      "
        .parse()
        .unwrap();
    let moore = Moore::new(dfa, HashMap::from([('0', 'z'), ('1', 'n')])).unwrap();
    assert_eq!(moore.transformer("0110"), "znnz");
    assert_eq!(moore.transformer("0110").len(), 4);
    assert_eq!(moore.transformer(""), "");
}
