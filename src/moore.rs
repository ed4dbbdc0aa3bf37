//! Moore machine: a [`DFA`] paired with an output symbol for every
//! alphabet symbol it consumes.

use std::collections::HashMap;

use crate::automaton::Automaton;
use crate::dfa::DFA;
use crate::error::BuildError;
use crate::sets::{Symbol, EOT};

/// A transducer built once from a DFA and an output map, immutable
/// afterwards.
#[derive(Clone, Debug)]
pub struct Moore {
    dfa: DFA,
    trans_map: HashMap<Symbol, Symbol>,
}

impl Moore {
    /// Wraps `dfa`; `trans_map` must assign an output symbol to every
    /// symbol of the DFA's alphabet.
    pub fn new(dfa: DFA, trans_map: HashMap<Symbol, Symbol>) -> Result<Moore, BuildError> {
        for &sy in dfa.alphabet().iter() {
            if !trans_map.contains_key(&sy) {
                return Err(BuildError::MissingOutput(sy));
            }
        }
        Ok(Moore { dfa, trans_map })
    }

    /// The wrapped automaton.
    pub fn dfa(&self) -> &DFA {
        &self.dfa
    }

    /// Transduces `tape` up to the first [`EOT`] (or the end of the
    /// input), appending the output mapped from each consumed input
    /// symbol after the corresponding state change. On success the
    /// output is exactly as long as the consumed input.
    ///
    /// Contract for broken runs: if a transition is undefined mid-way,
    /// the partial output is discarded and the empty string returned.
    pub fn transformer(&self, tape: &str) -> String {
        let mut state = self.dfa.start_id();
        let mut result = String::new();
        for sy in tape.chars() {
            if sy == EOT {
                break;
            }
            state = match self.dfa.step(state, sy) {
                Some(next) => next,
                None => return String::new(),
            };
            match self.trans_map.get(&sy) {
                Some(&out) => result.push(out),
                // A successful step implies an alphabet symbol, and the
                // map covers the alphabet.
                None => return String::new(),
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lower_to_upper() -> Moore {
        let dfa: DFA = "-> S -> a A | b B \n\
                           A -> a A       \n\
                           B ->             "
            .parse()
            .unwrap();
        Moore::new(dfa, HashMap::from([('a', 'X'), ('b', 'Y')])).unwrap()
    }

    #[test]
    fn transduces_consumed_symbols() {
        let moore = lower_to_upper();
        assert_eq!(moore.transformer("aaa"), "XXX");
        assert_eq!(moore.transformer("b"), "Y");
        assert_eq!(moore.transformer(""), "");
    }

    #[test]
    fn output_length_matches_input_length() {
        let moore = lower_to_upper();
        for input in ["a", "aa", "aaaa", "b"] {
            assert_eq!(moore.transformer(input).len(), input.len());
        }
    }

    #[test]
    fn stops_at_end_of_input_sentinel() {
        let moore = lower_to_upper();
        let tape = format!("aa{}aa", EOT);
        assert_eq!(moore.transformer(&tape), "XX");
    }

    #[test]
    fn undefined_transition_discards_partial_output() {
        let moore = lower_to_upper();
        assert_eq!(moore.transformer("aab"), "");
        assert_eq!(moore.transformer("ba"), "");
        assert_eq!(moore.transformer("c"), "");
    }

    #[test]
    fn output_map_must_cover_alphabet() {
        let dfa: DFA = "-> S -> a S | b S".parse().unwrap();
        let err = Moore::new(dfa, HashMap::from([('a', 'x')])).unwrap_err();
        assert_eq!(err, BuildError::MissingOutput('b'));
    }
}
