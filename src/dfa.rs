//! Deterministic finite automata: acceptance and minimization.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use bit_set::BitSet;
use bit_vec::BitVec;
use log::debug;

use crate::automaton::{parse_spec, write_spec, Automaton, Core, Spec};
use crate::error::BuildError;
use crate::sets::{StateSet, Symbol, SymbolSet};

/// A deterministic finite automaton.
///
/// The transition function is partial: an undefined transition means the
/// run is stuck and the input rejected, it is not an error. At most one
/// successor exists per `(state, symbol)` pair; construction rejects
/// anything ambiguous.
#[derive(Clone, Debug)]
pub struct DFA {
    core: Core,
    /// Successor table, `next[state id][symbol index]`.
    next: Vec<Box<[Option<usize>]>>,
}

impl DFA {
    pub(crate) fn from_spec(spec: Spec) -> Result<DFA, BuildError> {
        let Spec { core, edges } = spec;
        let row = vec![None; core.alphabet.len()].into_boxed_slice();
        let mut next = vec![row; core.n_states()];
        for (sid, k, tid) in edges {
            if next[sid][k].is_some() {
                return Err(BuildError::AmbiguousTransition {
                    state: core.names[sid].clone(),
                    symbol: core.alphabet[k],
                });
            }
            next[sid][k] = Some(tid);
        }
        Ok(DFA { core, next })
    }

    /// Caller guarantees the table is consistent with `core`.
    pub(crate) fn assemble(core: Core, next: Vec<Box<[Option<usize>]>>) -> DFA {
        debug_assert_eq!(next.len(), core.n_states());
        DFA { core, next }
    }

    /// Builds a DFA from explicitly given parts instead of a textual
    /// specification. `delta` lists `(state, symbol, target)` entries;
    /// everything is validated against `states` and `alphabet`.
    pub fn from_parts(
        states: &StateSet,
        alphabet: &SymbolSet,
        start: &str,
        accepting: &StateSet,
        delta: &[(&str, Symbol, &str)],
    ) -> Result<DFA, BuildError> {
        let core = Core::from_parts(states, alphabet, start, accepting)?;
        let mut edges = Vec::with_capacity(delta.len());
        for &(from, sy, to) in delta {
            let sid = core
                .state_id(from)
                .ok_or_else(|| BuildError::UndeclaredState(from.to_string()))?;
            let tid = core
                .state_id(to)
                .ok_or_else(|| BuildError::UndeclaredState(to.to_string()))?;
            let k = core.symbol_index(sy).ok_or(BuildError::UnknownSymbol(sy))?;
            edges.push((sid, k, tid));
        }
        DFA::from_spec(Spec { core, edges })
    }

    pub(crate) fn start_id(&self) -> usize {
        self.core.start
    }

    /// One deterministic step; `None` when the transition is undefined or
    /// the symbol is outside the alphabet.
    pub(crate) fn step(&self, sid: usize, sy: Symbol) -> Option<usize> {
        let k = self.core.symbol_index(sy)?;
        self.next[sid][k]
    }

    /// The coarsest language-equivalent DFA, computed by iterative
    /// partition refinement over the states reachable from the start:
    /// the initial partition separates accepting from non-accepting
    /// states, and a block splits whenever two of its members reach
    /// different blocks on some symbol (an undefined transition counts
    /// as a distinguished dead class). Merged states are named by the
    /// canonical set form of their members; singleton blocks keep their
    /// original name.
    pub fn minimal_dfa_of(&self) -> DFA {
        let n_sym = self.core.alphabet.len();

        // Unreachable states would pollute the blocks, so drop them first.
        let mut reachable = BitSet::with_capacity(self.core.n_states());
        reachable.insert(self.core.start);
        let mut worklist = vec![self.core.start];
        while let Some(sid) = worklist.pop() {
            for k in 0..n_sym {
                if let Some(tid) = self.next[sid][k] {
                    if reachable.insert(tid) {
                        worklist.push(tid);
                    }
                }
            }
        }
        let order: Vec<usize> = reachable.iter().collect();

        let mut block = vec![0usize; self.core.n_states()];
        let mut n_blocks = 1;
        for &sid in &order {
            if self.core.is_accepting(sid) {
                block[sid] = 1;
                n_blocks = 2;
            }
        }
        if n_blocks == 2 && order.iter().all(|&sid| self.core.is_accepting(sid)) {
            n_blocks = 1;
        }

        let mut round = 0;
        loop {
            let mut renumber: HashMap<(usize, Vec<Option<usize>>), usize> = HashMap::new();
            let mut refined = vec![0usize; self.core.n_states()];
            for &sid in &order {
                let sig: Vec<Option<usize>> = (0..n_sym)
                    .map(|k| self.next[sid][k].map(|tid| block[tid]))
                    .collect();
                let fresh = renumber.len();
                let b = *renumber.entry((block[sid], sig)).or_insert(fresh);
                refined[sid] = b;
            }
            let count = renumber.len();
            round += 1;
            debug!("refinement round {}: {} blocks", round, count);
            block = refined;
            if count == n_blocks {
                break;
            }
            n_blocks = count;
        }

        let mut members = vec![Vec::new(); n_blocks];
        for &sid in &order {
            members[block[sid]].push(sid);
        }

        let mut used = HashSet::new();
        let mut names = Vec::with_capacity(n_blocks);
        for group in &members {
            let mut name = if group.len() == 1 {
                self.core.names[group[0]].clone()
            } else {
                self.core.state_set(group.iter().copied()).to_string()
            };
            while !used.insert(name.clone()) {
                name.push('\'');
            }
            names.push(name);
        }

        let accepting: BitVec = members
            .iter()
            .map(|group| self.core.is_accepting(group[0]))
            .collect();
        let next: Vec<Box<[Option<usize>]>> = members
            .iter()
            .map(|group| {
                (0..n_sym)
                    .map(|k| self.next[group[0]][k].map(|tid| block[tid]))
                    .collect()
            })
            .collect();

        let core = Core::new_unchecked(
            names,
            self.core.alphabet.clone(),
            block[self.core.start],
            accepting,
        );
        DFA::assemble(core, next)
    }
}

impl Automaton for DFA {
    fn states(&self) -> StateSet {
        self.core.all_states()
    }

    fn alphabet(&self) -> SymbolSet {
        self.core.symbol_set()
    }

    fn start_state(&self) -> &str {
        &self.core.names[self.core.start]
    }

    fn accepting_states(&self) -> StateSet {
        self.core.accepting_set()
    }

    fn successors(&self, state: &str, symbol: Symbol) -> StateSet {
        let target = self
            .core
            .state_id(state)
            .and_then(|sid| self.step(sid, symbol));
        self.core.state_set(target)
    }

    fn accepts(&self, input: &str) -> bool {
        let mut state = self.core.start;
        for sy in input.chars() {
            state = match self.step(state, sy) {
                Some(next) => next,
                None => return false,
            };
        }
        self.core.is_accepting(state)
    }
}

impl FromStr for DFA {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<DFA, BuildError> {
        DFA::from_spec(parse_spec(s)?)
    }
}

impl fmt::Display for DFA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_spec(f, &self.core, |sid, k| {
            self.next[sid][k].into_iter().collect()
        })
    }
}
