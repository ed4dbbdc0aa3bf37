//! Nondeterministic finite automata: two acceptance strategies and the
//! subset construction producing an equivalent [`DFA`].

use std::collections::HashMap;
use std::fmt;
use std::mem;
use std::str::FromStr;

use bit_set::BitSet;
use bit_vec::BitVec;
use log::debug;

use crate::automaton::{parse_spec, write_spec, Automaton, Core, Spec};
use crate::dfa::DFA;
use crate::error::BuildError;
use crate::sets::{StateSet, Symbol, SymbolSet};

/// A nondeterministic finite automaton. A `(state, symbol)` pair maps to
/// a set of successor states, possibly empty. There are no ε-transitions.
#[derive(Clone, Debug)]
pub struct NFA {
    core: Core,
    /// Successor sets, `next[state id][symbol index]`.
    next: Vec<Box<[BitSet]>>,
}

impl NFA {
    pub(crate) fn from_spec(spec: Spec) -> NFA {
        let Spec { core, edges } = spec;
        let row = vec![BitSet::new(); core.alphabet.len()].into_boxed_slice();
        let mut next = vec![row; core.n_states()];
        for (sid, k, tid) in edges {
            next[sid][k].insert(tid);
        }
        NFA { core, next }
    }

    /// Caller guarantees the table is consistent with `core`.
    pub(crate) fn assemble(core: Core, next: Vec<Box<[BitSet]>>) -> NFA {
        debug_assert_eq!(next.len(), core.n_states());
        NFA { core, next }
    }

    /// Builds an NFA from explicitly given parts instead of a textual
    /// specification. `delta` lists `(state, symbol, targets)` entries;
    /// entries for the same pair accumulate.
    pub fn from_parts(
        states: &StateSet,
        alphabet: &SymbolSet,
        start: &str,
        accepting: &StateSet,
        delta: &[(&str, Symbol, StateSet)],
    ) -> Result<NFA, BuildError> {
        let core = Core::from_parts(states, alphabet, start, accepting)?;
        let mut edges = Vec::new();
        for (from, sy, targets) in delta {
            let sid = core
                .state_id(from)
                .ok_or_else(|| BuildError::UndeclaredState(from.to_string()))?;
            let k = core
                .symbol_index(*sy)
                .ok_or(BuildError::UnknownSymbol(*sy))?;
            for to in targets.iter() {
                let tid = core
                    .state_id(to)
                    .ok_or_else(|| BuildError::UndeclaredState(to.clone()))?;
                edges.push((sid, k, tid));
            }
        }
        Ok(NFA::from_spec(Spec { core, edges }))
    }

    /// Acceptance by determinizing first: builds the subset-construction
    /// DFA and runs the input through it. Agrees with [`Automaton::accepts`]
    /// on every input.
    pub fn accepts2(&self, input: &str) -> bool {
        self.dfa_of().accepts(input)
    }

    /// The equivalent DFA by subset construction. Only subsets actually
    /// reachable from `{start}` are materialized (worklist, memoized by
    /// the canonical member-id key), never the full power set. An empty
    /// successor union leaves the DFA transition undefined instead of
    /// adding a dead state. Each subset state is named by the canonical
    /// [`StateSet`] form of its members, so the construction is
    /// reproducible run to run.
    pub fn dfa_of(&self) -> DFA {
        let n_sym = self.core.alphabet.len();
        let start_key = vec![self.core.start];

        let mut names = vec![self.core.state_set(start_key.iter().copied()).to_string()];
        let mut accepting = BitVec::new();
        accepting.push(self.core.is_accepting(self.core.start));
        let empty_row = vec![None; n_sym].into_boxed_slice();
        let mut table = vec![empty_row.clone()];

        let mut subset_ids: HashMap<Vec<usize>, usize> = HashMap::new();
        subset_ids.insert(start_key.clone(), 0);
        let mut worklist = vec![(start_key, 0usize)];

        while let Some((key, num)) = worklist.pop() {
            for k in 0..n_sym {
                let mut union = BitSet::with_capacity(self.core.n_states());
                for &sid in &key {
                    union.union_with(&self.next[sid][k]);
                }
                // The stuck subset stays an undefined transition.
                if union.is_empty() {
                    continue;
                }
                let nxt_key: Vec<usize> = union.iter().collect();
                let nxt_num = match subset_ids.get(&nxt_key) {
                    Some(&known) => known,
                    None => {
                        let fresh = names.len();
                        names.push(self.core.state_set(nxt_key.iter().copied()).to_string());
                        accepting.push(nxt_key.iter().any(|&sid| self.core.is_accepting(sid)));
                        table.push(empty_row.clone());
                        subset_ids.insert(nxt_key.clone(), fresh);
                        worklist.push((nxt_key, fresh));
                        fresh
                    }
                };
                table[num][k] = Some(nxt_num);
            }
        }

        debug!(
            "subset construction reached {} of up to 2^{} states",
            names.len(),
            self.core.n_states()
        );
        let core = Core::new_unchecked(names, self.core.alphabet.clone(), 0, accepting);
        DFA::assemble(core, table)
    }
}

impl Automaton for NFA {
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
        match (self.core.state_id(state), self.core.symbol_index(symbol)) {
            (Some(sid), Some(k)) => self.core.state_set(self.next[sid][k].iter()),
            _ => StateSet::new(),
        }
    }

    /// Breadth-first simulation over frontiers of possible current
    /// states, starting from `{start}`. The frontier is a set, so
    /// branches that meet again are explored once; an empty frontier
    /// means every branch is stuck and the input is rejected early.
    fn accepts(&self, input: &str) -> bool {
        let mut cur = BitSet::with_capacity(self.core.n_states());
        let mut nxt = BitSet::with_capacity(self.core.n_states());
        cur.insert(self.core.start);
        for sy in input.chars() {
            let k = match self.core.symbol_index(sy) {
                Some(k) => k,
                None => return false,
            };
            nxt.clear();
            for sid in cur.iter() {
                nxt.union_with(&self.next[sid][k]);
            }
            mem::swap(&mut cur, &mut nxt);
            if cur.is_empty() {
                return false;
            }
        }
        cur.iter().any(|sid| self.core.is_accepting(sid))
    }
}

impl FromStr for NFA {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<NFA, BuildError> {
        Ok(NFA::from_spec(parse_spec(s)?))
    }
}

impl fmt::Display for NFA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_spec(f, &self.core, |sid, k| self.next[sid][k].iter().collect())
    }
}
