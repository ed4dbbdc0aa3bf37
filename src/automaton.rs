//! The machinery shared by deterministic and nondeterministic automata:
//! interned state/alphabet storage, the textual-specification parser and
//! its inverse, and the read-only [`Automaton`] query trait.
//!
//! The textual format is one definition line per state:
//!
//! ```text
//! [->] STATE [()] -> SYM TARGET | SYM TARGET | ...
//! ```
//!
//! A leading `->` marks the start state (exactly one line must carry it),
//! a leading `()` marks an accepting state. A state without outgoing
//! transitions still writes the trailing `->`. The alphabet is inferred
//! from the transition symbols.

use std::collections::HashMap;
use std::fmt;

use bit_vec::BitVec;

use crate::error::BuildError;
use crate::sets::{StateSet, Symbol, SymbolSet, EOT};

/// Read-only queries every finite automaton answers, regardless of how
/// its transitions are stored.
pub trait Automaton {
    /// All states.
    fn states(&self) -> StateSet;

    /// The input alphabet.
    fn alphabet(&self) -> SymbolSet;

    /// Name of the start state.
    fn start_state(&self) -> &str;

    /// The accepting states.
    fn accepting_states(&self) -> StateSet;

    /// States reachable from `state` in one step on `symbol`. Empty when
    /// the transition is undefined (or `state`/`symbol` are unknown).
    fn successors(&self, state: &str, symbol: Symbol) -> StateSet;

    /// Whether the automaton accepts `input`, read symbol by symbol.
    fn accepts(&self, input: &str) -> bool;
}

/// State and alphabet bookkeeping shared by `DFA` and `NFA`: state names
/// interned to dense ids (transition tables index by id), the sorted
/// alphabet, the start id and the accepting-id bitmap.
#[derive(Clone, Debug)]
pub(crate) struct Core {
    pub(crate) names: Vec<String>,
    ids: HashMap<String, usize>,
    pub(crate) alphabet: Vec<Symbol>,
    pub(crate) start: usize,
    pub(crate) accepting: BitVec,
}

impl Core {
    /// `alphabet` must be sorted and duplicate-free; `start` and
    /// `accepting` are over indices of `names`.
    pub(crate) fn new(
        names: Vec<String>,
        alphabet: Vec<Symbol>,
        start: usize,
        accepting: BitVec,
    ) -> Result<Self, BuildError> {
        if names.is_empty() {
            return Err(BuildError::EmptyStateSet);
        }
        if alphabet.contains(&EOT) {
            return Err(BuildError::ReservedSymbol);
        }
        debug_assert!(alphabet.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(start < names.len());
        debug_assert_eq!(accepting.len(), names.len());
        let mut ids = HashMap::with_capacity(names.len());
        for (id, name) in names.iter().enumerate() {
            if ids.insert(name.clone(), id).is_some() {
                return Err(BuildError::DuplicateState(name.clone()));
            }
        }
        Ok(Core {
            names,
            ids,
            alphabet,
            start,
            accepting,
        })
    }

    /// For cores built by construction algorithms whose invariants
    /// (unique fresh names, validated alphabet) already hold.
    pub(crate) fn new_unchecked(
        names: Vec<String>,
        alphabet: Vec<Symbol>,
        start: usize,
        accepting: BitVec,
    ) -> Self {
        debug_assert!(!names.is_empty());
        let ids = names
            .iter()
            .enumerate()
            .map(|(id, name)| (name.clone(), id))
            .collect::<HashMap<_, _>>();
        debug_assert_eq!(ids.len(), names.len());
        Core {
            names,
            ids,
            alphabet,
            start,
            accepting,
        }
    }

    /// Validates and interns explicitly given parts: `states` must be
    /// non-empty, `start` and all of `accepting` members of `states`.
    pub(crate) fn from_parts(
        states: &StateSet,
        alphabet: &SymbolSet,
        start: &str,
        accepting: &StateSet,
    ) -> Result<Self, BuildError> {
        for state in accepting.iter() {
            if !states.contains(state) {
                return Err(BuildError::UndeclaredState(state.clone()));
            }
        }
        if !states.contains(start) {
            return Err(BuildError::UndeclaredState(start.to_string()));
        }
        let names: Vec<String> = states.iter().cloned().collect();
        let start = names.iter().position(|n| n.as_str() == start).unwrap_or(0);
        let bits: BitVec = names.iter().map(|n| accepting.contains(n)).collect();
        Core::new(names, alphabet.iter().copied().collect(), start, bits)
    }

    pub(crate) fn n_states(&self) -> usize {
        self.names.len()
    }

    pub(crate) fn state_id(&self, name: &str) -> Option<usize> {
        self.ids.get(name).copied()
    }

    pub(crate) fn symbol_index(&self, sy: Symbol) -> Option<usize> {
        self.alphabet.binary_search(&sy).ok()
    }

    pub(crate) fn is_accepting(&self, id: usize) -> bool {
        self.accepting.get(id).unwrap_or(false)
    }

    pub(crate) fn state_set(&self, ids: impl IntoIterator<Item = usize>) -> StateSet {
        ids.into_iter().map(|id| self.names[id].clone()).collect()
    }

    pub(crate) fn all_states(&self) -> StateSet {
        self.names.iter().cloned().collect()
    }

    pub(crate) fn symbol_set(&self) -> SymbolSet {
        self.alphabet.iter().copied().collect()
    }

    pub(crate) fn accepting_set(&self) -> StateSet {
        self.state_set((0..self.n_states()).filter(|&id| self.is_accepting(id)))
    }
}

/// A parsed specification: the interned core plus the transition edges
/// as `(source id, symbol index, target id)` in source order. `DFA` and
/// `NFA` construction load the edges into their own tables.
#[derive(Debug)]
pub(crate) struct Spec {
    pub(crate) core: Core,
    pub(crate) edges: Vec<(usize, usize, usize)>,
}

struct SpecLine {
    start: bool,
    accepting: bool,
    name: String,
    pairs: Vec<(Symbol, String)>,
}

fn parse_line(line: &str) -> Result<SpecLine, BuildError> {
    let err = || BuildError::MalformedLine(line.to_string());
    let mut toks = line.split_whitespace().peekable();

    let start = toks.peek() == Some(&"->");
    if start {
        toks.next();
    }
    let accepting = toks.peek() == Some(&"()");
    if accepting {
        toks.next();
    }
    let name = toks
        .next()
        .filter(|t| !matches!(*t, "->" | "()" | "|"))
        .ok_or_else(err)?
        .to_string();
    if toks.next() != Some("->") {
        return Err(err());
    }

    let rest: Vec<&str> = toks.collect();
    let mut pairs = Vec::new();
    if !rest.is_empty() {
        for alt in rest.split(|t| *t == "|") {
            let (sym, target) = match alt {
                [sym, target] => (*sym, *target),
                _ => return Err(err()),
            };
            let mut chars = sym.chars();
            let sy = match (chars.next(), chars.next()) {
                (Some(sy), None) => sy,
                _ => return Err(err()),
            };
            pairs.push((sy, target.to_string()));
        }
    }
    Ok(SpecLine {
        start,
        accepting,
        name,
        pairs,
    })
}

/// Parses a whole textual specification. Fails fast on the first
/// malformed line, a missing or duplicate start marker, a duplicate
/// state definition, or a transition target that no line defines.
pub(crate) fn parse_spec(src: &str) -> Result<Spec, BuildError> {
    let mut lines = Vec::new();
    for raw in src.lines() {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        lines.push(parse_line(raw)?);
    }
    if lines.is_empty() {
        return Err(BuildError::EmptyStateSet);
    }

    let mut start = None;
    for (id, line) in lines.iter().enumerate() {
        if line.start {
            if start.is_some() {
                return Err(BuildError::DuplicateStart(line.name.clone()));
            }
            start = Some(id);
        }
    }
    let start = start.ok_or(BuildError::MissingStart)?;

    let mut alphabet: Vec<Symbol> = lines
        .iter()
        .flat_map(|l| l.pairs.iter().map(|&(sy, _)| sy))
        .collect();
    alphabet.sort_unstable();
    alphabet.dedup();

    let names: Vec<String> = lines.iter().map(|l| l.name.clone()).collect();
    let accepting: BitVec = lines.iter().map(|l| l.accepting).collect();
    let core = Core::new(names, alphabet, start, accepting)?;

    let mut edges = Vec::new();
    for (sid, line) in lines.iter().enumerate() {
        for (sy, target) in &line.pairs {
            let tid = core
                .state_id(target)
                .ok_or_else(|| BuildError::UndeclaredState(target.clone()))?;
            let k = core
                .symbol_index(*sy)
                .ok_or(BuildError::UnknownSymbol(*sy))?;
            edges.push((sid, k, tid));
        }
    }
    Ok(Spec { core, edges })
}

/// Writes the canonical re-serialization of an automaton: one line per
/// state in id order, alternatives in alphabet order with name-sorted
/// targets. The output parses back to an equivalent automaton.
pub(crate) fn write_spec<F>(f: &mut fmt::Formatter<'_>, core: &Core, mut targets: F) -> fmt::Result
where
    F: FnMut(usize, usize) -> Vec<usize>,
{
    for id in 0..core.n_states() {
        if id > 0 {
            writeln!(f)?;
        }
        if id == core.start {
            f.write_str("-> ")?;
        }
        if core.is_accepting(id) {
            f.write_str("() ")?;
        }
        write!(f, "{} ->", core.names[id])?;
        let mut first = true;
        for (k, &sy) in core.alphabet.iter().enumerate() {
            let mut tos: Vec<&str> = targets(id, k)
                .into_iter()
                .map(|t| core.names[t].as_str())
                .collect();
            tos.sort_unstable();
            for to in tos {
                if first {
                    write!(f, " {} {}", sy, to)?;
                    first = false;
                } else {
                    write!(f, " | {} {}", sy, to)?;
                }
            }
        }
    }
    Ok(())
}
