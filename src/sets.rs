//! Alphabet symbols, state names, and the finite sets over them.
//!
//! Both set types parse from the brace literal form (`{a,b,c}`) and
//! display in a canonical sorted form. The canonical `StateSet` form
//! doubles as the stable naming scheme for subset construction.

use std::collections::btree_set::{self, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::error::BuildError;

/// One atomic alphabet symbol.
pub type Symbol = char;

/// Reserved end-of-input sentinel. Never a member of an alphabet; a
/// Moore machine stops transducing when it reads this.
pub const EOT: Symbol = '\0';

fn split_braces(s: &str) -> Result<Vec<&str>, BuildError> {
    let inner = s
        .trim()
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .ok_or_else(|| BuildError::MalformedSet(s.to_string()))?;
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }
    inner
        .split(',')
        .map(|elem| {
            let elem = elem.trim();
            if elem.is_empty() {
                Err(BuildError::MalformedSet(s.to_string()))
            } else {
                Ok(elem)
            }
        })
        .collect()
}

/// A finite set of alphabet symbols.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolSet(BTreeSet<Symbol>);

impl SymbolSet {
    pub fn new() -> Self {
        SymbolSet(BTreeSet::new())
    }

    pub fn contains(&self, sy: Symbol) -> bool {
        self.0.contains(&sy)
    }

    pub fn insert(&mut self, sy: Symbol) -> bool {
        self.0.insert(sy)
    }

    pub fn union(&self, other: &SymbolSet) -> SymbolSet {
        SymbolSet(self.0.union(&other.0).cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Symbols in sorted order.
    pub fn iter(&self) -> btree_set::Iter<'_, Symbol> {
        self.0.iter()
    }
}

impl FromIterator<Symbol> for SymbolSet {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        SymbolSet(iter.into_iter().collect())
    }
}

impl FromStr for SymbolSet {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, BuildError> {
        let mut set = BTreeSet::new();
        for elem in split_braces(s)? {
            let mut chars = elem.chars();
            match (chars.next(), chars.next()) {
                (Some(sy), None) => set.insert(sy),
                _ => return Err(BuildError::MalformedSet(s.to_string())),
            };
        }
        Ok(SymbolSet(set))
    }
}

impl fmt::Display for SymbolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, sy) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", sy)?;
        }
        f.write_str("}")
    }
}

/// A finite set of state names.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct StateSet(BTreeSet<String>);

impl StateSet {
    pub fn new() -> Self {
        StateSet(BTreeSet::new())
    }

    pub fn contains(&self, state: &str) -> bool {
        self.0.contains(state)
    }

    pub fn insert(&mut self, state: impl Into<String>) -> bool {
        self.0.insert(state.into())
    }

    pub fn union(&self, other: &StateSet) -> StateSet {
        StateSet(self.0.union(&other.0).cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// State names in sorted order.
    pub fn iter(&self) -> btree_set::Iter<'_, String> {
        self.0.iter()
    }
}

impl FromIterator<String> for StateSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        StateSet(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for StateSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        StateSet(iter.into_iter().map(str::to_string).collect())
    }
}

impl FromStr for StateSet {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, BuildError> {
        let elems = split_braces(s)?;
        for elem in &elems {
            if elem.contains(['{', '}', '|']) || elem.contains(char::is_whitespace) {
                return Err(BuildError::MalformedSet(s.to_string()));
            }
        }
        Ok(elems.into_iter().collect())
    }
}

impl fmt::Display for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, state) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(state)?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_set_literal() {
        let set: SymbolSet = "{b,a,c}".parse().unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.contains('a'));
        assert!(!set.contains('d'));
        assert_eq!(set.to_string(), "{a,b,c}");
    }

    #[test]
    fn symbol_set_deduplicates() {
        let set: SymbolSet = "{a,a,b}".parse().unwrap();
        assert_eq!(set.len(), 2);
        let again: SymbolSet = "{b,a}".parse().unwrap();
        assert_eq!(set, again);
    }

    #[test]
    fn empty_set_literal() {
        let set: StateSet = "{}".parse().unwrap();
        assert!(set.is_empty());
        assert_eq!(set.to_string(), "{}");
    }

    #[test]
    fn state_set_canonical_form() {
        let set: StateSet = "{S,A}".parse().unwrap();
        assert_eq!(set.to_string(), "{A,S}");
        let merged = set.union(&"{E}".parse().unwrap());
        assert_eq!(merged.to_string(), "{A,E,S}");
    }

    #[test]
    fn malformed_literals_rejected() {
        assert!("a,b".parse::<SymbolSet>().is_err());
        assert!("{a,".parse::<SymbolSet>().is_err());
        assert!("{ab}".parse::<SymbolSet>().is_err());
        assert!("{a,,b}".parse::<StateSet>().is_err());
        assert!("{A B}".parse::<StateSet>().is_err());
    }

    #[test]
    fn multi_char_state_names() {
        let set: StateSet = "{q0,q1,dead}".parse().unwrap();
        assert!(set.contains("q1"));
        assert_eq!(set.to_string(), "{dead,q0,q1}");
    }
}
