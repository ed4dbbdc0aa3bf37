//! Right-regular grammars: parsing, the regularity check, and the
//! conversion into an equivalent [`NFA`].
//!
//! The textual form is a header naming the root nonterminal followed by
//! one production line per nonterminal:
//!
//! ```text
//! G(S):
//! S -> a | a B | c C
//! C -> a B
//! B -> b
//! ```
//!
//! Tokens starting with an uppercase letter are nonterminals; any other
//! token must be a single character and is a terminal.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use bit_set::BitSet;
use bit_vec::BitVec;

use crate::automaton::Core;
use crate::error::BuildError;
use crate::nfa::NFA;
use crate::sets::Symbol;

/// One symbol on the right-hand side of a production.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GrammarSymbol {
    Terminal(Symbol),
    Nonterminal(String),
}

#[derive(Clone, Debug)]
struct Rule {
    head: String,
    alts: Vec<Vec<GrammarSymbol>>,
}

/// A grammar as an ordered rule list plus the root nonterminal. Every
/// nonterminal used anywhere must have its own rule line.
#[derive(Clone, Debug)]
pub struct Grammar {
    rules: Vec<Rule>,
    root: String,
}

fn classify(tok: &str) -> Result<GrammarSymbol, BuildError> {
    if tok.chars().next().map_or(false, char::is_uppercase) {
        return Ok(GrammarSymbol::Nonterminal(tok.to_string()));
    }
    let mut chars = tok.chars();
    match (chars.next(), chars.next()) {
        (Some(sy), None) => Ok(GrammarSymbol::Terminal(sy)),
        _ => Err(BuildError::MalformedGrammar(format!(
            "terminal `{}` must be a single symbol",
            tok
        ))),
    }
}

impl Grammar {
    /// The root nonterminal.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Whether every alternative has the right-linear shape
    /// `terminal* nonterminal?` — at most one nonterminal, and only at
    /// the very end.
    pub fn is_regular(&self) -> bool {
        self.rules.iter().all(|rule| {
            rule.alts.iter().all(|alt| {
                alt.iter().enumerate().all(|(i, sym)| match sym {
                    GrammarSymbol::Terminal(_) => true,
                    GrammarSymbol::Nonterminal(_) => i + 1 == alt.len(),
                })
            })
        })
    }

    /// Converts a regular grammar into an equivalent NFA.
    ///
    /// One state per nonterminal, named after it. An alternative
    /// `t1 .. tk N` becomes a transition chain through fresh
    /// intermediate states ending at `N`; without a trailing
    /// nonterminal the chain ends at the head's accepting sink state
    /// (created on demand). The start state is the root's state. Since
    /// only sinks accept, the empty word is never in the language.
    ///
    /// Fails with [`BuildError::NotRegular`] on a non-regular grammar
    /// and with [`BuildError::UnitProduction`] on a bare-nonterminal
    /// alternative, which would need an ε-transition to express.
    pub fn nfa_of(&self) -> Result<NFA, BuildError> {
        if !self.is_regular() {
            return Err(BuildError::NotRegular);
        }

        let mut names: Vec<String> = self.rules.iter().map(|r| r.head.clone()).collect();
        let mut used: HashSet<String> = names.iter().cloned().collect();
        let ids: HashMap<String, usize> = names
            .iter()
            .enumerate()
            .map(|(id, name)| (name.clone(), id))
            .collect();

        let mut accepting_ids: HashSet<usize> = HashSet::new();
        let mut sinks: HashMap<usize, usize> = HashMap::new();
        let mut edges: Vec<(usize, Symbol, usize)> = Vec::new();

        let add_state = |base: &str, tick: bool, names: &mut Vec<String>, used: &mut HashSet<String>| {
            let mut name = if tick {
                format!("{}'", base)
            } else {
                format!("{}{}", base, names.len())
            };
            while !used.insert(name.clone()) {
                name.push('\'');
            }
            let id = names.len();
            names.push(name);
            id
        };

        for rule in &self.rules {
            let head_id = ids[rule.head.as_str()];
            for alt in &rule.alts {
                let mut terminals: Vec<Symbol> = Vec::new();
                let mut trailing: Option<&str> = None;
                for sym in alt {
                    match sym {
                        GrammarSymbol::Terminal(t) => terminals.push(*t),
                        GrammarSymbol::Nonterminal(n) => trailing = Some(n),
                    }
                }
                if terminals.is_empty() {
                    return Err(BuildError::UnitProduction(rule.head.clone()));
                }
                let end_id = match trailing {
                    Some(n) => *ids
                        .get(n)
                        .ok_or_else(|| BuildError::UnknownNonterminal(n.to_string()))?,
                    None => match sinks.get(&head_id) {
                        Some(&sink) => sink,
                        None => {
                            let sink = add_state(&rule.head, true, &mut names, &mut used);
                            accepting_ids.insert(sink);
                            sinks.insert(head_id, sink);
                            sink
                        }
                    },
                };
                let mut cur = head_id;
                let last = terminals.len() - 1;
                for (i, &t) in terminals.iter().enumerate() {
                    let nxt = if i == last {
                        end_id
                    } else {
                        add_state(&rule.head, false, &mut names, &mut used)
                    };
                    edges.push((cur, t, nxt));
                    cur = nxt;
                }
            }
        }

        let mut alphabet: Vec<Symbol> = edges.iter().map(|&(_, t, _)| t).collect();
        alphabet.sort_unstable();
        alphabet.dedup();

        let start = ids[self.root.as_str()];
        let accepting: BitVec = (0..names.len()).map(|id| accepting_ids.contains(&id)).collect();
        let core = Core::new(names, alphabet, start, accepting)?;

        let row = vec![BitSet::new(); core.alphabet.len()].into_boxed_slice();
        let mut table = vec![row; core.n_states()];
        for (from, t, to) in edges {
            let k = core.symbol_index(t).ok_or(BuildError::UnknownSymbol(t))?;
            table[from][k].insert(to);
        }
        Ok(NFA::assemble(core, table))
    }
}

impl FromStr for Grammar {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Grammar, BuildError> {
        let mut lines = s.lines().map(str::trim).filter(|l| !l.is_empty());
        let header = lines
            .next()
            .ok_or_else(|| BuildError::MalformedGrammar("empty grammar".into()))?;
        let root = header
            .strip_prefix("G(")
            .and_then(|rest| rest.strip_suffix("):"))
            .map(str::trim)
            .filter(|r| !r.is_empty() && !r.contains(char::is_whitespace))
            .ok_or_else(|| BuildError::MalformedGrammar(format!("bad header `{}`", header)))?
            .to_string();

        let mut rules: Vec<Rule> = Vec::new();
        let mut heads: HashSet<String> = HashSet::new();
        for line in lines {
            let err = || BuildError::MalformedGrammar(format!("bad rule line `{}`", line));
            let mut toks = line.split_whitespace();
            let head = match toks.next().map(classify) {
                Some(Ok(GrammarSymbol::Nonterminal(head))) => head,
                Some(Err(e)) => return Err(e),
                _ => return Err(err()),
            };
            if toks.next() != Some("->") {
                return Err(err());
            }
            let rest: Vec<&str> = toks.collect();
            if rest.is_empty() {
                return Err(err());
            }
            let mut alts = Vec::new();
            for alt in rest.split(|t| *t == "|") {
                if alt.is_empty() {
                    return Err(err());
                }
                let symbols = alt
                    .iter()
                    .map(|t| classify(t))
                    .collect::<Result<Vec<_>, _>>()?;
                alts.push(symbols);
            }
            if !heads.insert(head.clone()) {
                return Err(BuildError::DuplicateRule(head));
            }
            rules.push(Rule { head, alts });
        }

        if !heads.contains(&root) {
            return Err(BuildError::UnknownNonterminal(root));
        }
        for rule in &rules {
            for alt in &rule.alts {
                for sym in alt {
                    if let GrammarSymbol::Nonterminal(n) = sym {
                        if !heads.contains(n) {
                            return Err(BuildError::UnknownNonterminal(n.clone()));
                        }
                    }
                }
            }
        }
        Ok(Grammar { rules, root })
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "G({}):", self.root)?;
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{} ->", rule.head)?;
            for (j, alt) in rule.alts.iter().enumerate() {
                if j > 0 {
                    write!(f, " |")?;
                }
                for sym in alt {
                    match sym {
                        GrammarSymbol::Terminal(t) => write!(f, " {}", t)?,
                        GrammarSymbol::Nonterminal(n) => write!(f, " {}", n)?,
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::Automaton;

    fn sample() -> Grammar {
        "G(S):              \n\
         S -> a | a B | c C \n\
         C -> a B           \n\
         B -> b               "
            .parse()
            .unwrap()
    }

    #[test]
    fn parses_and_reserializes() {
        let g = sample();
        assert_eq!(g.root(), "S");
        assert_eq!(g.to_string(), "G(S):\nS -> a | a B | c C\nC -> a B\nB -> b");
        let back: Grammar = g.to_string().parse().unwrap();
        assert_eq!(back.to_string(), g.to_string());
    }

    #[test]
    fn regularity_check() {
        assert!(sample().is_regular());
        let left: Grammar = "G(S): \n S -> S a | b".parse().unwrap();
        assert!(!left.is_regular());
        let inner: Grammar = "G(S): \n S -> a S b".parse().unwrap();
        assert!(!inner.is_regular());
    }

    #[test]
    fn converts_to_equivalent_nfa() {
        let nfa = sample().nfa_of().unwrap();
        assert_eq!(nfa.start_state(), "S");
        assert!(nfa.accepts("a"));
        assert!(nfa.accepts("ab"));
        assert!(nfa.accepts("cab"));
        assert!(!nfa.accepts(""));
        assert!(!nfa.accepts("b"));
        assert!(!nfa.accepts("ca"));
        assert!(!nfa.accepts("aba"));
    }

    #[test]
    fn terminal_chains_get_intermediate_states() {
        let g: Grammar = "G(S): \n S -> a b c".parse().unwrap();
        let nfa = g.nfa_of().unwrap();
        assert!(nfa.accepts("abc"));
        assert!(!nfa.accepts("ab"));
        assert!(!nfa.accepts("abcc"));
    }

    #[test]
    fn non_regular_grammar_is_rejected() {
        let g: Grammar = "G(S): \n S -> S a | b".parse().unwrap();
        assert_eq!(g.nfa_of().unwrap_err(), BuildError::NotRegular);
    }

    #[test]
    fn unit_production_is_rejected() {
        let g: Grammar = "G(S): \n S -> a | B \n B -> b".parse().unwrap();
        assert_eq!(g.nfa_of().unwrap_err(), BuildError::UnitProduction("S".into()));
    }

    #[test]
    fn malformed_grammars() {
        assert!(matches!(
            "S -> a".parse::<Grammar>().unwrap_err(),
            BuildError::MalformedGrammar(_)
        ));
        assert!(matches!(
            "G(S): \n S -> ab".parse::<Grammar>().unwrap_err(),
            BuildError::MalformedGrammar(_)
        ));
        assert!(matches!(
            "G(S): \n S ->".parse::<Grammar>().unwrap_err(),
            BuildError::MalformedGrammar(_)
        ));
        assert_eq!(
            "G(S): \n S -> a \n S -> b".parse::<Grammar>().unwrap_err(),
            BuildError::DuplicateRule("S".into())
        );
        assert_eq!(
            "G(S): \n S -> a B".parse::<Grammar>().unwrap_err(),
            BuildError::UnknownNonterminal("B".into())
        );
        assert_eq!(
            "G(X): \n S -> a".parse::<Grammar>().unwrap_err(),
            BuildError::UnknownNonterminal("X".into())
        );
    }
}
