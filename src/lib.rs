//! Finite-state automata and regular grammars for teaching formal
//! languages: build deterministic and nondeterministic automata from a
//! textual specification, test acceptance, determinize an NFA by subset
//! construction, minimize a DFA, attach Moore-machine output
//! transduction, and convert right-regular grammars into NFAs.
//!
//! ```
//! use fsalab::{Automaton, NFA};
//!
//! let nfa: NFA = "-> S -> 0 S | 0 A | 1 S \n\
//!                    A -> 1 E             \n\
//!                 () E ->                   "
//!     .parse()
//!     .unwrap();
//! assert!(nfa.accepts("101"));
//! assert!(!nfa.accepts("011"));
//!
//! let dfa = nfa.dfa_of();
//! assert!(dfa.accepts("101"));
//! assert!(dfa.minimal_dfa_of().accepts("101"));
//! ```

pub mod automaton;
pub mod dfa;
pub mod error;
pub mod grammar;
pub mod moore;
pub mod nfa;
pub mod sets;

pub use crate::automaton::Automaton;
pub use crate::dfa::DFA;
pub use crate::error::BuildError;
pub use crate::grammar::{Grammar, GrammarSymbol};
pub use crate::moore::Moore;
pub use crate::nfa::NFA;
pub use crate::sets::{StateSet, Symbol, SymbolSet, EOT};
