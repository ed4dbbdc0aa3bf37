use crate::sets::Symbol;

/// Failure to build an automaton, Moore machine or grammar from its
/// description.
///
/// Construction either succeeds completely or fails with one of these;
/// no partially built value is ever returned. Rejection of an input
/// string is *not* an error, it is the `false` result of an acceptance
/// query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("no state carries the start marker `->`")]
    MissingStart,
    #[error("start marker `->` appears again on state `{0}`")]
    DuplicateStart(String),
    #[error("state `{0}` is defined more than once")]
    DuplicateState(String),
    #[error("state `{0}` is referenced but never defined")]
    UndeclaredState(String),
    #[error("symbol `{0}` is not part of the alphabet")]
    UnknownSymbol(Symbol),
    #[error("the end-of-input sentinel cannot be an alphabet symbol")]
    ReservedSymbol,
    #[error("state `{state}` has more than one transition on `{symbol}`")]
    AmbiguousTransition { state: String, symbol: Symbol },
    #[error("an automaton needs at least one state")]
    EmptyStateSet,
    #[error("malformed state definition: `{0}`")]
    MalformedLine(String),
    #[error("malformed set literal: `{0}`")]
    MalformedSet(String),
    #[error("malformed grammar: {0}")]
    MalformedGrammar(String),
    #[error("nonterminal `{0}` has more than one rule line")]
    DuplicateRule(String),
    #[error("nonterminal `{0}` is used but has no rule")]
    UnknownNonterminal(String),
    #[error("not a regular grammar")]
    NotRegular,
    #[error("unit production on `{0}` has no automaton counterpart")]
    UnitProduction(String),
    #[error("no output symbol mapped for alphabet symbol `{0}`")]
    MissingOutput(Symbol),
}
