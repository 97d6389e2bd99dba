//! Match drivers.
//!
//! Two ways to decide membership, both over the whole input: differentiate
//! the expression rune by rune, or walk a compiled DFA. They always agree;
//! the DFA just pays the differentiation cost once, at compile time.
//!
//! No backtracking in either driver — time is linear in the input length.

use crate::deriv::{derivative, is_nullable};
use crate::dfa::{compile, Dfa, DfaStats};
use crate::error::Result;
use crate::exp::{normalised, Exp, Rune, INVALID_RUNE};
use crate::parser::parse;

/// Match `input` against `exp` by repeated differentiation.
pub fn matches(exp: &Exp, input: &str) -> bool {
    let mut current = normalised(exp);

    for c in input.chars() {
        current = derivative(&current, c as Rune);
    }

    is_nullable(&current)
}

/// Match `input` by walking a compiled automaton. Runes without an explicit
/// transition take the state's default edge.
pub fn matches_dfa(dfa: &Dfa, input: &str) -> bool {
    let mut state = 0usize;

    for c in input.chars() {
        let next = dfa
            .transition
            .get(&(state, c as Rune))
            .or_else(|| dfa.transition.get(&(state, INVALID_RUNE)));
        state = match next {
            Some(&next) => next,
            None => return false,
        };
    }

    dfa.accepting.get(&state).copied().unwrap_or(false)
}

/// A pattern compiled once and queried many times.
///
/// Parsing, normalisation and DFA compilation happen in `new`; `is_match`
/// is then a pure table walk. Everything inside is immutable, so a Pattern
/// can be shared freely across threads.
pub struct Pattern {
    exp: Exp,
    dfa: Dfa,
    states: usize,
}

impl Pattern {
    /// Parse and compile `pattern`.
    pub fn new(pattern: &str) -> Result<Self> {
        let exp = normalised(&parse(pattern)?);
        let mut dfa = Dfa::new();
        let states = compile(&exp, &mut dfa);
        Ok(Self { exp, dfa, states })
    }

    /// Compile an already-built expression.
    pub fn from_exp(exp: &Exp) -> Self {
        let exp = normalised(exp);
        let mut dfa = Dfa::new();
        let states = compile(&exp, &mut dfa);
        Self { exp, dfa, states }
    }

    /// Whether `input` as a whole matches the pattern.
    pub fn is_match(&self, input: &str) -> bool {
        matches_dfa(&self.dfa, input)
    }

    /// The canonical expression behind the pattern.
    pub fn exp(&self) -> &Exp {
        &self.exp
    }

    /// The compiled automaton.
    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }

    /// Number of DFA states.
    pub fn state_count(&self) -> usize {
        self.states
    }

    /// Summary of the compiled automaton's shape.
    pub fn stats(&self) -> DfaStats {
        self.dfa.stats()
    }
}
