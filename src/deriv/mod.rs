//! The derivative engine.
//!
//! `derivative(e, a)` produces the expression whose language is
//! `{ w : a·w ∈ L(e) }` — matching is repeated differentiation, and the DFA
//! compiler enumerates the (finitely many) normalised derivatives of a
//! start expression. Nullability decides acceptance after the last rune.
//!
//! References
//! ----------
//!
//! "Derivatives of Regular Expressions", Janusz A. Brzozowski,
//! JACM vol. 11 iss. 4, 1964.
//!
//! "Regular-expression derivatives re-examined", Owens, Reppy, Turon,
//! JFP vol. 19 iss. 2, 2009.

pub mod partition;

use crate::exp::{
    complement, concatenation, conjunction, disjunction, empty_set, empty_string, normalised,
    Exp, Kind, Rune,
};

/// Whether `exp` matches the empty string.
pub fn is_nullable(exp: &Exp) -> bool {
    match exp.kind() {
        Kind::EmptySet | Kind::AnyCharacter | Kind::Character | Kind::CharacterClass => false,
        Kind::EmptyString | Kind::KleeneClosure => true,
        Kind::Complement => !is_nullable(exp.sub()),
        Kind::Concatenation => is_nullable(exp.head()) && is_nullable(exp.tail()),
        Kind::Conjunction => exp.subexpressions().iter().all(is_nullable),
        Kind::Disjunction => exp.subexpressions().iter().any(is_nullable),
    }
}

/// The nullability of `exp` as an expression: ε if `exp` matches the empty
/// string, ∅ otherwise. Returning an expression lets nullability compose
/// directly with the concatenation rule below.
pub fn nullability(exp: &Exp) -> Exp {
    if is_nullable(exp) {
        empty_string()
    } else {
        empty_set()
    }
}

/// The Brzozowski derivative of `exp` with respect to `rune`, in canonical
/// form. Derivatives of canonical expressions are the state space of the
/// compiled DFA, so the result is always normalised before return.
pub fn derivative(exp: &Exp, rune: Rune) -> Exp {
    let raw = match exp.kind() {
        Kind::EmptySet | Kind::EmptyString => empty_set(),
        Kind::AnyCharacter => empty_string(),
        Kind::Character => {
            if exp.character() == rune {
                empty_string()
            } else {
                empty_set()
            }
        }
        Kind::CharacterClass => {
            if exp.character_class().contains(&rune) {
                empty_string()
            } else {
                empty_set()
            }
        }
        Kind::KleeneClosure => {
            // ∂a(e*) = ∂a(e) · e*
            concatenation(derivative(exp.sub(), rune), normalised(exp))
        }
        Kind::Concatenation => {
            // ∂a(e₁·e₂) = ∂a(e₁)·e₂ ⋁ ν(e₁)·∂a(e₂)
            let head = exp.head();
            let tail = exp.tail();
            disjunction(vec![
                concatenation(derivative(head, rune), tail.clone()),
                concatenation(nullability(head), derivative(tail, rune)),
            ])
        }
        Kind::Complement => {
            // ∂a(¬e) = ¬∂a(e)
            complement(derivative(exp.sub(), rune))
        }
        Kind::Conjunction => conjunction(
            exp.subexpressions()
                .iter()
                .map(|sub| derivative(sub, rune))
                .collect(),
        ),
        Kind::Disjunction => disjunction(
            exp.subexpressions()
                .iter()
                .map(|sub| derivative(sub, rune))
                .collect(),
        ),
    };
    normalised(&raw)
}
