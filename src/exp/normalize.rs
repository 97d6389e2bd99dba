//! Canonical forms.
//!
//! `normalised` rewrites an expression bottom-up until no rule applies and
//! tags the result. Canonicalisation is what makes the derivative engine
//! terminate: syntactically different but equivalent forms (modulo
//! associativity, commutativity, idempotence and the identity/annihilator
//! laws) collapse to one shared node, so the set of derivative states
//! stays finite.

use super::intern::intern;
use super::{
    character, empty_set, empty_string, Exp, Kind, Payload,
};

/// The universal language, `¬∅`, in canonical form.
fn universal() -> Exp {
    intern(Kind::Complement, Payload::Subs(vec![empty_set()]), true)
}

/// Return the canonical form of `exp`.
///
/// Idempotent: normalising an already-normalised expression returns it
/// unchanged (and for free, via the norm flag).
pub fn normalised(exp: &Exp) -> Exp {
    if exp.norm() {
        return exp.clone();
    }
    match exp.kind() {
        Kind::EmptySet => empty_set(),
        Kind::EmptyString => empty_string(),
        Kind::AnyCharacter | Kind::Character => {
            // Leaf builders already produce canonical instances.
            exp.clone()
        }
        Kind::CharacterClass => normalise_class(exp),
        Kind::KleeneClosure => normalise_closure(exp),
        Kind::Complement => normalise_complement(exp),
        Kind::Concatenation => normalise_concatenation(exp),
        Kind::Conjunction => normalise_sorted_op(exp, Kind::Conjunction),
        Kind::Disjunction => normalise_sorted_op(exp, Kind::Disjunction),
    }
}

/// `[] → ∅`, `[c] → c`, otherwise the class itself, tagged.
fn normalise_class(exp: &Exp) -> Exp {
    let set = exp.character_class();
    match set.len() {
        0 => empty_set(),
        1 => match set.iter().next() {
            Some(&rune) => character(rune),
            None => empty_set(),
        },
        _ => intern(Kind::CharacterClass, Payload::Class(set.clone()), true),
    }
}

/// `(e*)* → e*`, `∅* → ε`, `ε* → ε`.
fn normalise_closure(exp: &Exp) -> Exp {
    let sub = normalised(exp.sub());
    match sub.kind() {
        Kind::KleeneClosure => sub,
        Kind::EmptySet | Kind::EmptyString => empty_string(),
        _ => intern(Kind::KleeneClosure, Payload::Subs(vec![sub]), true),
    }
}

/// `¬¬e → e`.
fn normalise_complement(exp: &Exp) -> Exp {
    let sub = normalised(exp.sub());
    match sub.kind() {
        Kind::Complement => sub.sub().clone(),
        _ => intern(Kind::Complement, Payload::Subs(vec![sub]), true),
    }
}

/// Flatten the sequence, annihilate on ∅, drop ε, re-fold to the right.
fn normalise_concatenation(exp: &Exp) -> Exp {
    let mut parts = Vec::new();
    gather_sequence(exp, &mut parts);

    if parts.iter().any(|p| p.kind() == Kind::EmptySet) {
        return empty_set();
    }
    parts.retain(|p| p.kind() != Kind::EmptyString);

    let mut folded = match parts.pop() {
        Some(last) => last,
        None => return empty_string(),
    };
    while let Some(part) = parts.pop() {
        folded = intern(
            Kind::Concatenation,
            Payload::Subs(vec![part, folded]),
            true,
        );
    }
    folded
}

/// Collect the normalised leaves of a (possibly nested) sequence in order.
fn gather_sequence(exp: &Exp, out: &mut Vec<Exp>) {
    if exp.kind() == Kind::Concatenation && !exp.norm() {
        gather_sequence(exp.head(), out);
        gather_sequence(exp.tail(), out);
        return;
    }
    let norm = normalised(exp);
    if norm.kind() == Kind::Concatenation {
        // Already a canonical right spine; walk it.
        let mut cursor = norm;
        loop {
            out.push(cursor.head().clone());
            let tail = cursor.tail().clone();
            if tail.kind() == Kind::Concatenation {
                cursor = tail;
            } else {
                out.push(tail);
                break;
            }
        }
    } else {
        out.push(norm);
    }
}

/// Shared rewrite for the commutative variadic operators: flatten, sort,
/// deduplicate, then apply the identity and annihilator laws.
fn normalise_sorted_op(exp: &Exp, kind: Kind) -> Exp {
    let mut subs = Vec::new();
    gather_operands(exp, kind, &mut subs);
    subs.sort();
    subs.dedup();

    let top = universal();
    match kind {
        Kind::Conjunction => {
            if subs.iter().any(|s| s.kind() == Kind::EmptySet) {
                return empty_set();
            }
            subs.retain(|s| *s != top);
            match subs.len() {
                0 => top,
                1 => subs.remove(0),
                _ => intern(Kind::Conjunction, Payload::Subs(subs), true),
            }
        }
        Kind::Disjunction => {
            if subs.iter().any(|s| *s == top) {
                return top;
            }
            subs.retain(|s| s.kind() != Kind::EmptySet);
            match subs.len() {
                0 => empty_set(),
                1 => subs.remove(0),
                _ => intern(Kind::Disjunction, Payload::Subs(subs), true),
            }
        }
        _ => unreachable!("sorted-op rewrite on {:?}", kind),
    }
}

/// Collect normalised operands, splicing nested operators of the same kind.
fn gather_operands(exp: &Exp, kind: Kind, out: &mut Vec<Exp>) {
    for sub in exp.subexpressions() {
        let norm = normalised(sub);
        if norm.kind() == kind {
            out.extend(norm.subexpressions().iter().cloned());
        } else {
            out.push(norm);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exp::{
        any_character, character_class, complement, concat_all, concatenation, conjunction,
        disjunction, kleene_closure, Rune,
    };
    use std::sync::Arc;

    fn ch(c: char) -> Exp {
        character(c as Rune)
    }

    #[test]
    fn test_idempotent() {
        let exps = vec![
            concat_all([ch('a'), ch('b'), ch('c')]),
            disjunction(vec![ch('b'), ch('a'), ch('a')]),
            complement(complement(ch('x'))),
            kleene_closure(kleene_closure(ch('a'))),
        ];
        for exp in exps {
            let once = normalised(&exp);
            let twice = normalised(&once);
            assert!(Arc::ptr_eq(&once, &twice));
            assert!(once.norm());
        }
    }

    #[test]
    fn test_closure_rules() {
        assert_eq!(normalised(&kleene_closure(empty_set())).kind(), Kind::EmptyString);
        assert_eq!(
            normalised(&kleene_closure(empty_string())).kind(),
            Kind::EmptyString
        );

        let star = normalised(&kleene_closure(ch('a')));
        let star_star = normalised(&kleene_closure(kleene_closure(ch('a'))));
        assert!(Arc::ptr_eq(&star, &star_star));
    }

    #[test]
    fn test_double_complement_cancels() {
        let a = normalised(&ch('a'));
        let back = normalised(&complement(complement(ch('a'))));
        assert!(Arc::ptr_eq(&a, &back));
    }

    #[test]
    fn test_concatenation_flattens_right() {
        // (a·b)·c and a·(b·c) meet in the same canonical spine.
        let left = concatenation(concatenation(ch('a'), ch('b')), ch('c'));
        let right = concatenation(ch('a'), concatenation(ch('b'), ch('c')));
        let l = normalised(&left);
        let r = normalised(&right);
        assert!(Arc::ptr_eq(&l, &r));
        assert_eq!(l.head().character(), 'a' as Rune);
        assert_eq!(l.tail().head().character(), 'b' as Rune);
    }

    #[test]
    fn test_concatenation_identities() {
        let a = normalised(&ch('a'));

        let with_eps = concatenation(empty_string(), concatenation(ch('a'), empty_string()));
        assert!(Arc::ptr_eq(&normalised(&with_eps), &a));

        let with_empty = concatenation(ch('a'), empty_set());
        assert_eq!(normalised(&with_empty).kind(), Kind::EmptySet);
    }

    #[test]
    fn test_disjunction_sorts_and_dedups() {
        let d1 = disjunction(vec![ch('b'), ch('a')]);
        let d2 = disjunction(vec![ch('a'), ch('b'), ch('a')]);
        let n1 = normalised(&d1);
        let n2 = normalised(&d2);
        assert!(Arc::ptr_eq(&n1, &n2));
        assert_eq!(n1.subexpressions().len(), 2);
        assert_eq!(n1.subexpressions()[0].character(), 'a' as Rune);
    }

    #[test]
    fn test_disjunction_identities() {
        // ∅ is the identity, ¬∅ the annihilator.
        let a = normalised(&ch('a'));
        let with_empty = disjunction(vec![ch('a'), empty_set()]);
        assert!(Arc::ptr_eq(&normalised(&with_empty), &a));

        let with_top = disjunction(vec![ch('a'), complement(empty_set())]);
        let top = normalised(&complement(empty_set()));
        assert!(Arc::ptr_eq(&normalised(&with_top), &top));
    }

    #[test]
    fn test_conjunction_identities() {
        // ¬∅ is the identity, ∅ the annihilator.
        let a = normalised(&ch('a'));
        let with_top = conjunction(vec![ch('a'), complement(empty_set())]);
        assert!(Arc::ptr_eq(&normalised(&with_top), &a));

        let with_empty = conjunction(vec![ch('a'), empty_set()]);
        assert_eq!(normalised(&with_empty).kind(), Kind::EmptySet);
    }

    #[test]
    fn test_nested_variadic_flattening() {
        let nested = disjunction(vec![
            disjunction(vec![ch('a'), ch('b')]),
            disjunction(vec![ch('b'), ch('c')]),
        ]);
        let flat = normalised(&nested);
        assert_eq!(flat.kind(), Kind::Disjunction);
        assert_eq!(flat.subexpressions().len(), 3);
    }

    #[test]
    fn test_class_degeneration() {
        assert_eq!(
            normalised(&character_class(Vec::<Rune>::new())).kind(),
            Kind::EmptySet
        );

        let single = normalised(&character_class(['q' as Rune]));
        assert!(Arc::ptr_eq(&single, &ch('q')));

        let multi = normalised(&character_class(['a' as Rune, 'b' as Rune]));
        assert_eq!(multi.kind(), Kind::CharacterClass);
        assert!(multi.norm());
    }

    #[test]
    fn test_any_character_untouched() {
        let any = any_character();
        assert!(Arc::ptr_eq(&normalised(&any), &any));
    }
}
