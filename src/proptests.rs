//! Property-based tests for the derivative engine.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use std::cmp::Ordering;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use crate::deriv::partition::partitions;
    use crate::deriv::{derivative, is_nullable};
    use crate::dfa::{compile, Dfa};
    use crate::exp::{
        any_character, character, character_class, compare, complement, concatenation,
        conjunction, disjunction, empty_set, empty_string, kleene_closure, normalised, Exp, Rune,
    };
    use crate::matcher::{matches, matches_dfa};

    // A three-letter alphabet keeps the derivative spaces small while
    // still exercising every refinement path.
    fn rune() -> impl Strategy<Value = Rune> {
        'a' as Rune..='c' as Rune
    }

    fn leaf() -> impl Strategy<Value = Exp> {
        prop_oneof![
            Just(empty_set()),
            Just(empty_string()),
            Just(any_character()),
            rune().prop_map(character),
            proptest::collection::btree_set(rune(), 1..3).prop_map(|s| character_class(s)),
        ]
    }

    fn exp() -> impl Strategy<Value = Exp> {
        leaf().prop_recursive(3, 24, 2, |inner| {
            prop_oneof![
                inner.clone().prop_map(kleene_closure),
                inner.clone().prop_map(complement),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| concatenation(a, b)),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| conjunction(vec![a, b])),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| disjunction(vec![a, b])),
            ]
        })
    }

    fn word() -> impl Strategy<Value = String> {
        proptest::collection::vec(prop_oneof![Just('a'), Just('b'), Just('c'), Just('z')], 0..6)
            .prop_map(|chars| chars.into_iter().collect())
    }

    proptest! {
        #[test]
        fn normalisation_is_idempotent(e in exp()) {
            let once = normalised(&e);
            let twice = normalised(&once);
            prop_assert!(Arc::ptr_eq(&once, &twice));
            prop_assert!(once.norm());
        }

        #[test]
        fn direct_and_dfa_drivers_agree(e in exp(), w in word()) {
            let mut dfa = Dfa::new();
            compile(&e, &mut dfa);
            prop_assert_eq!(matches(&e, &w), matches_dfa(&dfa, &w));
        }

        #[test]
        fn derivative_law_on_first_rune(e in exp(), w in word()) {
            if let Some(first) = w.chars().next() {
                let rest = &w[first.len_utf8()..];
                let derived = derivative(&e, first as Rune);
                prop_assert_eq!(matches(&e, &w), matches(&derived, rest));
            }
        }

        #[test]
        fn nullability_matches_empty_word(e in exp()) {
            prop_assert_eq!(is_nullable(&e), matches(&e, ""));
        }

        #[test]
        fn partitions_cover_and_agree(e in exp()) {
            let parts = partitions(&e);
            let comp = &parts[0];

            // ∅-based blocks are nonempty, pairwise disjoint, and together
            // make up exactly the complement of the Σ-based block.
            let mut union = BTreeSet::new();
            for block in &parts[1..] {
                prop_assert!(!block.is_empty());
                for r in block {
                    prop_assert!(union.insert(*r), "blocks overlap on {}", r);
                }
            }
            prop_assert_eq!(&union, comp);

            // All runes within one block take the state to the same place.
            for block in &parts[1..] {
                let mut runes = block.iter();
                if let Some(&first) = runes.next() {
                    let expected = derivative(&e, first);
                    for &r in runes {
                        prop_assert_eq!(derivative(&e, r), expected.clone());
                    }
                }
            }

            // Two different outsiders behave like each other too.
            let mut rep = 0;
            while comp.contains(&rep) {
                rep += 1;
            }
            let mut other = rep + 1;
            while comp.contains(&other) {
                other += 1;
            }
            prop_assert_eq!(derivative(&e, rep), derivative(&e, other));
        }

        #[test]
        fn compare_is_a_total_order(a in exp(), b in exp(), c in exp()) {
            prop_assert_eq!(compare(&a, &b), compare(&b, &a).reverse());
            if compare(&a, &b) != Ordering::Greater && compare(&b, &c) != Ordering::Greater {
                prop_assert!(compare(&a, &c) != Ordering::Greater);
            }
        }

        #[test]
        fn equal_normal_forms_share_identity(a in exp(), b in exp()) {
            let na = normalised(&a);
            let nb = normalised(&b);
            if compare(&na, &nb) == Ordering::Equal {
                prop_assert!(Arc::ptr_eq(&na, &nb));
            }
        }
    }
}
