//! # Quotient
//!
//! Extended regular expressions via Brzozowski derivatives.
//!
//! Expressions form an immutable, hash-consed algebra with intersection
//! (`&`) and complement (`~`) alongside the usual operators. Matching is
//! repeated symbolic differentiation; compilation enumerates the finitely
//! many derivatives of a canonical expression into a DFA whose size tracks
//! distinct derivative behaviours, not the size of the Unicode alphabet.
//!
//! ## Key Properties
//!
//! - **Derivative-based**: no backtracking, no ReDoS — matching is linear
//!   in the input length
//! - **Boolean-closed**: intersection and complement are first-class
//!   operators, not bolted on
//! - **Canonical**: normalisation collapses equivalent forms to one shared
//!   node, which is what keeps the compiled state space finite
//! - **Compact DFAs**: a sentinel default transition stands in for "every
//!   other rune", so Unicode costs nothing
//!
//! ## Quick Start
//!
//! ```rust
//! use quotient::Pattern;
//!
//! // Strings that contain no "ab".
//! let pattern = Pattern::new(".*&~(.*ab.*)").unwrap();
//! assert!(pattern.is_match("xyz"));
//! assert!(!pattern.is_match("xaby"));
//! ```

pub mod deriv;
pub mod dfa;
pub mod error;
pub mod exp;
pub mod matcher;
pub mod parser;

#[cfg(test)]
mod proptests;

// Re-exports for convenience
pub use error::{QuotientError, Result};

pub use deriv::partition::partitions;
pub use deriv::{derivative, is_nullable, nullability};
pub use dfa::{compile, Dfa, DfaStats};
pub use exp::{
    any_character, character, character_class, compare, complement, concat_all, concatenation,
    conjunction, disjunction, empty_set, empty_string, kleene_closure, normalised, Exp,
    Expression, Kind, Rune, INVALID_RUNE,
};
pub use matcher::{matches, matches_dfa, Pattern};
pub use parser::{parse, ParseError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_pipeline_boolean_query() {
        // Parse through to the DFA and query both drivers: identifiers
        // that start with Config and end with Manager, but skip the
        // deprecated one.
        let exp = parse("Config.*Manager&~ConfigLegacyManager").unwrap();
        let mut dfa = Dfa::new();
        let states = compile(&exp, &mut dfa);
        assert!(states > 2);

        for (input, expected) in [
            ("ConfigManager", true),
            ("ConfigFileManager", true),
            ("ConfigLegacyManager", false),
            ("Config", false),
            ("MyConfigManager", false),
        ] {
            assert_eq!(matches(&exp, input), expected, "direct on {input:?}");
            assert_eq!(matches_dfa(&dfa, input), expected, "dfa on {input:?}");
        }
    }

    #[test]
    fn test_builders_and_parser_meet_in_the_same_node() {
        let parsed = normalised(&parse("a(b|c)*").unwrap());
        let built = normalised(&concatenation(
            character('a' as Rune),
            kleene_closure(disjunction(vec![
                character('b' as Rune),
                character('c' as Rune),
            ])),
        ));
        assert!(std::sync::Arc::ptr_eq(&parsed, &built));
    }

    #[test]
    fn test_unicode_runes() {
        let pattern = Pattern::new("(α|β)+").unwrap();
        assert!(pattern.is_match("αβα"));
        assert!(!pattern.is_match("αbβ"));
        assert!(!pattern.is_match(""));
    }

    #[test]
    fn test_pattern_is_shareable_across_threads() {
        let pattern = std::sync::Arc::new(Pattern::new("(ab)*").unwrap());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let pattern = std::sync::Arc::clone(&pattern);
                std::thread::spawn(move || {
                    let input = "ab".repeat(i);
                    pattern.is_match(&input)
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }

    #[test]
    fn test_concurrent_construction_converges() {
        // The interning table is the only shared mutable state; equal
        // nodes built from different threads must come back identical.
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| normalised(&parse("inter(n|ned)*").unwrap())))
            .collect();
        let exps: Vec<Exp> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for exp in &exps[1..] {
            assert!(std::sync::Arc::ptr_eq(&exps[0], exp));
        }
    }

    #[test]
    fn test_derivative_word_by_word() {
        // Differentiating ~(.*ab.*) through "ab" leaves the accepting
        // region for good.
        let exp = normalised(&parse("~(.*ab.*)").unwrap());
        let after_a = derivative(&exp, 'a' as Rune);
        let after_ab = derivative(&after_a, 'b' as Rune);
        assert!(is_nullable(&exp));
        assert!(is_nullable(&after_a));
        assert!(!is_nullable(&after_ab));
    }
}
