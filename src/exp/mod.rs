//! Expression algebra — hash-consed, totally ordered, immutable.
//!
//! Regular expressions are data, not programs. Every node is built through
//! the constructors here, interned in a process-wide table, and never
//! mutated afterwards, so equality on handles is cheap and expressions can
//! serve as map keys in the derivative engine and the DFA compiler.
//!
//! Beyond the usual operators the algebra carries conjunction (`R1 & R2`)
//! and complement (`~R`), which stay closed under Brzozowski derivatives.

mod intern;
mod normalize;

pub use normalize::normalised;

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A Unicode code point, 32-bit signed.
///
/// The value `-1` is reserved: it never appears in a character class and is
/// used by the DFA as the key of the default transition.
pub type Rune = i32;

/// The reserved non-rune used for default DFA transitions.
pub const INVALID_RUNE: Rune = -1;

/// Expression kinds, in comparison order.
///
/// The declaration order here defines the first key of the total order on
/// expressions, so it must not be rearranged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    /// Matches nothing.
    EmptySet,
    /// Matches the empty string only.
    EmptyString,
    /// Matches any single rune.
    AnyCharacter,
    /// Matches one specific rune.
    Character,
    /// Matches any rune from a set.
    CharacterClass,
    /// Zero or more repetitions of the subexpression.
    KleeneClosure,
    /// Every string the subexpression does not match.
    Complement,
    /// Head followed by tail. Always binary; sequences nest to the right.
    Concatenation,
    /// Strings matched by all subexpressions.
    Conjunction,
    /// Strings matched by at least one subexpression.
    Disjunction,
}

/// Per-kind payload. Exactly one shape is legal for each kind.
#[derive(Debug)]
pub(crate) enum Payload {
    None,
    Rune(Rune),
    Class(BTreeSet<Rune>),
    Subs(Vec<Exp>),
}

/// Shared handle to an interned expression node.
pub type Exp = Arc<Expression>;

/// One immutable syntax-tree node.
///
/// Instances only come out of the interning table, so two structurally
/// equal nodes with the same `norm` flag are the same allocation.
#[derive(Debug)]
pub struct Expression {
    kind: Kind,
    payload: Payload,
    norm: bool,
}

impl Expression {
    pub(crate) fn new(kind: Kind, payload: Payload, norm: bool) -> Self {
        Expression {
            kind,
            payload,
            norm,
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Whether this subtree is known to be in canonical form.
    pub fn norm(&self) -> bool {
        self.norm
    }

    /// The rune of a Character node. Calling this on any other kind is a
    /// programmer error and panics.
    pub fn character(&self) -> Rune {
        match &self.payload {
            Payload::Rune(r) => *r,
            _ => panic!("character() called on {:?} node", self.kind),
        }
    }

    /// The rune set of a CharacterClass node. Panics on other kinds.
    pub fn character_class(&self) -> &BTreeSet<Rune> {
        match &self.payload {
            Payload::Class(set) => set,
            _ => panic!("character_class() called on {:?} node", self.kind),
        }
    }

    /// The children of a compound node. Panics on leaf kinds.
    pub fn subexpressions(&self) -> &[Exp] {
        match &self.payload {
            Payload::Subs(subs) => subs,
            _ => panic!("subexpressions() called on {:?} node", self.kind),
        }
    }

    /// The only child of a KleeneClosure or Complement node.
    pub fn sub(&self) -> &Exp {
        &self.subexpressions()[0]
    }

    /// First child of a Concatenation.
    pub fn head(&self) -> &Exp {
        &self.subexpressions()[0]
    }

    /// Second child of a Concatenation, typically itself a Concatenation.
    pub fn tail(&self) -> &Exp {
        &self.subexpressions()[1]
    }

    fn payload_cmp(&self, other: &Self) -> Ordering {
        match (&self.payload, &other.payload) {
            (Payload::None, Payload::None) => Ordering::Equal,
            (Payload::Rune(a), Payload::Rune(b)) => a.cmp(b),
            (Payload::Class(a), Payload::Class(b)) => a.cmp(b),
            (Payload::Subs(a), Payload::Subs(b)) => a.cmp(b),
            _ => unreachable!("same kind, different payload shapes"),
        }
    }
}

/// Three-way comparison in the total order: kind first (declaration order),
/// then payload (runes numerically, classes lexicographically over their
/// sorted elements), then children left-to-right.
///
/// The order depends only on structure, never on allocation addresses, so
/// sorting commutative operands is deterministic across runs.
pub fn compare(x: &Exp, y: &Exp) -> Ordering {
    x.cmp(y)
}

impl Ord for Expression {
    fn cmp(&self, other: &Self) -> Ordering {
        // Interning makes pointer identity the common case.
        if std::ptr::eq(self, other) {
            return Ordering::Equal;
        }
        self.kind
            .cmp(&other.kind)
            .then_with(|| self.payload_cmp(other))
    }
}

impl PartialOrd for Expression {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Expression {}

impl Hash for Expression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        match &self.payload {
            Payload::None => {}
            Payload::Rune(r) => r.hash(state),
            Payload::Class(set) => {
                for r in set {
                    r.hash(state);
                }
            }
            Payload::Subs(subs) => {
                for sub in subs {
                    sub.hash(state);
                }
            }
        }
    }
}

/// The expression matching nothing.
pub fn empty_set() -> Exp {
    intern::intern(Kind::EmptySet, Payload::None, true)
}

/// The expression matching only the empty string.
pub fn empty_string() -> Exp {
    intern::intern(Kind::EmptyString, Payload::None, true)
}

/// The expression matching any single rune.
pub fn any_character() -> Exp {
    intern::intern(Kind::AnyCharacter, Payload::None, true)
}

/// The expression matching exactly one rune.
pub fn character(rune: Rune) -> Exp {
    debug_assert!(rune != INVALID_RUNE, "INVALID_RUNE in expression");
    intern::intern(Kind::Character, Payload::Rune(rune), true)
}

/// The expression matching any rune in `runes`.
///
/// The set may be empty or a singleton; normalisation degenerates those to
/// EmptySet and Character respectively.
pub fn character_class<I>(runes: I) -> Exp
where
    I: IntoIterator<Item = Rune>,
{
    let set: BTreeSet<Rune> = runes.into_iter().collect();
    debug_assert!(!set.contains(&INVALID_RUNE), "INVALID_RUNE in class");
    intern::intern(Kind::CharacterClass, Payload::Class(set), false)
}

/// Zero or more repetitions of `sub`.
pub fn kleene_closure(sub: Exp) -> Exp {
    intern::intern(Kind::KleeneClosure, Payload::Subs(vec![sub]), false)
}

/// Every string `sub` does not match.
pub fn complement(sub: Exp) -> Exp {
    intern::intern(Kind::Complement, Payload::Subs(vec![sub]), false)
}

/// `head` followed by `tail`.
pub fn concatenation(head: Exp, tail: Exp) -> Exp {
    intern::intern(Kind::Concatenation, Payload::Subs(vec![head, tail]), false)
}

/// A sequence of parts, folded into right-nested binary concatenations.
/// Empty input yields EmptyString; a single part is returned unchanged.
pub fn concat_all<I>(parts: I) -> Exp
where
    I: IntoIterator<Item = Exp>,
{
    let mut parts: Vec<Exp> = parts.into_iter().collect();
    let mut exp = match parts.pop() {
        Some(last) => last,
        None => return empty_string(),
    };
    while let Some(part) = parts.pop() {
        exp = concatenation(part, exp);
    }
    exp
}

/// Strings matched by all of `subs`. With fewer than two operands this
/// returns the operand itself, or the universal language for none.
pub fn conjunction(mut subs: Vec<Exp>) -> Exp {
    match subs.len() {
        0 => complement(empty_set()),
        1 => subs.remove(0),
        _ => intern::intern(Kind::Conjunction, Payload::Subs(subs), false),
    }
}

/// Strings matched by at least one of `subs`. With fewer than two operands
/// this returns the operand itself, or EmptySet for none.
pub fn disjunction(mut subs: Vec<Exp>) -> Exp {
    match subs.len() {
        0 => empty_set(),
        1 => subs.remove(0),
        _ => intern::intern(Kind::Disjunction, Payload::Subs(subs), false),
    }
}
