//! Alphabet partitioning.
//!
//! Differentiating over every rune is infeasible for a Unicode-sized
//! alphabet, so each expression gets a finite partition of the alphabet
//! into blocks with equal derivatives. The first block is Σ-based and is
//! stored as its *complement* (the runes it does not cover; the empty set
//! therefore means "all runes"). The remaining blocks are ∅-based, stored
//! as the literal runes they contain.
//!
//! Invariant: the stored complement equals the union of the ∅-based
//! blocks, the ∅-based blocks are pairwise disjoint, and no stored block
//! other than the complement is empty.

use std::collections::BTreeSet;

use super::is_nullable;
use crate::exp::{Exp, Kind, Rune};

/// Compute the derivative-equivalence partition of the alphabet for `exp`.
///
/// `result[0]` is the complement of the Σ-based block; `result[1..]` are
/// the ∅-based blocks. All runes in one block have equal derivatives.
pub fn partitions(exp: &Exp) -> Vec<BTreeSet<Rune>> {
    match exp.kind() {
        // Every rune behaves the same.
        Kind::EmptySet | Kind::EmptyString | Kind::AnyCharacter => vec![BTreeSet::new()],
        Kind::Character => {
            let single = BTreeSet::from([exp.character()]);
            vec![single.clone(), single]
        }
        Kind::CharacterClass => {
            let set = exp.character_class().clone();
            if set.is_empty() {
                vec![BTreeSet::new()]
            } else {
                vec![set.clone(), set]
            }
        }
        Kind::KleeneClosure | Kind::Complement => partitions(exp.sub()),
        Kind::Concatenation => {
            let head = partitions(exp.head());
            if is_nullable(exp.head()) {
                refine(head, partitions(exp.tail()))
            } else {
                head
            }
        }
        Kind::Conjunction | Kind::Disjunction => {
            let mut subs = exp.subexpressions().iter();
            let first = match subs.next() {
                Some(sub) => partitions(sub),
                None => vec![BTreeSet::new()],
            };
            subs.fold(first, |acc, sub| refine(acc, partitions(sub)))
        }
    }
}

/// Coarsest common refinement of two partitions in complement encoding.
///
/// The Σ-based blocks intersect into the new Σ-based block, whose
/// complement is the union of the two complements; every other nonempty
/// pairwise intersection becomes a ∅-based block.
fn refine(p: Vec<BTreeSet<Rune>>, q: Vec<BTreeSet<Rune>>) -> Vec<BTreeSet<Rune>> {
    let (p_comp, p_blocks) = split(p);
    let (q_comp, q_blocks) = split(q);

    let mut out = vec![p_comp.union(&q_comp).copied().collect::<BTreeSet<Rune>>()];

    // ∅-based ∩ ∅-based.
    for pb in &p_blocks {
        for qb in &q_blocks {
            let both: BTreeSet<Rune> = pb.intersection(qb).copied().collect();
            if !both.is_empty() {
                out.push(both);
            }
        }
    }
    // ∅-based of one side ∩ Σ-based of the other.
    for pb in &p_blocks {
        let rest: BTreeSet<Rune> = pb.difference(&q_comp).copied().collect();
        if !rest.is_empty() {
            out.push(rest);
        }
    }
    for qb in &q_blocks {
        let rest: BTreeSet<Rune> = qb.difference(&p_comp).copied().collect();
        if !rest.is_empty() {
            out.push(rest);
        }
    }

    out
}

fn split(mut partition: Vec<BTreeSet<Rune>>) -> (BTreeSet<Rune>, Vec<BTreeSet<Rune>>) {
    if partition.is_empty() {
        return (BTreeSet::new(), Vec::new());
    }
    let blocks = partition.split_off(1);
    (partition.remove(0), blocks)
}
