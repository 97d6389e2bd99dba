//! DFA compilation by iterated differentiation.
//!
//! The compiler enumerates the reachable derivatives of a canonical start
//! expression with a worklist, using alphabet partitions so each state
//! takes one derivative per equivalence block rather than one per rune.
//! Brzozowski's theorem bounds the normalised derivative set, so the loop
//! terminates.

pub mod persistence;

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::deriv::partition::partitions;
use crate::deriv::{derivative, is_nullable};
use crate::exp::{normalised, Exp, Rune, INVALID_RUNE};

/// A compiled automaton.
///
/// `transition` is keyed by `(state, rune)`; the reserved rune
/// [`INVALID_RUNE`] keys the default transition out of each state, taken
/// for every rune without an explicit entry. State 0 is the start state.
/// The state whose expression is ∅ is the dead state: non-accepting, every
/// transition leading back to itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dfa {
    pub transition: BTreeMap<(usize, Rune), usize>,
    pub accepting: BTreeMap<usize, bool>,
}

impl Dfa {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of states.
    pub fn state_count(&self) -> usize {
        self.accepting.len()
    }

    /// Summary of the automaton's shape.
    pub fn stats(&self) -> DfaStats {
        DfaStats {
            states: self.state_count(),
            accepting: self.accepting.values().filter(|a| **a).count(),
            explicit_transitions: self
                .transition
                .keys()
                .filter(|(_, rune)| *rune != INVALID_RUNE)
                .count(),
        }
    }
}

/// Automaton shape, serializable for the front-end.
#[derive(Debug, Clone, Serialize)]
pub struct DfaStats {
    pub states: usize,
    pub accepting: usize,
    pub explicit_transitions: usize,
}

/// Compile `exp` into `dfa`, replacing its previous contents, and return
/// the number of states.
pub fn compile(exp: &Exp, dfa: &mut Dfa) -> usize {
    dfa.transition.clear();
    dfa.accepting.clear();

    let start = normalised(exp);
    let mut states: BTreeMap<Exp, usize> = BTreeMap::new();
    states.insert(start.clone(), 0);
    let mut worklist: VecDeque<(Exp, usize)> = VecDeque::from([(start, 0)]);

    while let Some((state, id)) = worklist.pop_front() {
        dfa.accepting.insert(id, is_nullable(&state));

        let parts = partitions(&state);

        // The Σ-based block first: one derivative stands in for every rune
        // not mentioned by the ∅-based blocks.
        let rep = sigma_representative(&parts[0]);
        let next = intern_state(derivative(&state, rep), &mut states, &mut worklist);
        dfa.transition.insert((id, INVALID_RUNE), next);

        for block in &parts[1..] {
            if let Some(&rep) = block.iter().next() {
                let next = intern_state(derivative(&state, rep), &mut states, &mut worklist);
                for &rune in block {
                    dfa.transition.insert((id, rune), next);
                }
            }
        }

        debug!(state = id, blocks = parts.len(), "state differentiated");
    }

    info!(states = states.len(), "compiled");
    states.len()
}

/// Smallest nonnegative rune outside every ∅-based block; the complement
/// set is finite, so the scan terminates quickly.
fn sigma_representative(complement: &BTreeSet<Rune>) -> Rune {
    let mut rep = 0;
    while complement.contains(&rep) {
        rep += 1;
    }
    rep
}

fn intern_state(
    exp: Exp,
    states: &mut BTreeMap<Exp, usize>,
    worklist: &mut VecDeque<(Exp, usize)>,
) -> usize {
    if let Some(&id) = states.get(&exp) {
        return id;
    }
    let id = states.len();
    states.insert(exp.clone(), id);
    worklist.push_back((exp, id));
    id
}
