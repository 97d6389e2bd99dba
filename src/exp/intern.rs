//! The hash-consing table.
//!
//! Every expression node in the process goes through `intern`, keyed by its
//! kind, payload, child identities and norm flag, so structurally equal
//! nodes come back as the same allocation. The table holds weak references;
//! entries whose node has been dropped are purged once the table passes a
//! high-water mark.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Weak};

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use super::{Exp, Expression, Kind, Payload, Rune};

/// Identity key for a node. Children are keyed by pointer address: interned
/// children are unique per structure, and a live entry's node keeps its
/// children alive, so live keys never collide.
#[derive(PartialEq, Eq, Hash)]
struct Key {
    kind: Kind,
    norm: bool,
    rune: Option<Rune>,
    class: Option<BTreeSet<Rune>>,
    subs: Vec<usize>,
}

impl Key {
    fn new(kind: Kind, payload: &Payload, norm: bool) -> Self {
        let mut key = Key {
            kind,
            norm,
            rune: None,
            class: None,
            subs: Vec::new(),
        };
        match payload {
            Payload::None => {}
            Payload::Rune(r) => key.rune = Some(*r),
            Payload::Class(set) => key.class = Some(set.clone()),
            Payload::Subs(subs) => {
                key.subs = subs.iter().map(|s| Arc::as_ptr(s) as usize).collect();
            }
        }
        key
    }
}

struct Pool {
    nodes: HashMap<Key, Weak<Expression>>,
    high_water: usize,
}

static POOL: Lazy<Mutex<Pool>> = Lazy::new(|| {
    Mutex::new(Pool {
        nodes: HashMap::new(),
        high_water: 1024,
    })
});

/// Return the shared instance for this node, creating it on first sight.
pub(crate) fn intern(kind: Kind, payload: Payload, norm: bool) -> Exp {
    let key = Key::new(kind, &payload, norm);
    let mut pool = POOL.lock();

    if let Some(exp) = pool.nodes.get(&key).and_then(Weak::upgrade) {
        return exp;
    }

    let exp = Arc::new(Expression::new(kind, payload, norm));
    pool.nodes.insert(key, Arc::downgrade(&exp));

    if pool.nodes.len() > pool.high_water {
        pool.nodes.retain(|_, weak| weak.strong_count() > 0);
        pool.high_water = (pool.nodes.len() * 2).max(1024);
    }

    exp
}
