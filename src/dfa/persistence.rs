//! DFA persistence — save and load compiled automata.
//!
//! Uses bincode for compact binary serialization. Atomic writes
//! (write to .tmp, then rename) prevent corruption from crashes. The
//! on-disk format is the public DFA contract itself: the transition map
//! keyed by `(state, rune)` with `-1` as the default-edge rune, plus the
//! accepting map.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use super::Dfa;
use crate::error::{QuotientError, Result};

impl Dfa {
    /// Save the automaton to a binary file.
    ///
    /// Uses atomic write: writes to a `.tmp` file first, then renames.
    /// This prevents corruption if the process is interrupted mid-write.
    pub fn save(&self, path: &Path) -> Result<()> {
        info!(path = %path.display(), "saving dfa");

        let bytes = bincode::serialize(self)
            .map_err(|e| QuotientError::SerializeError(e.to_string()))?;

        let tmp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;

        debug!(bytes = bytes.len(), "dfa saved");
        Ok(())
    }

    /// Load an automaton from a binary file.
    pub fn load(path: &Path) -> Result<Self> {
        info!(path = %path.display(), "loading dfa");

        let bytes = fs::read(path)?;
        let dfa: Dfa = bincode::deserialize(&bytes)
            .map_err(|e| QuotientError::MalformedDfa(e.to_string()))?;

        debug!(
            states = dfa.state_count(),
            transitions = dfa.transition.len(),
            "dfa loaded"
        );

        Ok(dfa)
    }
}
