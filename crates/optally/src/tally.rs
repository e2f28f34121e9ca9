//! Executed-instruction frequency store.

use optally_hook::Op;
use rustc_hash::FxHashMap;

/// Mapping from opcode mnemonic to occurrence count.
///
/// Owned by the hook instance and mutated only from the engine's execution
/// thread. The caller checks cancellation before `record`; the store itself
/// has no control flow and every operation is total.
#[derive(Clone, Debug, Default)]
pub struct Tally {
    counts: FxHashMap<&'static str, u64>,
}

impl Tally {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one execution of `op`, creating the entry at zero first if the
    /// mnemonic has not been seen.
    pub fn record(&mut self, op: Op) {
        *self.counts.entry(op.mnemonic).or_insert(0) += 1;
    }

    /// Occurrences recorded for `mnemonic`. Zero for unseen mnemonics.
    #[must_use]
    pub fn count_of(&self, mnemonic: &str) -> u64 {
        self.counts.get(mnemonic).copied().unwrap_or(0)
    }

    /// Number of distinct instruction kinds seen.
    #[must_use]
    pub fn kinds(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The full mnemonic → count mapping.
    #[must_use]
    pub const fn counts(&self) -> &FxHashMap<&'static str, u64> {
        &self.counts
    }
}
