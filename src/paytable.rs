//! Paytable lookups: `(symbol, occurrence count) → pay rate`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// One paytable row: `symbol` pays `pay` when it appears exactly
/// `occurrences` times on a payline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaytableEntry {
    /// Symbol id the entry applies to.
    pub symbol: u64,
    /// Required occurrence count, at least 1.
    pub occurrences: u32,
    /// Pay rate awarded for the exact count.
    pub pay: u64,
}

/// Exact-match paytable.
///
/// A symbol may carry several entries, one per occurrence count. Lookups
/// never fall back to a nearest or greater count: a `(symbol, count)` pair
/// without an entry simply does not pay.
#[derive(Debug, Clone, Default)]
pub struct Paytable {
    entries: HashMap<(u64, u32), u64>,
}

impl Paytable {
    /// Builds the lookup table in a single pass over the entries.
    ///
    /// Zero-occurrence entries and duplicate `(symbol, occurrences)` pairs
    /// are configuration errors.
    pub fn from_entries(
        entries: impl IntoIterator<Item = PaytableEntry>,
    ) -> Result<Paytable, EngineError> {
        let mut table = HashMap::new();
        for entry in entries {
            if entry.occurrences == 0 {
                return Err(EngineError::ZeroOccurrenceEntry {
                    symbol: entry.symbol,
                });
            }
            if table
                .insert((entry.symbol, entry.occurrences), entry.pay)
                .is_some()
            {
                return Err(EngineError::DuplicatePayEntry {
                    symbol: entry.symbol,
                    occurrences: entry.occurrences,
                });
            }
        }
        Ok(Paytable { entries: table })
    }

    /// Pay rate for exactly `occurrences` of `symbol`, if the combination pays.
    pub fn pay(&self, symbol: u64, occurrences: u32) -> Option<u64> {
        self.entries.get(&(symbol, occurrences)).copied()
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the entries in unspecified order.
    pub fn entries(&self) -> impl Iterator<Item = PaytableEntry> + '_ {
        self.entries
            .iter()
            .map(|(&(symbol, occurrences), &pay)| PaytableEntry {
                symbol,
                occurrences,
                pay,
            })
    }
}
