//! Multiset Comparator - Order-insensitive equality of join results
//!
//! Results are counted by typed `(left, right)` key, so null keeps its
//! position: `(null, 1)` and `(1, null)` are different keys while two
//! `(null, null)` pairs land in the same bucket.

use crate::join::{JoinPair, JoinResult};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

fn counts(result: &JoinResult) -> HashMap<JoinPair, usize> {
    result.iter().copied().counts()
}

/// True iff both results hold the same pairs with the same multiplicities
pub fn multiset_eq(a: &JoinResult, b: &JoinResult) -> bool {
    if a.len() != b.len() {
        return false;
    }
    counts(a) == counts(b)
}

/// True iff every pair of `sub` occurs in `sup` at least as often
pub fn is_submultiset(sub: &JoinResult, sup: &JoinResult) -> bool {
    let sup_counts = counts(sup);
    counts(sub)
        .into_iter()
        .all(|(pair, n)| sup_counts.get(&pair).copied().unwrap_or(0) >= n)
}

/// A pair and how many more times it appears on one side than the other
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairCount {
    pub pair: JoinPair,
    pub count: usize,
}

/// Difference between an expected (oracle) and an actual (engine) result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultisetDiff {
    /// Pairs the actual result is short of
    pub missing: Vec<PairCount>,
    /// Pairs the actual result has in excess
    pub extra: Vec<PairCount>,
}

impl MultisetDiff {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

impl fmt::Display for MultisetDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pc in &self.missing {
            writeln!(f, "  - {} x{}", pc.pair, pc.count)?;
        }
        for pc in &self.extra {
            writeln!(f, "  + {} x{}", pc.pair, pc.count)?;
        }
        Ok(())
    }
}

/// Per-pair count differences, sorted by pair
pub fn diff(expected: &JoinResult, actual: &JoinResult) -> MultisetDiff {
    let expected_counts = counts(expected);
    let actual_counts = counts(actual);

    let keys: BTreeSet<JoinPair> = expected_counts
        .keys()
        .chain(actual_counts.keys())
        .copied()
        .collect();

    let mut out = MultisetDiff::default();
    for pair in keys {
        let e = expected_counts.get(&pair).copied().unwrap_or(0);
        let a = actual_counts.get(&pair).copied().unwrap_or(0);
        if e > a {
            out.missing.push(PairCount { pair, count: e - a });
        } else if a > e {
            out.extra.push(PairCount { pair, count: a - e });
        }
    }
    out
}
