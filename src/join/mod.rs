//! Join Engine - Naive in-memory joins over single-column tables
//!
//! Three join kinds (inner, left outer, full outer), each available as a
//! nested-loop baseline and as a bucketed hash join. Both algorithms share
//! the [`eq`](crate::value::eq) predicate and must agree as multisets.

pub mod hash;
pub mod nested_loop;

use crate::table::Table;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Join kind under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    #[value(name = "inner")]
    Inner,
    #[value(name = "left")]
    LeftOuter,
    #[value(name = "full")]
    FullOuter,
}

impl JoinKind {
    pub const ALL: [JoinKind; 3] = [JoinKind::Inner, JoinKind::LeftOuter, JoinKind::FullOuter];

    /// Human-readable label used in progress lines
    pub fn label(&self) -> &'static str {
        match self {
            JoinKind::Inner => "inner join",
            JoinKind::LeftOuter => "left outer join",
            JoinKind::FullOuter => "full outer join",
        }
    }

    /// SQL join operator
    pub fn sql_keyword(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::LeftOuter => "LEFT OUTER JOIN",
            JoinKind::FullOuter => "FULL OUTER JOIN",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which in-memory algorithm computes the join
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum JoinAlgorithm {
    #[default]
    NestedLoop,
    Hash,
}

/// One output row of a join. Either side is `Null` when the row is
/// unmatched on that side (or when the unmatched row's own value is null).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JoinPair {
    pub left: Value,
    pub right: Value,
}

impl JoinPair {
    pub fn new(left: Value, right: Value) -> Self {
        Self { left, right }
    }

    /// Same pair seen from the other side of the join
    pub fn swapped(&self) -> Self {
        Self {
            left: self.right,
            right: self.left,
        }
    }
}

impl fmt::Display for JoinPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.left, self.right)
    }
}

/// Join output. Order is incidental; equality between results is
/// multiset equality (see [`crate::multiset`]), not `Vec` equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JoinResult {
    pairs: Vec<JoinPair>,
}

impl JoinResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, left: Value, right: Value) {
        self.pairs.push(JoinPair::new(left, right));
    }

    pub fn pairs(&self) -> &[JoinPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JoinPair> {
        self.pairs.iter()
    }

    /// Result with every pair's sides exchanged
    pub fn swapped(&self) -> Self {
        self.pairs.iter().map(JoinPair::swapped).collect()
    }
}

impl FromIterator<JoinPair> for JoinResult {
    fn from_iter<I: IntoIterator<Item = JoinPair>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<JoinPair>> for JoinResult {
    fn from(pairs: Vec<JoinPair>) -> Self {
        Self { pairs }
    }
}

impl<'a> IntoIterator for &'a JoinResult {
    type Item = &'a JoinPair;
    type IntoIter = std::slice::Iter<'a, JoinPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

impl fmt::Display for JoinResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, p) in self.pairs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, "]")
    }
}

/// Compute `kind` over `left` and `right` with the chosen algorithm
pub fn join(kind: JoinKind, algorithm: JoinAlgorithm, left: &Table, right: &Table) -> JoinResult {
    use JoinAlgorithm::{Hash, NestedLoop};

    match (algorithm, kind) {
        (NestedLoop, JoinKind::Inner) => nested_loop::inner_join(left, right),
        (NestedLoop, JoinKind::LeftOuter) => nested_loop::left_outer_join(left, right),
        (NestedLoop, JoinKind::FullOuter) => nested_loop::full_outer_join(left, right),
        (Hash, JoinKind::Inner) => hash::inner_join(left, right),
        (Hash, JoinKind::LeftOuter) => hash::left_outer_join(left, right),
        (Hash, JoinKind::FullOuter) => hash::full_outer_join(left, right),
    }
}

/// Build a result from `(left, right)` literals; `None` is null
#[cfg(test)]
pub(crate) fn pairs(items: &[(Option<i64>, Option<i64>)]) -> JoinResult {
    items
        .iter()
        .map(|(l, r)| JoinPair::new(Value::from(*l), Value::from(*r)))
        .collect()
}
