//! Bucketed hash joins
//!
//! Build phase: bucket right row positions by non-null value (null rows can
//! never match and stay out of the table). Probe phase: for each left row,
//! emit one pair per position in its bucket. Right matched flags are kept
//! per position, same as the nested-loop full outer join.

use super::JoinResult;
use crate::table::Table;
use crate::value::Value;
use std::collections::HashMap;

/// Right row positions grouped by join key
struct BuildSide<'a> {
    rows: &'a [Value],
    buckets: HashMap<i64, Vec<usize>>,
}

impl<'a> BuildSide<'a> {
    fn build(table: &'a Table) -> Self {
        let mut buckets: HashMap<i64, Vec<usize>> = HashMap::new();
        for (pos, v) in table.iter().enumerate() {
            if let Some(key) = v.as_i64() {
                buckets.entry(key).or_default().push(pos);
            }
        }
        Self {
            rows: table.rows(),
            buckets,
        }
    }

    /// Positions of right rows matching `probe`; empty for null
    fn probe(&self, probe: &Value) -> &[usize] {
        probe
            .as_i64()
            .and_then(|key| self.buckets.get(&key))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

pub fn inner_join(left: &Table, right: &Table) -> JoinResult {
    let build = BuildSide::build(right);
    let mut res = JoinResult::new();

    for l in left {
        for &pos in build.probe(l) {
            res.push(*l, build.rows[pos]);
        }
    }

    res
}

pub fn left_outer_join(left: &Table, right: &Table) -> JoinResult {
    let build = BuildSide::build(right);
    let mut res = JoinResult::new();

    for l in left {
        let matches = build.probe(l);
        if matches.is_empty() {
            res.push(*l, Value::Null);
            continue;
        }
        for &pos in matches {
            res.push(*l, build.rows[pos]);
        }
    }

    res
}

pub fn full_outer_join(left: &Table, right: &Table) -> JoinResult {
    let build = BuildSide::build(right);
    let mut right_matched = vec![false; right.len()];
    let mut res = JoinResult::new();

    for l in left {
        let matches = build.probe(l);
        if matches.is_empty() {
            res.push(*l, Value::Null);
            continue;
        }
        for &pos in matches {
            res.push(*l, build.rows[pos]);
            right_matched[pos] = true;
        }
    }

    for (r, _) in right.iter().zip(&right_matched).filter(|(_, m)| !**m) {
        res.push(Value::Null, *r);
    }

    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::join::{nested_loop, pairs};
    use crate::multiset::multiset_eq;
    use crate::table;

    #[test]
    fn test_full_outer_join_scenario() {
        let res = full_outer_join(&table![1, 1, 2], &table![1, null]);
        let expected = pairs(&[
            (Some(1), Some(1)),
            (Some(1), Some(1)),
            (Some(2), None),
            (None, None),
        ]);
        assert!(multiset_eq(&res, &expected), "{}", res);
    }

    #[test]
    fn test_null_probe_is_unmatched() {
        let res = left_outer_join(&table![null], &table![null, 1]);
        assert_eq!(res, pairs(&[(None, None)]));
    }

    #[test]
    fn test_matches_nested_loop_on_duplicates() {
        let left = table![2, 1, 2, null, 1];
        let right = table![2, 2, null, 3];
        assert!(multiset_eq(
            &inner_join(&left, &right),
            &nested_loop::inner_join(&left, &right)
        ));
        assert!(multiset_eq(
            &left_outer_join(&left, &right),
            &nested_loop::left_outer_join(&left, &right)
        ));
        assert!(multiset_eq(
            &full_outer_join(&left, &right),
            &nested_loop::full_outer_join(&left, &right)
        ));
    }
}
