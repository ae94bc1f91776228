//! Nested-loop joins: the O(|left|·|right|) reference algorithm

use super::JoinResult;
use crate::table::Table;
use crate::value::{eq, Value};

pub fn inner_join(left: &Table, right: &Table) -> JoinResult {
    let mut res = JoinResult::new();

    for l in left {
        for r in right {
            if eq(l, r) {
                res.push(*l, *r);
            }
        }
    }

    res
}

pub fn left_outer_join(left: &Table, right: &Table) -> JoinResult {
    let mut res = JoinResult::new();

    for l in left {
        let mut matched = false;
        for r in right {
            if eq(l, r) {
                res.push(*l, *r);
                matched = true;
            }
        }

        if !matched {
            res.push(*l, Value::Null);
        }
    }

    res
}

/// Matched flags are kept per row position, so of two equal left rows
/// facing no partner both emit `(v, null)`, and an unmatched right row
/// holding null emits `(null, null)`.
pub fn full_outer_join(left: &Table, right: &Table) -> JoinResult {
    let mut res = JoinResult::new();

    let mut left_matched = vec![false; left.len()];
    let mut right_matched = vec![false; right.len()];

    for (i, l) in left.iter().enumerate() {
        for (j, r) in right.iter().enumerate() {
            if eq(l, r) {
                res.push(*l, *r);
                left_matched[i] = true;
                right_matched[j] = true;
            }
        }
    }

    for (l, _) in left.iter().zip(&left_matched).filter(|(_, m)| !**m) {
        res.push(*l, Value::Null);
    }
    for (r, _) in right.iter().zip(&right_matched).filter(|(_, m)| !**m) {
        res.push(Value::Null, *r);
    }

    res
}
