//! Value - Scalar cell type shared by tables, join results and oracles

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell: a small integer scalar or the null marker.
///
/// The derived `PartialEq`/`Eq`/`Hash` are *structural*: `Null == Null`
/// holds, which is what result bookkeeping needs (two `(null, null)` pairs
/// are the same multiset key). Join matching never uses them; it goes
/// through [`eq`], under which null matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Int(i64),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Null => None,
            Value::Int(v) => Some(*v),
        }
    }

    /// SQL literal form used when seeding oracle tables
    pub fn to_sql_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Int(v) => v.to_string(),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<Option<i64>> for Value {
    fn from(v: Option<i64>) -> Self {
        match v {
            Some(v) => Value::Int(v),
            None => Value::Null,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Int(v) => write!(f, "{}", v),
        }
    }
}

/// Join equality: true iff both sides are non-null and carry the same scalar.
pub fn eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x == y,
        _ => false,
    }
}
