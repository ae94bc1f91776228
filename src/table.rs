//! Table - Ordered single-column relation used as join input

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered rows of a single `id` column. Row order only fixes the
/// iteration order of join output; it carries no join semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    rows: Vec<Value>,
}

impl Table {
    pub fn new(rows: Vec<Value>) -> Self {
        Self { rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.rows.iter()
    }

    /// Copy of this table with the row at `idx` removed
    pub fn without_row(&self, idx: usize) -> Self {
        let mut rows = self.rows.clone();
        rows.remove(idx);
        Self { rows }
    }
}

impl From<Vec<Value>> for Table {
    fn from(rows: Vec<Value>) -> Self {
        Self::new(rows)
    }
}

impl FromIterator<Value> for Table {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.rows.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, "]")
    }
}

/// Shorthand for building tables in tests: `table![1, 1, null]`
#[macro_export]
macro_rules! table {
    (@v null) => { $crate::value::Value::Null };
    (@v $v:expr) => { $crate::value::Value::Int($v) };
    ($($v:tt),* $(,)?) => {
        $crate::table::Table::new(vec![$($crate::table!(@v $v)),*])
    };
}
