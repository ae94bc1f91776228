//! Row Generator - Small adversarial tables for differential trials
//!
//! Tables are short (default at most 4 rows) and drawn from a tiny domain
//! with null, so duplicates, nulls and empty tables come up constantly.

use crate::error::{HarnessError, Result};
use crate::table::Table;
use crate::value::Value;
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Shape of generated tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorParams {
    /// Non-null scalars rows are drawn from
    pub domain: Vec<i64>,
    /// Whether null is part of the domain
    pub include_null: bool,
    /// Inclusive upper bound on table length
    pub max_len: usize,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            domain: vec![1, 2],
            include_null: true,
            max_len: 4,
        }
    }
}

impl GeneratorParams {
    pub fn validate(&self) -> Result<()> {
        if self.domain.is_empty() && !self.include_null {
            return Err(HarnessError::Config(
                "value domain is empty: give at least one scalar or allow null".to_string(),
            ));
        }
        if !self.domain.iter().all_unique() {
            return Err(HarnessError::Config(format!(
                "value domain {:?} has duplicates; draws would not be uniform",
                self.domain
            )));
        }
        Ok(())
    }

    fn values(&self) -> Vec<Value> {
        let mut values: Vec<Value> = self.domain.iter().copied().map(Value::Int).collect();
        if self.include_null {
            values.push(Value::Null);
        }
        values
    }
}

pub struct RowGenerator {
    rng: StdRng,
    seed: u64,
    values: Vec<Value>,
    max_len: usize,
}

impl RowGenerator {
    /// Create a generator; without a seed one is drawn from entropy so the
    /// run can still be replayed with [`RowGenerator::seed`].
    pub fn new(params: &GeneratorParams, seed: Option<u64>) -> Result<Self> {
        params.validate()?;
        let seed = seed.unwrap_or_else(rand::random);
        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            values: params.values(),
            max_len: params.max_len,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Table of length in `[0, max_len]`, values uniform over the domain
    pub fn table(&mut self) -> Table {
        let len = self.rng.gen_range(0..=self.max_len);
        (0..len)
            .filter_map(|_| self.values.choose(&mut self.rng).copied())
            .collect()
    }

    /// Fresh `(left, right)` input for one trial
    pub fn pair(&mut self) -> (Table, Table) {
        let left = self.table();
        let right = self.table();
        (left, right)
    }
}
