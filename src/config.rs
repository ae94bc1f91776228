//! Harness configuration - trial count, table shape, oracle selection

use crate::error::{HarnessError, Result};
use crate::generator::GeneratorParams;
use crate::join::{JoinAlgorithm, JoinKind};
use serde::{Deserialize, Serialize};

/// Which reference engine backs the oracle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OracleBackend {
    #[default]
    Sqlite,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Random trials per join kind
    pub trials: usize,

    /// Shape of generated tables
    pub generator: GeneratorParams,

    /// RNG seed; drawn from entropy when absent
    pub seed: Option<u64>,

    /// In-memory algorithm under test
    pub algorithm: JoinAlgorithm,

    /// Join kinds to test, in order
    pub kinds: Vec<JoinKind>,

    pub oracle: OracleBackend,

    /// Connection string for the postgres oracle
    #[serde(skip_serializing)]
    pub database_url: Option<String>,

    /// Shrink failing inputs before reporting
    pub minimize: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            trials: 1000,
            generator: GeneratorParams::default(),
            seed: None,
            algorithm: JoinAlgorithm::default(),
            kinds: JoinKind::ALL.to_vec(),
            oracle: OracleBackend::default(),
            database_url: None,
            minimize: false,
        }
    }
}

impl HarnessConfig {
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(HarnessError::Config("trial count must be at least 1".to_string()));
        }
        if self.kinds.is_empty() {
            return Err(HarnessError::Config("no join kinds selected".to_string()));
        }
        if self.oracle == OracleBackend::Postgres && self.database_url.is_none() {
            return Err(HarnessError::Config(
                "postgres oracle needs --database-url or DATABASE_URL".to_string(),
            ));
        }
        self.generator.validate()
    }
}
