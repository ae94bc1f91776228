pub mod config;
pub mod driver;
pub mod error;
pub mod generator;
pub mod join;
pub mod multiset;
pub mod oracle;
pub mod table;
pub mod value;

pub use config::{HarnessConfig, OracleBackend};
pub use driver::{KindSummary, MismatchCase, MismatchReport, RunReport, TestDriver, TrialOutcome};
pub use error::{HarnessError, Result};
pub use generator::{GeneratorParams, RowGenerator};
pub use join::{JoinAlgorithm, JoinKind, JoinPair, JoinResult};
pub use multiset::{diff, multiset_eq, MultisetDiff};
pub use oracle::{PostgresOracle, ReferenceOracle, SqliteOracle};
pub use table::Table;
pub use value::{eq, Value};
