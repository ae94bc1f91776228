//! Test Driver - Differential trials of the join engine against an oracle
//!
//! For every selected join kind the driver runs up to `trials` random
//! inputs, computes the join in memory and in the oracle, and stops that
//! kind at the first multiset mismatch. Oracle failures abort the run.

use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use crate::generator::RowGenerator;
use crate::join::{self, JoinAlgorithm, JoinKind, JoinResult};
use crate::multiset::{self, MultisetDiff};
use crate::oracle::ReferenceOracle;
use crate::table::Table;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Inputs and both outputs of a failing trial
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MismatchCase {
    pub left: Table,
    pub right: Table,
    /// In-memory join output
    pub engine: JoinResult,
    /// Reference engine output
    pub oracle: JoinResult,
    /// Oracle output taken as expected
    pub diff: MultisetDiff,
}

impl fmt::Display for MismatchCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  left:   {}", self.left)?;
        writeln!(f, "  right:  {}", self.right)?;
        writeln!(f, "  engine: {}", self.engine)?;
        writeln!(f, "  oracle: {}", self.oracle)?;
        write!(f, "{}", self.diff)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrialOutcome {
    Match,
    Mismatch(MismatchCase),
}

/// First mismatch of a join kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MismatchReport {
    pub kind: JoinKind,
    /// Zero-based trial index
    pub trial: usize,
    pub case: MismatchCase,
    /// Smallest failing input found by row deletion, if requested
    pub minimized: Option<MismatchCase>,
}

impl fmt::Display for MismatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "failed: {} (trial {})", self.kind, self.trial)?;
        write!(f, "{}", self.case)?;
        if let Some(min) = &self.minimized {
            writeln!(f, "minimized:")?;
            write!(f, "{}", min)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KindSummary {
    pub kind: JoinKind,
    pub trials_run: usize,
    pub passed: usize,
    pub mismatch: Option<MismatchReport>,
}

impl KindSummary {
    pub fn is_success(&self) -> bool {
        self.mismatch.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub seed: u64,
    pub oracle: String,
    pub algorithm: JoinAlgorithm,
    pub kinds: Vec<KindSummary>,
}

impl RunReport {
    pub fn has_mismatch(&self) -> bool {
        self.kinds.iter().any(|k| !k.is_success())
    }

    /// 0 when every kind passed, 1 when any mismatched
    pub fn exit_code(&self) -> i32 {
        if self.has_mismatch() {
            1
        } else {
            0
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "run {} (seed {}, oracle {}, {:?})",
            self.run_id, self.seed, self.oracle, self.algorithm
        )?;
        for k in &self.kinds {
            let status = if k.is_success() { "ok" } else { "FAILED" };
            writeln!(
                f,
                "  {:<16} {:>5}/{:<5} {}",
                k.kind.label(),
                k.passed,
                k.trials_run,
                status
            )?;
        }
        for report in self.kinds.iter().filter_map(|k| k.mismatch.as_ref()) {
            write!(f, "\n{}", report)?;
        }
        Ok(())
    }
}

pub struct TestDriver {
    config: HarnessConfig,
    oracle: Box<dyn ReferenceOracle>,
    generator: RowGenerator,
}

impl TestDriver {
    pub fn new(config: HarnessConfig, oracle: Box<dyn ReferenceOracle>) -> Result<Self> {
        config.validate()?;
        let generator = RowGenerator::new(&config.generator, config.seed)?;
        Ok(Self {
            config,
            oracle,
            generator,
        })
    }

    pub fn seed(&self) -> u64 {
        self.generator.seed()
    }

    /// Release the oracle's connections and drop the driver
    pub async fn close(self) {
        self.oracle.close().await;
    }

    /// Run one input through the engine and the oracle and compare
    pub async fn check(&self, kind: JoinKind, left: &Table, right: &Table) -> Result<TrialOutcome> {
        let engine = join::join(kind, self.config.algorithm, left, right);
        let oracle = self.oracle.execute(kind, left, right).await?;

        if multiset::multiset_eq(&engine, &oracle) {
            return Ok(TrialOutcome::Match);
        }

        let diff = multiset::diff(&oracle, &engine);
        Ok(TrialOutcome::Mismatch(MismatchCase {
            left: left.clone(),
            right: right.clone(),
            engine,
            oracle,
            diff,
        }))
    }

    /// Random trials for one join kind, stopping at the first mismatch
    pub async fn run_kind(&mut self, kind: JoinKind) -> Result<KindSummary> {
        info!("test: {}", kind);

        let mut summary = KindSummary {
            kind,
            trials_run: 0,
            passed: 0,
            mismatch: None,
        };

        for trial in 0..self.config.trials {
            let (left, right) = self.generator.pair();
            summary.trials_run += 1;

            match self.check(kind, &left, &right).await? {
                TrialOutcome::Match => summary.passed += 1,
                TrialOutcome::Mismatch(case) => {
                    error!(
                        "{} mismatch at trial {}: left={} right={} engine={} oracle={}",
                        kind, trial, case.left, case.right, case.engine, case.oracle
                    );
                    let minimized = if self.config.minimize {
                        Some(self.minimize(kind, case.clone()).await?)
                    } else {
                        None
                    };
                    summary.mismatch = Some(MismatchReport {
                        kind,
                        trial,
                        case,
                        minimized,
                    });
                    break;
                }
            }
        }

        if summary.is_success() {
            info!("{}: {} trials passed", kind, summary.passed);
        }
        Ok(summary)
    }

    /// Health-check the oracle, then test every configured kind in order
    pub async fn run(&mut self) -> Result<RunReport> {
        let started_at = Utc::now();
        let run_id = Uuid::new_v4();
        info!(
            "run {} starting: {} trials per kind, seed {}, oracle {}",
            run_id,
            self.config.trials,
            self.seed(),
            self.oracle.name()
        );

        if !self.oracle.health_check().await? {
            return Err(HarnessError::Oracle(format!(
                "{} oracle failed its health check",
                self.oracle.name()
            )));
        }

        let mut kinds = Vec::with_capacity(self.config.kinds.len());
        for kind in self.config.kinds.clone() {
            kinds.push(self.run_kind(kind).await?);
        }

        Ok(RunReport {
            run_id,
            started_at,
            seed: self.seed(),
            oracle: self.oracle.name().to_string(),
            algorithm: self.config.algorithm,
            kinds,
        })
    }

    /// Greedily delete single rows from either table while the mismatch
    /// persists; returns the last failing case.
    pub async fn minimize(&self, kind: JoinKind, mut case: MismatchCase) -> Result<MismatchCase> {
        let mut steps = 0usize;
        'shrink: loop {
            let candidates = (0..case.left.len())
                .map(|i| (case.left.without_row(i), case.right.clone()))
                .chain(
                    (0..case.right.len())
                        .map(|j| (case.left.clone(), case.right.without_row(j))),
                )
                .collect::<Vec<_>>();

            for (left, right) in candidates {
                if let TrialOutcome::Mismatch(smaller) = self.check(kind, &left, &right).await? {
                    debug!("minimize {}: left={} right={}", kind, smaller.left, smaller.right);
                    case = smaller;
                    steps += 1;
                    continue 'shrink;
                }
            }
            break;
        }

        if steps == 0 {
            warn!("{} mismatch could not be reduced", kind);
        } else {
            info!("{} mismatch reduced in {} steps", kind, steps);
        }
        Ok(case)
    }
}
