use join_harness::config::{HarnessConfig, OracleBackend};
use join_harness::driver::TestDriver;
use join_harness::error::HarnessError;
use join_harness::generator::GeneratorParams;
use join_harness::join::{JoinAlgorithm, JoinKind};
use join_harness::oracle;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "join-harness")]
#[command(about = "Differential tests of naive joins against a reference SQL engine")]
#[command(version)]
struct Args {
    /// Random trials per join kind
    #[arg(short, long, default_value_t = 1000)]
    trials: usize,

    /// Maximum rows per generated table (inclusive)
    #[arg(long, default_value_t = 4)]
    max_len: usize,

    /// Non-null values rows are drawn from
    #[arg(long, value_delimiter = ',', default_value = "1,2")]
    domain: Vec<i64>,

    /// Leave null out of the value domain
    #[arg(long)]
    no_null: bool,

    /// RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// In-memory join algorithm under test
    #[arg(long, value_enum, default_value_t = JoinAlgorithm::NestedLoop)]
    algorithm: JoinAlgorithm,

    /// Join kinds to test (repeatable; default all)
    #[arg(short, long = "kind", value_enum)]
    kinds: Vec<JoinKind>,

    /// Reference engine
    #[arg(long, value_enum, default_value_t = OracleBackend::Sqlite)]
    oracle: OracleBackend,

    /// Postgres connection string (or set DATABASE_URL env var)
    #[arg(long)]
    database_url: Option<String>,

    /// Shrink failing inputs before reporting
    #[arg(long)]
    minimize: bool,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn into_config(self) -> HarnessConfig {
        let kinds = if self.kinds.is_empty() {
            JoinKind::ALL.to_vec()
        } else {
            self.kinds
        };
        HarnessConfig {
            trials: self.trials,
            generator: GeneratorParams {
                domain: self.domain,
                include_null: !self.no_null,
                max_len: self.max_len,
            },
            seed: self.seed,
            algorithm: self.algorithm,
            kinds,
            oracle: self.oracle,
            database_url: self
                .database_url
                .or_else(|| std::env::var("DATABASE_URL").ok()),
            minimize: self.minimize,
        }
    }
}

async fn run(args: Args) -> Result<i32> {
    let json = args.json;
    let config = args.into_config();
    if let Err(e) = config.validate() {
        return Ok(fail(e));
    }

    let oracle = match oracle::connect(&config).await {
        Ok(oracle) => oracle,
        Err(e) => return Ok(fail(e)),
    };
    let mut driver = match TestDriver::new(config, oracle) {
        Ok(driver) => driver,
        Err(e) => return Ok(fail(e)),
    };

    let outcome = driver.run().await;
    driver.close().await;
    let report = match outcome {
        Ok(report) => report,
        Err(e) => return Ok(fail(e)),
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serializing run report")?
        );
    } else {
        println!("{}", report);
    }

    info!("run {} finished", report.run_id);
    Ok(report.exit_code())
}

fn fail(e: HarnessError) -> i32 {
    error!("{}", e);
    eprintln!("error: {}", e);
    e.exit_code()
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let code = run(args).await?;
    std::process::exit(code);
}
