use join_harness::config::HarnessConfig;
use join_harness::driver::{MismatchCase, MismatchReport, TestDriver, TrialOutcome};
use join_harness::join::{JoinAlgorithm, JoinKind, JoinPair, JoinResult};
use join_harness::multiset::{diff, multiset_eq};
use join_harness::oracle::{ReferenceOracle, SqliteOracle};
use join_harness::table;
use join_harness::value::Value;

fn pairs(items: &[(Option<i64>, Option<i64>)]) -> JoinResult {
    items
        .iter()
        .map(|(l, r)| JoinPair::new(Value::from(*l), Value::from(*r)))
        .collect()
}

#[tokio::test]
async fn test_sqlite_oracle_on_duplicate_and_null_scenario() {
    let oracle = SqliteOracle::open_in_memory().unwrap();
    let left = table![1, 1, 2];
    let right = table![1, null];

    let cases = [
        (JoinKind::Inner, pairs(&[(Some(1), Some(1)), (Some(1), Some(1))])),
        (
            JoinKind::LeftOuter,
            pairs(&[(Some(1), Some(1)), (Some(1), Some(1)), (Some(2), None)]),
        ),
        (
            JoinKind::FullOuter,
            pairs(&[
                (Some(1), Some(1)),
                (Some(1), Some(1)),
                (Some(2), None),
                (None, None),
            ]),
        ),
    ];

    for (kind, expected) in cases {
        let res = oracle.execute(kind, &left, &right).await.unwrap();
        assert!(multiset_eq(&res, &expected), "{}: got {}", kind, res);
    }
}

#[tokio::test]
async fn test_nested_loop_agrees_with_sqlite_over_random_trials() {
    let config = HarnessConfig {
        seed: Some(20240501),
        ..HarnessConfig::default()
    };
    let oracle = Box::new(SqliteOracle::open_in_memory().unwrap());
    let mut driver = TestDriver::new(config, oracle).unwrap();

    let report = driver.run().await.unwrap();
    for summary in &report.kinds {
        assert!(
            summary.is_success(),
            "{}",
            summary.mismatch.as_ref().map(|m| m.to_string()).unwrap_or_default()
        );
        assert_eq!(summary.passed, 1000);
    }
    assert_eq!(report.exit_code(), 0);
}

#[tokio::test]
async fn test_hash_join_agrees_with_sqlite_on_wider_tables() {
    let mut config = HarnessConfig {
        trials: 300,
        seed: Some(7),
        algorithm: JoinAlgorithm::Hash,
        ..HarnessConfig::default()
    };
    config.generator.domain = vec![1, 2, 3];
    config.generator.max_len = 8;

    let oracle = Box::new(SqliteOracle::open_in_memory().unwrap());
    let mut driver = TestDriver::new(config, oracle).unwrap();
    let report = driver.run().await.unwrap();
    assert!(!report.has_mismatch());
}

#[tokio::test]
async fn test_null_rows_match_and_join_result_serializes_nulls() {
    let oracle = Box::new(SqliteOracle::open_in_memory().unwrap());
    let driver = TestDriver::new(HarnessConfig::default(), oracle).unwrap();

    let outcome = driver
        .check(JoinKind::FullOuter, &table![null], &table![null])
        .await
        .unwrap();
    assert_eq!(outcome, TrialOutcome::Match);

    let res = SqliteOracle::open_in_memory()
        .unwrap()
        .execute(JoinKind::FullOuter, &table![null], &table![])
        .await
        .unwrap();
    assert_eq!(
        serde_json::to_string(&res).unwrap(),
        r#"[{"left":null,"right":null}]"#
    );
}

#[tokio::test]
async fn test_run_report_serializes_to_json() {
    let config = HarnessConfig {
        trials: 25,
        seed: Some(99),
        ..HarnessConfig::default()
    };
    let oracle = Box::new(SqliteOracle::open_in_memory().unwrap());
    let mut driver = TestDriver::new(config, oracle).unwrap();
    let report = driver.run().await.unwrap();
    driver.close().await;

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["seed"], 99);
    assert_eq!(json["oracle"], "sqlite");
    assert_eq!(json["algorithm"], "nested_loop");
    let kinds = json["kinds"].as_array().unwrap();
    assert_eq!(kinds.len(), 3);
    for k in kinds {
        assert_eq!(k["trials_run"], 25);
        assert!(k["mismatch"].is_null());
    }
}

#[test]
fn test_mismatch_report_serializes_null_pairs() {
    let oracle = pairs(&[(Some(2), None), (None, None)]);
    let engine = pairs(&[(Some(2), None)]);
    let report = MismatchReport {
        kind: JoinKind::FullOuter,
        trial: 3,
        case: MismatchCase {
            left: table![2],
            right: table![null],
            diff: diff(&oracle, &engine),
            engine,
            oracle,
        },
        minimized: None,
    };

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["kind"], "full_outer");
    assert_eq!(json["case"]["right"], serde_json::json!([null]));
    assert_eq!(
        json["case"]["diff"]["missing"],
        serde_json::json!([{ "pair": { "left": null, "right": null }, "count": 1 }])
    );
    assert!(json["minimized"].is_null());
}
