use chrono::Local;
use residue_cli::{
    generate_with_gate, GenerateError, GenerateOutcome, GeneratorError, ImageGenerator,
    SpendLimits, UnconfiguredGenerator, UsageLedger,
};
use std::path::{Path, PathBuf};
use tempfile::tempdir;

struct FakeGenerator;

impl ImageGenerator for FakeGenerator {
    fn generate(
        &self,
        _prompt: &str,
        num_images: u32,
        _aspect_ratio: &str,
        output: &Path,
    ) -> Result<Vec<PathBuf>, GeneratorError> {
        Ok((0..num_images)
            .map(|i| output.with_file_name(format!("out_{i}.png")))
            .collect())
    }
}

#[test]
fn ledger_round_trips_through_disk() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("imagen_usage.json");

    let mut ledger = UsageLedger::default();
    ledger.record("ruined shrine at dusk", 2, "16:9", None);
    ledger.save(&path).expect("save ledger");

    let loaded = UsageLedger::load(&path).expect("load ledger");
    assert_eq!(loaded, ledger);
    assert_eq!(loaded.total_images, 2);
}

#[test]
fn missing_ledger_loads_as_empty() {
    let dir = tempdir().expect("tempdir");
    let ledger = UsageLedger::load(&dir.path().join("absent.json")).expect("empty ledger");
    assert!(ledger.entries.is_empty());
    assert_eq!(ledger.total_images, 0);
}

#[test]
fn corrupt_ledger_is_an_error_not_a_silent_reset() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("imagen_usage.json");
    std::fs::write(&path, b"{broken").expect("write");
    assert!(UsageLedger::load(&path).is_err());
}

#[test]
fn generate_records_usage_after_backend_success() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("imagen_usage.json");

    let outcome = generate_with_gate(
        &FakeGenerator,
        &path,
        SpendLimits::default(),
        "ruined shrine at dusk",
        2,
        "16:9",
        Path::new("out.png"),
    )
    .expect("generate");

    match outcome {
        GenerateOutcome::Generated { saved, status } => {
            assert_eq!(saved.len(), 2);
            assert!(!status.blocked);
            assert_eq!(status.daily_count, 2);
        }
        GenerateOutcome::Blocked(_) => panic!("fresh ledger must not block"),
    }

    let ledger = UsageLedger::load(&path).expect("load ledger");
    assert_eq!(ledger.total_images, 2);
}

#[test]
fn generate_is_blocked_once_todays_spend_hits_the_limit() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("imagen_usage.json");

    let mut ledger = UsageLedger::default();
    // 125 images at default pricing is $5.00, exactly the daily cap.
    ledger.record("backlog", 125, "1:1", None);
    ledger.save(&path).expect("save ledger");

    let outcome = generate_with_gate(
        &FakeGenerator,
        &path,
        SpendLimits::default(),
        "one more",
        1,
        "1:1",
        Path::new("out.png"),
    )
    .expect("generate");

    match outcome {
        GenerateOutcome::Blocked(status) => {
            assert!(status.blocked);
            assert!(status.alerts.iter().any(|a| a.contains("daily limit")));
        }
        GenerateOutcome::Generated { .. } => panic!("capped ledger must block"),
    }

    // The refused call must not have touched the ledger.
    let after = UsageLedger::load(&path).expect("load ledger");
    assert_eq!(after.total_images, 125);
}

#[test]
fn backend_failure_costs_nothing() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("imagen_usage.json");

    let err = generate_with_gate(
        &UnconfiguredGenerator,
        &path,
        SpendLimits::default(),
        "ruined shrine at dusk",
        1,
        "1:1",
        Path::new("out.png"),
    )
    .expect_err("unconfigured backend");
    assert!(matches!(err, GenerateError::Backend(_)));

    let ledger = UsageLedger::load(&path).expect("load ledger");
    assert_eq!(ledger.total_images, 0);
}

#[test]
fn record_groups_by_local_date() {
    let mut ledger = UsageLedger::default();
    ledger.record("ruined shrine at dusk", 1, "1:1", None);
    let today = Local::now().format("%Y-%m-%d").to_string();
    assert_eq!(ledger.entries[0].date, today);
}
