use chrono::Utc;
use residue_model::{AssetErrorReport, NetworkType};
use residue_store::{ReportLog, StoreErrorCode};
use tempfile::tempdir;

fn report_for(task: usize, seq: usize) -> AssetErrorReport {
    AssetErrorReport::new(
        format!("asset_{task:02}_{seq:02}"),
        3,
        "HASH_MISMATCH".to_string(),
        NetworkType::Wifi,
        Utc::now(),
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_appends_produce_whole_records() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("asset_reports.log");
    let log = ReportLog::spawn(path.clone());

    const TASKS: usize = 16;
    const PER_TASK: usize = 8;

    let mut handles = Vec::new();
    for task in 0..TASKS {
        let log = log.clone();
        handles.push(tokio::spawn(async move {
            for seq in 0..PER_TASK {
                log.append(&report_for(task, seq)).await.expect("append");
            }
        }));
    }
    for handle in handles {
        handle.await.expect("task join");
    }

    let raw = std::fs::read_to_string(&path).expect("read log");
    let lines: Vec<&str> = raw.lines().collect();
    assert_eq!(lines.len(), TASKS * PER_TASK);

    let mut seen = std::collections::BTreeSet::new();
    for line in lines {
        let record: AssetErrorReport = serde_json::from_str(line).expect("well-formed record");
        assert_eq!(record.error_code, "HASH_MISMATCH");
        assert!(seen.insert(record.asset_id.clone()), "no merged records");
    }
    assert_eq!(seen.len(), TASKS * PER_TASK);
}

#[tokio::test]
async fn append_reports_round_trip_reported_at() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("asset_reports.log");
    let log = ReportLog::spawn(path.clone());

    let report = report_for(0, 0);
    log.append(&report).await.expect("append");

    let raw = std::fs::read_to_string(&path).expect("read log");
    let record: AssetErrorReport =
        serde_json::from_str(raw.lines().next().expect("one record")).expect("record json");
    assert_eq!(record, report);
}

#[tokio::test]
async fn append_surfaces_unwritable_destination() {
    let dir = tempdir().expect("tempdir");
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"file, not a directory").expect("write blocker");

    // Parent path is a regular file, so the directory create must fail.
    let log = ReportLog::spawn(blocker.join("sub").join("asset_reports.log"));
    let err = log
        .append(&report_for(0, 0))
        .await
        .expect_err("unwritable destination");
    assert_eq!(err.code, StoreErrorCode::ReportPersistenceFailed);
}
