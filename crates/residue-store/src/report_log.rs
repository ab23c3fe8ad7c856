use crate::{StoreError, StoreErrorCode};
use residue_model::AssetErrorReport;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

const APPEND_QUEUE_DEPTH: usize = 256;

struct AppendRequest {
    line: String,
    ack: oneshot::Sender<Result<(), StoreError>>,
}

/// Append-only sink for client asset-error reports, one JSON record per
/// line.
///
/// All physical writes go through a single writer task that owns the
/// destination file, so records from concurrent callers are always whole
/// and never interleaved. Callers get the write result back through a
/// per-request ack; a failed write is reported once and never retried.
#[derive(Clone)]
pub struct ReportLog {
    tx: mpsc::Sender<AppendRequest>,
}

impl ReportLog {
    /// Spawns the writer task for `path` on the current tokio runtime.
    #[must_use]
    pub fn spawn(path: PathBuf) -> Self {
        let (tx, mut rx) = mpsc::channel::<AppendRequest>(APPEND_QUEUE_DEPTH);
        tokio::spawn(async move {
            while let Some(request) = rx.recv().await {
                let result = write_record(&path, &request.line).await;
                if let Err(e) = &result {
                    warn!("report append failed: {e}");
                }
                let _ = request.ack.send(result);
            }
        });
        Self { tx }
    }

    pub async fn append(&self, report: &AssetErrorReport) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(report).map_err(|e| {
            StoreError::new(
                StoreErrorCode::ReportPersistenceFailed,
                format!("report serialization failed: {e}"),
            )
        })?;
        line.push('\n');

        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send(AppendRequest {
                line,
                ack: ack_tx,
            })
            .await
            .map_err(|_| {
                StoreError::new(
                    StoreErrorCode::ReportPersistenceFailed,
                    "report writer task is not running",
                )
            })?;
        ack_rx.await.map_err(|_| {
            StoreError::new(
                StoreErrorCode::ReportPersistenceFailed,
                "report writer task dropped the request",
            )
        })?
    }
}

async fn write_record(path: &Path, line: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StoreError::new(
                    StoreErrorCode::ReportPersistenceFailed,
                    format!("report log directory create failed: {e}"),
                )
            })?;
        }
    }
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| {
            StoreError::new(
                StoreErrorCode::ReportPersistenceFailed,
                format!("report log open failed: {e}"),
            )
        })?;
    file.write_all(line.as_bytes()).await.map_err(|e| {
        StoreError::new(
            StoreErrorCode::ReportPersistenceFailed,
            format!("report log write failed: {e}"),
        )
    })?;
    file.flush().await.map_err(|e| {
        StoreError::new(
            StoreErrorCode::ReportPersistenceFailed,
            format!("report log flush failed: {e}"),
        )
    })?;
    Ok(())
}
