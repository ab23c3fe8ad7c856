#![forbid(unsafe_code)]
//! Persistence edges of the Residue asset backend: a read-only manifest
//! document and an append-only report log, both plain files whose locations
//! are configuration.

use std::fmt::{Display, Formatter};

mod manifest;
mod report_log;

pub use manifest::{LocalFsStore, ManifestStore};
pub use report_log::ReportLog;

pub const CRATE_NAME: &str = "residue-store";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorCode {
    ManifestUnavailable,
    ReportPersistenceFailed,
    Internal,
}

impl StoreErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ManifestUnavailable => "manifest_unavailable",
            Self::ReportPersistenceFailed => "report_persistence_failed",
            Self::Internal => "internal_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub message: String,
}

impl StoreError {
    #[must_use]
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for StoreError {}
