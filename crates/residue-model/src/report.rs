use crate::manifest::{ValidationError, ASSET_ID_MAX_LEN};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ERROR_CODE_MAX_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum NetworkType {
    Wifi,
    Cellular,
    Offline,
    #[default]
    Unknown,
}

impl NetworkType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wifi => "wifi",
            Self::Cellular => "cellular",
            Self::Offline => "offline",
            Self::Unknown => "unknown",
        }
    }
}

/// One client-submitted asset failure record.
///
/// Write-once: the sink appends it and nothing in this system mutates or
/// deletes it afterwards. `reported_at` is stamped by the server, never
/// taken from the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct AssetErrorReport {
    pub asset_id: String,
    pub version: u64,
    pub error_code: String,
    pub network_type: NetworkType,
    pub reported_at: DateTime<Utc>,
}

impl AssetErrorReport {
    #[must_use]
    pub fn new(
        asset_id: String,
        version: u64,
        error_code: String,
        network_type: NetworkType,
        reported_at: DateTime<Utc>,
    ) -> Self {
        Self {
            asset_id,
            version,
            error_code,
            network_type,
            reported_at,
        }
    }

    pub fn validate_strict(&self) -> Result<(), ValidationError> {
        if self.asset_id.trim().is_empty() {
            return Err(ValidationError("asset_id must not be empty".to_string()));
        }
        if self.asset_id.len() > ASSET_ID_MAX_LEN {
            return Err(ValidationError(format!(
                "asset_id exceeds max length {ASSET_ID_MAX_LEN}"
            )));
        }
        if self.error_code.trim().is_empty() {
            return Err(ValidationError(
                "error_code must not be empty".to_string(),
            ));
        }
        if self.error_code.len() > ERROR_CODE_MAX_LEN {
            return Err(ValidationError(format!(
                "error_code exceeds max length {ERROR_CODE_MAX_LEN}"
            )));
        }
        Ok(())
    }
}
