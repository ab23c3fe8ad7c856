// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use residue_model::{AssetErrorReport, NetworkType, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigResponse {
    pub game_title: String,
    pub min_supported_app_version: String,
    pub feature_flags: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// Inbound body of `POST /v1/assets/report`. The client never supplies
/// `reported_at`; the server stamps it when converting to the owned record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportSubmission {
    pub asset_id: String,
    pub version: u64,
    pub error_code: String,
    #[serde(default)]
    pub network_type: NetworkType,
}

impl ReportSubmission {
    pub fn into_report(
        self,
        reported_at: DateTime<Utc>,
    ) -> Result<AssetErrorReport, ValidationError> {
        let report = AssetErrorReport::new(
            self.asset_id,
            self.version,
            self.error_code,
            self.network_type,
            reported_at,
        );
        report.validate_strict()?;
        Ok(report)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportAck {
    pub accepted: bool,
}
