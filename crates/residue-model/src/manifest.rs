use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

pub const ASSET_ID_MAX_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum AssetKind {
    #[default]
    Image,
    Audio,
    Music,
}

impl AssetKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Music => "music",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum AssetPriority {
    High,
    #[default]
    Normal,
    Low,
}

impl AssetPriority {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Normal => "normal",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct AssetItem {
    pub asset_id: String,
    #[serde(rename = "type", default)]
    pub kind: AssetKind,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub priority: AssetPriority,
    pub version: u64,
    pub hash: String,
    pub size_bytes: u64,
    pub cdn_url: String,
}

impl AssetItem {
    #[must_use]
    pub fn new(
        asset_id: String,
        version: u64,
        hash: String,
        size_bytes: u64,
        cdn_url: String,
    ) -> Self {
        Self {
            asset_id,
            kind: AssetKind::default(),
            tags: Vec::new(),
            priority: AssetPriority::default(),
            version,
            hash,
            size_bytes,
            cdn_url,
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
        if self.version == 0 {
            return Err(ValidationError(format!(
                "asset {} version must be >= 1",
                self.asset_id
            )));
        }
        if self.hash.trim().is_empty() {
            return Err(ValidationError(format!(
                "asset {} hash must not be empty",
                self.asset_id
            )));
        }
        if self.cdn_url.trim().is_empty() {
            return Err(ValidationError(format!(
                "asset {} cdn_url must not be empty",
                self.asset_id
            )));
        }
        Ok(())
    }
}

/// Versioned description of the full asset set a client should have.
///
/// Produced out-of-band by the publishing pipeline; this service only reads
/// it. `manifest_version` strictly increases across publications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct AssetManifest {
    pub manifest_version: u64,
    pub generated_at: DateTime<Utc>,
    pub required_bytes_wifi: u64,
    pub required_bytes_cellular: u64,
    pub assets: Vec<AssetItem>,
    #[serde(default)]
    pub deleted_asset_ids: Vec<String>,
}

impl AssetManifest {
    #[must_use]
    pub fn new(manifest_version: u64, generated_at: DateTime<Utc>) -> Self {
        Self {
            manifest_version,
            generated_at,
            required_bytes_wifi: 0,
            required_bytes_cellular: 0,
            assets: Vec::new(),
            deleted_asset_ids: Vec::new(),
        }
    }

    pub fn validate_strict(&self) -> Result<(), ValidationError> {
        if self.manifest_version == 0 {
            return Err(ValidationError(
                "manifest_version must be >= 1".to_string(),
            ));
        }
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for item in &self.assets {
            item.validate_strict()?;
            if !seen.insert(item.asset_id.as_str()) {
                return Err(ValidationError(format!(
                    "duplicate asset_id {} in manifest",
                    item.asset_id
                )));
            }
        }
        let mut deleted: BTreeSet<&str> = BTreeSet::new();
        for id in &self.deleted_asset_ids {
            if id.trim().is_empty() {
                return Err(ValidationError(
                    "deleted_asset_ids must not contain empty ids".to_string(),
                ));
            }
            if !deleted.insert(id.as_str()) {
                return Err(ValidationError(format!(
                    "duplicate deleted asset id {id}"
                )));
            }
        }
        Ok(())
    }
}
