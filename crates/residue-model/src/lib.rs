#![forbid(unsafe_code)]
//! Residue model SSOT: manifest and report contracts plus delta resolution.

mod delta;
mod manifest;
mod report;

pub use delta::resolve_delta;
pub use manifest::{
    AssetItem, AssetKind, AssetManifest, AssetPriority, ValidationError, ASSET_ID_MAX_LEN,
};
pub use report::{AssetErrorReport, NetworkType, ERROR_CODE_MAX_LEN};

pub const CRATE_NAME: &str = "residue-model";
