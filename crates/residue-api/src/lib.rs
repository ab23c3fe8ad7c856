#![forbid(unsafe_code)]
//! Wire-level contracts for the Residue asset backend: query-parameter
//! parsing, inbound/outbound DTOs, and the machine-readable error envelope.
//! Everything here runs before the core; malformed requests never reach it.

mod errors;
mod params;
mod wire;

pub use errors::{ApiError, ApiErrorCode};
pub use params::{parse_manifest_params, ManifestQueryParams, PARAM_VALUE_MAX_LEN};
pub use wire::{ConfigResponse, HealthResponse, ReportAck, ReportSubmission};

pub const CRATE_NAME: &str = "residue-api";
