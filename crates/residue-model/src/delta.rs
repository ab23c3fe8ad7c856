use crate::manifest::AssetManifest;

/// Decide what a client that last saw `client_last_version` must download.
///
/// A client at or ahead of the current version gets an empty delta: the
/// current `manifest_version` and `generated_at` with zeroed byte counts and
/// no asset entries, so it can confirm it is up to date without re-fetching
/// anything. Any older (or absent) client version gets the entire current
/// manifest; no incremental diff is computed between versions.
#[must_use]
pub fn resolve_delta(current: &AssetManifest, client_last_version: Option<u64>) -> AssetManifest {
    match client_last_version {
        Some(version) if version >= current.manifest_version => AssetManifest {
            manifest_version: current.manifest_version,
            generated_at: current.generated_at,
            required_bytes_wifi: 0,
            required_bytes_cellular: 0,
            assets: Vec::new(),
            deleted_asset_ids: Vec::new(),
        },
        _ => current.clone(),
    }
}
