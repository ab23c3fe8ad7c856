use residue_model::AssetManifest;
use residue_store::{ManifestStore, StoreError, StoreErrorCode};
use std::sync::Mutex;

/// In-memory manifest store for tests. No manifest published means the
/// same `manifest_unavailable` failure a missing document produces.
#[derive(Default)]
pub struct FakeManifestStore {
    manifest: Mutex<Option<AssetManifest>>,
}

impl FakeManifestStore {
    #[must_use]
    pub fn with_manifest(manifest: AssetManifest) -> Self {
        Self {
            manifest: Mutex::new(Some(manifest)),
        }
    }

    pub fn publish(&self, manifest: AssetManifest) {
        if let Ok(mut guard) = self.manifest.lock() {
            *guard = Some(manifest);
        }
    }
}

impl ManifestStore for FakeManifestStore {
    fn load(&self) -> Result<AssetManifest, StoreError> {
        self.manifest
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().cloned())
            .ok_or_else(|| {
                StoreError::new(
                    StoreErrorCode::ManifestUnavailable,
                    "no manifest published",
                )
            })
    }
}
