use crate::{StoreError, StoreErrorCode};
use residue_model::AssetManifest;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::SystemTime;

/// Source of the current asset manifest. The document is produced by an
/// external publishing pipeline; implementations only read it.
pub trait ManifestStore: Send + Sync + 'static {
    fn load(&self) -> Result<AssetManifest, StoreError>;
}

struct CachedManifest {
    modified: SystemTime,
    manifest: AssetManifest,
}

/// Reads the manifest JSON document from a configured path.
///
/// Keeps the last successfully parsed manifest keyed by file mtime; the
/// document only changes through external publication, so an unchanged mtime
/// means an unchanged manifest. A missing, unreadable, malformed, or
/// invalid document is `manifest_unavailable`; it is never served stale
/// from the cache.
pub struct LocalFsStore {
    path: PathBuf,
    cache: Mutex<Option<CachedManifest>>,
}

impl LocalFsStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            cache: Mutex::new(None),
        }
    }

    fn load_uncached(&self) -> Result<AssetManifest, StoreError> {
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StoreError::new(
                    StoreErrorCode::ManifestUnavailable,
                    format!("manifest document missing at {}", self.path.display()),
                )
            } else {
                StoreError::new(
                    StoreErrorCode::ManifestUnavailable,
                    format!("manifest read failed: {e}"),
                )
            }
        })?;
        let manifest: AssetManifest = serde_json::from_str(&raw).map_err(|e| {
            StoreError::new(
                StoreErrorCode::ManifestUnavailable,
                format!("manifest parse failed: {e}"),
            )
        })?;
        manifest.validate_strict().map_err(|e| {
            StoreError::new(
                StoreErrorCode::ManifestUnavailable,
                format!("manifest failed validation: {e}"),
            )
        })?;
        Ok(manifest)
    }
}

impl ManifestStore for LocalFsStore {
    fn load(&self) -> Result<AssetManifest, StoreError> {
        let modified = fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    StoreError::new(
                        StoreErrorCode::ManifestUnavailable,
                        format!("manifest document missing at {}", self.path.display()),
                    )
                } else {
                    StoreError::new(
                        StoreErrorCode::ManifestUnavailable,
                        format!("manifest stat failed: {e}"),
                    )
                }
            })?;

        if let Ok(guard) = self.cache.lock() {
            if let Some(cached) = guard.as_ref() {
                if cached.modified == modified {
                    return Ok(cached.manifest.clone());
                }
            }
        }

        let manifest = self.load_uncached()?;
        if let Ok(mut guard) = self.cache.lock() {
            *guard = Some(CachedManifest {
                modified,
                manifest: manifest.clone(),
            });
        }
        Ok(manifest)
    }
}
