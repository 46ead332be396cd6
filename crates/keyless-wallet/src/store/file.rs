use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::{check_immutable, check_placement, Backend, PackStore, StoredPack};
use crate::{
    errors::{KeylessError, Result},
    types::PackSetId,
};

/// Pack store backed by JSON files: `<base>/<backend>/<pack_set_id>.json`.
///
/// Writes go to a temp file first and are renamed into place; files are
/// `0600` on unix.
#[derive(Debug, Clone)]
pub struct FilePackStore {
    base_dir: PathBuf,
}

impl FilePackStore {
    pub async fn open(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| KeylessError::Storage(format!("Cannot create data directory: {e}")))?;
        tracing::debug!(path = %base_dir.display(), "Opened file pack store");
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn pack_path(&self, backend: Backend, pack_set_id: &PackSetId) -> PathBuf {
        self.base_dir
            .join(backend.as_str())
            .join(format!("{}.json", pack_set_id))
    }

    async fn read_pack(&self, path: &Path) -> Result<Option<StoredPack>> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(KeylessError::Storage(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )))
            }
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| KeylessError::Storage(format!("Failed to parse {}: {e}", path.display())))
    }

    async fn write_pack(&self, path: &Path, pack: &StoredPack) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| KeylessError::Storage(format!("Cannot create directory: {e}")))?;
        }

        let content = serde_json::to_string_pretty(pack)?;

        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, &content)
            .await
            .map_err(|e| KeylessError::Storage(format!("Failed to write: {e}")))?;
        set_restrictive_permissions(&tmp_path).await?;

        fs::rename(&tmp_path, path)
            .await
            .map_err(|e| KeylessError::Storage(format!("Failed to commit write: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl PackStore for FilePackStore {
    async fn save(&self, backend: Backend, pack_set_id: &PackSetId, pack: &StoredPack) -> Result<()> {
        check_placement(backend, pack_set_id, pack)?;
        let path = self.pack_path(backend, pack_set_id);
        let existing = self.read_pack(&path).await?;
        check_immutable(backend, existing.as_ref(), pack)?;
        if existing.is_none() {
            self.write_pack(&path, pack).await?;
        }
        Ok(())
    }

    async fn load(&self, backend: Backend, pack_set_id: &PackSetId) -> Result<Option<StoredPack>> {
        let pack = self.read_pack(&self.pack_path(backend, pack_set_id)).await?;
        if let Some(pack) = &pack {
            check_placement(backend, pack_set_id, pack)?;
        }
        Ok(pack)
    }

    async fn delete(&self, backend: Backend, pack_set_id: &PackSetId) -> Result<()> {
        match fs::remove_file(self.pack_path(backend, pack_set_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(KeylessError::Storage(format!("Failed to delete: {e}"))),
        }
    }
}

#[cfg(unix)]
async fn set_restrictive_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let perms = std::fs::Permissions::from_mode(0o600);
    fs::set_permissions(path, perms)
        .await
        .map_err(|e| KeylessError::Storage(format!("Failed to set file permissions: {e}")))?;
    Ok(())
}

#[cfg(not(unix))]
async fn set_restrictive_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
