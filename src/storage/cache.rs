//! Local download cache in front of the bucket

use std::path::PathBuf;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::storage::ObjectStorage;

/// Mirrors bucket objects into a configured local directory
///
/// Objects are keyed `{uuid}.jpg` in the bucket and cached under the same name
/// locally. Downloads go through a temp file and a rename so a failed fetch
/// never leaves a truncated file that a later existence check would trust.
pub struct AvatarCache {
    storage: Arc<dyn ObjectStorage>,
    download_dir: PathBuf,
}

impl AvatarCache {
    pub fn new(storage: Arc<dyn ObjectStorage>, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage,
            download_dir: download_dir.into(),
        }
    }

    fn object_key(uuid: Uuid) -> String {
        format!("{}.jpg", uuid)
    }

    /// Return the local path of the avatar image, fetching it on a cache miss
    pub async fn ensure_local(&self, uuid: Uuid) -> Result<PathBuf> {
        let file_name = Self::object_key(uuid);
        let path = self.download_dir.join(&file_name);

        if fs::try_exists(&path).await? {
            debug!(path = ?path, "Cache hit");
            return Ok(path);
        }

        fs::create_dir_all(&self.download_dir).await?;

        let bytes = self.storage.fetch(&file_name).await?;

        let tmp_path = self.download_dir.join(format!("{}.part", file_name));
        fs::write(&tmp_path, &bytes).await?;
        fs::rename(&tmp_path, &path).await?;

        debug!(path = ?path, size = bytes.len(), "Cached avatar image");
        Ok(path)
    }

    /// Read the avatar image and return it base64-encoded
    pub async fn read_base64(&self, uuid: Uuid) -> Result<String> {
        let path = self.ensure_local(uuid).await?;
        let bytes = fs::read(&path).await?;
        Ok(STANDARD.encode(bytes))
    }
}
