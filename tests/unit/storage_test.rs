//! Local cache behavior in front of the object storage gateway

use std::sync::Arc;

use tempfile::TempDir;
use uuid::Uuid;

use avatar_gen_service::error::AppError;
use avatar_gen_service::storage::{AvatarCache, ObjectStorage};

use crate::support::MapStorage;

fn cache_with(storage: MapStorage) -> (AvatarCache, Arc<MapStorage>, TempDir) {
    let storage = Arc::new(storage);
    let object_storage: Arc<dyn ObjectStorage> = storage.clone();
    let dir = TempDir::new().expect("temp dir");
    let cache = AvatarCache::new(object_storage, dir.path());
    (cache, storage, dir)
}

#[tokio::test]
async fn test_miss_fetches_once_then_hits_cache() {
    let uuid = Uuid::new_v4();
    let key = format!("{}.jpg", uuid);
    let (cache, storage, dir) = cache_with(MapStorage::with_object(&key, b"imagebytes"));

    let path = cache.ensure_local(uuid).await.unwrap();
    assert_eq!(path, dir.path().join(&key));
    assert_eq!(std::fs::read(&path).unwrap(), b"imagebytes");
    assert_eq!(*storage.fetch_count.lock(), 1);

    // Second call is served from disk
    cache.ensure_local(uuid).await.unwrap();
    assert_eq!(*storage.fetch_count.lock(), 1);
}

#[tokio::test]
async fn test_existing_file_is_not_refetched() {
    let uuid = Uuid::new_v4();
    let (cache, storage, dir) = cache_with(MapStorage::default());

    std::fs::write(dir.path().join(format!("{}.jpg", uuid)), b"already-here").unwrap();

    cache.ensure_local(uuid).await.unwrap();
    assert_eq!(*storage.fetch_count.lock(), 0);
}

#[tokio::test]
async fn test_missing_object_is_a_typed_error_with_no_residue() {
    let uuid = Uuid::new_v4();
    let (cache, _storage, dir) = cache_with(MapStorage::default());

    let err = cache.ensure_local(uuid).await.unwrap_err();
    assert!(matches!(err, AppError::Storage(_)));

    // A failed fetch leaves neither the file nor a partial download behind
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .map(|entries| entries.filter_map(|e| e.ok()).collect())
        .unwrap_or_default();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn test_read_base64_encodes_file_contents() {
    let uuid = Uuid::new_v4();
    let key = format!("{}.jpg", uuid);
    let (cache, _storage, _dir) = cache_with(MapStorage::with_object(&key, b"Hello, World!"));

    let encoded = cache.read_base64(uuid).await.unwrap();
    assert_eq!(encoded, "SGVsbG8sIFdvcmxkIQ==");
}
