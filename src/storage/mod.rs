//! Storage module - bucket gateway and local avatar cache

pub mod cache;
pub mod s3;

pub use cache::AvatarCache;
pub use s3::S3ObjectStorage;

use async_trait::async_trait;

use crate::error::Result;

/// Trait for reading objects out of the avatar bucket
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Fetch one object by key; every failure surfaces as a typed error
    async fn fetch(&self, key: &str) -> Result<Vec<u8>>;
}
