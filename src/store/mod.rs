//! Persistence module - entities, the store trait and its implementations

pub mod memory;
pub mod models;
pub mod pg;

pub use memory::InMemoryStore;
pub use models::{Avatar, AvatarFilter, NewAvatar, Share, User, UserWithAvatars};
pub use pg::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;

/// Relational store for users, avatars and share grants
///
/// Every operation acquires its own scoped session; multi-statement operations
/// commit on success and roll back on any failure path.
#[async_trait]
pub trait AvatarStore: Send + Sync {
    async fn find_user_by_mail(&self, mail: &str) -> Result<Option<User>>;

    /// Idempotent create; the unique constraint on mail is authoritative under
    /// concurrent duplicate inserts
    async fn create_user_if_absent(&self, mail: &str) -> Result<User>;

    async fn list_users_with_avatars(&self, mail: Option<&str>) -> Result<Vec<UserWithAvatars>>;

    async fn list_avatars(&self, user_id: i32, filter: &AvatarFilter) -> Result<Vec<Avatar>>;

    async fn find_avatar(&self, avatar_id: i32) -> Result<Option<Avatar>>;

    async fn find_avatar_by_uuid(&self, uuid: Uuid) -> Result<Option<Avatar>>;

    async fn insert_avatar(&self, new: NewAvatar) -> Result<Avatar>;

    async fn delete_avatar(&self, avatar_id: i32) -> Result<()>;

    async fn insert_share(&self, avatar_id: i32, grantor_id: i32, grantee_id: i32)
        -> Result<Share>;

    /// Returns true when a grant existed and was removed
    async fn delete_share(&self, avatar_id: i32, grantee_id: i32) -> Result<bool>;

    async fn find_share(&self, avatar_id: i32, grantee_id: i32) -> Result<Option<Share>>;

    /// Avatars of `grantor_id` that carry a grant to `grantee_id`
    async fn list_shared_avatars(
        &self,
        grantor_id: i32,
        grantee_id: i32,
        filter: &AvatarFilter,
    ) -> Result<Vec<Avatar>>;
}
