//! Persisted entities

use sqlx::FromRow;
use uuid::Uuid;

/// A user identified by mail address
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i32,
    pub mail: String,
}

/// An avatar owned by exactly one user
///
/// `uuid` is the opaque externally-facing identifier; the storage location is
/// derived as `{uuid}.jpg` and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Avatar {
    pub id: i32,
    pub uuid: Uuid,
    pub name: Option<String>,
    #[sqlx(rename = "type")]
    pub kind: Option<String>,
    pub user_id: i32,
}

/// A revocable grant of read access to one avatar
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Share {
    pub id: i32,
    pub avatar_id: i32,
    pub grantor_id: i32,
    pub grantee_id: i32,
}

/// Insertable avatar row
#[derive(Debug, Clone)]
pub struct NewAvatar {
    pub user_id: i32,
    pub uuid: Uuid,
    pub name: String,
    pub kind: String,
}

/// A user together with all avatars it owns
#[derive(Debug, Clone)]
pub struct UserWithAvatars {
    pub user: User,
    pub avatars: Vec<Avatar>,
}

/// Optional narrowing of avatar listings
#[derive(Debug, Clone, Default)]
pub struct AvatarFilter {
    pub id: Option<i32>,
    pub kind: Option<String>,
}
