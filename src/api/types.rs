//! GraphQL object types exposed by the schema

use async_graphql::SimpleObject;
use uuid::Uuid;

use crate::store::{Avatar, Share, User, UserWithAvatars};

/// An avatar as seen by API clients
#[derive(Debug, Clone, SimpleObject)]
pub struct AvatarType {
    pub id: i32,
    pub uuid: Uuid,
    pub name: Option<String>,
    #[graphql(name = "type")]
    pub kind: Option<String>,
}

/// A user with the avatars it owns
#[derive(Debug, Clone, SimpleObject)]
pub struct UserType {
    pub id: i32,
    pub mail: String,
    pub avatars: Vec<AvatarType>,
}

/// An explicit, revocable share grant
#[derive(Debug, Clone, SimpleObject)]
pub struct ShareType {
    pub id: i32,
    pub avatar_id: i32,
    pub grantor_id: i32,
    pub grantee_id: i32,
}

impl From<Avatar> for AvatarType {
    fn from(avatar: Avatar) -> Self {
        Self {
            id: avatar.id,
            uuid: avatar.uuid,
            name: avatar.name,
            kind: avatar.kind,
        }
    }
}

impl From<UserWithAvatars> for UserType {
    fn from(entry: UserWithAvatars) -> Self {
        Self {
            id: entry.user.id,
            mail: entry.user.mail,
            avatars: entry.avatars.into_iter().map(AvatarType::from).collect(),
        }
    }
}

impl UserType {
    pub fn from_parts(user: User, avatars: Vec<Avatar>) -> Self {
        Self {
            id: user.id,
            mail: user.mail,
            avatars: avatars.into_iter().map(AvatarType::from).collect(),
        }
    }
}

impl From<Share> for ShareType {
    fn from(share: Share) -> Self {
        Self {
            id: share.id,
            avatar_id: share.avatar_id,
            grantor_id: share.grantor_id,
            grantee_id: share.grantee_id,
        }
    }
}
