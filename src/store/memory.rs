//! In-memory store used by the test suites

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::Result;
use crate::store::models::{Avatar, AvatarFilter, NewAvatar, Share, User, UserWithAvatars};
use crate::store::AvatarStore;

/// Store implementation that keeps everything behind a lock
///
/// Mirrors the relational semantics (surrogate ids, unique mail, owner foreign
/// key, cascading share deletes) without a database.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    users: Vec<User>,
    avatars: Vec<Avatar>,
    shares: Vec<Share>,
    next_user_id: i32,
    next_avatar_id: i32,
    next_share_id: i32,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_filter(avatar: &Avatar, filter: &AvatarFilter) -> bool {
    if let Some(id) = filter.id {
        if avatar.id != id {
            return false;
        }
    }
    if let Some(kind) = &filter.kind {
        if avatar.kind.as_deref() != Some(kind.as_str()) {
            return false;
        }
    }
    true
}

#[async_trait]
impl AvatarStore for InMemoryStore {
    async fn find_user_by_mail(&self, mail: &str) -> Result<Option<User>> {
        let state = self.state.read();
        Ok(state.users.iter().find(|u| u.mail == mail).cloned())
    }

    async fn create_user_if_absent(&self, mail: &str) -> Result<User> {
        let mut state = self.state.write();
        if let Some(existing) = state.users.iter().find(|u| u.mail == mail) {
            return Ok(existing.clone());
        }

        state.next_user_id += 1;
        let user = User {
            id: state.next_user_id,
            mail: mail.to_string(),
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn list_users_with_avatars(&self, mail: Option<&str>) -> Result<Vec<UserWithAvatars>> {
        let state = self.state.read();
        let users = state
            .users
            .iter()
            .filter(|u| mail.map_or(true, |m| u.mail == m))
            .map(|user| UserWithAvatars {
                user: user.clone(),
                avatars: state
                    .avatars
                    .iter()
                    .filter(|a| a.user_id == user.id)
                    .cloned()
                    .collect(),
            })
            .collect();
        Ok(users)
    }

    async fn list_avatars(&self, user_id: i32, filter: &AvatarFilter) -> Result<Vec<Avatar>> {
        let state = self.state.read();
        Ok(state
            .avatars
            .iter()
            .filter(|a| a.user_id == user_id && matches_filter(a, filter))
            .cloned()
            .collect())
    }

    async fn find_avatar(&self, avatar_id: i32) -> Result<Option<Avatar>> {
        let state = self.state.read();
        Ok(state.avatars.iter().find(|a| a.id == avatar_id).cloned())
    }

    async fn find_avatar_by_uuid(&self, uuid: Uuid) -> Result<Option<Avatar>> {
        let state = self.state.read();
        Ok(state.avatars.iter().find(|a| a.uuid == uuid).cloned())
    }

    async fn insert_avatar(&self, new: NewAvatar) -> Result<Avatar> {
        let mut state = self.state.write();
        state.next_avatar_id += 1;
        let avatar = Avatar {
            id: state.next_avatar_id,
            uuid: new.uuid,
            name: Some(new.name),
            kind: Some(new.kind),
            user_id: new.user_id,
        };
        state.avatars.push(avatar.clone());
        Ok(avatar)
    }

    async fn delete_avatar(&self, avatar_id: i32) -> Result<()> {
        let mut state = self.state.write();
        state.avatars.retain(|a| a.id != avatar_id);
        // Same as ON DELETE CASCADE on the share table
        state.shares.retain(|s| s.avatar_id != avatar_id);
        Ok(())
    }

    async fn insert_share(
        &self,
        avatar_id: i32,
        grantor_id: i32,
        grantee_id: i32,
    ) -> Result<Share> {
        let mut state = self.state.write();
        if let Some(existing) = state
            .shares
            .iter()
            .find(|s| s.avatar_id == avatar_id && s.grantee_id == grantee_id)
        {
            return Ok(existing.clone());
        }

        state.next_share_id += 1;
        let share = Share {
            id: state.next_share_id,
            avatar_id,
            grantor_id,
            grantee_id,
        };
        state.shares.push(share.clone());
        Ok(share)
    }

    async fn delete_share(&self, avatar_id: i32, grantee_id: i32) -> Result<bool> {
        let mut state = self.state.write();
        let before = state.shares.len();
        state
            .shares
            .retain(|s| !(s.avatar_id == avatar_id && s.grantee_id == grantee_id));
        Ok(state.shares.len() < before)
    }

    async fn find_share(&self, avatar_id: i32, grantee_id: i32) -> Result<Option<Share>> {
        let state = self.state.read();
        Ok(state
            .shares
            .iter()
            .find(|s| s.avatar_id == avatar_id && s.grantee_id == grantee_id)
            .cloned())
    }

    async fn list_shared_avatars(
        &self,
        grantor_id: i32,
        grantee_id: i32,
        filter: &AvatarFilter,
    ) -> Result<Vec<Avatar>> {
        let state = self.state.read();
        Ok(state
            .avatars
            .iter()
            .filter(|a| {
                a.user_id == grantor_id
                    && matches_filter(a, filter)
                    && state
                        .shares
                        .iter()
                        .any(|s| s.avatar_id == a.id && s.grantee_id == grantee_id)
            })
            .cloned()
            .collect())
    }
}
