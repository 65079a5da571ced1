//! Ownership and share-grant gates applied by every sensitive resolver

use crate::error::{AppError, Result};
use crate::store::{Avatar, AvatarStore, User};

/// Resolve the acting user or fail with a typed not-found error
pub async fn require_user(store: &dyn AvatarStore, mail: &str) -> Result<User> {
    store
        .find_user_by_mail(mail)
        .await?
        .ok_or_else(|| AppError::UserNotFound(mail.to_string()))
}

/// Ownership gate: the acting user must own the avatar
pub fn authorize_owner(acting: &User, avatar: &Avatar) -> Result<()> {
    if acting.id == avatar.user_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(avatar.id.to_string()))
    }
}

/// Read gate: the owner, or a grantee of an explicit share on the avatar
pub async fn authorize_read(
    store: &dyn AvatarStore,
    acting: &User,
    avatar: &Avatar,
) -> Result<()> {
    if acting.id == avatar.user_id {
        return Ok(());
    }

    match store.find_share(avatar.id, acting.id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::Forbidden(avatar.id.to_string())),
    }
}
