//! GraphQL mutation resolvers

use std::sync::Arc;

use async_graphql::{Context, ErrorExtensions, Object, ResultExt};
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::auth;
use crate::api::types::{AvatarType, ShareType, UserType};
use crate::error::AppError;
use crate::provider::catalog;
use crate::queue::GenerationJob;
use crate::store::{AvatarFilter, NewAvatar};
use crate::AppState;

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Create a user; returns the existing row when the mail is already known
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        email: String,
    ) -> async_graphql::Result<UserType> {
        let state = ctx.data_unchecked::<Arc<AppState>>();
        let user = state.store.create_user_if_absent(&email).await.extend()?;
        let avatars = state
            .store
            .list_avatars(user.id, &AvatarFilter::default())
            .await
            .extend()?;
        Ok(UserType::from_parts(user, avatars))
    }

    /// Accept a generation request: persist the pending avatar row, then
    /// defer the provider call to the worker queue
    async fn create_avatar(
        &self,
        ctx: &Context<'_>,
        email: String,
        ai_model: String,
        prompt: String,
    ) -> async_graphql::Result<AvatarType> {
        let state = ctx.data_unchecked::<Arc<AppState>>();
        let user = auth::require_user(state.store.as_ref(), &email).await.extend()?;

        // Reject unknown tags before any row exists
        catalog::resolve(&ai_model).extend()?;

        let avatar = state
            .store
            .insert_avatar(NewAvatar {
                user_id: user.id,
                uuid: Uuid::new_v4(),
                name: prompt.clone(),
                kind: ai_model.clone(),
            })
            .await
            .extend()?;

        let job = GenerationJob::generate(avatar.uuid, &ai_model, &prompt);
        if let Err(e) = state.queue.publish(&job).await {
            // The committed row stays behind as a pending avatar with no job;
            // surface the failure instead of hiding it
            warn!(uuid = %avatar.uuid, error = %e, "Avatar row committed but publish failed");
            return Err(e.extend());
        }

        info!(uuid = %avatar.uuid, model = %ai_model, "Avatar generation queued");
        Ok(avatar.into())
    }

    /// Regenerate from caller-supplied reference images, persist the new
    /// avatar and queue an ingest job for the produced asset
    async fn edit_avatar(
        &self,
        ctx: &Context<'_>,
        email: String,
        avatar_urls: Vec<String>,
        ai_model: String,
        prompt: String,
    ) -> async_graphql::Result<AvatarType> {
        let state = ctx.data_unchecked::<Arc<AppState>>();
        let user = auth::require_user(state.store.as_ref(), &email).await.extend()?;

        let asset_url = state
            .generator
            .regenerate(&ai_model, &prompt, &avatar_urls)
            .await
            .extend()?;

        let avatar = state
            .store
            .insert_avatar(NewAvatar {
                user_id: user.id,
                uuid: Uuid::new_v4(),
                name: prompt.clone(),
                kind: ai_model.clone(),
            })
            .await
            .extend()?;

        let job = GenerationJob::ingest(avatar.uuid, &ai_model, &prompt, asset_url);
        if let Err(e) = state.queue.publish(&job).await {
            warn!(uuid = %avatar.uuid, error = %e, "Avatar row committed but publish failed");
            return Err(e.extend());
        }

        info!(uuid = %avatar.uuid, model = %ai_model, "Avatar regeneration queued for ingest");
        Ok(avatar.into())
    }

    /// Delete an avatar; only its owner may do so
    async fn delete_avatar(
        &self,
        ctx: &Context<'_>,
        email: String,
        avatar_id: i32,
    ) -> async_graphql::Result<String> {
        let state = ctx.data_unchecked::<Arc<AppState>>();
        let user = auth::require_user(state.store.as_ref(), &email).await.extend()?;

        let avatar = state
            .store
            .find_avatar(avatar_id)
            .await
            .extend()?
            .ok_or_else(|| AppError::AvatarNotFound(avatar_id.to_string()).extend())?;

        auth::authorize_owner(&user, &avatar).extend()?;

        state.store.delete_avatar(avatar.id).await.extend()?;
        info!(avatar_id, user_id = user.id, "Avatar deleted");
        Ok("Avatar deleted successfully".to_string())
    }

    /// Grant another user read access to one avatar
    async fn share_avatar(
        &self,
        ctx: &Context<'_>,
        owner_email: String,
        grantee_email: String,
        avatar_id: i32,
    ) -> async_graphql::Result<ShareType> {
        let state = ctx.data_unchecked::<Arc<AppState>>();
        let owner = auth::require_user(state.store.as_ref(), &owner_email).await?;
        let grantee = auth::require_user(state.store.as_ref(), &grantee_email).await?;

        let avatar = state
            .store
            .find_avatar(avatar_id)
            .await
            .extend()?
            .ok_or_else(|| AppError::AvatarNotFound(avatar_id.to_string()).extend())?;

        auth::authorize_owner(&owner, &avatar).extend()?;

        let share = state
            .store
            .insert_share(avatar.id, owner.id, grantee.id)
            .await
            .extend()?;
        info!(avatar_id, grantee_id = grantee.id, "Share granted");
        Ok(share.into())
    }

    /// Revoke a previously granted share
    async fn revoke_share(
        &self,
        ctx: &Context<'_>,
        owner_email: String,
        grantee_email: String,
        avatar_id: i32,
    ) -> async_graphql::Result<String> {
        let state = ctx.data_unchecked::<Arc<AppState>>();
        let owner = auth::require_user(state.store.as_ref(), &owner_email).await?;
        let grantee = auth::require_user(state.store.as_ref(), &grantee_email).await?;

        let avatar = state
            .store
            .find_avatar(avatar_id)
            .await
            .extend()?
            .ok_or_else(|| AppError::AvatarNotFound(avatar_id.to_string()).extend())?;

        auth::authorize_owner(&owner, &avatar).extend()?;

        if !state.store.delete_share(avatar.id, grantee.id).await.extend()? {
            return Err(AppError::ShareNotFound(avatar_id.to_string()).extend());
        }

        info!(avatar_id, grantee_id = grantee.id, "Share revoked");
        Ok("Share revoked successfully".to_string())
    }
}
