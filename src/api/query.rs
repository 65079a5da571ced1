//! GraphQL query resolvers

use std::sync::Arc;

use async_graphql::{Context, ErrorExtensions, Object, ResultExt};
use uuid::Uuid;

use crate::api::auth;
use crate::api::types::{AvatarType, UserType};
use crate::error::AppError;
use crate::store::AvatarFilter;
use crate::AppState;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// List users with their avatars, optionally narrowed to one mail address
    async fn users(
        &self,
        ctx: &Context<'_>,
        email: Option<String>,
    ) -> async_graphql::Result<Vec<UserType>> {
        let state = ctx.data_unchecked::<Arc<AppState>>();
        let users = state
            .store
            .list_users_with_avatars(email.as_deref())
            .await
            .extend()?;
        Ok(users.into_iter().map(UserType::from).collect())
    }

    /// List the acting user's avatars, or avatars another user has shared with
    /// them when `sharedFromEmail` is given
    async fn avatars(
        &self,
        ctx: &Context<'_>,
        email: String,
        avatar_id: Option<i32>,
        avatar_type: Option<String>,
        shared_from_email: Option<String>,
    ) -> async_graphql::Result<Vec<AvatarType>> {
        let state = ctx.data_unchecked::<Arc<AppState>>();
        let acting = auth::require_user(state.store.as_ref(), &email).await.extend()?;

        let filter = AvatarFilter {
            id: avatar_id,
            kind: avatar_type,
        };

        let avatars = match shared_from_email {
            Some(from) => {
                let grantor = auth::require_user(state.store.as_ref(), &from).await.extend()?;
                state
                    .store
                    .list_shared_avatars(grantor.id, acting.id, &filter)
                    .await
                    .extend()?
            }
            None => state.store.list_avatars(acting.id, &filter).await.extend()?,
        };

        Ok(avatars.into_iter().map(AvatarType::from).collect())
    }

    /// Download the avatar image as base64, fetching from the bucket on a
    /// local cache miss
    async fn download_avatar(
        &self,
        ctx: &Context<'_>,
        email: String,
        avatar_uuid: Uuid,
    ) -> async_graphql::Result<String> {
        let state = ctx.data_unchecked::<Arc<AppState>>();
        let acting = auth::require_user(state.store.as_ref(), &email).await.extend()?;

        let avatar = state
            .store
            .find_avatar_by_uuid(avatar_uuid)
            .await
            .extend()?
            .ok_or_else(|| AppError::AvatarNotFound(avatar_uuid.to_string()).extend())?;

        auth::authorize_read(state.store.as_ref(), &acting, &avatar)
            .await
            .extend()?;

        Ok(state.cache.read_base64(avatar_uuid).await.extend()?)
    }
}
