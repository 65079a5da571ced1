//! Postgres store implementation backed by a sqlx pool

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::debug;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::store::models::{Avatar, AvatarFilter, NewAvatar, Share, User, UserWithAvatars};
use crate::store::AvatarStore;

/// Store implementation on top of a Postgres connection pool
///
/// Each operation checks a connection out of the pool for its own scope only.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the schema at startup if it does not exist yet
    pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS "user" (
                id SERIAL PRIMARY KEY,
                mail VARCHAR(50) UNIQUE NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS avatar (
                id SERIAL PRIMARY KEY,
                uuid UUID UNIQUE NOT NULL,
                name TEXT,
                type TEXT,
                user_id INTEGER NOT NULL REFERENCES "user"(id)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS share (
                id SERIAL PRIMARY KEY,
                avatar_id INTEGER NOT NULL REFERENCES avatar(id) ON DELETE CASCADE,
                grantor_id INTEGER NOT NULL REFERENCES "user"(id),
                grantee_id INTEGER NOT NULL REFERENCES "user"(id),
                UNIQUE (avatar_id, grantee_id)
            )
            "#,
        )
        .execute(pool)
        .await?;

        debug!("Database schema ensured");
        Ok(())
    }
}

#[async_trait]
impl AvatarStore for PgStore {
    async fn find_user_by_mail(&self, mail: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(r#"SELECT id, mail FROM "user" WHERE mail = $1"#)
            .bind(mail)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create_user_if_absent(&self, mail: &str) -> Result<User> {
        // The insert is a no-op when the mail already exists; the unique
        // constraint settles concurrent duplicate inserts
        let inserted = sqlx::query_as::<_, User>(
            r#"INSERT INTO "user" (mail) VALUES ($1) ON CONFLICT (mail) DO NOTHING RETURNING id, mail"#,
        )
        .bind(mail)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(user) = inserted {
            return Ok(user);
        }

        self.find_user_by_mail(mail)
            .await?
            .ok_or_else(|| AppError::Internal(format!("User vanished after insert: {}", mail)))
    }

    async fn list_users_with_avatars(&self, mail: Option<&str>) -> Result<Vec<UserWithAvatars>> {
        let mut builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT u.id AS user_id, u.mail,
                   a.id AS avatar_id, a.uuid, a.name, a.type, a.user_id AS owner_id
            FROM "user" u
            LEFT JOIN avatar a ON a.user_id = u.id
            "#,
        );
        if let Some(mail) = mail {
            builder.push(" WHERE u.mail = ").push_bind(mail);
        }
        builder.push(" ORDER BY u.id, a.id");

        let rows = builder.build().fetch_all(&self.pool).await?;

        let mut users: Vec<UserWithAvatars> = Vec::new();
        for row in rows {
            let user = User {
                id: row.try_get("user_id")?,
                mail: row.try_get("mail")?,
            };

            if users.last().map(|u| u.user.id) != Some(user.id) {
                users.push(UserWithAvatars {
                    user,
                    avatars: Vec::new(),
                });
            }

            let avatar_id: Option<i32> = row.try_get("avatar_id")?;
            if let (Some(id), Some(current)) = (avatar_id, users.last_mut()) {
                current.avatars.push(Avatar {
                    id,
                    uuid: row.try_get("uuid")?,
                    name: row.try_get("name")?,
                    kind: row.try_get("type")?,
                    user_id: row.try_get("owner_id")?,
                });
            }
        }

        Ok(users)
    }

    async fn list_avatars(&self, user_id: i32, filter: &AvatarFilter) -> Result<Vec<Avatar>> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT id, uuid, name, type, user_id FROM avatar WHERE user_id = ",
        );
        builder.push_bind(user_id);
        if let Some(id) = filter.id {
            builder.push(" AND id = ").push_bind(id);
        }
        if let Some(kind) = &filter.kind {
            builder.push(" AND type = ").push_bind(kind.as_str());
        }
        builder.push(" ORDER BY id");

        let avatars = builder
            .build_query_as::<Avatar>()
            .fetch_all(&self.pool)
            .await?;
        Ok(avatars)
    }

    async fn find_avatar(&self, avatar_id: i32) -> Result<Option<Avatar>> {
        let avatar = sqlx::query_as::<_, Avatar>(
            "SELECT id, uuid, name, type, user_id FROM avatar WHERE id = $1",
        )
        .bind(avatar_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(avatar)
    }

    async fn find_avatar_by_uuid(&self, uuid: Uuid) -> Result<Option<Avatar>> {
        let avatar = sqlx::query_as::<_, Avatar>(
            "SELECT id, uuid, name, type, user_id FROM avatar WHERE uuid = $1",
        )
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await?;
        Ok(avatar)
    }

    async fn insert_avatar(&self, new: NewAvatar) -> Result<Avatar> {
        let avatar = sqlx::query_as::<_, Avatar>(
            r#"
            INSERT INTO avatar (uuid, name, type, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, uuid, name, type, user_id
            "#,
        )
        .bind(new.uuid)
        .bind(&new.name)
        .bind(&new.kind)
        .bind(new.user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(avatar)
    }

    async fn delete_avatar(&self, avatar_id: i32) -> Result<()> {
        sqlx::query("DELETE FROM avatar WHERE id = $1")
            .bind(avatar_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_share(
        &self,
        avatar_id: i32,
        grantor_id: i32,
        grantee_id: i32,
    ) -> Result<Share> {
        let share = sqlx::query_as::<_, Share>(
            r#"
            INSERT INTO share (avatar_id, grantor_id, grantee_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (avatar_id, grantee_id) DO UPDATE SET grantor_id = EXCLUDED.grantor_id
            RETURNING id, avatar_id, grantor_id, grantee_id
            "#,
        )
        .bind(avatar_id)
        .bind(grantor_id)
        .bind(grantee_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(share)
    }

    async fn delete_share(&self, avatar_id: i32, grantee_id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM share WHERE avatar_id = $1 AND grantee_id = $2")
            .bind(avatar_id)
            .bind(grantee_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_share(&self, avatar_id: i32, grantee_id: i32) -> Result<Option<Share>> {
        let share = sqlx::query_as::<_, Share>(
            r#"
            SELECT id, avatar_id, grantor_id, grantee_id
            FROM share WHERE avatar_id = $1 AND grantee_id = $2
            "#,
        )
        .bind(avatar_id)
        .bind(grantee_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(share)
    }

    async fn list_shared_avatars(
        &self,
        grantor_id: i32,
        grantee_id: i32,
        filter: &AvatarFilter,
    ) -> Result<Vec<Avatar>> {
        let mut builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT a.id, a.uuid, a.name, a.type, a.user_id
            FROM avatar a
            JOIN share s ON s.avatar_id = a.id
            WHERE a.user_id = "#,
        );
        builder.push_bind(grantor_id);
        builder.push(" AND s.grantee_id = ").push_bind(grantee_id);
        if let Some(id) = filter.id {
            builder.push(" AND a.id = ").push_bind(id);
        }
        if let Some(kind) = &filter.kind {
            builder.push(" AND a.type = ").push_bind(kind.as_str());
        }
        builder.push(" ORDER BY a.id");

        let avatars = builder
            .build_query_as::<Avatar>()
            .fetch_all(&self.pool)
            .await?;
        Ok(avatars)
    }
}
