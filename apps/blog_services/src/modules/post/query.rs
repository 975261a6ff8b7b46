use async_trait::async_trait;
use pgsql_libs::DbPool;
use sqlx::{query, query_as, query_scalar};
use uuid::Uuid;

use crate::error::QueryError;

use super::model::{CreatePost, Post, PostPayload, UpdatePost};

#[async_trait]
pub trait PostQuery: Send + Sync {
    async fn create_post(&self, data: CreatePost) -> Result<Post, QueryError>;
    async fn get_post_by_id(&self, post_id: Uuid) -> Result<Option<PostPayload>, QueryError>;
    /// Newest first. `user_id` narrows the listing to one author.
    async fn get_all_posts(
        &self,
        user_id: Option<Uuid>,
        page: i64,
        limit: i64,
    ) -> Result<Vec<PostPayload>, QueryError>;
    async fn count_posts(&self, user_id: Option<Uuid>) -> Result<i64, QueryError>;
    async fn update_post(&self, data: UpdatePost) -> Result<Option<Post>, QueryError>;
    /// Returns whether a row was removed.
    async fn delete_post(&self, post_id: Uuid) -> Result<bool, QueryError>;
}

pub struct PgPostQuery {
    db_pool: DbPool,
}

impl PgPostQuery {
    pub fn new(db_pool: DbPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PostQuery for PgPostQuery {
    async fn create_post(&self, data: CreatePost) -> Result<Post, QueryError> {
        query_as::<_, Post>(
            r#"
            INSERT INTO "posts" (title, content, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, date_posted, content, user_id
            "#,
        )
        .bind(data.title)
        .bind(data.content)
        .bind(data.user_id)
        .fetch_one(&self.db_pool)
        .await
        .map_err(QueryError::from_sqlx)
    }

    async fn get_post_by_id(&self, post_id: Uuid) -> Result<Option<PostPayload>, QueryError> {
        query_as::<_, PostPayload>(
            r#"
            SELECT p.id, p.title, p.date_posted, p.content, p.user_id,
                   u.username AS author, u.image_file AS author_image
            FROM "posts" p
            JOIN "user" u ON u.id = p.user_id
            WHERE p.id = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.db_pool)
        .await
        .map_err(QueryError::from_sqlx)
    }

    async fn get_all_posts(
        &self,
        user_id: Option<Uuid>,
        page: i64,
        limit: i64,
    ) -> Result<Vec<PostPayload>, QueryError> {
        let offset = (page - 1).saturating_mul(limit);

        query_as::<_, PostPayload>(
            r#"
            SELECT p.id, p.title, p.date_posted, p.content, p.user_id,
                   u.username AS author, u.image_file AS author_image
            FROM "posts" p
            JOIN "user" u ON u.id = p.user_id
            WHERE ($1::uuid IS NULL OR p.user_id = $1)
            ORDER BY p.date_posted DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db_pool)
        .await
        .map_err(QueryError::from_sqlx)
    }

    async fn count_posts(&self, user_id: Option<Uuid>) -> Result<i64, QueryError> {
        query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM "posts" WHERE ($1::uuid IS NULL OR user_id = $1)
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.db_pool)
        .await
        .map_err(QueryError::from_sqlx)
    }

    async fn update_post(&self, data: UpdatePost) -> Result<Option<Post>, QueryError> {
        query_as::<_, Post>(
            r#"
            UPDATE "posts"
            SET title = $1, content = $2
            WHERE id = $3
            RETURNING id, title, date_posted, content, user_id
            "#,
        )
        .bind(data.title)
        .bind(data.content)
        .bind(data.post_id)
        .fetch_optional(&self.db_pool)
        .await
        .map_err(QueryError::from_sqlx)
    }

    async fn delete_post(&self, post_id: Uuid) -> Result<bool, QueryError> {
        query(
            r#"
            DELETE FROM "posts" WHERE id = $1;
            "#,
        )
        .bind(post_id)
        .execute(&self.db_pool)
        .await
        .map(|result| result.rows_affected() > 0)
        .map_err(QueryError::from_sqlx)
    }
}
