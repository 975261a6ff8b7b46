use async_trait::async_trait;
use pgsql_libs::DbPool;
use sqlx::{query, query_as};
use uuid::Uuid;

use crate::error::QueryError;

use super::model::{NewUser, UpdateUser, User};

#[async_trait]
pub trait UserQuery: Send + Sync {
    async fn create_user(&self, data: NewUser) -> Result<User, QueryError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, QueryError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, QueryError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, QueryError>;
    /// Returns `None` when the user no longer exists.
    async fn update_user(&self, data: UpdateUser) -> Result<Option<User>, QueryError>;
    async fn ping(&self) -> Result<(), QueryError>;
}

pub struct PgUserQuery {
    db_pool: DbPool,
}

impl PgUserQuery {
    pub fn new(db_pool: DbPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl UserQuery for PgUserQuery {
    async fn create_user(&self, data: NewUser) -> Result<User, QueryError> {
        query_as::<_, User>(
            r#"
            INSERT INTO "user"
            (username, email, password)
            VALUES
            ($1, $2, $3)
            RETURNING
            id, username, email, image_file, password
            "#,
        )
        .bind(data.username)
        .bind(data.email)
        .bind(data.password)
        .fetch_one(&self.db_pool)
        .await
        .map_err(QueryError::from_sqlx)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, QueryError> {
        query_as::<_, User>(
            r#"
            SELECT id, username, email, image_file, password FROM "user" WHERE id = $1;
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await
        .map_err(QueryError::from_sqlx)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, QueryError> {
        query_as::<_, User>(
            r#"
            SELECT id, username, email, image_file, password FROM "user" WHERE email = $1;
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db_pool)
        .await
        .map_err(QueryError::from_sqlx)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, QueryError> {
        query_as::<_, User>(
            r#"
            SELECT id, username, email, image_file, password FROM "user" WHERE username = $1;
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db_pool)
        .await
        .map_err(QueryError::from_sqlx)
    }

    async fn update_user(&self, data: UpdateUser) -> Result<Option<User>, QueryError> {
        query_as::<_, User>(
            r#"
            UPDATE "user"
            SET username = $1, email = $2, image_file = $3
            WHERE id = $4
            RETURNING id, username, email, image_file, password
            "#,
        )
        .bind(data.username)
        .bind(data.email)
        .bind(data.image_file)
        .bind(data.id)
        .fetch_optional(&self.db_pool)
        .await
        .map_err(QueryError::from_sqlx)
    }

    async fn ping(&self) -> Result<(), QueryError> {
        query("SELECT 1;")
            .execute(&self.db_pool)
            .await
            .map(|_| ())
            .map_err(QueryError::from_sqlx)
    }
}
