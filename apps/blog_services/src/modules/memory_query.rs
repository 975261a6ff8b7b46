use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::{QueryError, UniqueField};

use super::{
    post::{
        model::{CreatePost, Post, PostPayload, UpdatePost},
        query::PostQuery,
    },
    user::{
        model::{NewUser, UpdateUser, User, DEFAULT_IMAGE_FILE},
        query::UserQuery,
    },
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    posts: Vec<Post>,
}

/// Process-local store backing both repositories; used for `storage = "memory"` and tests.
#[derive(Default)]
pub struct MemoryQuery {
    tables: Mutex<Tables>,
}

impl MemoryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn unique_conflict(users: &[User], id: Option<Uuid>, username: &str, email: &str) -> Option<UniqueField> {
    let others: Vec<&User> = users.iter().filter(|user| Some(user.id) != id).collect();
    if others.iter().any(|user| user.username == username) {
        return Some(UniqueField::Username);
    }
    if others.iter().any(|user| user.email == email) {
        return Some(UniqueField::Email);
    }
    None
}

fn with_author(post: &Post, users: &[User]) -> Option<PostPayload> {
    let author = users.iter().find(|user| user.id == post.user_id)?;
    Some(PostPayload {
        id: post.id,
        title: post.title.clone(),
        date_posted: post.date_posted,
        content: post.content.clone(),
        user_id: post.user_id,
        author: author.username.clone(),
        author_image: author.image_file.clone(),
    })
}

#[async_trait]
impl UserQuery for MemoryQuery {
    async fn create_user(&self, data: NewUser) -> Result<User, QueryError> {
        let mut tables = self.tables();
        if let Some(field) = unique_conflict(&tables.users, None, &data.username, &data.email) {
            return Err(QueryError::Duplicate(field));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: data.username,
            email: data.email,
            image_file: DEFAULT_IMAGE_FILE.to_string(),
            password: data.password,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, QueryError> {
        Ok(self.tables().users.iter().find(|user| user.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, QueryError> {
        Ok(self.tables().users.iter().find(|user| user.email == email).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, QueryError> {
        Ok(self.tables().users.iter().find(|user| user.username == username).cloned())
    }

    async fn update_user(&self, data: UpdateUser) -> Result<Option<User>, QueryError> {
        let mut tables = self.tables();
        if let Some(field) = unique_conflict(&tables.users, Some(data.id), &data.username, &data.email) {
            return Err(QueryError::Duplicate(field));
        }

        let Some(user) = tables.users.iter_mut().find(|user| user.id == data.id) else {
            return Ok(None);
        };
        user.username = data.username;
        user.email = data.email;
        user.image_file = data.image_file;
        Ok(Some(user.clone()))
    }

    async fn ping(&self) -> Result<(), QueryError> {
        Ok(())
    }
}

#[async_trait]
impl PostQuery for MemoryQuery {
    async fn create_post(&self, data: CreatePost) -> Result<Post, QueryError> {
        let mut tables = self.tables();
        if !tables.users.iter().any(|user| user.id == data.user_id) {
            return Err(QueryError::MissingOwner);
        }

        let post = Post {
            id: Uuid::new_v4(),
            title: data.title,
            date_posted: Utc::now(),
            content: data.content,
            user_id: data.user_id,
        };
        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn get_post_by_id(&self, post_id: Uuid) -> Result<Option<PostPayload>, QueryError> {
        let tables = self.tables();
        Ok(tables
            .posts
            .iter()
            .find(|post| post.id == post_id)
            .and_then(|post| with_author(post, &tables.users)))
    }

    async fn get_all_posts(
        &self,
        user_id: Option<Uuid>,
        page: i64,
        limit: i64,
    ) -> Result<Vec<PostPayload>, QueryError> {
        let tables = self.tables();
        let mut posts: Vec<&Post> = tables
            .posts
            .iter()
            .rev()
            .filter(|post| user_id.map_or(true, |id| post.user_id == id))
            .collect();
        posts.sort_by(|left, right| right.date_posted.cmp(&left.date_posted));

        let offset = (page - 1).saturating_mul(limit).max(0) as usize;
        Ok(posts
            .into_iter()
            .skip(offset)
            .take(limit.max(0) as usize)
            .filter_map(|post| with_author(post, &tables.users))
            .collect())
    }

    async fn count_posts(&self, user_id: Option<Uuid>) -> Result<i64, QueryError> {
        let tables = self.tables();
        Ok(tables
            .posts
            .iter()
            .filter(|post| user_id.map_or(true, |id| post.user_id == id))
            .count() as i64)
    }

    async fn update_post(&self, data: UpdatePost) -> Result<Option<Post>, QueryError> {
        let mut tables = self.tables();
        let Some(post) = tables.posts.iter_mut().find(|post| post.id == data.post_id) else {
            return Ok(None);
        };
        post.title = data.title;
        post.content = data.content;
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, post_id: Uuid) -> Result<bool, QueryError> {
        let mut tables = self.tables();
        let before = tables.posts.len();
        tables.posts.retain(|post| post.id != post_id);
        Ok(tables.posts.len() < before)
    }
}
