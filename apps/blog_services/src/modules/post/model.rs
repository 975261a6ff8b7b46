use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub date_posted: DateTime<Utc>,
    pub content: String,
    pub user_id: Uuid,
}

/// A post joined with the author columns shown next to it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostPayload {
    pub id: Uuid,
    pub title: String,
    pub date_posted: DateTime<Utc>,
    pub content: String,
    pub user_id: Uuid,
    pub author: String,
    pub author_image: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, Default)]
#[serde(default)]
pub struct PostData {
    #[validate(length(min = 1, max = 100, message = "Field must be between 1 and 100 characters long."))]
    pub title: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub content: String,
}

impl From<&PostPayload> for PostData {
    fn from(post: &PostPayload) -> Self {
        Self {
            title: post.title.clone(),
            content: post.content.clone(),
        }
    }
}

pub struct CreatePost {
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
}

pub struct UpdatePost {
    pub post_id: Uuid,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct PostPage {
    pub items: Vec<PostPayload>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub pages: i64,
    pub has_prev: bool,
    pub has_next: bool,
}

impl PostPage {
    pub fn new(items: Vec<PostPayload>, page: i64, per_page: i64, total: i64) -> Self {
        let pages = if total == 0 { 0 } else { (total + per_page - 1) / per_page };
        Self {
            items,
            page,
            per_page,
            total,
            pages,
            has_prev: page > 1,
            has_next: page < pages,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthorPayload {
    pub username: String,
    pub image_file: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn page_count_rounds_up() {
        let page = PostPage::new(Vec::new(), 2, 5, 11);
        assert_eq!(page.pages, 3);
        assert!(page.has_prev);
        assert!(page.has_next);

        let empty = PostPage::new(Vec::new(), 1, 5, 0);
        assert_eq!(empty.pages, 0);
        assert!(!empty.has_next);
    }

    #[test]
    fn title_and_content_are_required() {
        let data = PostData::default();
        let errors = data.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("content"));
    }

    #[test]
    fn long_title_is_rejected() {
        let data = PostData {
            title: "x".repeat(101),
            content: "World".to_string(),
        };
        assert!(data.validate().is_err());
    }
}
