use logger_libs::{info_logger, warning_logger};
use uuid::Uuid;

use crate::{
    error::BlogError,
    modules::user::model::CurrentUser,
    utils::validate_utils::form_validate,
    AppState,
};

use super::model::{AuthorPayload, CreatePost, Post, PostData, PostPage, PostPayload, UpdatePost};

pub struct PostServices;

impl PostServices {
    /// Malformed ids cannot name a post, so they are reported as missing.
    pub fn parse_post_id(raw: &str) -> Result<Uuid, BlogError> {
        raw.parse::<Uuid>().map_err(|_| BlogError::NotFound("post"))
    }

    pub async fn list_posts(
        log_id: &str,
        page: Option<i64>,
        user_id: Option<Uuid>,
        app_state: &AppState,
    ) -> Result<PostPage, BlogError> {
        let per_page = app_state.settings.posts_per_page;
        let page = page.unwrap_or(1).max(1);
        if (page - 1).checked_mul(per_page).is_none() {
            warning_logger(log_id, "list_posts", "page_offset", "page out of range");
            return Err(BlogError::NotFound("page"));
        }

        let total = app_state.posts.count_posts(user_id).await?;
        let items = app_state.posts.get_all_posts(user_id, page, per_page).await?;
        info_logger(log_id, "list_posts", "get_all_posts");

        Ok(PostPage::new(items, page, per_page, total))
    }

    pub async fn list_user_posts(
        log_id: &str,
        username: &str,
        page: Option<i64>,
        app_state: &AppState,
    ) -> Result<(AuthorPayload, PostPage), BlogError> {
        let user = match app_state.users.find_user_by_username(username).await? {
            Some(user) => user,
            None => {
                warning_logger(log_id, "user_posts", "find_user", "user not found");
                return Err(BlogError::NotFound("user"));
            }
        };

        let posts = Self::list_posts(log_id, page, Some(user.id), app_state).await?;
        let author = AuthorPayload {
            username: user.username,
            image_file: user.image_file,
        };
        Ok((author, posts))
    }

    pub async fn get_post(
        log_id: &str,
        post_id: Uuid,
        app_state: &AppState,
    ) -> Result<PostPayload, BlogError> {
        match app_state.posts.get_post_by_id(post_id).await? {
            Some(post) => {
                info_logger(log_id, "get_post", "get_post_in_db");
                Ok(post)
            }
            None => {
                warning_logger(log_id, "get_post", "get_post_in_db", "data not found");
                Err(BlogError::NotFound("post"))
            }
        }
    }

    /// Loads a post for mutation: missing → NotFound, foreign → Forbidden.
    pub async fn owned_post(
        log_id: &str,
        post_id: Uuid,
        actor: &CurrentUser,
        app_state: &AppState,
    ) -> Result<PostPayload, BlogError> {
        let post = Self::get_post(log_id, post_id, app_state).await?;
        if post.user_id != actor.id {
            warning_logger(log_id, "owned_post", "check_owner", "you are not the owner");
            return Err(BlogError::Forbidden);
        }
        Ok(post)
    }

    pub async fn create_post(
        log_id: &str,
        owner: &CurrentUser,
        data: PostData,
        app_state: &AppState,
    ) -> Result<Post, BlogError> {
        form_validate(&data, log_id, "create_post")?;

        let post = app_state
            .posts
            .create_post(CreatePost {
                user_id: owner.id,
                title: data.title,
                content: data.content,
            })
            .await?;
        info_logger(log_id, "create_post", "insert_db");
        Ok(post)
    }

    pub async fn update_post(
        log_id: &str,
        post_id: Uuid,
        actor: &CurrentUser,
        data: PostData,
        app_state: &AppState,
    ) -> Result<Post, BlogError> {
        Self::owned_post(log_id, post_id, actor, app_state).await?;
        form_validate(&data, log_id, "update_post")?;

        match app_state
            .posts
            .update_post(UpdatePost {
                post_id,
                title: data.title,
                content: data.content,
            })
            .await?
        {
            Some(post) => {
                info_logger(log_id, "update_post", "update_db");
                Ok(post)
            }
            None => Err(BlogError::NotFound("post")),
        }
    }

    pub async fn delete_post(
        log_id: &str,
        post_id: Uuid,
        actor: &CurrentUser,
        app_state: &AppState,
    ) -> Result<(), BlogError> {
        Self::owned_post(log_id, post_id, actor, app_state).await?;

        if app_state.posts.delete_post(post_id).await? {
            info_logger(log_id, "delete_post", "delete_db_data");
            Ok(())
        } else {
            Err(BlogError::NotFound("post"))
        }
    }
}
