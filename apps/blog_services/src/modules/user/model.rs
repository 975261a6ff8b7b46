use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_IMAGE_FILE: &str = "default.jpg";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub image_file: String,
    #[serde(skip_serializing)]
    pub password: String,
}

/// The user resolved from the session cookie for the current request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub image_file: String,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            image_file: user.image_file,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, Default)]
#[serde(default)]
pub struct RegisterData {
    #[validate(length(min = 2, max = 20, message = "Field must be between 2 and 20 characters long."))]
    pub username: String,
    #[validate(
        length(max = 120, message = "Field cannot be longer than 120 characters."),
        email(message = "Invalid email address.")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Field must be equal to password."))]
    pub confirm_password: String,
}

pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, Default)]
#[serde(default)]
pub struct LoginData {
    #[validate(email(message = "Invalid email address."))]
    pub email: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,
    pub remember: Option<String>,
}

impl LoginData {
    /// HTML checkboxes post "y"/"on" when ticked and nothing otherwise.
    pub fn remember_me(&self) -> bool {
        matches!(self.remember.as_deref(), Some("y" | "on" | "true" | "1"))
    }
}

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, Default)]
pub struct UpdateAccountData {
    #[validate(length(min = 2, max = 20, message = "Field must be between 2 and 20 characters long."))]
    pub username: String,
    #[validate(
        length(max = 120, message = "Field cannot be longer than 120 characters."),
        email(message = "Invalid email address.")
    )]
    pub email: String,
}

#[derive(MultipartForm)]
pub struct AccountForm {
    pub username: Option<Text<String>>,
    pub email: Option<Text<String>>,
    #[multipart(limit = "5MB")]
    pub picture: Option<TempFile>,
}

/// An uploaded avatar read off the multipart temp file.
pub struct AvatarUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct UpdateUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub image_file: String,
}

#[derive(Debug, Serialize)]
pub struct AccountPayload {
    pub username: String,
    pub email: String,
    pub image_file: String,
}

impl AccountPayload {
    pub fn new(user: &CurrentUser) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            image_file: format!("/static/photos/{}", user.image_file),
        }
    }
}
