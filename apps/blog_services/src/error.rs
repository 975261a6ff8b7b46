use std::collections::BTreeMap;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use logger_libs::error_logger;
use thiserror::Error;

use crate::utils::view_utils::{login_url, Page, Redirect};

/// Field name → messages, rendered inline next to each form field.
pub type FormErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

impl UniqueField {
    pub fn field(&self) -> &'static str {
        match self {
            UniqueField::Username => "username",
            UniqueField::Email => "email",
        }
    }

    pub fn taken_message(&self) -> &'static str {
        match self {
            UniqueField::Username => "That username is taken. Please choose a different one.",
            UniqueField::Email => "That email is taken. Please choose a different one.",
        }
    }
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("{} already taken", .0.field())]
    Duplicate(UniqueField),
    #[error("owning user does not exist")]
    MissingOwner,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl QueryError {
    /// Maps constraint violations from the `user`/`posts` schema onto domain errors.
    pub fn from_sqlx(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_error) = &error {
            if db_error.is_unique_violation() {
                match db_error.constraint() {
                    Some("user_username_key") => return QueryError::Duplicate(UniqueField::Username),
                    Some("user_email_key") => return QueryError::Duplicate(UniqueField::Email),
                    _ => {}
                }
            }
            if db_error.is_foreign_key_violation() {
                return QueryError::MissingOwner;
            }
        }
        QueryError::Database(error)
    }
}

#[derive(Debug, Error)]
pub enum BlogError {
    #[error("form validation failed: {0:?}")]
    Validation(FormErrors),
    #[error("Login Unsuccessful. Please check email and password")]
    Auth,
    #[error("Please log in to access this page.")]
    LoginRequired { next: String },
    #[error("You are not allowed to modify this post")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("database error: {0}")]
    Database(String),
    #[error("session error: {0}")]
    Session(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl BlogError {
    pub fn field(field: &str, message: &str) -> Self {
        let mut errors = FormErrors::new();
        errors.insert(field.to_string(), vec![message.to_string()]);
        BlogError::Validation(errors)
    }
}

impl From<QueryError> for BlogError {
    fn from(error: QueryError) -> Self {
        match error {
            QueryError::Duplicate(field) => BlogError::field(field.field(), field.taken_message()),
            QueryError::MissingOwner => BlogError::Internal("owning user does not exist".to_string()),
            QueryError::Database(error) => BlogError::Database(error.to_string()),
        }
    }
}

impl ResponseError for BlogError {
    fn status_code(&self) -> StatusCode {
        match self {
            BlogError::Validation(_) => StatusCode::BAD_REQUEST,
            BlogError::Auth => StatusCode::UNAUTHORIZED,
            BlogError::LoginRequired { .. } => StatusCode::FOUND,
            BlogError::Forbidden => StatusCode::FORBIDDEN,
            BlogError::NotFound(_) => StatusCode::NOT_FOUND,
            BlogError::Database(_) | BlogError::Session(_) | BlogError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            BlogError::LoginRequired { next } => Redirect::to(login_url(next))
                .flash("info", self.to_string())
                .finish(),
            BlogError::Validation(errors) => Page::new("error", "Invalid Form")
                .status(status)
                .message("Please correct the highlighted fields")
                .errors(errors.clone())
                .into_response(),
            BlogError::Auth => Page::new("login", "Login")
                .status(status)
                .flash("danger", self.to_string())
                .into_response(),
            BlogError::Forbidden | BlogError::NotFound(_) => Page::new("error", status.canonical_reason().unwrap_or("Error"))
                .status(status)
                .message(self.to_string())
                .into_response(),
            BlogError::Database(_) | BlogError::Session(_) | BlogError::Internal(_) => {
                error_logger("-", "response", "internal_error", &self.to_string());
                Page::new("error", "Internal Server Error")
                    .status(status)
                    .message("Something went wrong. Please try again later")
                    .into_response()
            }
        }
    }
}
