use actix_web::{
    cookie::{time::Duration, Cookie, SameSite},
    web,
};
use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use jwt_libs::{decode_session_token, generate_session_token, types::SessionToken};
use logger_libs::{error_logger, info_logger, warning_logger};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{BlogError, FormErrors, UniqueField},
    utils::{
        avatar_utils::{picture_extension, remove_picture, save_picture},
        validate_utils::{collect_errors, form_validate, merge_errors},
    },
    AppState,
};

use super::model::{
    AvatarUpload, CurrentUser, LoginData, NewUser, RegisterData, UpdateAccountData, UpdateUser, User,
};

pub const SESSION_COOKIE: &str = "session";

pub struct UserServices {}

impl UserServices {
    pub async fn register(
        log_id: &str,
        data: RegisterData,
        app_state: &AppState,
    ) -> Result<User, BlogError> {
        let mut errors = match data.validate() {
            Ok(()) => FormErrors::new(),
            Err(validation) => collect_errors(&validation),
        };
        merge_errors(
            &mut errors,
            Self::taken_fields(None, &data.username, &data.email, app_state).await?,
        );

        if !errors.is_empty() {
            warning_logger(log_id, "register", "validate", &format!("{:?}", errors));
            return Err(BlogError::Validation(errors));
        }
        info_logger(log_id, "register", "validate");

        let password_hash = Self::hash_password(log_id, &data.password)?;

        match app_state
            .users
            .create_user(NewUser {
                username: data.username,
                email: data.email,
                password: password_hash,
            })
            .await
        {
            Ok(user) => {
                info_logger(log_id, "register", "create_user");
                Ok(user)
            }
            Err(error) => {
                warning_logger(log_id, "register", "create_user", &error.to_string());
                Err(error.into())
            }
        }
    }

    pub fn hash_password(log_id: &str, password: &str) -> Result<String, BlogError> {
        let argon2 = Argon2::default();
        let salt: SaltString = SaltString::generate(&mut OsRng);

        match argon2.hash_password(password.as_bytes(), &salt) {
            Ok(hash) => {
                info_logger(log_id, "register", "hash_password");
                Ok(hash.to_string())
            }
            Err(error) => {
                error_logger(log_id, "register", "hash_password", &error.to_string());
                Err(BlogError::Internal(format!("Password hash error: {}", error)))
            }
        }
    }

    /// Uniqueness checks; `current` skips the values a user already owns.
    async fn taken_fields(
        current: Option<&CurrentUser>,
        username: &str,
        email: &str,
        app_state: &AppState,
    ) -> Result<FormErrors, BlogError> {
        let mut errors = FormErrors::new();

        let username_changed = current.map_or(true, |user| user.username != username);
        if username_changed && app_state.users.find_user_by_username(username).await?.is_some() {
            errors
                .entry(UniqueField::Username.field().to_string())
                .or_default()
                .push(UniqueField::Username.taken_message().to_string());
        }

        let email_changed = current.map_or(true, |user| user.email != email);
        if email_changed && app_state.users.find_user_by_email(email).await?.is_some() {
            errors
                .entry(UniqueField::Email.field().to_string())
                .or_default()
                .push(UniqueField::Email.taken_message().to_string());
        }

        Ok(errors)
    }

    /// Verifies credentials. Every mismatch yields the same `BlogError::Auth`.
    pub async fn login(
        log_id: &str,
        data: &LoginData,
        app_state: &AppState,
    ) -> Result<User, BlogError> {
        form_validate(data, log_id, "login")?;

        let user = match app_state.users.find_user_by_email(&data.email).await? {
            Some(user) => user,
            None => {
                warning_logger(log_id, "login", "find_user", "unknown email");
                return Err(BlogError::Auth);
            }
        };

        let parsed_hash = match PasswordHash::new(&user.password) {
            Ok(parsed_hash) => parsed_hash,
            Err(error) => {
                error_logger(log_id, "login", "parse_hash", &error.to_string());
                return Err(BlogError::Auth);
            }
        };

        if let Err(error) = Argon2::default().verify_password(data.password.as_bytes(), &parsed_hash) {
            warning_logger(log_id, "login", "verify_password", &error.to_string());
            return Err(BlogError::Auth);
        }

        info_logger(log_id, "login", "verify_password");
        Ok(user)
    }

    /// Records a new server-side session and returns the cookie carrying its token.
    pub fn start_session(
        log_id: &str,
        user: &User,
        remember: bool,
        app_state: &AppState,
    ) -> Result<Cookie<'static>, BlogError> {
        let settings = &app_state.settings;
        let ttl = if remember { settings.remember_ttl } else { settings.session_ttl };
        let session = SessionToken {
            sid: Uuid::new_v4(),
            id: user.id,
        };

        if let Err(error) = app_state.sessions.save(session.sid, user.id, ttl) {
            error_logger(log_id, "login", "save_session", &error);
            return Err(BlogError::Session(error));
        }

        let token = generate_session_token(session, &settings.session_secret, ttl as i64)
            .map_err(BlogError::Session)?;
        info_logger(log_id, "login", "start_session");

        let mut cookie = Cookie::build(SESSION_COOKIE, token)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(settings.secure_cookie)
            .finish();
        if remember {
            cookie.set_max_age(Duration::seconds(ttl as i64));
        }
        Ok(cookie)
    }

    pub fn end_session(token: &str, app_state: &AppState) -> Result<(), BlogError> {
        match decode_session_token(token, &app_state.settings.session_secret) {
            Ok(session) => app_state.sessions.delete(session.sid).map_err(BlogError::Session),
            // nothing to revoke for a forged or expired token
            Err(_) => Ok(()),
        }
    }

    pub fn session_removal() -> Cookie<'static> {
        let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
        cookie.make_removal();
        cookie
    }

    /// Resolves a session cookie to its user. Invalid, revoked or expired
    /// sessions resolve to `None`.
    pub async fn resolve_session(
        token: &str,
        app_state: &AppState,
    ) -> Result<Option<CurrentUser>, BlogError> {
        let session = match decode_session_token(token, &app_state.settings.session_secret) {
            Ok(session) => session,
            Err(_) => return Ok(None),
        };

        match app_state.sessions.find(session.sid).map_err(BlogError::Session)? {
            Some(user_id) if user_id == session.id => {}
            _ => return Ok(None),
        }

        Ok(app_state
            .users
            .find_user_by_id(session.id)
            .await?
            .map(CurrentUser::from))
    }

    pub async fn update_account(
        log_id: &str,
        current: &CurrentUser,
        data: UpdateAccountData,
        picture: Option<AvatarUpload>,
        app_state: &AppState,
    ) -> Result<User, BlogError> {
        let mut errors = match data.validate() {
            Ok(()) => FormErrors::new(),
            Err(validation) => collect_errors(&validation),
        };
        merge_errors(
            &mut errors,
            Self::taken_fields(Some(current), &data.username, &data.email, app_state).await?,
        );
        if let Some(upload) = &picture {
            if let Err(error) = picture_extension(&upload.file_name) {
                errors.entry(String::from("picture")).or_default().push(error.to_string());
            }
        }

        if !errors.is_empty() {
            warning_logger(log_id, "account", "validate", &format!("{:?}", errors));
            return Err(BlogError::Validation(errors));
        }

        let new_picture = match picture {
            Some(upload) => Some(Self::store_picture(log_id, upload, app_state).await?),
            None => None,
        };

        let updated = app_state
            .users
            .update_user(UpdateUser {
                id: current.id,
                username: data.username,
                email: data.email,
                image_file: new_picture.clone().unwrap_or_else(|| current.image_file.clone()),
            })
            .await;

        match updated {
            Ok(Some(user)) => {
                info_logger(log_id, "account", "update_user");
                Ok(user)
            }
            Ok(None) => {
                Self::discard_picture(log_id, new_picture.as_deref(), app_state);
                Err(BlogError::NotFound("user"))
            }
            Err(error) => {
                warning_logger(log_id, "account", "update_user", &error.to_string());
                Self::discard_picture(log_id, new_picture.as_deref(), app_state);
                Err(error.into())
            }
        }
    }

    async fn store_picture(
        log_id: &str,
        upload: AvatarUpload,
        app_state: &AppState,
    ) -> Result<String, BlogError> {
        let photos_dir = app_state.settings.photos_dir.clone();
        let saved = web::block(move || save_picture(&upload.file_name, &upload.bytes, &photos_dir))
            .await
            .map_err(|error| BlogError::Internal(error.to_string()))?;

        match saved {
            Ok(picture_fn) => {
                info_logger(log_id, "account", "save_picture");
                Ok(picture_fn)
            }
            Err(error) if error.is_user_error() => {
                warning_logger(log_id, "account", "save_picture", &error.to_string());
                Err(BlogError::field("picture", &error.to_string()))
            }
            Err(error) => {
                error_logger(log_id, "account", "save_picture", &error.to_string());
                Err(BlogError::Internal(error.to_string()))
            }
        }
    }

    fn discard_picture(log_id: &str, picture_fn: Option<&str>, app_state: &AppState) {
        if let Some(picture_fn) = picture_fn {
            if let Err(error) = remove_picture(&app_state.settings.photos_dir, picture_fn) {
                warning_logger(log_id, "account", "remove_picture", &error.to_string());
            }
        }
    }
}
