use std::{fs, time::Instant};

use actix_multipart::form::MultipartForm;
use actix_web::{
    get,
    http::StatusCode,
    post,
    web::{Data, Form, Query, ServiceConfig},
    HttpRequest, HttpResponse,
};
use log::info;
use logger_libs::{debug_logger, username_mask, warning_logger};
use uuid::Uuid;

use crate::{
    error::BlogError,
    utils::view_utils::{safe_next, Page, Redirect},
    AppState,
};

use super::{
    model::{
        AccountForm, AccountPayload, AvatarUpload, CurrentUser, LoginData, NextQuery, RegisterData,
        UpdateAccountData,
    },
    service::{UserServices, SESSION_COOKIE},
};

#[get("/register")]
async fn register_page(req: HttpRequest, user: Option<CurrentUser>) -> HttpResponse {
    if user.is_some() {
        return Redirect::to("/home").finish();
    }
    Page::new("register", "Register")
        .form(RegisterData::default())
        .render(&req)
}

#[post("/register")]
async fn register_handler(
    req: HttpRequest,
    user: Option<CurrentUser>,
    register_body: Form<RegisterData>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, BlogError> {
    if user.is_some() {
        return Ok(Redirect::to("/home").finish());
    }

    let start = Instant::now();
    let register_data = register_body.into_inner();
    let log_id = format!("{}-{}", Uuid::new_v4(), username_mask(&register_data.username));
    let req_log = register_data.clone();

    match UserServices::register(&log_id, register_data, &app_state).await {
        Ok(user) => {
            debug_logger(&log_id, "register", "service", &req_log, &user);
            info!("User registered successfully with ID: {}, response time: {:?}", user.id, start.elapsed());
            Ok(Redirect::to("/login")
                .flash("success", "Your account has been created! You are now able to login")
                .finish())
        }
        Err(BlogError::Validation(errors)) => Ok(Page::new("register", "Register")
            .status(StatusCode::BAD_REQUEST)
            .form(&req_log)
            .errors(errors)
            .render(&req)),
        Err(error) => Err(error),
    }
}

#[get("/login")]
async fn login_page(req: HttpRequest, user: Option<CurrentUser>) -> HttpResponse {
    if user.is_some() {
        return Redirect::to("/home").finish();
    }
    Page::new("login", "Login").form(LoginData::default()).render(&req)
}

#[post("/login")]
async fn login_handler(
    req: HttpRequest,
    user: Option<CurrentUser>,
    next: Query<NextQuery>,
    login_body: Form<LoginData>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, BlogError> {
    if user.is_some() {
        return Ok(Redirect::to("/home").finish());
    }

    let start = Instant::now();
    let login_data = login_body.into_inner();
    let log_id = format!("login.{}", Uuid::new_v4());

    match UserServices::login(&log_id, &login_data, &app_state).await {
        Ok(user) => {
            let cookie = UserServices::start_session(&log_id, &user, login_data.remember_me(), &app_state)?;
            info!("login success, response time: {:?}", start.elapsed());
            Ok(Redirect::to(safe_next(next.next.as_deref()))
                .cookie(cookie)
                .finish())
        }
        Err(BlogError::Auth) => Ok(Page::new("login", "Login")
            .status(StatusCode::UNAUTHORIZED)
            .flash("danger", BlogError::Auth.to_string())
            .form(&login_data)
            .render(&req)),
        Err(BlogError::Validation(errors)) => Ok(Page::new("login", "Login")
            .status(StatusCode::BAD_REQUEST)
            .form(&login_data)
            .errors(errors)
            .render(&req)),
        Err(error) => Err(error),
    }
}

#[get("/logout")]
async fn logout_handler(req: HttpRequest, app_state: Data<AppState>) -> HttpResponse {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        if let Err(error) = UserServices::end_session(cookie.value(), &app_state) {
            warning_logger("-", "logout", "end_session", &error.to_string());
        }
    }

    Redirect::to("/home")
        .cookie(UserServices::session_removal())
        .finish()
}

#[get("/account")]
async fn account_page(req: HttpRequest, user: CurrentUser) -> HttpResponse {
    Page::new("account", "Account")
        .form(UpdateAccountData {
            username: user.username.clone(),
            email: user.email.clone(),
        })
        .data(AccountPayload::new(&user))
        .render(&req)
}

#[post("/account")]
async fn account_handler(
    req: HttpRequest,
    user: CurrentUser,
    MultipartForm(account_form): MultipartForm<AccountForm>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, BlogError> {
    let log_id = format!("account.{}", user.id);
    let (account_data, picture) = account_parts(account_form)?;
    let form_echo = account_data.clone();

    match UserServices::update_account(&log_id, &user, account_data, picture, &app_state).await {
        Ok(_) => Ok(Redirect::to("/account")
            .flash("success", "Your account has been updated!")
            .finish()),
        Err(BlogError::Validation(errors)) => Ok(Page::new("account", "Account")
            .status(StatusCode::BAD_REQUEST)
            .form(form_echo)
            .errors(errors)
            .data(AccountPayload::new(&user))
            .render(&req)),
        Err(error) => Err(error),
    }
}

/// Splits the multipart form; an empty file input counts as no upload.
fn account_parts(form: AccountForm) -> Result<(UpdateAccountData, Option<AvatarUpload>), BlogError> {
    let account_data = UpdateAccountData {
        username: form.username.map(|text| text.0).unwrap_or_default(),
        email: form.email.map(|text| text.0).unwrap_or_default(),
    };

    let picture = match form.picture {
        Some(file) if file.size > 0 => {
            let bytes = fs::read(file.file.path())
                .map_err(|error| BlogError::Internal(format!("could not read upload: {}", error)))?;
            Some(AvatarUpload {
                file_name: file.file_name.unwrap_or_default(),
                bytes,
            })
        }
        _ => None,
    };

    Ok((account_data, picture))
}

pub fn user_config(config: &mut ServiceConfig) {
    config
        .service(register_page)
        .service(register_handler)
        .service(login_page)
        .service(login_handler)
        .service(logout_handler)
        .service(account_page)
        .service(account_handler);
}
