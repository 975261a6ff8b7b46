#![allow(dead_code)]

use std::path::Path;

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    cookie::Cookie,
    dev::{Service, ServiceResponse},
    http::header::{CONTENT_TYPE, LOCATION},
    test,
    web::{self, Data},
    App, Error,
};
use blog_services::{
    app_config, middlewares::session_middleware::SessionMW, modules::home::handler::not_found,
    utils::view_utils::FLASH_COOKIE, AppState, Settings,
};
use serde_json::Value;

pub const BOUNDARY: &str = "----blogtestboundary";

pub fn memory_state(photos_dir: &Path) -> Data<AppState> {
    Data::new(AppState::in_memory(Settings {
        photos_dir: photos_dir.to_path_buf(),
        ..Settings::default()
    }))
}

pub async fn init_app(
    state: Data<AppState>,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    test::init_service(
        App::new()
            .app_data(state)
            .wrap(SessionMW)
            .configure(app_config)
            .default_service(web::to(not_found)),
    )
    .await
}

pub async fn register<S, B>(app: &S, username: &str, email: &str, password: &str) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/register")
        .set_form([
            ("username", username),
            ("email", email),
            ("password", password),
            ("confirm_password", password),
        ])
        .to_request();
    test::call_service(app, req).await
}

pub async fn login<S, B>(app: &S, uri: &str, email: &str, password: &str) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri(uri)
        .set_form([("email", email), ("password", password)])
        .to_request();
    test::call_service(app, req).await
}

/// Registers and logs in, returning the session cookie.
pub async fn signed_in<S, B>(app: &S, username: &str, email: &str, password: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    register(app, username, email, password).await;
    let resp = login(app, "/login", email, password).await;
    session_cookie(&resp).expect("login sets a session cookie")
}

pub async fn get<S, B>(app: &S, uri: &str, session: Option<&Cookie<'static>>) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let mut req = test::TestRequest::get().uri(uri);
    if let Some(cookie) = session {
        req = req.cookie(cookie.clone());
    }
    test::call_service(app, req.to_request()).await
}

pub async fn post_form<S, B>(
    app: &S,
    uri: &str,
    session: Option<&Cookie<'static>>,
    form: &[(&str, &str)],
) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let mut req = test::TestRequest::post().uri(uri).set_form(form);
    if let Some(cookie) = session {
        req = req.cookie(cookie.clone());
    }
    test::call_service(app, req.to_request()).await
}

pub async fn post_multipart<S, B>(
    app: &S,
    uri: &str,
    session: Option<&Cookie<'static>>,
    fields: &[(&str, &str)],
    file: Option<(&str, &[u8])>,
) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let mut req = test::TestRequest::post()
        .uri(uri)
        .insert_header((CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY)))
        .set_payload(multipart_body(fields, file));
    if let Some(cookie) = session {
        req = req.cookie(cookie.clone());
    }
    test::call_service(app, req.to_request()).await
}

pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"picture\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn session_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    find_cookie(resp, "session")
}

pub fn flash_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    find_cookie(resp, FLASH_COOKIE)
}

fn find_cookie<B>(resp: &ServiceResponse<B>, name: &str) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.into_owned())
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub async fn body_json<B: MessageBody>(resp: ServiceResponse<B>) -> Value {
    test::read_body_json(resp).await
}

pub async fn create_post<S, B>(app: &S, session: &Cookie<'static>, title: &str, content: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    post_form(app, "/post/new", Some(session), &[("title", title), ("content", content)]).await;

    let home = body_json(get(app, "/home", None).await).await;
    home["data"]["items"][0]["id"]
        .as_str()
        .expect("new post is listed first")
        .to_string()
}
