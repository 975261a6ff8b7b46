use actix_web::{
    get,
    http::StatusCode,
    post,
    web::{Data, Form, Path, Query, ServiceConfig},
    HttpRequest, HttpResponse,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::BlogError,
    modules::user::model::CurrentUser,
    utils::view_utils::{Page, Redirect},
    AppState,
};

use super::{
    model::{PageQuery, PostData},
    service::PostServices,
};

fn post_form_page(title: &'static str, legend: &str) -> Page {
    Page::new("create_post", title).data(json!({ "legend": legend }))
}

#[get("/post/new")]
async fn new_post_page(req: HttpRequest, _user: CurrentUser) -> HttpResponse {
    post_form_page("New Post", "New Post")
        .form(PostData::default())
        .render(&req)
}

#[post("/post/new")]
async fn new_post_handler(
    req: HttpRequest,
    user: CurrentUser,
    post_body: Form<PostData>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, BlogError> {
    let log_id = format!("create_post.{}", user.id);
    let post_data = post_body.into_inner();
    let form_echo = post_data.clone();

    match PostServices::create_post(&log_id, &user, post_data, &app_state).await {
        Ok(_) => Ok(Redirect::to("/home")
            .flash("success", "Your post has been created!")
            .finish()),
        Err(BlogError::Validation(errors)) => Ok(post_form_page("New Post", "New Post")
            .status(StatusCode::BAD_REQUEST)
            .form(form_echo)
            .errors(errors)
            .render(&req)),
        Err(error) => Err(error),
    }
}

#[get("/post/{post_id}")]
async fn post_detail(
    req: HttpRequest,
    path: Path<String>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, BlogError> {
    let post_id = PostServices::parse_post_id(&path)?;
    let log_id = format!("get_post.{}", post_id);

    let post = PostServices::get_post(&log_id, post_id, &app_state).await?;
    Ok(Page::new("post", post.title.clone()).data(post).render(&req))
}

#[get("/post/{post_id}/update")]
async fn update_post_page(
    req: HttpRequest,
    user: CurrentUser,
    path: Path<String>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, BlogError> {
    let post_id = PostServices::parse_post_id(&path)?;
    let log_id = format!("update_post.{}", user.id);

    let post = PostServices::owned_post(&log_id, post_id, &user, &app_state).await?;
    Ok(post_form_page("Update Post", "Update Post")
        .form(PostData::from(&post))
        .render(&req))
}

#[post("/post/{post_id}/update")]
async fn update_post_handler(
    req: HttpRequest,
    user: CurrentUser,
    path: Path<String>,
    post_body: Form<PostData>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, BlogError> {
    let post_id = PostServices::parse_post_id(&path)?;
    let log_id = format!("update_post.{}", user.id);
    let post_data = post_body.into_inner();
    let form_echo = post_data.clone();

    match PostServices::update_post(&log_id, post_id, &user, post_data, &app_state).await {
        Ok(post) => Ok(Redirect::to(format!("/post/{}", post.id))
            .flash("success", "Your post has been updated!")
            .finish()),
        Err(BlogError::Validation(errors)) => Ok(post_form_page("Update Post", "Update Post")
            .status(StatusCode::BAD_REQUEST)
            .form(form_echo)
            .errors(errors)
            .render(&req)),
        Err(error) => Err(error),
    }
}

#[post("/post/{post_id}/delete")]
async fn delete_post_handler(
    user: CurrentUser,
    path: Path<String>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, BlogError> {
    let post_id = PostServices::parse_post_id(&path)?;
    let log_id = format!("delete_post.{}", user.id);

    PostServices::delete_post(&log_id, post_id, &user, &app_state).await?;
    Ok(Redirect::to("/home")
        .flash("success", "Your post has been deleted!")
        .finish())
}

#[get("/user/{username}")]
async fn user_posts(
    req: HttpRequest,
    path: Path<String>,
    page: Query<PageQuery>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, BlogError> {
    let username = path.into_inner();
    let log_id = format!("user_posts.{}", Uuid::new_v4());

    let (author, posts) = PostServices::list_user_posts(&log_id, &username, page.page, &app_state).await?;
    Ok(Page::new("user_posts", format!("Posts by {}", author.username))
        .data(json!({ "author": author, "posts": posts }))
        .render(&req))
}

pub fn post_config(config: &mut ServiceConfig) {
    config
        .service(new_post_page)
        .service(new_post_handler)
        .service(post_detail)
        .service(update_post_page)
        .service(update_post_handler)
        .service(delete_post_handler)
        .service(user_posts);
}
