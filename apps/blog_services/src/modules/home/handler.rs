use actix_web::{
    get,
    web::{self, Data, Query, ServiceConfig},
    HttpRequest, HttpResponse,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::BlogError,
    modules::post::{model::PageQuery, service::PostServices},
    utils::view_utils::Page,
    AppState,
};

async fn home(
    req: HttpRequest,
    page: Query<PageQuery>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, BlogError> {
    let log_id = format!("home.{}", Uuid::new_v4());
    let posts = PostServices::list_posts(&log_id, page.page, None, &app_state).await?;
    Ok(Page::new("home", "Home").data(posts).render(&req))
}

#[get("/about")]
async fn about(req: HttpRequest) -> HttpResponse {
    Page::new("about", "About").render(&req)
}

#[get("/api/healthcheck")]
async fn api_health_check(app_state: Data<AppState>) -> HttpResponse {
    if let Err(err) = app_state.users.ping().await {
        return HttpResponse::ServiceUnavailable().json(json!({
            "status": "failed",
            "error": [{ "database": format!("Cannot connect to database: {}", err) }]
        }));
    }

    HttpResponse::Ok().json(json!({ "status": "success", "message": "API healthy and ready to go!" }))
}

/// Fallback for unmatched routes.
pub async fn not_found() -> Result<HttpResponse, BlogError> {
    Err(BlogError::NotFound("page"))
}

pub fn home_config(config: &mut ServiceConfig) {
    config
        .service(web::resource(["/", "/home"]).route(web::get().to(home)))
        .service(about)
        .service(api_health_check);
}
