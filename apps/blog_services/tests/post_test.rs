mod common;

use actix_web::{http::StatusCode, test};
use common::*;

#[actix_web::test]
async fn owner_creates_views_and_updates_a_post() {
    let dir = tempfile::tempdir().unwrap();
    let app = init_app(memory_state(dir.path())).await;
    let session = signed_in(&app, "jm", "jm@x.com", "pw123").await;

    let created = post_form(&app, "/post/new", Some(&session), &[("title", "Hello"), ("content", "World")]).await;
    assert_eq!(created.status(), StatusCode::FOUND);
    assert_eq!(location(&created), "/home");

    let flash = flash_cookie(&created).expect("flash cookie");
    let req = test::TestRequest::get().uri("/home").cookie(flash).to_request();
    let home = body_json(test::call_service(&app, req).await).await;
    assert_eq!(home["flashes"][0]["message"], "Your post has been created!");
    assert_eq!(home["data"]["items"][0]["title"], "Hello");
    assert_eq!(home["data"]["items"][0]["author"], "jm");

    let post_id = home["data"]["items"][0]["id"].as_str().unwrap().to_string();
    let post_uri = format!("/post/{}", post_id);

    let detail = get(&app, &post_uri, None).await;
    assert_eq!(detail.status(), StatusCode::OK);
    let detail = body_json(detail).await;
    assert_eq!(detail["view"], "post");
    assert_eq!(detail["data"]["title"], "Hello");
    assert_eq!(detail["data"]["content"], "World");

    let edit_form = body_json(get(&app, &format!("{}/update", post_uri), Some(&session)).await).await;
    assert_eq!(edit_form["form"]["title"], "Hello");
    assert_eq!(edit_form["data"]["legend"], "Update Post");

    let updated = post_form(
        &app,
        &format!("{}/update", post_uri),
        Some(&session),
        &[("title", "Hello2"), ("content", "World")],
    )
    .await;
    assert_eq!(updated.status(), StatusCode::FOUND);
    assert_eq!(location(&updated), post_uri);

    let detail = body_json(get(&app, &post_uri, Some(&session)).await).await;
    assert_eq!(detail["data"]["title"], "Hello2");
}

#[actix_web::test]
async fn other_users_cannot_touch_a_post() {
    let dir = tempfile::tempdir().unwrap();
    let app = init_app(memory_state(dir.path())).await;
    let owner = signed_in(&app, "jm", "jm@x.com", "pw123").await;
    let intruder = signed_in(&app, "eve", "eve@x.com", "pw456").await;

    let post_id = create_post(&app, &owner, "Hello", "World").await;
    let update_uri = format!("/post/{}/update", post_id);

    let form = get(&app, &update_uri, Some(&intruder)).await;
    assert_eq!(form.status(), StatusCode::FORBIDDEN);

    let update = post_form(&app, &update_uri, Some(&intruder), &[("title", "Owned"), ("content", "x")]).await;
    assert_eq!(update.status(), StatusCode::FORBIDDEN);

    let delete = post_form(&app, &format!("/post/{}/delete", post_id), Some(&intruder), &[]).await;
    assert_eq!(delete.status(), StatusCode::FORBIDDEN);

    let detail = body_json(get(&app, &format!("/post/{}", post_id), None).await).await;
    assert_eq!(detail["data"]["title"], "Hello");
}

#[actix_web::test]
async fn owner_deletes_a_post() {
    let dir = tempfile::tempdir().unwrap();
    let app = init_app(memory_state(dir.path())).await;
    let session = signed_in(&app, "jm", "jm@x.com", "pw123").await;
    let post_id = create_post(&app, &session, "Hello", "World").await;

    let deleted = post_form(&app, &format!("/post/{}/delete", post_id), Some(&session), &[]).await;
    assert_eq!(deleted.status(), StatusCode::FOUND);
    assert_eq!(location(&deleted), "/home");

    let gone = get(&app, &format!("/post/{}", post_id), None).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);

    let again = post_form(&app, &format!("/post/{}/delete", post_id), Some(&session), &[]).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn unknown_or_malformed_post_id_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = init_app(memory_state(dir.path())).await;

    let unknown = get(&app, &format!("/post/{}", uuid::Uuid::new_v4()), None).await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    let page = body_json(unknown).await;
    assert_eq!(page["message"], "post not found");

    let malformed = get(&app, "/post/42", None).await;
    assert_eq!(malformed.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn post_routes_require_login() {
    let dir = tempfile::tempdir().unwrap();
    let app = init_app(memory_state(dir.path())).await;

    let resp = get(&app, "/post/new", None).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/login?next=%2Fpost%2Fnew");

    let resp = post_form(&app, "/post/new", None, &[("title", "Hello"), ("content", "World")]).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let home = body_json(get(&app, "/home", None).await).await;
    assert_eq!(home["data"]["total"], 0);
}

#[actix_web::test]
async fn empty_title_is_rejected_inline() {
    let dir = tempfile::tempdir().unwrap();
    let app = init_app(memory_state(dir.path())).await;
    let session = signed_in(&app, "jm", "jm@x.com", "pw123").await;

    let resp = post_form(&app, "/post/new", Some(&session), &[("title", ""), ("content", "World")]).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let page = body_json(resp).await;
    assert_eq!(page["view"], "create_post");
    assert!(page["errors"]["title"].is_array());
    assert!(page["errors"].get("content").is_none());
    assert_eq!(page["form"]["content"], "World");
}

#[actix_web::test]
async fn home_lists_newest_first_five_per_page() {
    let dir = tempfile::tempdir().unwrap();
    let app = init_app(memory_state(dir.path())).await;
    let session = signed_in(&app, "jm", "jm@x.com", "pw123").await;

    for n in 1..=7 {
        let title = format!("Post {}", n);
        post_form(&app, "/post/new", Some(&session), &[("title", title.as_str()), ("content", "body")]).await;
    }

    let first = body_json(get(&app, "/", None).await).await;
    assert_eq!(first["data"]["items"].as_array().unwrap().len(), 5);
    assert_eq!(first["data"]["items"][0]["title"], "Post 7");
    assert_eq!(first["data"]["total"], 7);
    assert_eq!(first["data"]["pages"], 2);
    assert_eq!(first["data"]["has_next"], true);

    let second = body_json(get(&app, "/home?page=2", None).await).await;
    assert_eq!(second["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(second["data"]["items"][1]["title"], "Post 1");
    assert_eq!(second["data"]["has_prev"], true);
    assert_eq!(second["data"]["has_next"], false);
}

#[actix_web::test]
async fn user_page_lists_only_their_posts() {
    let dir = tempfile::tempdir().unwrap();
    let app = init_app(memory_state(dir.path())).await;
    let jm = signed_in(&app, "jm", "jm@x.com", "pw123").await;
    let eve = signed_in(&app, "eve", "eve@x.com", "pw456").await;

    create_post(&app, &jm, "By jm", "one").await;
    create_post(&app, &eve, "By eve", "two").await;

    let resp = get(&app, "/user/jm", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = body_json(resp).await;
    assert_eq!(page["data"]["author"]["username"], "jm");
    assert_eq!(page["data"]["posts"]["total"], 1);
    assert_eq!(page["data"]["posts"]["items"][0]["title"], "By jm");

    let missing = get(&app, "/user/nobody", None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn about_and_unknown_routes() {
    let dir = tempfile::tempdir().unwrap();
    let app = init_app(memory_state(dir.path())).await;

    let about = get(&app, "/about", None).await;
    assert_eq!(about.status(), StatusCode::OK);
    assert_eq!(body_json(about).await["view"], "about");

    let missing = get(&app, "/no/such/page", None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let health = get(&app, "/api/healthcheck", None).await;
    assert_eq!(health.status(), StatusCode::OK);
}

#[actix_web::test]
async fn out_of_range_page_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = init_app(memory_state(dir.path())).await;
    let session = signed_in(&app, "jm", "jm@x.com", "pw123").await;
    create_post(&app, &session, "Hello", "World").await;

    let home = get(&app, "/home?page=9223372036854775807", None).await;
    assert_eq!(home.status(), StatusCode::NOT_FOUND);

    let user = get(&app, "/user/jm?page=9223372036854775807", None).await;
    assert_eq!(user.status(), StatusCode::NOT_FOUND);

    let past_the_end = body_json(get(&app, "/home?page=3", None).await).await;
    assert_eq!(past_the_end["data"]["items"].as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn blocked_delete_returns_home_after_login() {
    let dir = tempfile::tempdir().unwrap();
    let app = init_app(memory_state(dir.path())).await;
    let session = signed_in(&app, "jm", "jm@x.com", "pw123").await;
    let post_id = create_post(&app, &session, "Hello", "World").await;

    let blocked = post_form(&app, &format!("/post/{}/delete", post_id), None, &[]).await;
    assert_eq!(blocked.status(), StatusCode::FOUND);
    let login_uri = location(&blocked);
    assert_eq!(login_uri, "/login");

    let resp = login(&app, &login_uri, "jm@x.com", "pw123").await;
    assert_eq!(location(&resp), "/home");

    let detail = get(&app, &format!("/post/{}", post_id), None).await;
    assert_eq!(detail.status(), StatusCode::OK);
}
