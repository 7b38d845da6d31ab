//! Integration tests for project CRUD.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_project, delete, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn create_seeds_one_segment_and_no_assets(pool: PgPool) {
    let app = common::build_test_app(pool);
    let project = create_project(&app, "赛博侦探_S01").await;

    assert_eq!(project["segments"].as_array().unwrap().len(), 1);
    assert_eq!(project["segments"][0]["name"], "第一章 (Chapter 1)");
    assert_eq!(project["assets"].as_array().unwrap().len(), 0);
    assert_eq!(project["art_style"]["id"], "film_noir");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_rejects_blank_title(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(&app, "/api/v1/projects", json!({ "title": "" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_rejects_unknown_style(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        &app,
        "/api/v1/projects",
        json!({ "title": "x", "art_style_id": "vaporwave" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_shows_created_project(pool: PgPool) {
    let app = common::build_test_app(pool);
    create_project(&app, "第一部").await;

    let response = get(&app, "/api/v1/projects").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["title"], "第一部");
    assert_eq!(json["data"][0]["shot_count"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn get_missing_project_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(&app, "/api/v1/projects/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_changes_title_but_not_art_style(pool: PgPool) {
    let app = common::build_test_app(pool);
    let mut project = create_project(&app, "旧标题").await;
    let id = project["id"].as_str().unwrap().to_string();

    // Title change is accepted.
    project["title"] = json!("新标题");
    let response = put_json(&app, &format!("/api/v1/projects/{id}"), project.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["title"], "新标题");

    // Art style change is a conflict.
    let mut restyled = updated.clone();
    restyled["art_style"]["id"] = json!("anime_jp");
    restyled["art_style"]["label"] = json!("日系动画 (Japanese Anime)");
    let response = put_json(&app, &format!("/api/v1/projects/{id}"), restyled).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_is_confirmation_gated(pool: PgPool) {
    let app = common::build_test_app(pool);
    let project = create_project(&app, "删除我").await;
    let id = project["id"].as_str().unwrap();

    // No confirmation: rejected with the dedicated code.
    let response = delete(&app, &format!("/api/v1/projects/{id}")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFIRMATION_REQUIRED");

    // Confirmed: gone for good.
    let response = delete(&app, &format!("/api/v1/projects/{id}?confirm=true")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(&app, &format!("/api/v1/projects/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn art_styles_endpoint_lists_presets(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(&app, "/api/v1/art-styles").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let styles = json["data"].as_array().unwrap();
    assert_eq!(styles.len(), 6);
    assert!(styles.iter().any(|s| s["id"] == "chinese_ink"));
}
