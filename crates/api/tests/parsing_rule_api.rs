//! Integration tests for parsing-rule CRUD.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn first_list_seeds_the_default_rule(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(&app, "/api/v1/parsing-rules").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let rules = json["data"].as_array().unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0]["id"], "default");
    assert_eq!(rules[0]["is_default"], true);
    assert!(rules[0]["system_instruction"]
        .as_str()
        .unwrap()
        .contains("Storyboard Artist"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn new_rule_copies_default_instruction_when_absent(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        &app,
        "/api/v1/parsing-rules",
        json!({ "name": "新自定义规则" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let rule = body_json(response).await["data"].clone();
    assert_eq!(rule["is_default"], false);
    assert!(rule["system_instruction"]
        .as_str()
        .unwrap()
        .contains("Storyboard Artist"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn blank_rule_name_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        &app,
        "/api/v1/parsing-rules",
        json!({ "name": " ", "system_instruction": "x" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_renames_a_rule(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        &app,
        "/api/v1/parsing-rules",
        json!({ "name": "动画分镜", "system_instruction": "Break into anime shots." }),
    )
    .await;
    let rule = body_json(response).await["data"].clone();
    let id = rule["id"].as_str().unwrap();

    let response = put_json(
        &app,
        &format!("/api/v1/parsing-rules/{id}"),
        json!({ "name": "动画分镜 v2" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["name"], "动画分镜 v2");
    assert_eq!(updated["system_instruction"], "Break into anime shots.");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_is_gated_and_spares_the_default(pool: PgPool) {
    let app = common::build_test_app(pool);
    get(&app, "/api/v1/parsing-rules").await; // seed

    let response = post_json(
        &app,
        "/api/v1/parsing-rules",
        json!({ "name": "临时规则", "system_instruction": "x" }),
    )
    .await;
    let id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    // Unconfirmed delete is rejected.
    let response = delete(&app, &format!("/api/v1/parsing-rules/{id}")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFIRMATION_REQUIRED");

    // The default rule refuses deletion even when confirmed.
    let response = delete(&app, "/api/v1/parsing-rules/default?confirm=true").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // A custom rule deletes cleanly.
    let response = delete(&app, &format!("/api/v1/parsing-rules/{id}?confirm=true")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
