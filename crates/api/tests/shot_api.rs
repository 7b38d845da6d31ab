//! Integration tests for shots: document-level injection, frame
//! generation in mock mode, reordering, middle frames, and the mock
//! video render.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, create_project, delete, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

fn make_shot(sequence: i64, script: &str) -> serde_json::Value {
    json!({
        "id": format!("shot-{sequence}"),
        "sequence": sequence,
        "script_content": script,
        "visual_prompt": "detective walking, heavy rain",
        "shot_type": "Wide Shot",
        "camera_movement": "Dolly",
        "assigned_asset_ids": [],
        "status": "pending",
        "middle_frame_urls": []
    })
}

/// Write shots into a project's first segment via the whole-document
/// update path and return the updated document.
async fn inject_shots(
    app: &Router,
    mut project: serde_json::Value,
    shots: Vec<serde_json::Value>,
) -> serde_json::Value {
    let id = project["id"].as_str().unwrap().to_string();
    project["segments"][0]["shots"] = json!(shots);
    let response = put_json(app, &format!("/api/v1/projects/{id}"), project).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn start_frame_generation_marks_shot_done(pool: PgPool) {
    let app = common::build_test_app(pool);
    let project = create_project(&app, "首帧").await;
    let project = inject_shots(&app, project, vec![make_shot(1, "雨夜")]).await;
    let project_id = project["id"].as_str().unwrap();
    let segment_id = project["segments"][0]["id"].as_str().unwrap();

    let response = post_json(
        &app,
        &format!(
            "/api/v1/projects/{project_id}/segments/{segment_id}/shots/shot-1/frames"
        ),
        json!({ "slot": "start" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await["data"].clone();
    let shot = updated["segments"][0]["shots"][0].clone();
    assert_eq!(shot["status"], "done");
    assert!(shot["image_url"]
        .as_str()
        .unwrap()
        .starts_with("https://picsum.photos/seed/"));

    // The summary promotes the new frame to the cover image.
    let response = common::get(&app, "/api/v1/projects").await;
    let list = body_json(response).await;
    assert_eq!(list["data"][0]["cover_image"], shot["image_url"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn end_frame_requires_a_start_frame(pool: PgPool) {
    let app = common::build_test_app(pool);
    let project = create_project(&app, "尾帧").await;
    let project = inject_shots(&app, project, vec![make_shot(1, "雨夜")]).await;
    let project_id = project["id"].as_str().unwrap();
    let segment_id = project["segments"][0]["id"].as_str().unwrap();
    let frames_uri = format!(
        "/api/v1/projects/{project_id}/segments/{segment_id}/shots/shot-1/frames"
    );

    let response = post_json(&app, &frames_uri, json!({ "slot": "end" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Generate the start frame, then the end frame succeeds.
    let response = post_json(&app, &frames_uri, json!({ "slot": "start" })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(&app, &frames_uri, json!({ "slot": "end" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    let shot = updated["segments"][0]["shots"][0].clone();
    assert!(shot["end_frame_url"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn move_shot_swaps_neighbours_and_ignores_boundaries(pool: PgPool) {
    let app = common::build_test_app(pool);
    let project = create_project(&app, "排序").await;
    let project = inject_shots(
        &app,
        project,
        vec![make_shot(1, "a"), make_shot(2, "b"), make_shot(3, "c")],
    )
    .await;
    let project_id = project["id"].as_str().unwrap();
    let segment_id = project["segments"][0]["id"].as_str().unwrap();

    // Moving the first shot up is a no-op.
    let response = post_json(
        &app,
        &format!("/api/v1/projects/{project_id}/segments/{segment_id}/shots/shot-1/move"),
        json!({ "direction": "up" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["segments"][0]["shots"][0]["id"], "shot-1");

    // Moving it down swaps with its neighbour; ids are preserved.
    let response = post_json(
        &app,
        &format!("/api/v1/projects/{project_id}/segments/{segment_id}/shots/shot-1/move"),
        json!({ "direction": "down" }),
    )
    .await;
    let updated = body_json(response).await["data"].clone();
    let ids: Vec<&str> = updated["segments"][0]["shots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["shot-2", "shot-1", "shot-3"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn middle_frames_append_and_remove_by_index(pool: PgPool) {
    let app = common::build_test_app(pool);
    let project = create_project(&app, "中间帧").await;
    let project = inject_shots(&app, project, vec![make_shot(1, "a")]).await;
    let project_id = project["id"].as_str().unwrap();
    let segment_id = project["segments"][0]["id"].as_str().unwrap();
    let base_uri = format!(
        "/api/v1/projects/{project_id}/segments/{segment_id}/shots/shot-1/middle-frames"
    );

    post_json(&app, &base_uri, json!({ "url": "http://img/m1" })).await;
    let response = post_json(&app, &base_uri, json!({ "url": "http://img/m2" })).await;
    let updated = body_json(response).await["data"].clone();
    assert_eq!(
        updated["segments"][0]["shots"][0]["middle_frame_urls"],
        json!(["http://img/m1", "http://img/m2"])
    );

    let response = delete(&app, &format!("{base_uri}/0")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    assert_eq!(
        updated["segments"][0]["shots"][0]["middle_frame_urls"],
        json!(["http://img/m2"])
    );

    // Out-of-range index.
    let response = delete(&app, &format!("{base_uri}/9")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn shot_edit_updates_prompt_and_assignments(pool: PgPool) {
    let app = common::build_test_app(pool);
    let project = create_project(&app, "编辑").await;
    let project = inject_shots(&app, project, vec![make_shot(1, "a")]).await;
    let project_id = project["id"].as_str().unwrap();
    let segment_id = project["segments"][0]["id"].as_str().unwrap();

    let response = put_json(
        &app,
        &format!("/api/v1/projects/{project_id}/segments/{segment_id}/shots/shot-1"),
        json!({ "visual_prompt": "close up, neon glow", "assigned_asset_ids": ["asset-1"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    let shot = updated["segments"][0]["shots"][0].clone();
    assert_eq!(shot["visual_prompt"], "close up, neon glow");
    assert_eq!(shot["assigned_asset_ids"], json!(["asset-1"]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn video_render_resolves_placeholder_clip(pool: PgPool) {
    let app = common::build_test_app(pool);
    let project = create_project(&app, "成片").await;
    let project = inject_shots(&app, project, vec![make_shot(1, "a")]).await;
    let project_id = project["id"].as_str().unwrap();
    let segment_id = project["segments"][0]["id"].as_str().unwrap();

    let response = post_json(
        &app,
        &format!("/api/v1/projects/{project_id}/segments/{segment_id}/shots/shot-1/video"),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    assert_eq!(
        updated["segments"][0]["shots"][0]["video_url"],
        "https://www.w3schools.com/html/mov_bbb.mp4"
    );
}
