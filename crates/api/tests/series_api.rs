mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{
    admin_token, body_json, build_test_app, get, get_auth, post_json, seed_category, user_token,
    SERVICE_KEY,
};

fn publish_body(category_id: i64) -> serde_json::Value {
    json!({
        "categoryId": category_id,
        "seriesTitle": "Fox Story",
        "difficulty": "hard",
        "images": [
            { "imageUrl": "https://cdn.test/1.png", "sceneDescription": "Fox wakes up", "order": 1 },
            { "imageUrl": "https://cdn.test/2.png", "sceneDescription": "Fox finds a lantern", "order": 2 },
        ],
    })
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_publishes_and_reads_series(pool: PgPool) {
    let category_id = seed_category(&pool, "animals").await;
    let token = admin_token(1);

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/series/publish",
        Some(&token),
        publish_body(category_id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let series_id = json["data"]["seriesId"].as_str().unwrap().to_string();
    let pages = json["data"]["pages"].as_array().unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0]["title"], "Fox Story - Part 1");
    assert_eq!(pages[1]["description"], "Fox finds a lantern");
    assert_eq!(pages[0]["difficulty"], "hard");

    let reader = user_token(5);
    let response = get_auth(
        build_test_app(pool),
        &format!("/api/v1/series/{series_id}"),
        &reader,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let orders: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["seriesOrder"].as_i64().unwrap())
        .collect();
    assert_eq!(orders, vec![1, 2]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn service_key_can_publish(pool: PgPool) {
    let category_id = seed_category(&pool, "space").await;
    let response = post_json(
        build_test_app(pool),
        "/api/v1/series/publish",
        Some(SERVICE_KEY),
        publish_body(category_id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn regular_user_cannot_publish(pool: PgPool) {
    let category_id = seed_category(&pool, "animals").await;
    let token = user_token(2);
    let response = post_json(
        build_test_app(pool),
        "/api/v1/series/publish",
        Some(&token),
        publish_body(category_id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn publish_validates_input(pool: PgPool) {
    let category_id = seed_category(&pool, "animals").await;
    let app = build_test_app(pool);

    let mut empty = publish_body(category_id);
    empty["images"] = json!([]);
    let response = post_json(app.clone(), "/api/v1/series/publish", Some(SERVICE_KEY), empty).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        app,
        "/api/v1/series/publish",
        Some(SERVICE_KEY),
        publish_body(category_id + 100),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_series_is_404(pool: PgPool) {
    let response = get_auth(
        build_test_app(pool),
        "/api/v1/series/00000000-0000-0000-0000-000000000000",
        SERVICE_KEY,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn reading_series_requires_credentials(pool: PgPool) {
    let response = get(
        build_test_app(pool),
        "/api/v1/series/00000000-0000-0000-0000-000000000000",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
