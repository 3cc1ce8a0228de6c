use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;

use colorbook_api::error::AppError;
use colorbook_core::error::CoreError;
use colorbook_pipeline::PipelineError;
use colorbook_social::SocialError;

async fn into_parts(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn payment_required_carries_amounts() {
    let err = AppError::Pipeline(PipelineError::Core(CoreError::PaymentRequired {
        required: 5,
        available_quota: 2,
        available_credits: 1,
    }));
    let (status, json) = into_parts(err).await;

    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(json["code"], "PAYMENT_REQUIRED");
    assert_eq!(json["required"], 5);
    assert_eq!(json["availableQuota"], 2);
    assert_eq!(json["availableCredits"], 1);
}

#[tokio::test]
async fn validation_is_bad_request() {
    let (status, json) = into_parts(CoreError::Validation("theme is required".into()).into()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "theme is required");
}

#[tokio::test]
async fn pipeline_validation_is_bad_request() {
    let err = AppError::Pipeline(PipelineError::Core(CoreError::Validation("bad length".into())));
    let (status, _) = into_parts(err).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn outline_failure_keeps_message() {
    let err = AppError::Pipeline(PipelineError::Outline("no JSON array in reply".into()));
    let (status, json) = into_parts(err).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "GENERATION_FAILED");
    assert_matches!(json["error"].as_str(), Some(msg) if msg.contains("no JSON array"));
}

#[tokio::test]
async fn image_failure_is_sanitized() {
    let err = AppError::Pipeline(PipelineError::Image("upstream said: secret detail".into()));
    let (status, json) = into_parts(err).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Image generation failed");
}

#[tokio::test]
async fn social_failures_are_internal() {
    let (status, json) = into_parts(SocialError::NoRefreshToken.into()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
}

#[tokio::test]
async fn row_not_found_is_404() {
    let (status, _) = into_parts(sqlx::Error::RowNotFound.into()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn core_not_found_names_entity() {
    let err = CoreError::NotFound { entity: "Category", id: 9 };
    let (status, json) = into_parts(err.into()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Category with id 9 not found");
}
