//! HTTP Transport
//!
//! axumによるHTTPトランスポート
//!
//! 各エンドポイントは薄いハンドラーで、処理は `wellness_inner` に委譲する。
//! inner関数はaxumのディスパッチを介さずに直接テストできる。
//!
//! Endpoints:
//! - POST /             ウェルネスデータ取得
//! - POST /api/wellness 同上

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Local};
use log::{info, warn};
use serde::Deserialize;
use serde_json::Value;
use tokio::net::TcpListener;

use crate::application::dto::response_payload::{ErrorPayload, FetchOutcome, ResponsePayload};
use crate::application::use_cases::fetch_wellness::FetchWellnessUseCase;
use crate::domain::repositories::session_repository::SessionRepository;
use crate::domain::repositories::wellness_client::WellnessClientFactory;

/// リクエストボディ（どちらも任意、欠落はユースケース側で検証）
#[derive(Debug, Default, Deserialize)]
pub struct WellnessRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// 処理結果をHTTPステータスに対応付ける
pub fn status_for(outcome: &FetchOutcome) -> StatusCode {
    match outcome {
        FetchOutcome::InvalidInput(_) => StatusCode::BAD_REQUEST,
        FetchOutcome::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        FetchOutcome::Succeeded(_) => StatusCode::OK,
    }
}

fn to_value(payload: &ResponsePayload) -> Value {
    serde_json::to_value(payload).unwrap_or_else(|e| {
        serde_json::json!({
            "success": false,
            "error": e.to_string(),
            "error_type": "JSONEncodeError",
        })
    })
}

/// Build the Axum router with all endpoints
pub fn build_router<S, F>(use_case: Arc<FetchWellnessUseCase<S, F>>) -> Router
where
    S: SessionRepository + 'static,
    F: WellnessClientFactory + 'static,
{
    Router::new()
        .route("/", post(wellness_handler::<S, F>))
        .route("/api/wellness", post(wellness_handler::<S, F>))
        .with_state(use_case)
}

/// リクエストボディを解釈して処理し、(ステータス, JSON) を返す
///
/// JSONとして読めないボディは 500 (`JSONDecodeError`) になる
pub async fn wellness_inner<S, F>(
    use_case: &FetchWellnessUseCase<S, F>,
    body: &[u8],
    now: DateTime<Local>,
) -> (StatusCode, Value)
where
    S: SessionRepository,
    F: WellnessClientFactory,
{
    let request = match serde_json::from_slice::<WellnessRequest>(body)
        .context("Failed to parse request body")
    {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejected request body: {:#}", e);
            let payload = ResponsePayload::Failure(ErrorPayload::from_error(&e));
            return (StatusCode::INTERNAL_SERVER_ERROR, to_value(&payload));
        }
    };

    let outcome = use_case
        .respond(request.email, request.password, now)
        .await;
    let status = status_for(&outcome);

    (status, to_value(&outcome.into_payload()))
}

async fn wellness_handler<S, F>(
    State(use_case): State<Arc<FetchWellnessUseCase<S, F>>>,
    body: Bytes,
) -> impl IntoResponse
where
    S: SessionRepository + 'static,
    F: WellnessClientFactory + 'static,
{
    let (status, value) = wellness_inner(&use_case, &body, Local::now()).await;
    (status, Json(value))
}

/// Start the HTTP server on the given address.
/// Gracefully shuts down on Ctrl-C.
#[cfg_attr(coverage_nightly, coverage(off))]
pub async fn serve<S, F>(use_case: Arc<FetchWellnessUseCase<S, F>>, addr: &str) -> Result<()>
where
    S: SessionRepository + 'static,
    F: WellnessClientFactory + 'static,
{
    let app = build_router(use_case);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("garmin-bridge listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl-C: {}", e);
            }
            info!("HTTP server shutting down...");
        })
        .await
        .context("HTTP server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::domain::repositories::session_repository::MockSessionRepository;
    use crate::domain::repositories::wellness_client::MockWellnessClientFactory;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 12, 25, 10, 0, 0).unwrap()
    }

    fn untouched_use_case() -> FetchWellnessUseCase<MockSessionRepository, MockWellnessClientFactory>
    {
        let mut factory = MockWellnessClientFactory::new();
        factory.expect_create_client().never();
        FetchWellnessUseCase::new(Arc::new(MockSessionRepository::new()), Arc::new(factory))
    }

    #[tokio::test]
    async fn test_missing_password_is_bad_request() {
        let (status, body) =
            wellness_inner(&untouched_use_case(), br#"{"email":"a@x.com"}"#, now()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            serde_json::json!({"success": false, "error": "Missing email or password"})
        );
    }

    #[tokio::test]
    async fn test_empty_strings_are_missing() {
        let (status, _) = wellness_inner(
            &untouched_use_case(),
            br#"{"email":"","password":""}"#,
            now(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_json_is_server_error() {
        let (status, body) = wellness_inner(&untouched_use_case(), b"email=a", now()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["error_type"], "JSONDecodeError");
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to parse request body"));
    }

    #[tokio::test]
    async fn test_empty_body_is_server_error() {
        let (status, body) = wellness_inner(&untouched_use_case(), b"", now()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error_type"], "JSONDecodeError");
    }
}
