//! # Response Payload DTO
//!
//! 成功・失敗のレスポンスペイロードと、トランスポートに渡す処理結果

use serde::Serialize;

use crate::domain::entities::credentials::CredentialsError;
use crate::domain::entities::wellness_report::WellnessReport;
use crate::domain::services::error_message::{error_type, surface_message};

/// 失敗時のペイロード
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorPayload {
    pub success: bool,
    pub error: String,
    /// 入力検証エラーでは出力しない
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl ErrorPayload {
    /// 入力検証エラー
    pub fn invalid_input(err: &CredentialsError) -> Self {
        Self {
            success: false,
            error: err.to_string(),
            error_type: None,
        }
    }

    /// 処理中に発生したエラー
    ///
    /// 401 Unauthorized のメッセージは固定文言に置き換えるが、種別は元のエラーのまま
    pub fn from_error(e: &anyhow::Error) -> Self {
        Self {
            success: false,
            error: surface_message(e),
            error_type: Some(error_type(e)),
        }
    }
}

/// 成功時のペイロード
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuccessPayload {
    pub success: bool,
    #[serde(flatten)]
    pub report: WellnessReport,
}

/// レスポンスペイロード
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponsePayload {
    Success(SuccessPayload),
    Failure(ErrorPayload),
}

impl ResponsePayload {
    /// JSON文字列に変換
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            serde_json::json!({
                "success": false,
                "error": e.to_string(),
                "error_type": "JSONEncodeError",
            })
            .to_string()
        })
    }
}

/// 共通オーケストレーションの処理結果
///
/// トランスポートごとにステータスコード・終了コードへ対応付ける
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// 資格情報の欠落（外部APIには接続していない）
    InvalidInput(ErrorPayload),
    /// 認証または集約の失敗
    Failed(ErrorPayload),
    Succeeded(Box<WellnessReport>),
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Succeeded(_))
    }

    pub fn into_payload(self) -> ResponsePayload {
        match self {
            FetchOutcome::InvalidInput(payload) | FetchOutcome::Failed(payload) => {
                ResponsePayload::Failure(payload)
            }
            FetchOutcome::Succeeded(report) => ResponsePayload::Success(SuccessPayload {
                success: true,
                report: *report,
            }),
        }
    }
}
