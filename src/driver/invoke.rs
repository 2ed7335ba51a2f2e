//! CLI Transport
//!
//! `invoke` サブコマンドの処理結果を標準出力のJSONと終了コードに変換する

use chrono::{DateTime, Local};

use crate::application::dto::response_payload::FetchOutcome;
use crate::application::use_cases::fetch_wellness::FetchWellnessUseCase;
use crate::domain::repositories::session_repository::SessionRepository;
use crate::domain::repositories::wellness_client::WellnessClientFactory;

/// 資格情報が欠けている場合の終了コード
pub const EXIT_INVALID_INPUT: i32 = 1;

/// CLI実行結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeOutcome {
    /// 標準出力に書くJSON
    pub output: String,
    pub exit_code: i32,
}

/// 処理結果を終了コードに対応付ける
///
/// 認証・取得の失敗はエラーJSONを出力したうえで 0 を返す
pub fn exit_code_for(outcome: &FetchOutcome) -> i32 {
    match outcome {
        FetchOutcome::InvalidInput(_) => EXIT_INVALID_INPUT,
        FetchOutcome::Failed(_) | FetchOutcome::Succeeded(_) => 0,
    }
}

impl InvokeOutcome {
    /// 処理結果を標準出力のJSONと終了コードにする
    pub fn from_outcome(outcome: FetchOutcome) -> Self {
        let exit_code = exit_code_for(&outcome);
        Self {
            output: outcome.into_payload().to_json(),
            exit_code,
        }
    }
}

pub async fn run_invoke<S, F>(
    use_case: &FetchWellnessUseCase<S, F>,
    email: Option<String>,
    password: Option<String>,
    now: DateTime<Local>,
) -> InvokeOutcome
where
    S: SessionRepository,
    F: WellnessClientFactory,
{
    InvokeOutcome::from_outcome(use_case.respond(email, password, now).await)
}
