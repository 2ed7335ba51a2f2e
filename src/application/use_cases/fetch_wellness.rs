//! # Fetch Wellness Use Case
//!
//! 入力検証 → セッション解決 → 集約 の共通オーケストレーション
//!
//! HTTP と CLI の両トランスポートから同じ処理として呼び出される。

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Local};
use log::{error, info};

use crate::application::dto::response_payload::{ErrorPayload, FetchOutcome};
use crate::application::use_cases::aggregate_wellness::AggregateWellnessUseCase;
use crate::application::use_cases::resolve_session::ResolveSessionUseCase;
use crate::domain::entities::credentials::Credentials;
use crate::domain::entities::wellness_report::WellnessReport;
use crate::domain::repositories::session_repository::SessionRepository;
use crate::domain::repositories::wellness_client::WellnessClientFactory;

/// ウェルネスデータ取得ユースケース
pub struct FetchWellnessUseCase<S: SessionRepository, F: WellnessClientFactory> {
    resolve_session: ResolveSessionUseCase<S, F>,
    aggregate_wellness: AggregateWellnessUseCase,
}

impl<S: SessionRepository, F: WellnessClientFactory> FetchWellnessUseCase<S, F> {
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `session_repository` - セッションリポジトリ
    /// * `client_factory` - クライアントファクトリ
    pub fn new(session_repository: Arc<S>, client_factory: Arc<F>) -> Self {
        Self {
            resolve_session: ResolveSessionUseCase::new(session_repository, client_factory),
            aggregate_wellness: AggregateWellnessUseCase::new(),
        }
    }

    /// 認証して集約する
    ///
    /// # Errors
    ///
    /// 認証、または中断対象の取得に失敗した場合にエラーを返す
    pub async fn execute(
        &self,
        credentials: &Credentials,
        now: DateTime<Local>,
    ) -> Result<WellnessReport> {
        let client = self.resolve_session.execute(credentials).await?;
        self.aggregate_wellness.execute(client.as_ref(), now).await
    }

    /// 任意入力から処理結果を組み立てる
    ///
    /// 資格情報が欠けている場合は外部APIに接続せずに `InvalidInput` を返す。
    /// それ以外のエラーはここで一度だけ捕捉して `Failed` にする。
    pub async fn respond(
        &self,
        email: Option<String>,
        password: Option<String>,
        now: DateTime<Local>,
    ) -> FetchOutcome {
        let credentials = match Credentials::from_parts(email, password) {
            Ok(credentials) => credentials,
            Err(e) => return FetchOutcome::InvalidInput(ErrorPayload::invalid_input(&e)),
        };

        match self.execute(&credentials, now).await {
            Ok(report) => {
                info!("Wellness report ready ({} history days)", report.history.len());
                FetchOutcome::Succeeded(Box::new(report))
            }
            Err(e) => {
                error!("Wellness fetch failed: {:#}", e);
                FetchOutcome::Failed(ErrorPayload::from_error(&e))
            }
        }
    }
}
