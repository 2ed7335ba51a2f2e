//! Workflow Orchestration
//!
//! 設定から依存性を組み立て、各トランスポートを起動する

use anyhow::Result;
use chrono::Local;
use log::{error, info};

use std::sync::Arc;

use crate::adapter::config::{Config, Transport};
use crate::adapter::garmin::GarminClientFactory;
use crate::adapter::repositories::file_session_repository::FileSessionRepository;
use crate::application::dto::response_payload::{ErrorPayload, FetchOutcome};
use crate::application::use_cases::fetch_wellness::FetchWellnessUseCase;
use crate::domain::entities::credentials::Credentials;

use super::cli::Command;
use super::http;
use super::invoke::{run_invoke, InvokeOutcome};

/// 本番構成のユースケース
pub type GarminFetchWellness = FetchWellnessUseCase<FileSessionRepository, GarminClientFactory>;

/// Wellness Workflow
pub struct WellnessWorkflow {
    config: Config,
}

impl WellnessWorkflow {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// トランスポートに応じた依存性を注入してユースケースを作成
    pub fn build_use_case(&self, transport: Transport) -> Result<GarminFetchWellness> {
        let session_dir = self.config.session_dir_for(transport);
        info!("Session directory: {}", session_dir.display());

        let session_repo = Arc::new(FileSessionRepository::new(session_dir));
        let client_factory = Arc::new(GarminClientFactory::new(&self.config)?);

        Ok(FetchWellnessUseCase::new(session_repo, client_factory))
    }

    /// CLIから1回だけ取得する
    ///
    /// 依存性の組み立てに失敗した場合も、引数解析後のエラーとしてエラーJSONを返す
    pub async fn invoke(&self, email: Option<String>, password: Option<String>) -> InvokeOutcome {
        match self.build_use_case(Transport::Cli) {
            Ok(use_case) => run_invoke(&use_case, email, password, Local::now()).await,
            Err(e) => {
                error!("Failed to initialize: {:#}", e);
                let outcome = match Credentials::from_parts(email, password) {
                    Err(invalid) => FetchOutcome::InvalidInput(ErrorPayload::invalid_input(&invalid)),
                    Ok(_) => FetchOutcome::Failed(ErrorPayload::from_error(&e)),
                };
                InvokeOutcome::from_outcome(outcome)
            }
        }
    }

    /// HTTPサーバーとして待ち受ける
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub async fn serve(&self, bind: Option<String>) -> Result<()> {
        let use_case = Arc::new(self.build_use_case(Transport::Http)?);
        let addr = bind.unwrap_or_else(|| self.config.bind_address.clone());
        http::serve(use_case, &addr).await
    }

    /// サブコマンドを実行し、プロセスの終了コードを返す
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub async fn execute(&self, command: Command) -> Result<i32> {
        match command {
            Command::Invoke { email, password } => {
                let outcome = self.invoke(email, password).await;
                println!("{}", outcome.output);
                Ok(outcome.exit_code)
            }
            Command::Serve { bind } => {
                self.serve(bind).await?;
                Ok(0)
            }
        }
    }
}
