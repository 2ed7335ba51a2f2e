//! # Resolve Session Use Case
//!
//! 保存済みセッションを再利用し、使えなければフルログインして保存し直す

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::domain::entities::credentials::Credentials;
use crate::domain::entities::session::SessionKey;
use crate::domain::repositories::session_repository::SessionRepository;
use crate::domain::repositories::wellness_client::{WellnessClient, WellnessClientFactory};

/// 保存済みセッションの復元結果
#[derive(Debug)]
pub enum SessionResume {
    /// 復元に成功
    Resumed,
    /// 保存済みセッションが無い
    NoStoredSession,
    /// 読み込み失敗、または上流に拒否された
    Rejected(anyhow::Error),
}

/// セッション解決ユースケース
///
/// 認証済みクライアントを返す
pub struct ResolveSessionUseCase<S: SessionRepository, F: WellnessClientFactory> {
    session_repository: Arc<S>,
    client_factory: Arc<F>,
}

impl<S: SessionRepository, F: WellnessClientFactory> ResolveSessionUseCase<S, F> {
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `session_repository` - セッションリポジトリ
    /// * `client_factory` - クライアントファクトリ
    pub fn new(session_repository: Arc<S>, client_factory: Arc<F>) -> Self {
        Self {
            session_repository,
            client_factory,
        }
    }

    /// 認証済みクライアントを取得
    ///
    /// 保存済みセッションの復元に失敗した場合は理由を問わずフルログインし、
    /// 新しいセッションでこのメールアドレスの保存内容を上書きする。
    ///
    /// # Errors
    ///
    /// フルログインまたは新しいセッションの保存に失敗した場合にエラーを返す（リトライしない）
    pub async fn execute(&self, credentials: &Credentials) -> Result<Box<dyn WellnessClient>> {
        let mut client = self
            .client_factory
            .create_client(credentials)
            .context("Failed to create wellness client")?;
        let key = SessionKey::from_email(&credentials.email);

        match self.try_resume(client.as_mut(), &key).await {
            SessionResume::Resumed => {
                info!("Resumed stored session");
                return Ok(client);
            }
            SessionResume::NoStoredSession => {
                info!("No stored session, performing full login");
            }
            SessionResume::Rejected(e) => {
                warn!("Stored session rejected, performing full login: {:#}", e);
            }
        }

        client.login().await?;

        let session = client.dump_session()?;
        self.session_repository
            .save(&key, &session)
            .await
            .context("Failed to persist session")?;
        info!("Saved new session");

        Ok(client)
    }

    /// 保存済みセッションでの復元を試みる
    pub async fn try_resume(
        &self,
        client: &mut dyn WellnessClient,
        key: &SessionKey,
    ) -> SessionResume {
        let session = match self.session_repository.load(key).await {
            Ok(Some(session)) => session,
            Ok(None) => return SessionResume::NoStoredSession,
            Err(e) => return SessionResume::Rejected(e),
        };

        match client.resume(&session).await {
            Ok(()) => SessionResume::Resumed,
            Err(e) => SessionResume::Rejected(e),
        }
    }
}
