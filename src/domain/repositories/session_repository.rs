//! # Session Repository Trait
//!
//! 認証済みセッションの永続化を抽象化

use anyhow::Result;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::entities::session::{Session, SessionKey};

/// セッションリポジトリ
///
/// メールアドレスから導出したキーごとにセッションを1つ保持する
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// セッションを読み込む
    ///
    /// # Arguments
    ///
    /// * `key` - セッションキー
    ///
    /// # Returns
    ///
    /// 保存済みのセッション。存在しない場合は `None`
    ///
    /// # Errors
    ///
    /// 読み込みまたはパースに失敗した場合にエラーを返す
    async fn load(&self, key: &SessionKey) -> Result<Option<Session>>;

    /// セッションを保存する（既存のものは上書き）
    ///
    /// # Arguments
    ///
    /// * `key` - セッションキー
    /// * `session` - 保存するセッション
    ///
    /// # Errors
    ///
    /// 書き込みに失敗した場合にエラーを返す
    async fn save(&self, key: &SessionKey, session: &Session) -> Result<()>;
}
