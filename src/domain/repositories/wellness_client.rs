//! # Wellness Client Trait
//!
//! 外部ウェルネスAPIクライアント（Garmin Connect）の境界
//!
//! ゲッターが返す値は上流が定義する不透明な JSON で、そのまま出力に渡す。

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

#[cfg(test)]
use mockall::automock;

use crate::domain::entities::credentials::Credentials;
use crate::domain::entities::session::Session;

/// 認証済みウェルネスAPIクライアント
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WellnessClient: Send + Sync {
    /// 保存済みセッションで認証状態を復元する
    ///
    /// # Errors
    ///
    /// セッションが壊れている、期限切れ、または上流に拒否された場合にエラーを返す
    async fn resume(&mut self, session: &Session) -> Result<()>;

    /// 資格情報でフルログインする
    ///
    /// # Errors
    ///
    /// 資格情報が誤っている場合などにエラーを返す
    async fn login(&mut self) -> Result<()>;

    /// 現在の認証状態をセッションとして書き出す
    fn dump_session(&self) -> Result<Session>;

    /// 認証時に取得した表示名
    fn display_name(&self) -> Option<String>;

    async fn get_user_profile(&self) -> Result<Value>;

    async fn get_devices(&self) -> Result<Value>;

    async fn get_userprofile_settings(&self) -> Result<Value>;

    async fn get_full_name(&self) -> Result<Option<String>>;

    /// 新しい順にアクティビティを取得
    async fn get_activities(&self, start: u32, limit: u32) -> Result<Value>;

    /// 日次サマリー統計
    async fn get_stats(&self, date: NaiveDate) -> Result<Value>;

    async fn get_hrv_data(&self, date: NaiveDate) -> Result<Value>;

    async fn get_steps_data(&self, date: NaiveDate) -> Result<Value>;

    async fn get_heart_rates(&self, date: NaiveDate) -> Result<Value>;

    async fn get_sleep_data(&self, date: NaiveDate) -> Result<Value>;

    async fn get_stress_data(&self, date: NaiveDate) -> Result<Value>;

    async fn get_body_battery(&self, date: NaiveDate) -> Result<Value>;
}

/// クライアントのファクトリ
///
/// リクエストごとに未認証のクライアントを作成する
#[cfg_attr(test, automock)]
pub trait WellnessClientFactory: Send + Sync {
    /// 資格情報に紐づいたクライアントを作成
    ///
    /// # Errors
    ///
    /// HTTPクライアントの初期化に失敗した場合にエラーを返す
    fn create_client(&self, credentials: &Credentials) -> Result<Box<dyn WellnessClient>>;
}
