//! # Aggregate Wellness Use Case
//!
//! 認証済みクライアントから決められた順序でデータを取得し、1つのレポートにまとめる
//!
//! 取得は1件ずつ順番に行う。失敗の扱いは段階ごとに異なる：
//!
//! - プロフィール・デバイス・設定・名前・アクティビティ：失敗したら集約全体を中断
//! - 28日分の履歴：日ごとに独立。統計が取れない日はスキップし、HRVが取れない日は `null`
//! - 当日の高解像度データ：失敗したら集約全体を中断
//!
//! 中断するエラーには取得段階を前置する（`Failed to fetch devices: 404 Client Error: ...`）。
//! レスポンスの `error` はこの前置きを含むチェーン全体をそのまま返す。

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate};
use log::{debug, info};

use crate::domain::entities::wellness_report::{
    DailyRecord, Identity, WellnessReport, WellnessSnapshot,
};
use crate::domain::repositories::wellness_client::WellnessClient;
use crate::domain::services::history_window::{yesterday, HistoryWindow};

/// 取得するアクティビティの件数
pub const ACTIVITY_LIMIT: u32 = 50;

/// ウェルネスデータ集約ユースケース
#[derive(Debug, Default)]
pub struct AggregateWellnessUseCase;

impl AggregateWellnessUseCase {
    /// 新しいユースケースを作成
    pub fn new() -> Self {
        Self
    }

    /// データを取得して集約する
    ///
    /// # Arguments
    ///
    /// * `client` - 認証済みクライアント
    /// * `now` - 集約時刻（今日の日付とタイムスタンプに使う）
    ///
    /// # Errors
    ///
    /// 履歴ループ以外の取得に失敗した場合にエラーを返す
    pub async fn execute(
        &self,
        client: &dyn WellnessClient,
        now: DateTime<Local>,
    ) -> Result<WellnessReport> {
        let today = now.date_naive();

        let profile = client
            .get_user_profile()
            .await
            .context("Failed to fetch user profile")?;
        let devices = client.get_devices().await.context("Failed to fetch devices")?;
        let settings = client
            .get_userprofile_settings()
            .await
            .context("Failed to fetch user settings")?;
        let full_name = client
            .get_full_name()
            .await
            .context("Failed to fetch full name")?;
        let identity = Identity {
            full_name,
            display_name: client.display_name(),
        };

        let activities = client
            .get_activities(0, ACTIVITY_LIMIT)
            .await
            .context("Failed to fetch activities")?;

        let history = self.collect_history(client, today).await;
        info!(
            "Collected {} of {} history days",
            history.len(),
            HistoryWindow::ending(today).len()
        );

        let wellness = self.fetch_current_day(client, today).await?;

        Ok(WellnessReport {
            timestamp: now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            profile,
            identity,
            devices,
            settings,
            activities,
            wellness,
            history,
        })
    }

    /// 28日分の履歴を集める（collect-or-skip）
    ///
    /// 1日の失敗が他の日に影響することはない
    pub async fn collect_history(
        &self,
        client: &dyn WellnessClient,
        today: NaiveDate,
    ) -> Vec<DailyRecord> {
        let window = HistoryWindow::ending(today);
        let mut history = Vec::with_capacity(window.len());

        for date in window.dates() {
            let stats = match client.get_stats(date).await {
                Ok(stats) => stats,
                Err(e) => {
                    debug!("Skipping {}: stats unavailable: {:#}", date, e);
                    continue;
                }
            };

            let hrv = match client.get_hrv_data(date).await {
                Ok(hrv) => Some(hrv),
                Err(e) => {
                    debug!("No HRV for {}: {:#}", date, e);
                    None
                }
            };

            history.push(DailyRecord { date, stats, hrv });
        }

        history
    }

    async fn fetch_current_day(
        &self,
        client: &dyn WellnessClient,
        today: NaiveDate,
    ) -> Result<WellnessSnapshot> {
        let steps = client
            .get_steps_data(today)
            .await
            .context("Failed to fetch steps")?;
        let steps_yesterday = client
            .get_steps_data(yesterday(today))
            .await
            .context("Failed to fetch yesterday's steps")?;
        let heart_rate = client
            .get_heart_rates(today)
            .await
            .context("Failed to fetch heart rate")?;
        let sleep = client
            .get_sleep_data(today)
            .await
            .context("Failed to fetch sleep data")?;
        let stress = client
            .get_stress_data(today)
            .await
            .context("Failed to fetch stress data")?;
        let body_battery = client
            .get_body_battery(today)
            .await
            .context("Failed to fetch body battery")?;

        Ok(WellnessSnapshot {
            date: today,
            steps,
            steps_yesterday,
            heart_rate,
            sleep,
            stress,
            body_battery,
        })
    }
}
