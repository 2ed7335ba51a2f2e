//! # WellnessReport Entity
//!
//! 集約されたウェルネスデータのドメインエンティティ
//!
//! 上流の値（プロフィール、統計、HRVなど）は `serde_json::Value` のまま保持し、
//! 変換せずにそのまま出力する。

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 1日分の履歴レコード
///
/// 統計の取得に成功した日だけが作られる
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub stats: serde_json::Value,
    /// HRVの取得に失敗した日は `None`（JSONでは `null`）
    pub hrv: Option<serde_json::Value>,
}

/// ユーザーの表示名情報
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}

/// 当日の高解像度データ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellnessSnapshot {
    pub date: NaiveDate,
    pub steps: serde_json::Value,
    pub steps_yesterday: serde_json::Value,
    pub heart_rate: serde_json::Value,
    pub sleep: serde_json::Value,
    pub stress: serde_json::Value,
    pub body_battery: serde_json::Value,
}

/// 集約結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellnessReport {
    /// 集約時刻（ローカル時刻、ISO-8601）
    pub timestamp: String,
    pub profile: serde_json::Value,
    pub identity: Identity,
    pub devices: serde_json::Value,
    pub settings: serde_json::Value,
    pub activities: serde_json::Value,
    pub wellness: WellnessSnapshot,
    /// 新しい日付から順に並ぶ
    pub history: Vec<DailyRecord>,
}
