//! 統合テスト用のフェイククライアント
//!
//! 上流APIの代わりに固定のJSONを返す

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

use garmin_bridge::domain::entities::credentials::Credentials;
use garmin_bridge::domain::entities::session::Session;
use garmin_bridge::domain::errors::WellnessError;
use garmin_bridge::domain::repositories::wellness_client::{
    WellnessClient, WellnessClientFactory,
};

pub const TOKEN: &str = "fake-token";

pub fn now() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 12, 25, 10, 0, 0).unwrap()
}

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, day).unwrap()
}

/// フェイクの振る舞い
#[derive(Debug, Clone, Default)]
pub struct Behavior {
    /// 統計の取得に失敗する日
    pub failing_stats: Vec<NaiveDate>,
    /// ログインを 401 で拒否する
    pub reject_login: bool,
}

/// 呼び出しの記録
#[derive(Debug, Default)]
pub struct Calls {
    pub logins: usize,
    pub resumes: usize,
}

pub struct FakeClient {
    behavior: Behavior,
    calls: Arc<Mutex<Calls>>,
    logged_in: bool,
}

#[async_trait]
impl WellnessClient for FakeClient {
    async fn resume(&mut self, session: &Session) -> Result<()> {
        self.calls.lock().unwrap().resumes += 1;
        if session.payload["token"] == TOKEN {
            self.logged_in = true;
            Ok(())
        } else {
            Err(WellnessError::Session("unknown token".to_string()).into())
        }
    }

    async fn login(&mut self) -> Result<()> {
        self.calls.lock().unwrap().logins += 1;
        if self.behavior.reject_login {
            return Err(WellnessError::Http {
                status: 401,
                reason: "Unauthorized".to_string(),
                url: "https://sso.garmin.com/sso/signin".to_string(),
            }
            .into());
        }
        self.logged_in = true;
        Ok(())
    }

    fn dump_session(&self) -> Result<Session> {
        Ok(Session::new(json!({ "token": TOKEN })))
    }

    fn display_name(&self) -> Option<String> {
        self.logged_in.then(|| "jdoe".to_string())
    }

    async fn get_user_profile(&self) -> Result<Value> {
        Ok(json!({"id": 42}))
    }

    async fn get_devices(&self) -> Result<Value> {
        Ok(json!([{"deviceId": 1}]))
    }

    async fn get_userprofile_settings(&self) -> Result<Value> {
        Ok(json!({"units": "metric"}))
    }

    async fn get_full_name(&self) -> Result<Option<String>> {
        Ok(Some("Jane Doe".to_string()))
    }

    async fn get_activities(&self, _start: u32, limit: u32) -> Result<Value> {
        Ok(json!({ "limit": limit }))
    }

    async fn get_stats(&self, date: NaiveDate) -> Result<Value> {
        if self.behavior.failing_stats.contains(&date) {
            return Err(WellnessError::Http {
                status: 500,
                reason: "Internal Server Error".to_string(),
                url: format!("https://connect.garmin.com/stats/{}", date),
            }
            .into());
        }
        Ok(json!({ "calendarDate": date.to_string() }))
    }

    async fn get_hrv_data(&self, _date: NaiveDate) -> Result<Value> {
        Ok(Value::Null)
    }

    async fn get_steps_data(&self, date: NaiveDate) -> Result<Value> {
        Ok(json!([{ "date": date.to_string(), "steps": 100 }]))
    }

    async fn get_heart_rates(&self, _date: NaiveDate) -> Result<Value> {
        Ok(json!({"restingHeartRate": 55}))
    }

    async fn get_sleep_data(&self, _date: NaiveDate) -> Result<Value> {
        Ok(json!({"sleepTimeSeconds": 28800}))
    }

    async fn get_stress_data(&self, _date: NaiveDate) -> Result<Value> {
        Ok(json!({"avgStressLevel": 30}))
    }

    async fn get_body_battery(&self, _date: NaiveDate) -> Result<Value> {
        Ok(json!([]))
    }
}

/// フェイククライアントのファクトリ
#[derive(Default)]
pub struct FakeFactory {
    pub behavior: Behavior,
    pub calls: Arc<Mutex<Calls>>,
}

impl FakeFactory {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: Arc::default(),
        }
    }
}

impl WellnessClientFactory for FakeFactory {
    fn create_client(&self, _credentials: &Credentials) -> Result<Box<dyn WellnessClient>> {
        Ok(Box::new(FakeClient {
            behavior: self.behavior.clone(),
            calls: self.calls.clone(),
            logged_in: false,
        }))
    }
}
