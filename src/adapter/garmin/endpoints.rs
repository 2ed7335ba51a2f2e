//! Garmin Connect Endpoints
//!
//! SSO と Connect API のURL組み立て

use chrono::NaiveDate;

pub const SOCIAL_PROFILE: &str = "/userprofile-service/socialProfile";
pub const USER_SETTINGS: &str = "/userprofile-service/userprofile/user-settings";
pub const USERPROFILE_SETTINGS: &str = "/userprofile-service/userprofile/settings";
pub const DEVICES: &str = "/device-service/deviceregistration/devices";
pub const ACTIVITIES: &str = "/activitylist-service/activities/search/activities";
pub const BODY_BATTERY: &str = "/wellness-service/wellness/bodyBattery/reports/daily";

/// 睡眠データ取得時の前後バッファ（分）
pub const SLEEP_BUFFER_MINUTES: &str = "60";

/// ベースURLを保持してURLを組み立てる
#[derive(Debug, Clone)]
pub struct Endpoints {
    sso_url: String,
    connect_url: String,
}

impl Endpoints {
    pub fn new(sso_url: &str, connect_url: &str) -> Self {
        Self {
            sso_url: sso_url.trim_end_matches('/').to_string(),
            connect_url: connect_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn sso_origin(&self) -> &str {
        &self.sso_url
    }

    pub fn connect_origin(&self) -> &str {
        &self.connect_url
    }

    /// SSOサインインページ
    pub fn signin(&self) -> String {
        format!("{}/sso/signin", self.sso_url)
    }

    /// Webアプリのトップ（サービスチケットの受け取り先）
    pub fn modern(&self) -> String {
        format!("{}/modern/", self.connect_url)
    }

    /// APIプロキシ経由のURL
    pub fn proxy(&self, path: &str) -> String {
        format!("{}/modern/proxy{}", self.connect_url, path)
    }

    /// サインインに付けるクエリパラメータ
    pub fn signin_params(&self) -> Vec<(&'static str, String)> {
        let modern = self.modern();
        vec![
            ("service", modern.clone()),
            ("webhost", modern.clone()),
            ("source", format!("{}/signin/", self.connect_url)),
            ("redirectAfterAccountLoginUrl", modern.clone()),
            ("redirectAfterAccountCreationUrl", modern),
            ("gauthHost", format!("{}/sso", self.sso_url)),
            ("locale", "en_US".to_string()),
            ("id", "gauth-widget".to_string()),
            ("clientId", "GarminConnect".to_string()),
            ("consumeServiceTicket", "false".to_string()),
            ("generateExtraServiceTicket", "true".to_string()),
        ]
    }
}

pub fn daily_summary(display_name: &str) -> String {
    format!("/usersummary-service/usersummary/daily/{}", display_name)
}

pub fn hrv(date: NaiveDate) -> String {
    format!("/hrv-service/hrv/{}", date)
}

pub fn steps_chart(display_name: &str) -> String {
    format!("/wellness-service/wellness/dailySummaryChart/{}", display_name)
}

pub fn heart_rates(display_name: &str) -> String {
    format!("/wellness-service/wellness/dailyHeartRate/{}", display_name)
}

pub fn sleep(display_name: &str) -> String {
    format!("/wellness-service/wellness/dailySleepData/{}", display_name)
}

pub fn stress(date: NaiveDate) -> String {
    format!("/wellness-service/wellness/dailyStress/{}", date)
}
