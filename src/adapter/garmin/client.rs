//! Garmin Connect Client
//!
//! WellnessClientのGarmin Connect実装
//!
//! SSOでサインインしてサービスチケットをWebセッションに交換し、
//! 以降は `/modern/proxy` 経由でJSONを読む。認証状態はクッキーだけで表される。

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info};
use reqwest::header::{ACCEPT, COOKIE, LOCATION, ORIGIN, REFERER};
use reqwest::redirect::Policy;
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::cookies::CookieJar;
use super::endpoints::{self, Endpoints};
use super::sso;
use crate::adapter::config::{redact_proxy_url, Config};
use crate::domain::entities::credentials::Credentials;
use crate::domain::entities::session::Session;
use crate::domain::errors::WellnessError;
use crate::domain::repositories::wellness_client::{WellnessClient, WellnessClientFactory};

/// チケット交換時に追うリダイレクトの上限
const MAX_REDIRECTS: usize = 10;

/// Webクライアントが送るヘッダー（無いと空レスポンスを返すエンドポイントがある）
const NK_HEADER: (&str, &str) = ("NK", "NT");

/// セッションに保存する認証状態
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct GarminSession {
    cookies: CookieJar,
    display_name: Option<String>,
    full_name: Option<String>,
}

fn connection_error(e: reqwest::Error) -> WellnessError {
    WellnessError::Connection(e.to_string())
}

/// 2xx 以外を `WellnessError::Http` にする
fn check_status(response: &Response) -> Result<(), WellnessError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    Err(WellnessError::Http {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        url: response.url().to_string(),
    })
}

fn parse_url(url: &str) -> Result<Url, WellnessError> {
    Url::parse(url).map_err(|e| WellnessError::InvalidResponse(format!("bad URL {}: {}", url, e)))
}

/// レスポンス本文をJSONとして読む（空本文と 204 は `null`）
fn parse_json_body(status: StatusCode, body: &str, url: &str) -> Result<Value, WellnessError> {
    if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body)
        .map_err(|e| WellnessError::InvalidResponse(format!("{} (from {})", e, url)))
}

/// Garmin Connect クライアント
pub struct GarminConnectClient {
    http: reqwest::Client,
    endpoints: Endpoints,
    credentials: Credentials,
    state: GarminSession,
}

impl GarminConnectClient {
    pub fn new(http: reqwest::Client, endpoints: Endpoints, credentials: Credentials) -> Self {
        Self {
            http,
            endpoints,
            credentials,
            state: GarminSession::default(),
        }
    }

    /// `url` のホストに送るクッキーを付ける
    fn with_cookies(&self, url: &Url, builder: RequestBuilder) -> RequestBuilder {
        let cookies = url
            .host_str()
            .and_then(|host| self.state.cookies.header_value(host));
        match cookies {
            Some(cookies) => builder.header(COOKIE, cookies),
            None => builder,
        }
    }

    fn absorb_cookies(&mut self, response: &Response) {
        if let Some(host) = response.url().host_str() {
            self.state.cookies.absorb(host, response.headers());
        }
    }

    fn require_display_name(&self) -> Result<&str> {
        self.state
            .display_name
            .as_deref()
            .ok_or_else(|| WellnessError::Session("not logged in: display name unknown".to_string()))
            .map_err(Into::into)
    }

    /// APIからJSONを取得
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = parse_url(&self.endpoints.proxy(path))?;
        debug!("GET {}", url);

        let response = self
            .with_cookies(&url, self.http.get(url.clone()).query(query))
            .header(NK_HEADER.0, NK_HEADER.1)
            .header(ACCEPT, "application/json")
            .header(ORIGIN, self.endpoints.connect_origin())
            .header(REFERER, self.endpoints.modern())
            .send()
            .await
            .map_err(connection_error)?;

        // 認証切れはログインページへのリダイレクトとして返ってくる
        if response.status().is_redirection() {
            return Err(WellnessError::Session(format!(
                "session expired: {} redirected to sign-in",
                url
            ))
            .into());
        }
        check_status(&response)?;

        let status = response.status();
        let body = response.text().await.map_err(connection_error)?;
        Ok(parse_json_body(status, &body, url.as_str())?)
    }

    /// ソーシャルプロフィールから表示名と氏名を読み込む
    async fn load_profile(&mut self) -> Result<()> {
        let profile = self.get_json(endpoints::SOCIAL_PROFILE, &[]).await?;

        let display_name = profile
            .get("displayName")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                WellnessError::InvalidResponse("social profile has no displayName".to_string())
            })?;
        self.state.full_name = profile
            .get("fullName")
            .and_then(Value::as_str)
            .map(str::to_string);
        self.state.display_name = Some(display_name);

        Ok(())
    }

    /// リダイレクトを手動で追い、途中のクッキーもすべて取り込む
    async fn follow_redirects(&mut self, start: Url) -> Result<()> {
        let mut url = start;

        for _ in 0..MAX_REDIRECTS {
            let response = self
                .with_cookies(&url, self.http.get(url.clone()))
                .send()
                .await
                .map_err(connection_error)?;
            self.absorb_cookies(&response);

            if !response.status().is_redirection() {
                check_status(&response)?;
                return Ok(());
            }

            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| {
                    WellnessError::InvalidResponse("redirect without Location header".to_string())
                })?;
            url = url
                .join(location)
                .map_err(|e| WellnessError::InvalidResponse(format!("bad redirect: {}", e)))?;
        }

        Err(WellnessError::InvalidResponse(format!(
            "more than {} redirects while exchanging service ticket",
            MAX_REDIRECTS
        ))
        .into())
    }

    async fn by_display_name(
        &self,
        path: impl FnOnce(&str) -> String,
        query: &[(&str, String)],
    ) -> Result<Value> {
        let path = path(self.require_display_name()?);
        self.get_json(&path, query).await
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[async_trait]
impl WellnessClient for GarminConnectClient {
    async fn resume(&mut self, session: &Session) -> Result<()> {
        let state: GarminSession = serde_json::from_value(session.payload.clone())
            .map_err(|e| WellnessError::Session(format!("unreadable session: {}", e)))?;
        if state.cookies.is_empty() {
            return Err(WellnessError::Session("session has no cookies".to_string()).into());
        }

        self.state = state;
        self.load_profile()
            .await
            .context("Stored session was not accepted")?;

        info!("Session restored for {:?}", self.state.display_name);
        Ok(())
    }

    async fn login(&mut self) -> Result<()> {
        self.state = GarminSession::default();
        let signin = parse_url(&self.endpoints.signin())?;
        let params = self.endpoints.signin_params();

        // 1. サインインページからCSRFトークンを取得
        let response = self
            .with_cookies(&signin, self.http.get(signin.clone()).query(&params))
            .send()
            .await
            .map_err(connection_error)?;
        self.absorb_cookies(&response);
        check_status(&response)?;
        let html = response.text().await.map_err(connection_error)?;
        let csrf = sso::extract_csrf(&html).ok_or_else(|| {
            WellnessError::Authentication("CSRF token not found on sign-in page".to_string())
        })?;

        // 2. 資格情報を送信してサービスチケットを受け取る
        let form = [
            ("username", self.credentials.email.as_str()),
            ("password", self.credentials.password.as_str()),
            ("embed", "false"),
            ("_csrf", csrf.as_str()),
        ];
        let response = self
            .with_cookies(&signin, self.http.post(signin.clone()).query(&params).form(&form))
            .header(ORIGIN, self.endpoints.sso_origin())
            .header(REFERER, signin.as_str())
            .send()
            .await
            .map_err(connection_error)?;
        self.absorb_cookies(&response);
        check_status(&response)?;
        let html = response.text().await.map_err(connection_error)?;
        let ticket = sso::ticket_from_signin(&html)?;
        debug!("Received service ticket");

        // 3. チケットをWebセッションに交換
        let exchange = Url::parse_with_params(&self.endpoints.modern(), &[("ticket", ticket)])
            .map_err(|e| WellnessError::InvalidResponse(format!("bad service URL: {}", e)))?;
        self.follow_redirects(exchange).await?;

        self.load_profile().await?;
        info!("Logged in as {:?}", self.state.display_name);
        Ok(())
    }

    fn dump_session(&self) -> Result<Session> {
        let payload = serde_json::to_value(&self.state).context("Failed to serialize session")?;
        Ok(Session::new(payload))
    }

    fn display_name(&self) -> Option<String> {
        self.state.display_name.clone()
    }

    async fn get_user_profile(&self) -> Result<Value> {
        self.get_json(endpoints::USER_SETTINGS, &[]).await
    }

    async fn get_devices(&self) -> Result<Value> {
        self.get_json(endpoints::DEVICES, &[]).await
    }

    async fn get_userprofile_settings(&self) -> Result<Value> {
        self.get_json(endpoints::USERPROFILE_SETTINGS, &[]).await
    }

    async fn get_full_name(&self) -> Result<Option<String>> {
        Ok(self.state.full_name.clone())
    }

    async fn get_activities(&self, start: u32, limit: u32) -> Result<Value> {
        self.get_json(
            endpoints::ACTIVITIES,
            &[("start", start.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    async fn get_stats(&self, date: NaiveDate) -> Result<Value> {
        self.by_display_name(
            endpoints::daily_summary,
            &[("calendarDate", date.to_string())],
        )
        .await
    }

    async fn get_hrv_data(&self, date: NaiveDate) -> Result<Value> {
        self.get_json(&endpoints::hrv(date), &[]).await
    }

    async fn get_steps_data(&self, date: NaiveDate) -> Result<Value> {
        self.by_display_name(endpoints::steps_chart, &[("date", date.to_string())])
            .await
    }

    async fn get_heart_rates(&self, date: NaiveDate) -> Result<Value> {
        self.by_display_name(endpoints::heart_rates, &[("date", date.to_string())])
            .await
    }

    async fn get_sleep_data(&self, date: NaiveDate) -> Result<Value> {
        self.by_display_name(
            endpoints::sleep,
            &[
                ("date", date.to_string()),
                (
                    "nonSleepBufferMinutes",
                    endpoints::SLEEP_BUFFER_MINUTES.to_string(),
                ),
            ],
        )
        .await
    }

    async fn get_stress_data(&self, date: NaiveDate) -> Result<Value> {
        self.get_json(&endpoints::stress(date), &[]).await
    }

    async fn get_body_battery(&self, date: NaiveDate) -> Result<Value> {
        self.get_json(
            endpoints::BODY_BATTERY,
            &[("startDate", date.to_string()), ("endDate", date.to_string())],
        )
        .await
    }
}

/// Garmin Connect クライアントのファクトリ
///
/// HTTPクライアントは1つを共有し、認証状態はクライアントごとに持つ
pub struct GarminClientFactory {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl GarminClientFactory {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(Policy::none());

        // データセンターのIPはGarmin側で拒否されることがあるため、プロキシを経由できる
        if let Some(proxy_url) = config.effective_proxy_url() {
            info!("Routing Garmin traffic through {}", redact_proxy_url(&proxy_url));
            let proxy = reqwest::Proxy::all(proxy_url.as_str())
                .map_err(connection_error)
                .context("Invalid proxy URL")?;
            builder = builder.proxy(proxy);
        }

        let http = builder
            .build()
            .map_err(connection_error)
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoints: Endpoints::new(&config.sso_url, &config.connect_url),
        })
    }
}

impl WellnessClientFactory for GarminClientFactory {
    fn create_client(&self, credentials: &Credentials) -> Result<Box<dyn WellnessClient>> {
        Ok(Box::new(GarminConnectClient::new(
            self.http.clone(),
            self.endpoints.clone(),
            credentials.clone(),
        )))
    }
}
