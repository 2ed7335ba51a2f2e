//! Configuration
//!
//! JSON設定ファイルの読み込み（ファイルが無ければデフォルト値）

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "./garmin-bridge.json";
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8787";
pub const DEFAULT_SSO_URL: &str = "https://sso.garmin.com";
pub const DEFAULT_CONNECT_URL: &str = "https://connect.garmin.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36";

/// 設定ファイルで未指定の場合に参照する環境変数
pub const PROXY_URL_ENV: &str = "PROXY_URL";

/// CLI実行時のセッション保存先
const CLI_SESSION_DIR: &str = "~/.garmin-bridge/sessions";

/// セッション保存先を決めるトランスポート種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Cli,
    Http,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// セッションファイルの保存先（未指定ならトランスポートごとのデフォルト）
    pub session_dir: Option<String>,
    pub bind_address: String,
    pub sso_url: String,
    pub connect_url: String,
    pub user_agent: String,
    /// Garmin への通信を経由させるプロキシ（未指定なら `PROXY_URL` 環境変数）
    pub proxy_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session_dir: None,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            sso_url: DEFAULT_SSO_URL.to_string(),
            connect_url: DEFAULT_CONNECT_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy_url: None,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;
        Ok(config)
    }

    /// 設定ファイルがあれば読み込み、無ければデフォルト値を返す
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            info!("Loading configuration from {}", path);
            Self::load(path)
        } else {
            info!("No configuration at {}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// 実際に使うプロキシURL（設定ファイル → `PROXY_URL` の順）
    pub fn effective_proxy_url(&self) -> Option<String> {
        self.proxy_url_or(std::env::var(PROXY_URL_ENV).ok())
    }

    fn proxy_url_or(&self, env_value: Option<String>) -> Option<String> {
        self.proxy_url
            .clone()
            .or(env_value)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
    }

    /// セッションファイルの保存先ディレクトリ
    ///
    /// CLIはホームディレクトリ配下、HTTPは書き込み可能な一時ディレクトリを使う
    pub fn session_dir_for(&self, transport: Transport) -> PathBuf {
        match (&self.session_dir, transport) {
            (Some(dir), _) => PathBuf::from(shellexpand::tilde(dir).as_ref()),
            (None, Transport::Cli) => PathBuf::from(shellexpand::tilde(CLI_SESSION_DIR).as_ref()),
            (None, Transport::Http) => std::env::temp_dir(),
        }
    }
}

/// ログ出力用にプロキシURLのパスワードを伏せる
pub fn redact_proxy_url(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(mut parsed) if parsed.password().is_some() => {
            if parsed.set_password(Some("***")).is_err() {
                return "<proxy>".to_string();
            }
            parsed.to_string()
        }
        Ok(parsed) => parsed.to_string(),
        Err(_) => "<unparseable proxy URL>".to_string(),
    }
}
