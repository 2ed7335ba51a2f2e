//! # Session Entity
//!
//! 認証済みセッション（外部クライアントが定義する不透明な状態）と保存キー

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// 認証済みセッション
///
/// `payload` の中身は外部クライアントだけが解釈する
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// クライアント固有の状態
    pub payload: serde_json::Value,
    /// セッションをダンプした時刻
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// 現在時刻でセッションを作成
    pub fn new(payload: serde_json::Value) -> Self {
        Self {
            payload,
            created_at: Utc::now(),
        }
    }
}

/// セッション保存キー
///
/// メールアドレスをそのままパスに使わず、SHA-256 の16進表現を使う
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey(String);

impl SessionKey {
    /// メールアドレスからキーを導出
    ///
    /// 前後の空白を除き小文字化してからハッシュする
    pub fn from_email(email: &str) -> Self {
        let normalized = email.trim().to_lowercase();
        let digest = Sha256::digest(normalized.as_bytes());
        Self(format!("{:x}", digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
