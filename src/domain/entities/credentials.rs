//! # Credentials Entity
//!
//! ログイン資格情報（リクエストごとに渡され、永続化しない）

use std::fmt;

use thiserror::Error;

/// 資格情報が欠けている場合のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialsError {
    #[error("Missing email or password")]
    Missing,
}

/// ログイン資格情報
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// 任意入力から資格情報を組み立てる
    ///
    /// 空文字列は欠落として扱う。
    ///
    /// # Errors
    ///
    /// メールアドレスまたはパスワードが無い場合に `CredentialsError::Missing` を返す
    ///
    /// # 例
    ///
    /// ```
    /// use garmin_bridge::domain::entities::credentials::{Credentials, CredentialsError};
    ///
    /// let ok = Credentials::from_parts(Some("a@x.com".into()), Some("pw".into()));
    /// assert!(ok.is_ok());
    ///
    /// let missing = Credentials::from_parts(Some("a@x.com".into()), Some(String::new()));
    /// assert_eq!(missing.unwrap_err(), CredentialsError::Missing);
    /// ```
    pub fn from_parts(
        email: Option<String>,
        password: Option<String>,
    ) -> Result<Self, CredentialsError> {
        match (email, password) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Ok(Self { email, password })
            }
            _ => Err(CredentialsError::Missing),
        }
    }
}

// パスワードをログに出さない
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"********")
            .finish()
    }
}
