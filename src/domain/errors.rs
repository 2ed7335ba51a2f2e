//! # Domain Errors
//!
//! 外部クライアント（Garmin Connect）の型付きエラー

use thiserror::Error;

/// 外部クライアントのエラー
#[derive(Debug, Error)]
pub enum WellnessError {
    /// 2xx 以外のHTTPステータス
    #[error("{status} {} Error: {reason} for url: {url}", status_class(.status))]
    Http {
        status: u16,
        reason: String,
        url: String,
    },

    /// 認証フローの失敗（チケット取得失敗、MFA要求など）
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// 接続エラー
    #[error("Connection error: {0}")]
    Connection(String),

    /// 想定外のレスポンス
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// セッションの復元失敗
    #[error("Session error: {0}")]
    Session(String),
}

fn status_class(status: &u16) -> &'static str {
    if *status >= 500 {
        "Server"
    } else {
        "Client"
    }
}

impl WellnessError {
    /// レスポンスの `error_type` に使うエラー種別名
    pub fn type_name(&self) -> &'static str {
        match self {
            WellnessError::Http { .. } => "HTTPError",
            WellnessError::Authentication(_) => "AuthenticationError",
            WellnessError::Connection(_) => "ConnectionError",
            WellnessError::InvalidResponse(_) => "InvalidResponseError",
            WellnessError::Session(_) => "SessionError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_error_display() {
        let err = WellnessError::Http {
            status: 401,
            reason: "Unauthorized".to_string(),
            url: "https://sso.garmin.com/sso/signin".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "401 Client Error: Unauthorized for url: https://sso.garmin.com/sso/signin"
        );
    }

    #[test]
    fn test_http_server_error_display() {
        let err = WellnessError::Http {
            status: 503,
            reason: "Service Unavailable".to_string(),
            url: "https://connect.garmin.com/x".to_string(),
        };
        assert!(err.to_string().starts_with("503 Server Error"));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(
            WellnessError::Authentication("x".into()).type_name(),
            "AuthenticationError"
        );
        assert_eq!(
            WellnessError::Connection("x".into()).type_name(),
            "ConnectionError"
        );
        assert_eq!(
            WellnessError::InvalidResponse("x".into()).type_name(),
            "InvalidResponseError"
        );
        assert_eq!(WellnessError::Session("x".into()).type_name(), "SessionError");
    }
}
