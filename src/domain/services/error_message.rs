//! # Error Message Service
//!
//! 利用者に返すエラーメッセージとエラー種別の決定

use crate::domain::errors::WellnessError;

/// 資格情報が誤っている場合に返す固定メッセージ
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Email ou mot de passe incorrect.";

/// 分類できないエラーの種別名
pub const GENERIC_ERROR_TYPE: &str = "Exception";

/// エラーチェーン全体を1つの文字列にする（`outer: inner` 形式）
pub fn error_chain_to_string(e: &anyhow::Error) -> String {
    e.chain()
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join(": ")
}

/// 401 Unauthorized を示すメッセージかどうか
pub fn is_unauthorized_message(error_msg: &str) -> bool {
    error_msg.contains("401") && error_msg.contains("Unauthorized")
}

/// 利用者に返すメッセージ
///
/// 401 Unauthorized は固定メッセージに置き換え、それ以外はチェーン全体をそのまま返す
pub fn surface_message(e: &anyhow::Error) -> String {
    let error_msg = error_chain_to_string(e);
    if is_unauthorized_message(&error_msg) {
        INVALID_CREDENTIALS_MESSAGE.to_string()
    } else {
        error_msg
    }
}

/// 元のエラーの種別名
///
/// チェーンを外側から辿り、最初に分類できたものを使う
pub fn error_type(e: &anyhow::Error) -> String {
    for cause in e.chain() {
        if let Some(err) = cause.downcast_ref::<WellnessError>() {
            return err.type_name().to_string();
        }
        if cause.downcast_ref::<serde_json::Error>().is_some() {
            return "JSONDecodeError".to_string();
        }
        if cause.downcast_ref::<std::io::Error>().is_some() {
            return "OSError".to_string();
        }
    }
    GENERIC_ERROR_TYPE.to_string()
}
