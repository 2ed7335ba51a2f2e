//! # Domain Services
//!
//! エンティティに属さないビジネスルール
//!
//! - **history_window**: 履歴取得対象の日付範囲
//! - **error_message**: エラーメッセージの正規化

pub mod error_message;
pub mod history_window;
