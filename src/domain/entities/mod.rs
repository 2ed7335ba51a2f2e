//! # Domain Entities
//!
//! ビジネスエンティティとバリューオブジェクトを定義するモジュール
//!
//! ## エンティティ
//!
//! - **Credentials**: ログイン資格情報（永続化しない）
//! - **Session / SessionKey**: 認証済みセッションとその保存キー
//! - **WellnessReport**: 集約されたウェルネスデータ

pub mod credentials;
pub mod session;
pub mod wellness_report;
