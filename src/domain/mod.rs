//! # Domain Layer
//!
//! このモジュールはビジネスの核心的なルールとエンティティを定義します。
//!
//! ## 特徴
//!
//! - HTTPやファイルシステムの詳細を知らない
//! - Garmin Connect のプロトコルについて何も知らない
//! - 上流のデータは不透明な JSON としてそのまま扱う
//!
//! ## 構成要素
//!
//! - **entities**: ビジネスエンティティ（Credentials, Session, WellnessReportなど）
//! - **errors**: 外部クライアントの型付きエラー
//! - **repositories**: Repository / Collaborator trait（インターフェース定義のみ）
//! - **services**: Domain Service（履歴ウィンドウ、エラーメッセージ正規化）

pub mod entities;
pub mod errors;
pub mod repositories;
pub mod services;
