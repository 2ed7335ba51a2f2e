//! # Domain Repositories
//!
//! Repository trait（インターフェース）定義
//!
//! ## 特徴
//!
//! - Domain層では実装を持たない（traitの定義のみ）
//! - Adapter層で具体的な実装を提供
//! - 依存性逆転の原則（DIP）を実現
//!
//! ## 構成要素
//!
//! - **session_repository**: セッションの永続化
//! - **wellness_client**: 外部ウェルネスAPIクライアントの境界

pub mod session_repository;
pub mod wellness_client;
