//! # Use Cases
//!
//! アプリケーションのビジネスフロー（ユースケース）
//!
//! ## ユースケース
//!
//! - **ResolveSessionUseCase**: 保存済みセッションの再利用とフルログインへのフォールバック
//! - **AggregateWellnessUseCase**: ウェルネスデータの取得と集約
//! - **FetchWellnessUseCase**: 入力検証から集約までの共通オーケストレーション

pub mod aggregate_wellness;
pub mod fetch_wellness;
pub mod resolve_session;
