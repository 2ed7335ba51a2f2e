//! # Driver Layer (Presentation)
//!
//! CLIとHTTPのトランスポートを提供
//!
//! ## 特徴
//!
//! - Use Caseを呼び出してビジネスフローを起動
//! - 依存性注入（DI）を行い、全てを組み立てる
//! - 処理結果を終了コード・ステータスコードに対応付ける
//!
//! ## 構成要素
//!
//! - **cli**: CLI引数のパース
//! - **invoke**: CLIトランスポート
//! - **http**: HTTPトランスポート（axum）
//! - **workflow**: 依存性の組み立て

pub mod cli;
pub mod http;
pub mod invoke;
pub mod workflow;

pub use cli::{Args, Command};
pub use workflow::WellnessWorkflow;
