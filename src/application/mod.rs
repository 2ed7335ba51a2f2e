//! # Application Layer
//!
//! アプリケーション固有のビジネスフロー（ユースケース）
//!
//! ## 特徴
//!
//! - Domain層のエンティティとサービスを組み合わせてビジネスフローを実現
//! - Repository / Client traitに依存（実装には依存しない）
//! - HTTPやCLIなどの出力先は知らない
//!
//! ## 構成要素
//!
//! - **dto**: Data Transfer Object（レスポンスペイロード）
//! - **use_cases**: ユースケース

pub mod dto;
pub mod use_cases;
