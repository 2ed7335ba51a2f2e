//! Adapter Layer
//!
//! 外部システム（Garmin Connect, ファイルシステム）との統合

pub mod config;
pub mod garmin;
pub mod repositories;
