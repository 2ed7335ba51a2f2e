//! # Data Transfer Objects
//!
//! トランスポート（HTTP / CLI）に渡すレスポンス表現

pub mod response_payload;
