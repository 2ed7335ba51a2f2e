//! Garmin Connect Adapter
//!
//! WellnessClientのGarmin Connect実装（SSOログイン、クッキー、エンドポイント）

pub mod client;
pub mod cookies;
pub mod endpoints;
pub mod sso;

pub use client::{GarminClientFactory, GarminConnectClient};
