//! Garmin Bridge
//!
//! Garmin Connect のウェルネスデータを CLI または HTTP で返す

// coverage_nightly cfg が設定されている場合のみ coverage_attribute を有効化
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use anyhow::Result;
use clap::Parser;

use garmin_bridge::adapter::config::Config;
use garmin_bridge::driver::{Args, WellnessWorkflow};

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() -> Result<()> {
    // ログは stderr に出す（stdout はペイロード専用）
    env_logger::init();

    let args = Args::parse();

    // Load configuration
    let config = Config::load_or_default(&args.config)?;

    // Create workflow with injected dependencies
    let workflow = WellnessWorkflow::new(config);

    let exit_code = workflow.execute(args.command).await?;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
