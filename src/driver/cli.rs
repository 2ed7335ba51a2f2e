//! CLI Argument Parsing
//!
//! CLIの引数解析

use clap::{Parser, Subcommand};

use crate::adapter::config::DEFAULT_CONFIG_PATH;

/// Garmin Connectのウェルネスデータを1つのJSONとして出力するCLI
#[derive(Parser, Debug, Clone)]
#[command(name = "garmin-bridge")]
#[command(about = "Fetch Garmin Connect wellness data as a single JSON payload", long_about = None)]
pub struct Args {
    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch once and print the payload to stdout
    Invoke {
        /// Garmin Connect account email
        email: Option<String>,
        /// Garmin Connect account password
        password: Option<String>,
    },
    /// Serve the payload over HTTP
    Serve {
        /// Address to listen on (defaults to the configured bind_address)
        #[arg(long)]
        bind: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_invoke() {
        let args = Args::parse_from(["garmin-bridge", "invoke", "a@x.com", "pw"]);
        assert_eq!(args.config, DEFAULT_CONFIG_PATH);
        assert_eq!(
            args.command,
            Command::Invoke {
                email: Some("a@x.com".to_string()),
                password: Some("pw".to_string()),
            }
        );
    }

    #[test]
    fn test_args_invoke_missing_password_still_parses() {
        // 欠落はパース段階ではなくユースケース側で検証する
        let args = Args::parse_from(["garmin-bridge", "invoke", "a@x.com"]);
        assert_eq!(
            args.command,
            Command::Invoke {
                email: Some("a@x.com".to_string()),
                password: None,
            }
        );
    }

    #[test]
    fn test_args_serve_default_bind() {
        let args = Args::parse_from(["garmin-bridge", "serve"]);
        assert_eq!(args.command, Command::Serve { bind: None });
    }

    #[test]
    fn test_args_serve_custom_bind() {
        let args = Args::parse_from(["garmin-bridge", "serve", "--bind", "0.0.0.0:9000"]);
        assert_eq!(
            args.command,
            Command::Serve {
                bind: Some("0.0.0.0:9000".to_string())
            }
        );
    }

    #[test]
    fn test_args_custom_config() {
        let args = Args::parse_from(["garmin-bridge", "-c", "/custom/config.json", "serve"]);
        assert_eq!(args.config, "/custom/config.json");
    }

    #[test]
    fn test_args_requires_subcommand() {
        assert!(Args::try_parse_from(["garmin-bridge"]).is_err());
    }
}
