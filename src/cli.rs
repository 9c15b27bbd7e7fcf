// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `zapret-adapter`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "zapret-adapter",
    version,
    about = "zapret CLI adapter: inspect, switch and stop winws strategies.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to zapret-adapter.json (or a .toml config).
    ///
    /// Default: `ZAPRET_ADAPTER_CONFIG`, then `zapret-adapter.json` next to
    /// the executable.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `ZAPRET_ADAPTER_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show zapret status.
    Status,
    /// List available strategies.
    ListStrategies,
    /// Run selected strategy.
    RunStrategy {
        /// Strategy file name, e.g. "general (ALT3).bat".
        strategy: String,
    },
    /// Stop zapret processes.
    Stop,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_strategy_takes_file_name_and_global_config() {
        let args = CliArgs::try_parse_from([
            "zapret-adapter",
            "run-strategy",
            "--config",
            "cfg.json",
            "general (ALT3).bat",
        ])
        .unwrap();

        assert_eq!(args.config, Some(PathBuf::from("cfg.json")));
        assert_eq!(
            args.command,
            Command::RunStrategy {
                strategy: "general (ALT3).bat".into()
            }
        );
    }

    #[test]
    fn list_strategies_is_kebab_case() {
        let args = CliArgs::try_parse_from(["zapret-adapter", "list-strategies"]).unwrap();
        assert_eq!(args.command, Command::ListStrategies);
        assert!(args.config.is_none());
    }

    #[test]
    fn subcommand_is_required() {
        assert!(CliArgs::try_parse_from(["zapret-adapter"]).is_err());
    }
}
