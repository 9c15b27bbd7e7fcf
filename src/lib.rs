// src/lib.rs

pub mod app;
pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod output;
pub mod process;
pub mod state;
pub mod strategy;
pub mod supervisor;
pub mod types;

use anyhow::Result;

use crate::app::App;
use crate::cli::CliArgs;

/// High-level entry point used by `main.rs`.
///
/// Runs one command against the real system and writes its JSON result to
/// stdout. Returns the exit code.
pub async fn run(args: CliArgs) -> Result<i32> {
    let stdout = std::io::stdout();
    App::system().execute(&args, stdout.lock()).await
}
