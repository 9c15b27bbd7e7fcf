// src/app.rs

//! Command dispatch: config, supervisor, JSON envelope, exit code.

use std::io::Write;

use anyhow::Result;
use tracing::{debug, warn};

use crate::cli::{CliArgs, Command};
use crate::config::{install_dir, ConfigLoader};
use crate::output::JsonPrinter;
use crate::supervisor::{Services, Supervisor};

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

/// One adapter invocation, parameterised over its collaborators so tests can
/// swap in fakes for the process table and state store.
pub struct App {
    loader: ConfigLoader,
    services: Services,
}

impl App {
    pub fn new(loader: ConfigLoader, services: Services) -> Self {
        Self { loader, services }
    }

    /// Real process table and file-backed state, rooted at the directory of
    /// the running executable.
    pub fn system() -> Self {
        let base_dir = install_dir();
        Self::new(ConfigLoader::new(&base_dir), Services::system(&base_dir))
    }

    /// Execute `args`, writing exactly one JSON line to `out`.
    ///
    /// Returns the process exit code. `Err` is reserved for failures to write
    /// the envelope itself.
    pub async fn execute<W: Write>(&self, args: &CliArgs, out: W) -> Result<i32> {
        let mut printer = JsonPrinter::new(out);

        let config = match self.loader.load(args.config.as_deref()) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!(error = %err, kind = err.kind(), "configuration rejected");
                printer.print_error(&err)?;
                return Ok(EXIT_FAILURE);
            }
        };
        debug!(zapret_path = %config.zapret_path().display(), command = ?args.command, "dispatching");

        let supervisor = Supervisor::new(config, self.services.clone());

        match &args.command {
            Command::Status => {
                printer.print_status(&supervisor.status())?;
                Ok(EXIT_OK)
            }
            Command::ListStrategies => {
                printer.print_strategies(&supervisor.list_strategies())?;
                Ok(EXIT_OK)
            }
            Command::RunStrategy { strategy } => match supervisor.run(strategy).await {
                Ok(report) => {
                    printer.print_run(&report)?;
                    Ok(EXIT_OK)
                }
                Err(err) => {
                    printer.print_error(&err)?;
                    Ok(EXIT_FAILURE)
                }
            },
            Command::Stop => {
                printer.print_stop(&supervisor.stop().await)?;
                Ok(EXIT_OK)
            }
        }
    }
}
