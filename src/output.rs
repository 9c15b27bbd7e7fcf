// src/output.rs

//! JSON envelopes written to stdout.
//!
//! Success: `{"ok":true, ...payload}`. Failure:
//! `{"ok":false,"error":"<kind>","details":"<text>"}`. One compact line per
//! command.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::errors::AdapterError;
use crate::supervisor::{RunReport, StatusReport, StopReport};
use crate::types::StrategyDescriptor;

#[derive(Serialize)]
struct Success<'a, T: Serialize> {
    ok: bool,
    #[serde(flatten)]
    payload: &'a T,
}

#[derive(Serialize)]
struct Failure<'a> {
    ok: bool,
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

#[derive(Serialize)]
struct StatusPayload<'a> {
    state: &'a StatusReport,
}

#[derive(Serialize)]
struct StrategiesPayload<'a> {
    strategies: &'a [StrategyDescriptor],
}

/// Writes envelopes to any `Write` sink (stdout in production, a buffer in
/// tests).
pub struct JsonPrinter<W: Write> {
    out: W,
}

impl<W: Write> JsonPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn print_status(&mut self, report: &StatusReport) -> Result<()> {
        self.print_ok(&StatusPayload { state: report })
    }

    pub fn print_strategies(&mut self, strategies: &[StrategyDescriptor]) -> Result<()> {
        self.print_ok(&StrategiesPayload { strategies })
    }

    pub fn print_run(&mut self, report: &RunReport) -> Result<()> {
        self.print_ok(report)
    }

    pub fn print_stop(&mut self, report: &StopReport) -> Result<()> {
        self.print_ok(report)
    }

    pub fn print_error(&mut self, err: &AdapterError) -> Result<()> {
        let details = err.to_string();
        self.write_line(&Failure {
            ok: false,
            error: err.kind(),
            details: (!details.is_empty()).then_some(details),
        })
    }

    fn print_ok<T: Serialize>(&mut self, payload: &T) -> Result<()> {
        self.write_line(&Success { ok: true, payload })
    }

    fn write_line<T: Serialize>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer(&mut self.out, value).context("serializing JSON output")?;
        writeln!(self.out).context("writing JSON output")?;
        self.out.flush().context("flushing JSON output")?;
        Ok(())
    }
}
