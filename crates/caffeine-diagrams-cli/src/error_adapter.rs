//! Error adapter for converting CaffeineError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::{fmt, io};

use log::{Level, error, log_enabled};
use miette::Diagnostic as MietteDiagnostic;

use caffeine_diagrams::CaffeineError;

/// Adapter giving a [`CaffeineError`] a diagnostic code and help text.
pub struct ErrorAdapter<'a>(pub &'a CaffeineError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            CaffeineError::Io(_) => "caffeine::io",
            CaffeineError::Write { .. } => "caffeine::write",
            CaffeineError::InvalidDiagram(_) => "caffeine::diagram",
            CaffeineError::Layout(_) => "caffeine::layout",
            CaffeineError::Export(_) => "caffeine::export",
            CaffeineError::Config(_) => "caffeine::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            CaffeineError::Io(_) | CaffeineError::Write { .. } => {
                "check that the output directory is writable"
            }
            CaffeineError::Config(_) => {
                "check the configuration file passed with --config or found in the config search path"
            }
            CaffeineError::Export(_) => {
                "PNG output needs a positive `output.scale`; the graphviz engine needs `dot` on PATH"
            }
            CaffeineError::InvalidDiagram(_) | CaffeineError::Layout(_) => return None,
        };
        Some(Box::new(help))
    }
}

/// Render `err` as a miette graphical report.
pub fn render_report(err: &CaffeineError) -> String {
    let reporter = miette::GraphicalReportHandler::new();
    let mut writer = String::new();
    if reporter
        .render_report(&mut writer, &ErrorAdapter(err))
        .is_err()
    {
        // Formatting into a String only fails if a Display impl does
        return err.to_string();
    }
    writer
}

/// Reports a failed run. The report goes through the logger, or straight to
/// `stderr` when error logging is switched off.
///
/// # Errors
///
/// Returns the I/O error of writing to `stderr`.
pub fn report_failure(err: &CaffeineError, stderr: &mut impl io::Write) -> io::Result<()> {
    emit_report(&render_report(err), log_enabled!(Level::Error), stderr)
}

fn emit_report(report: &str, logging: bool, stderr: &mut impl io::Write) -> io::Result<()> {
    if logging {
        error!("{report}");
        Ok(())
    } else {
        writeln!(stderr, "{report}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_and_help() {
        let err = CaffeineError::Config("bad color".to_string());
        let adapter = ErrorAdapter(&err);
        assert_eq!(adapter.code().unwrap().to_string(), "caffeine::config");
        assert!(adapter.help().is_some());

        let err = CaffeineError::Layout("oops".to_string());
        assert!(ErrorAdapter(&err).help().is_none());
    }

    #[test]
    fn test_report_contains_message() {
        let err = CaffeineError::Layout("cluster laid out twice".to_string());
        let report = render_report(&err);
        assert!(report.contains("cluster laid out twice"));
        assert!(report.contains("caffeine::layout"));
    }

    #[test]
    fn test_report_reaches_stderr_without_logging() {
        let mut stderr: Vec<u8> = Vec::new();
        emit_report("caffeine::io output directory missing", false, &mut stderr).unwrap();
        let written = String::from_utf8(stderr).unwrap();
        assert!(written.contains("output directory missing"));
    }

    #[test]
    fn test_logged_report_skips_stderr() {
        let mut stderr: Vec<u8> = Vec::new();
        emit_report("caffeine::io output directory missing", true, &mut stderr).unwrap();
        assert!(stderr.is_empty());
    }
}
