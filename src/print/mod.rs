//! Print-service collaborator used only for startup diagnostics.
//!
//! The sync engine never calls into this module. When printing is enabled the
//! application checks the print server, lists its printers and optionally
//! submits a test page before the first scan pass.

pub mod cups;

use thiserror::Error;
use tracing::info;

use crate::config::PrintSettings;

pub use cups::CupsClient;

#[derive(Debug, Error)]
pub enum PrintError {
    #[error("cannot connect to print server at {target}: {source}")]
    Connect {
        target: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid print server URI '{uri}': {reason}")]
    Uri { uri: String, reason: String },
    #[error("IPP request failed: {0}")]
    Ipp(#[from] ipp::error::IppError),
    #[error("print server returned IPP status {0}")]
    Status(String),
    #[error("print server accepted the job but returned no job-id")]
    MissingJobId,
    #[error("a printer name is required to print a test page")]
    NoPrinter,
}

/// Narrow interface to a print server.
pub trait PrintService {
    /// Check the server is reachable.
    fn test_connection(&self) -> Result<(), PrintError>;
    /// Names of the printers the server knows.
    fn list_printers(&self) -> Result<Vec<String>, PrintError>;
    /// Submit a test page; returns the job id.
    fn print_test_page(&self, printer: &str) -> Result<i32, PrintError>;
}

/// What the diagnostics found.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DiagnosticsReport {
    pub printers: Vec<String>,
    /// The configured printer was among `printers`
    pub configured_found: bool,
    pub test_job: Option<i32>,
}

/// Run the startup diagnostics against `service`. No-op when printing is disabled.
pub fn run_diagnostics(
    service: &dyn PrintService,
    settings: &PrintSettings,
) -> Result<DiagnosticsReport, PrintError> {
    let mut report = DiagnosticsReport::default();
    if !settings.enabled {
        return Ok(report);
    }

    service.test_connection()?;
    info!(host = %settings.host, port = settings.port, "Connected to print server");

    report.printers = service.list_printers()?;
    for printer in &report.printers {
        let configured = settings.printer.as_deref() == Some(printer.as_str());
        if configured {
            report.configured_found = true;
        }
        info!(printer = %printer, configured, "Found printer");
    }

    if settings.test_page {
        let printer = settings.printer.as_deref().ok_or(PrintError::NoPrinter)?;
        let job = service.print_test_page(printer)?;
        info!(printer, job, "Submitted test page");
        report.test_job = Some(job);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeService {
        calls: RefCell<Vec<String>>,
        printers: Vec<String>,
        refuse: bool,
    }

    impl PrintService for FakeService {
        fn test_connection(&self) -> Result<(), PrintError> {
            self.calls.borrow_mut().push("test".into());
            if self.refuse {
                return Err(PrintError::Connect {
                    target: "fake:631".into(),
                    source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
                });
            }
            Ok(())
        }
        fn list_printers(&self) -> Result<Vec<String>, PrintError> {
            self.calls.borrow_mut().push("list".into());
            Ok(self.printers.clone())
        }
        fn print_test_page(&self, printer: &str) -> Result<i32, PrintError> {
            self.calls.borrow_mut().push(format!("print:{printer}"));
            Ok(7)
        }
    }

    fn settings(printer: Option<&str>, test_page: bool) -> PrintSettings {
        PrintSettings {
            enabled: true,
            printer: printer.map(String::from),
            test_page,
            ..Default::default()
        }
    }

    #[test]
    fn disabled_makes_no_calls() {
        let svc = FakeService::default();
        let report = run_diagnostics(&svc, &PrintSettings::default()).unwrap();
        assert_eq!(report, DiagnosticsReport::default());
        assert!(svc.calls.borrow().is_empty());
    }

    #[test]
    fn lists_and_marks_configured_printer_then_prints() {
        let svc = FakeService {
            printers: vec!["office".into(), "lab".into()],
            ..Default::default()
        };
        let report = run_diagnostics(&svc, &settings(Some("lab"), true)).unwrap();
        assert!(report.configured_found);
        assert_eq!(report.test_job, Some(7));
        assert_eq!(*svc.calls.borrow(), ["test", "list", "print:lab"]);
    }

    #[test]
    fn test_page_without_printer_is_an_error() {
        let svc = FakeService::default();
        let err = run_diagnostics(&svc, &settings(None, true)).unwrap_err();
        assert!(matches!(err, PrintError::NoPrinter));
    }

    #[test]
    fn connection_failure_stops_early() {
        let svc = FakeService { refuse: true, ..Default::default() };
        assert!(run_diagnostics(&svc, &settings(Some("lab"), true)).is_err());
        assert_eq!(*svc.calls.borrow(), ["test"]);
    }
}
