//! CUPS client built on the `ipp` crate's blocking client.

use ipp::operation::IppOperation;
use ipp::prelude::*;
use std::io::Cursor;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::debug;

use super::{PrintError, PrintService};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const BANNER_MIME: &str = "application/vnd.cups-banner";

/// CUPS banner template that renders the standard test page.
const TEST_PAGE: &[u8] = b"#CUPS-BANNER\n\
Template test\n\
Show printer-name printer-info printer-location printer-make-and-model printer-driver-name \
printer-driver-version paper-size imageable-area job-id options time-at-creation time-at-processing\n\n";

#[derive(Debug, Clone)]
pub struct CupsClient {
    host: String,
    port: u16,
    user: String,
}

impl CupsClient {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        let user = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "folder_sync".into());
        Self { host: host.into(), port, user }
    }

    fn server_uri(&self) -> String {
        format!("ipp://{}:{}/", self.host, self.port)
    }

    fn printer_uri(&self, printer: &str) -> String {
        format!("ipp://{}:{}/printers/{}", self.host, self.port, printer)
    }

    fn send<O: IppOperation>(&self, uri: Uri, operation: O) -> Result<IppRequestResponse, PrintError> {
        debug!(%uri, "Sending IPP request");
        let response = IppClient::new(uri).send(operation)?;
        let status = response.header().status_code();
        if !status.is_success() {
            return Err(PrintError::Status(format!("{status:?}")));
        }
        Ok(response)
    }
}

fn parse_uri(uri: String) -> Result<Uri, PrintError> {
    uri.parse::<Uri>().map_err(|e| PrintError::Uri { reason: e.to_string(), uri })
}

impl PrintService for CupsClient {
    fn test_connection(&self) -> Result<(), PrintError> {
        let target = format!("{}:{}", self.host, self.port);
        let addrs = target
            .to_socket_addrs()
            .map_err(|source| PrintError::Connect { target: target.clone(), source })?;
        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT) {
                Ok(_) => return Ok(()),
                Err(e) => last_err = Some(e),
            }
        }
        Err(PrintError::Connect {
            target,
            source: last_err.unwrap_or_else(|| std::io::Error::other("no addresses resolved")),
        })
    }

    fn list_printers(&self) -> Result<Vec<String>, PrintError> {
        let uri = parse_uri(self.server_uri())?;
        let response = self.send(uri, IppOperationBuilder::cups().get_printers())?;
        Ok(response
            .attributes()
            .groups_of(DelimiterTag::PrinterAttributes)
            .filter_map(|g| g.attributes().get("printer-name"))
            .map(|a| a.value().to_string())
            .collect())
    }

    fn print_test_page(&self, printer: &str) -> Result<i32, PrintError> {
        let uri = parse_uri(self.printer_uri(printer))?;
        let operation = IppOperationBuilder::print_job(uri.clone(), IppPayload::new(Cursor::new(TEST_PAGE)))
            .user_name(&self.user)
            .job_title("Test Page")
            .document_format(BANNER_MIME)
            .build();
        let response = self.send(uri, operation)?;
        response
            .attributes()
            .groups_of(DelimiterTag::JobAttributes)
            .find_map(|g| g.attributes().get("job-id"))
            .and_then(|a| match a.value() {
                IppValue::Integer(id) => Some(*id),
                _ => None,
            })
            .ok_or(PrintError::MissingJobId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uris_point_at_configured_server() {
        let c = CupsClient::new("print.local", 8631);
        assert_eq!(c.server_uri(), "ipp://print.local:8631/");
        assert_eq!(c.printer_uri("lab"), "ipp://print.local:8631/printers/lab");
        assert!(parse_uri(c.printer_uri("lab")).is_ok());
    }

    #[test]
    fn malformed_host_is_a_uri_error() {
        let c = CupsClient::new("bad host", 631);
        assert!(matches!(c.list_printers(), Err(PrintError::Uri { .. })));
    }

    #[test]
    fn unreachable_server_fails_connection_test() {
        // Bind then drop a listener to get a port nothing listens on.
        let port = {
            let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap().port()
        };
        let c = CupsClient::new("127.0.0.1", port);
        assert!(matches!(c.test_connection(), Err(PrintError::Connect { .. })));
    }

    #[test]
    fn unreachable_server_fails_listing_with_ipp_error() {
        let port = {
            let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap().port()
        };
        let c = CupsClient::new("127.0.0.1", port);
        assert!(matches!(c.list_printers(), Err(PrintError::Ipp(_))));
    }
}
