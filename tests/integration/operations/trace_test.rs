//! Wire tracing output, captured from a local subscriber

use std::io;
use std::sync::{Arc, Mutex};

use crate::integration::{MockCaServer, PATH_SIMPLEENROLL};
use ejbca_client::{Credentials, EjbcaError, EstEnrollOptions};
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

const CSR_BASE64: &str = "MIIBWjCBxAIBADAbMRkwFwYDVQQDDBBkZXZpY2UuZXhhbXBsZS5jb20=";

/// Shared buffer the fmt layer writes into
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run one RA-mode enrollment against a server answering `status`, returning
/// the result and everything logged under the wire target.
async fn enroll_and_capture(trace: bool, status: u16, body: &str) -> (Result<Vec<u8>, EjbcaError>, String) {
    let mock = MockCaServer::start().await;
    Mock::given(method("POST"))
        .and(path(PATH_SIMPLEENROLL))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(mock.inner())
        .await;

    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("ejbca_client::wire=info"))
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let options = EstEnrollOptions::registration_authority("alice", "foo123");
    let result = mock
        .client_with_trace(trace)
        .est()
        .simple_enroll(CSR_BASE64.as_bytes(), &Credentials::insecure(), &options)
        .await;

    (result, captured.text())
}

#[tokio::test(flavor = "current_thread")]
async fn test_trace_on_logs_request_and_response() {
    let (result, log) = enroll_and_capture(true, 200, "MIIC").await;
    assert!(result.is_ok());

    assert!(log.contains(&format!("POST {}", PATH_SIMPLEENROLL)), "{log}");
    assert!(log.contains("Content-Type: application/pkcs10"), "{log}");
    assert!(log.contains(CSR_BASE64), "{log}");
    assert!(log.contains("200 OK"), "{log}");
    assert!(log.contains("ejbca_client::wire"), "{log}");
}

#[tokio::test(flavor = "current_thread")]
async fn test_trace_on_redacts_authorization() {
    let (_, log) = enroll_and_capture(true, 200, "MIIC").await;

    assert!(log.contains("Authorization: <redacted>"), "{log}");
    assert!(!log.contains("YWxpY2U6Zm9vMTIz"), "{log}");
}

#[tokio::test(flavor = "current_thread")]
async fn test_trace_on_reports_failure_once() {
    let (result, log) = enroll_and_capture(true, 500, "enrollment rejected").await;
    assert!(matches!(result, Err(EjbcaError::EstEnrollmentFailed { status: 500, .. })));

    assert_eq!(log.matches("500 Internal Server Error").count(), 1, "{log}");
    assert!(!log.contains("WARN"), "{log}");
}

#[tokio::test(flavor = "current_thread")]
async fn test_trace_off_is_silent_on_success() {
    let (result, log) = enroll_and_capture(false, 200, "MIIC").await;
    assert!(result.is_ok());

    assert!(log.is_empty(), "{log}");
}

#[tokio::test(flavor = "current_thread")]
async fn test_trace_off_dumps_failed_response() {
    let (result, log) = enroll_and_capture(false, 500, "enrollment rejected").await;
    assert!(matches!(result, Err(EjbcaError::EstEnrollmentFailed { status: 500, .. })));

    assert!(log.contains("WARN"), "{log}");
    assert!(log.contains("500 Internal Server Error"), "{log}");
    assert!(log.contains("enrollment rejected"), "{log}");
    assert!(!log.contains(&format!("POST {}", PATH_SIMPLEENROLL)), "{log}");
    assert!(!log.contains("Authorization"), "{log}");
}
