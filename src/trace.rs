//! Wire-level diagnostics.
//!
//! When enabled, every adapter reports the request line, headers and text
//! body it sends and the status and body it receives. When disabled, only
//! failed exchanges are reported. Events go to the `ejbca_client::wire`
//! target; installing a subscriber is left to the application.

use crate::codec::local_url;
use crate::transport::{RequestEnvelope, ResponseEnvelope};

/// Per-client diagnostic switch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WireTracer {
    enabled: bool,
}

impl WireTracer {
    /// Create a tracer.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Whether full tracing is on.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Report an outbound request.
    pub fn request(&self, request: &RequestEnvelope) {
        if !self.enabled {
            return;
        }

        tracing::info!(target: "ejbca_client::wire", "{} {}", request.method, local_url(&request.url));
        for (name, value) in &request.headers {
            tracing::info!(target: "ejbca_client::wire", "{}: {}", name, redact(name, value));
        }
        if let Some(ref body) = request.body {
            tracing::info!(target: "ejbca_client::wire", "\n{}", render_body(body));
        }
    }

    /// Report a response, if tracing is on.
    pub fn response(&self, response: &ResponseEnvelope) {
        if self.enabled {
            tracing::info!(
                target: "ejbca_client::wire",
                "{}\n{}",
                status_line(response),
                render_body(&response.body)
            );
        }
    }

    /// Report a response that failed the caller's success check.
    ///
    /// With tracing on the response was already reported by
    /// [`response`](Self::response), so nothing more is emitted.
    pub fn failure(&self, response: &ResponseEnvelope) {
        if !self.enabled {
            tracing::warn!(
                target: "ejbca_client::wire",
                "{}\n{}",
                status_line(response),
                render_body(&response.body)
            );
        }
    }
}

fn status_line(response: &ResponseEnvelope) -> String {
    format!(
        "{} {}",
        response.status.as_u16(),
        response.status.canonical_reason().unwrap_or("")
    )
}

fn redact<'a>(name: &str, value: &'a str) -> &'a str {
    if name.eq_ignore_ascii_case("authorization") {
        "<redacted>"
    } else {
        value
    }
}

/// Text bodies verbatim; anything else as a byte count.
fn render_body(body: &[u8]) -> String {
    match std::str::from_utf8(body) {
        Ok(text) if is_printable(text) => text.to_string(),
        _ => format!("<{} bytes of binary data>", body.len()),
    }
}

fn is_printable(text: &str) -> bool {
    text.chars()
        .all(|c| !c.is_control() || c == '\n' || c == '\r' || c == '\t')
}
