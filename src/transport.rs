//! Single-shot HTTP exchange.
//!
//! The adapters describe a request as a [`RequestEnvelope`], hand it to the
//! [`TransportInvoker`] together with the call's credentials, and get back a
//! [`ResponseEnvelope`] for any completed exchange, whatever its status.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use url::Url;

use crate::credentials::Credentials;
use crate::error::Result;
use crate::tls::build_http_client;

/// Connect timeout applied to every call.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

/// An outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEnvelope {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL.
    pub url: Url,
    /// Headers, in the order they are sent.
    pub headers: Vec<(&'static str, String)>,
    /// Request body.
    pub body: Option<Vec<u8>>,
}

impl RequestEnvelope {
    /// Create a request without headers or body.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    /// GET `url`.
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// POST `body` to `url`.
    pub fn post(url: Url, body: Vec<u8>) -> Self {
        Self::new(Method::POST, url).body(body)
    }

    /// DELETE `url`.
    pub fn delete(url: Url) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Append a header.
    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Set the body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }
}

/// A completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw body.
    pub body: Vec<u8>,
}

impl ResponseEnvelope {
    /// Status code as a number.
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Body decoded as UTF-8, with invalid sequences replaced.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Performs exactly one HTTP request per call.
///
/// No retries are attempted; connection, TLS and timeout failures surface
/// as [`EjbcaError::Transport`](crate::EjbcaError::Transport) and non-2xx
/// statuses are returned to the caller as ordinary responses.
#[derive(Debug, Clone)]
pub struct TransportInvoker {
    connect_timeout: Duration,
}

impl Default for TransportInvoker {
    fn default() -> Self {
        Self::new()
    }
}

impl TransportInvoker {
    /// Create an invoker with the fixed connect timeout.
    pub fn new() -> Self {
        Self {
            connect_timeout: CONNECT_TIMEOUT,
        }
    }

    /// Connect timeout used for every call.
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Send `request`, using `credentials` for TLS when given.
    pub async fn invoke(
        &self,
        request: &RequestEnvelope,
        credentials: Option<&Credentials>,
    ) -> Result<ResponseEnvelope> {
        let http = build_http_client(credentials, self.connect_timeout)?;

        tracing::debug!("{} {}", request.method, request.url);

        let mut builder = http.request(request.method.clone(), request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        if let Some(ref body) = request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        tracing::debug!("{} {} -> {}", request.method, request.url, status);

        Ok(ResponseEnvelope {
            status,
            headers,
            body,
        })
    }
}
