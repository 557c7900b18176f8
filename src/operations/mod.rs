//! Protocol adapters.
//!
//! Each adapter borrows an [`EjbcaClient`](crate::EjbcaClient) and turns one
//! call into one exchange: build the request, send it through the transport,
//! check the status the protocol defines as success and decode the body.

pub mod certstore;
pub mod est;
pub mod ocsp;
pub mod rest;

pub use certstore::CertStoreApi;
pub use est::{EstApi, EstEnrollOptions};
pub use ocsp::OcspApi;
pub use rest::RestApi;

use reqwest::StatusCode;

use crate::client::EjbcaClient;
use crate::credentials::Credentials;
use crate::error::{EjbcaError, Result};
use crate::transport::{RequestEnvelope, ResponseEnvelope};

/// Trace, send and trace back one request.
pub(crate) async fn exchange(
    client: &EjbcaClient,
    request: RequestEnvelope,
    credentials: Option<&Credentials>,
) -> Result<ResponseEnvelope> {
    client.tracer().request(&request);
    let response = client.transport().invoke(&request, credentials).await?;
    client.tracer().response(&response);
    Ok(response)
}

/// Pass the response through if it carries `expected`, otherwise dump it
/// and build the operation's error from its status and body.
pub(crate) fn expect_status<F>(
    client: &EjbcaClient,
    response: ResponseEnvelope,
    expected: StatusCode,
    fail: F,
) -> Result<ResponseEnvelope>
where
    F: FnOnce(u16, String) -> EjbcaError,
{
    if response.status == expected {
        return Ok(response);
    }

    client.tracer().failure(&response);
    Err(fail(response.status_code(), response.body_text()))
}

/// Remove every `\n` from an EST body.
pub(crate) fn strip_newlines(mut body: Vec<u8>) -> Vec<u8> {
    body.retain(|b| *b != b'\n');
    body
}
