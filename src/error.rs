//! Error types for the EJBCA client.
//!
//! This module defines all error types that can occur while talking to an
//! EJBCA server, separating transport failures (the request never completed)
//! from protocol failures (the server answered, but not with the expected
//! success value).

use std::path::PathBuf;

use thiserror::Error;

use crate::types::ocsp::OcspResponseStatus;

/// Result type alias using [`EjbcaError`].
pub type Result<T> = std::result::Result<T, EjbcaError>;

/// Errors that can occur during EJBCA client operations.
#[derive(Debug, Error)]
pub enum EjbcaError {
    /// A file referenced by a credential bundle does not exist.
    #[error("Credential file not found: {}", path.display())]
    CredentialFileNotFound {
        /// The offending path.
        path: PathBuf,
    },

    /// Connection, TLS handshake or timeout failure. Never retried.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// TLS configuration error (unreadable CA bundle, bad client identity).
    #[error("TLS error: {0}")]
    Tls(String),

    /// A REST API call returned something other than its success status.
    #[error("REST call '{operation}' failed with status {status}: {body}")]
    RestCallFailed {
        /// Operation name.
        operation: &'static str,
        /// HTTP status code.
        status: u16,
        /// Response body, lossily decoded.
        body: String,
    },

    /// EST simple enrollment was rejected.
    #[error("EST enrollment failed with status {status}: {body}")]
    EstEnrollmentFailed {
        /// HTTP status code.
        status: u16,
        /// Response body, lossily decoded.
        body: String,
    },

    /// EST CA certificate distribution was rejected.
    #[error("EST CA certificate fetch failed with status {status}: {body}")]
    EstFetchFailed {
        /// HTTP status code.
        status: u16,
        /// Response body, lossily decoded.
        body: String,
    },

    /// The OCSP responder returned a non-200 HTTP status.
    #[error("OCSP call failed with status {status}: {body}")]
    OcspCallFailed {
        /// HTTP status code.
        status: u16,
        /// Response body, lossily decoded.
        body: String,
    },

    /// The OCSP response carried a status other than `successful`.
    #[error("Unsuccessful OCSP query: {status:?}")]
    OcspQueryUnsuccessful {
        /// Embedded OCSP response status.
        status: OcspResponseStatus,
    },

    /// The certificate store lookup returned a non-200 status.
    #[error("Certificate search failed with status {status}")]
    CertSearchFailed {
        /// HTTP status code.
        status: u16,
    },

    /// Invalid client-side configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The server answered with the success status but an undecodable body.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// JSON encoding/decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base64 decoding error.
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// DER encoding/decoding error.
    #[error("DER error: {0}")]
    Der(#[from] der::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EjbcaError {
    /// Create a credential-file-not-found error.
    pub fn credential_file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::CredentialFileNotFound { path: path.into() }
    }

    /// Create a TLS error with the given message.
    pub fn tls(msg: impl Into<String>) -> Self {
        Self::Tls(msg.into())
    }

    /// Create a REST call failure.
    pub fn rest_call_failed(operation: &'static str, status: u16, body: impl Into<String>) -> Self {
        Self::RestCallFailed {
            operation,
            status,
            body: body.into(),
        }
    }

    /// Create an EST enrollment failure.
    pub fn est_enrollment_failed(status: u16, body: impl Into<String>) -> Self {
        Self::EstEnrollmentFailed {
            status,
            body: body.into(),
        }
    }

    /// Create an EST fetch failure.
    pub fn est_fetch_failed(status: u16, body: impl Into<String>) -> Self {
        Self::EstFetchFailed {
            status,
            body: body.into(),
        }
    }

    /// Create an OCSP call failure.
    pub fn ocsp_call_failed(status: u16, body: impl Into<String>) -> Self {
        Self::OcspCallFailed {
            status,
            body: body.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an invalid response error.
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Returns true if the request never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns the HTTP status code for protocol-level failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RestCallFailed { status, .. }
            | Self::EstEnrollmentFailed { status, .. }
            | Self::EstFetchFailed { status, .. }
            | Self::OcspCallFailed { status, .. }
            | Self::CertSearchFailed { status } => Some(*status),
            _ => None,
        }
    }
}
