//! Revocation status as reported by the REST API.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::error::{EjbcaError, Result};

/// Timestamp format used by the REST API for `revocation_date`.
const REVOCATION_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Revocation status of a certificate.
///
/// Reason, date and message only exist for revoked certificates; the enum
/// makes that invariant structural.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevocationStatus {
    /// The certificate is not revoked.
    NotRevoked,

    /// The certificate has been revoked.
    Revoked(RevocationDetails),
}

/// Details accompanying a revoked status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevocationDetails {
    /// Revocation reason, e.g. `KEY_COMPROMISE`.
    pub reason: String,

    /// When the certificate was revoked.
    pub date: DateTime<Utc>,

    /// Free-text message from the server.
    pub message: Option<String>,
}

impl RevocationStatus {
    /// Check if the certificate is revoked.
    pub fn is_revoked(&self) -> bool {
        matches!(self, Self::Revoked(_))
    }

    /// Revocation reason, if revoked.
    pub fn reason(&self) -> Option<&str> {
        self.details().map(|d| d.reason.as_str())
    }

    /// Revocation date, if revoked.
    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.details().map(|d| d.date)
    }

    /// Server message, if revoked and present.
    pub fn message(&self) -> Option<&str> {
        self.details().and_then(|d| d.message.as_deref())
    }

    /// Revocation details, if revoked.
    pub fn details(&self) -> Option<&RevocationDetails> {
        match self {
            Self::NotRevoked => None,
            Self::Revoked(details) => Some(details),
        }
    }

    /// Decode a `revocationstatus` JSON body.
    ///
    /// For a certificate that is not revoked every other field is ignored,
    /// whatever the server put there. A revoked status must carry a reason
    /// and a parseable date.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        let wire: WireRevocationStatus = serde_json::from_slice(body)?;

        if !wire.revoked {
            return Ok(Self::NotRevoked);
        }

        let reason = wire
            .revocation_reason
            .ok_or_else(|| EjbcaError::invalid_response("revoked status without revocation_reason"))?;
        let date = wire
            .revocation_date
            .ok_or_else(|| EjbcaError::invalid_response("revoked status without revocation_date"))?;
        let date = parse_revocation_date(&date)?;

        Ok(Self::Revoked(RevocationDetails {
            reason,
            date,
            message: wire.message,
        }))
    }
}

#[derive(Debug, Deserialize)]
struct WireRevocationStatus {
    revoked: bool,
    #[serde(default)]
    revocation_reason: Option<String>,
    #[serde(default)]
    revocation_date: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

fn parse_revocation_date(date: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(date, REVOCATION_DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| EjbcaError::invalid_response(format!("bad revocation_date '{}': {}", date, e)))
}
