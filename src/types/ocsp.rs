//! OCSP helpers ([RFC 6960]) over the `x509-ocsp` message types.
//!
//! Only what the client exchanges with the responder is built here: an
//! unsigned single-certificate request and the basic response type.
//!
//! [RFC 6960]: https://datatracker.ietf.org/doc/html/rfc6960

use chrono::{DateTime, Utc};
use const_oid::db::rfc5912::ID_SHA_256;
use const_oid::db::rfc6960::ID_PKIX_OCSP_BASIC;
use der::asn1::{Null, OctetString};
use der::{Any, Decode, Encode};
use sha2::{Digest, Sha256};
use spki::AlgorithmIdentifierOwned;
use x509_cert::ext::pkix::CrlReason;
use x509_cert::serial_number::SerialNumber;
use x509_cert::Certificate;

pub use x509_ocsp::{
    BasicOcspResponse, CertId, CertStatus, OcspGeneralizedTime, OcspRequest, OcspResponse,
    OcspResponseStatus, Request, ResponderId, ResponseBytes, ResponseData, RevokedInfo,
    SingleResponse, TbsRequest, Version,
};

use crate::error::{EjbcaError, Result};

/// Per-certificate status extracted from an OCSP response.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OcspCertStatus {
    /// The certificate is not revoked.
    Good,

    /// The certificate has been revoked.
    Revoked {
        /// When the certificate was revoked.
        revocation_time: DateTime<Utc>,
        /// Revocation reason, when the responder reports one.
        reason: Option<CrlReason>,
    },

    /// The responder does not know the certificate.
    Unknown,
}

impl OcspCertStatus {
    /// Check if the status is `Good`.
    pub fn is_good(&self) -> bool {
        matches!(self, Self::Good)
    }

    /// Check if the status is `Revoked`.
    pub fn is_revoked(&self) -> bool {
        matches!(self, Self::Revoked { .. })
    }
}

impl std::fmt::Display for OcspCertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Good => write!(f, "good"),
            Self::Revoked {
                revocation_time,
                reason: Some(reason),
            } => write!(f, "revoked at {} ({:?})", revocation_time, reason),
            Self::Revoked {
                revocation_time, ..
            } => write!(f, "revoked at {}", revocation_time),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl From<&CertStatus> for OcspCertStatus {
    fn from(status: &CertStatus) -> Self {
        match status {
            CertStatus::Good(_) => Self::Good,
            CertStatus::Revoked(info) => Self::Revoked {
                revocation_time: DateTime::<Utc>::from(info.revocation_time.0.to_system_time()),
                reason: info.revocation_reason,
            },
            CertStatus::Unknown(_) => Self::Unknown,
        }
    }
}

/// Identify `cert` by SHA-256 hashes of its issuer's name and public key.
///
/// `issuer` must be the certificate that signed `cert`.
pub fn sha256_cert_id(cert: &Certificate, issuer: &Certificate) -> Result<CertId> {
    let issuer_name = cert.tbs_certificate.issuer.to_der()?;
    let issuer_key = issuer
        .tbs_certificate
        .subject_public_key_info
        .subject_public_key
        .raw_bytes();

    Ok(CertId {
        hash_algorithm: AlgorithmIdentifierOwned {
            oid: ID_SHA_256,
            parameters: Some(Any::encode_from(&Null)?),
        },
        issuer_name_hash: OctetString::new(Sha256::digest(&issuer_name).to_vec())?,
        issuer_key_hash: OctetString::new(Sha256::digest(issuer_key).to_vec())?,
        serial_number: cert.tbs_certificate.serial_number.clone(),
    })
}

/// Unsigned request for a single certificate.
pub fn single_request(cert_id: CertId) -> OcspRequest {
    OcspRequest {
        tbs_request: TbsRequest {
            version: Version::V1,
            requestor_name: None,
            request_list: vec![Request {
                req_cert: cert_id,
                single_request_extensions: None,
            }],
            request_extensions: None,
        },
        optional_signature: None,
    }
}

/// Wrap a basic response in a `successful` envelope.
pub fn successful_response(basic: &BasicOcspResponse) -> Result<OcspResponse> {
    Ok(OcspResponse {
        response_status: OcspResponseStatus::Successful,
        response_bytes: Some(ResponseBytes {
            response_type: ID_PKIX_OCSP_BASIC,
            response: OctetString::new(basic.to_der()?)?,
        }),
    })
}

/// Response carrying only an error status.
pub fn unsuccessful_response(status: OcspResponseStatus) -> OcspResponse {
    OcspResponse {
        response_status: status,
        response_bytes: None,
    }
}

/// Decode the basic response carried by a `successful` envelope.
///
/// # Errors
///
/// [`EjbcaError::OcspQueryUnsuccessful`] for any other embedded status;
/// [`EjbcaError::InvalidResponse`] when the response bytes are missing or
/// not of the basic type.
pub fn basic_response(response: &OcspResponse) -> Result<BasicOcspResponse> {
    if response.response_status != OcspResponseStatus::Successful {
        return Err(EjbcaError::OcspQueryUnsuccessful {
            status: response.response_status,
        });
    }

    let bytes = response
        .response_bytes
        .as_ref()
        .ok_or_else(|| EjbcaError::invalid_response("successful OCSP response without body"))?;
    if bytes.response_type != ID_PKIX_OCSP_BASIC {
        return Err(EjbcaError::invalid_response(format!(
            "unsupported OCSP response type {}",
            bytes.response_type
        )));
    }

    Ok(BasicOcspResponse::from_der(bytes.response.as_bytes())?)
}

/// Status of the certificate with the given serial number.
pub fn status_for(basic: &BasicOcspResponse, serial: &SerialNumber) -> Result<OcspCertStatus> {
    basic
        .tbs_response_data
        .responses
        .iter()
        .find(|single| &single.cert_id.serial_number == serial)
        .map(|single| OcspCertStatus::from(&single.cert_status))
        .ok_or_else(|| {
            EjbcaError::invalid_response("OCSP response does not cover the requested certificate")
        })
}
