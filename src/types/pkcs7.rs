//! PKCS#7/CMS parsing utilities.
//!
//! EST answers `cacerts` and `simpleenroll` with a base64 "certs-only"
//! SignedData. The adapters hand those bodies back as bytes; these helpers
//! turn them into certificates for callers that want them.

use cms::cert::CertificateChoices;
use cms::content_info::ContentInfo;
use cms::signed_data::SignedData;
use const_oid::db::rfc5911::ID_SIGNED_DATA;
use der::Decode;
use x509_cert::Certificate;

use crate::codec::base64_decode;
use crate::error::{EjbcaError, Result};

/// Collection of CA certificates returned from the EST `cacerts` endpoint.
#[derive(Debug, Clone)]
pub struct CaCertificates {
    /// The CA certificates.
    pub certificates: Vec<Certificate>,
}

impl CaCertificates {
    /// Create a new CA certificates collection.
    pub fn new(certificates: Vec<Certificate>) -> Self {
        Self { certificates }
    }

    /// Decode a newline-stripped EST `cacerts` body.
    pub fn from_est_body(body: &[u8]) -> Result<Self> {
        parse_certs_only(body).map(Self::new)
    }

    /// Returns true if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    /// Returns the number of certificates.
    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    /// Iterate over the certificates.
    pub fn iter(&self) -> impl Iterator<Item = &Certificate> {
        self.certificates.iter()
    }
}

impl IntoIterator for CaCertificates {
    type Item = Certificate;
    type IntoIter = std::vec::IntoIter<Certificate>;

    fn into_iter(self) -> Self::IntoIter {
        self.certificates.into_iter()
    }
}

/// Parse a base64 PKCS#7 certs-only body.
///
/// Whitespace inside the base64 text is ignored, so bodies with or without
/// line breaks are accepted.
pub fn parse_certs_only(body: &[u8]) -> Result<Vec<Certificate>> {
    let der_bytes = base64_decode(body)?;

    let content_info = ContentInfo::from_der(&der_bytes)?;
    if content_info.content_type != ID_SIGNED_DATA {
        return Err(EjbcaError::invalid_response(format!(
            "Expected SignedData, got {}",
            content_info.content_type
        )));
    }

    let signed_data: SignedData = content_info.content.decode_as()?;

    let Some(cert_set) = signed_data.certificates else {
        return Ok(Vec::new());
    };

    let mut certificates = Vec::new();
    for choice in cert_set.0.into_vec() {
        match choice {
            CertificateChoices::Certificate(cert) => certificates.push(cert),
            CertificateChoices::Other(_) => {
                tracing::warn!("Skipping non-X.509 certificate in PKCS#7 bundle");
            }
        }
    }

    Ok(certificates)
}
