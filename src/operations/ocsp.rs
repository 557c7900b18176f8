//! OCSP status queries (`/ejbca/publicweb/status/ocsp`).

use der::{Decode, Encode};
use reqwest::StatusCode;
use x509_cert::Certificate;

use crate::client::EjbcaClient;
use crate::codec::{base64_encode, percent_encode_str};
use crate::error::{EjbcaError, Result};
use crate::transport::RequestEnvelope;
use crate::types::content_types;
use crate::types::ocsp::{basic_response, sha256_cert_id, single_request, status_for, OcspResponse};
use crate::types::OcspCertStatus;

use super::{exchange, expect_status};

/// OCSP adapter. Queries go over plain HTTP with no client credentials.
#[derive(Debug, Clone, Copy)]
pub struct OcspApi<'a> {
    client: &'a EjbcaClient,
}

impl<'a> OcspApi<'a> {
    pub(crate) fn new(client: &'a EjbcaClient) -> Self {
        Self { client }
    }

    /// Status of `cert`, which must have been issued by `issuer`.
    ///
    /// # Errors
    ///
    /// [`EjbcaError::OcspCallFailed`] when the HTTP status is not 200;
    /// [`EjbcaError::OcspQueryUnsuccessful`] when the responder answers 200
    /// with any embedded status but `successful`.
    pub async fn get_status(&self, cert: &Certificate, issuer: &Certificate) -> Result<OcspCertStatus> {
        let request_der = single_request(sha256_cert_id(cert, issuer)?).to_der()?;
        let encoded = percent_encode_str(&base64_encode(&request_der));

        let url = self.client.target().ocsp_url(&encoded);
        let request = RequestEnvelope::get(url).header("Content-Type", content_types::OCSP_REQUEST);

        let response = exchange(self.client, request, None).await?;
        let response = expect_status(self.client, response, StatusCode::OK, EjbcaError::ocsp_call_failed)?;

        let ocsp_response = OcspResponse::from_der(&response.body)?;
        let basic = match basic_response(&ocsp_response) {
            Ok(basic) => basic,
            Err(e) => {
                self.client.tracer().failure(&response);
                return Err(e);
            }
        };

        status_for(&basic, &cert.tbs_certificate.serial_number)
    }
}
