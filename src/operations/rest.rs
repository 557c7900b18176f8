//! REST management API (`/ejbca/ejbca-rest-api/v1`).
//!
//! All calls run over HTTPS with the caller's credential bundle, normally a
//! client certificate authorized as an EJBCA administrator.

use reqwest::StatusCode;

use crate::client::EjbcaClient;
use crate::codec::{percent_encode_str, serial_hex};
use crate::credentials::Credentials;
use crate::error::{EjbcaError, Result};
use crate::transport::RequestEnvelope;
use crate::types::{content_types, EndEntity, KeystoreRequest, KeystoreResponse, RevocationStatus};

use super::{exchange, expect_status};

/// REST API adapter.
///
/// # Example
///
/// ```no_run
/// use ejbca_client::{Credentials, EjbcaClient, ServerTarget};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = EjbcaClient::new(ServerTarget::new("ca.example.com")?);
/// let creds = Credentials::builder()
///     .ca_bundle("/etc/ejbca/ca.pem")
///     .client_identity("/etc/ejbca/admin.pem", "/etc/ejbca/admin-key.pem")
///     .build()?;
///
/// let pem = client.rest().fetch_certificate("CN=ManagementCA", &creds).await?;
/// println!("{}", String::from_utf8_lossy(&pem));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RestApi<'a> {
    client: &'a EjbcaClient,
}

impl<'a> RestApi<'a> {
    pub(crate) fn new(client: &'a EjbcaClient) -> Self {
        Self { client }
    }

    /// Download the certificate of the CA named `subject_dn`.
    pub async fn fetch_certificate(
        &self,
        subject_dn: &str,
        credentials: &Credentials,
    ) -> Result<Vec<u8>> {
        let url = self.client.target().rest_url(&format!(
            "/ca/{}/certificate/download",
            percent_encode_str(subject_dn)
        ));

        let response = exchange(self.client, RequestEnvelope::get(url), Some(credentials)).await?;
        let response = expect_status(self.client, response, StatusCode::OK, |status, body| {
            EjbcaError::rest_call_failed("fetch_certificate", status, body)
        })?;

        Ok(response.body)
    }

    /// Revocation status of the certificate `serial` (big-endian bytes)
    /// issued by `issuer_dn`.
    pub async fn fetch_revocation_status(
        &self,
        issuer_dn: &str,
        serial: &[u8],
        credentials: &Credentials,
    ) -> Result<RevocationStatus> {
        let url = self.client.target().rest_url(&format!(
            "/certificate/{}/{}/revocationstatus",
            percent_encode_str(issuer_dn),
            serial_hex(serial)
        ));

        let response = exchange(self.client, RequestEnvelope::get(url), Some(credentials)).await?;
        let response = expect_status(self.client, response, StatusCode::OK, |status, body| {
            EjbcaError::rest_call_failed("fetch_revocation_status", status, body)
        })?;

        RevocationStatus::from_json(&response.body)
    }

    /// Register a new end entity.
    pub async fn add_end_entity(&self, entity: &EndEntity, credentials: &Credentials) -> Result<()> {
        let url = self.client.target().rest_url("/endentity");
        let request = RequestEnvelope::post(url, entity.to_json()?)
            .header("Accept", content_types::JSON)
            .header("Content-Type", content_types::JSON);

        let response = exchange(self.client, request, Some(credentials)).await?;
        expect_status(self.client, response, StatusCode::OK, |status, body| {
            EjbcaError::rest_call_failed("add_end_entity", status, body)
        })?;

        Ok(())
    }

    /// Delete the end entity `username`.
    pub async fn delete_end_entity(&self, username: &str, credentials: &Credentials) -> Result<()> {
        let url = self
            .client
            .target()
            .rest_url(&format!("/endentity/{}", percent_encode_str(username)));

        let response = exchange(self.client, RequestEnvelope::delete(url), Some(credentials)).await?;
        expect_status(self.client, response, StatusCode::OK, |status, body| {
            EjbcaError::rest_call_failed("delete_end_entity", status, body)
        })?;

        Ok(())
    }

    /// Have the CA generate a key and return it with its certificate in a
    /// keystore.
    ///
    /// Unlike the other REST calls, success is `201 Created`.
    pub async fn enroll_keystore(
        &self,
        username: &str,
        password: &str,
        key_alg: &str,
        key_spec: &str,
        credentials: &Credentials,
    ) -> Result<KeystoreResponse> {
        let url = self.client.target().rest_url("/certificate/enrollkeystore");
        let body = serde_json::to_vec(&KeystoreRequest {
            username,
            password,
            key_alg,
            key_spec,
        })?;
        let request = RequestEnvelope::post(url, body)
            .header("Accept", content_types::JSON)
            .header("Content-Type", content_types::JSON);

        let response = exchange(self.client, request, Some(credentials)).await?;
        let response = expect_status(self.client, response, StatusCode::CREATED, |status, body| {
            EjbcaError::rest_call_failed("enroll_keystore", status, body)
        })?;

        KeystoreResponse::from_json(&response.body)
    }
}
