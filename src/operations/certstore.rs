//! RFC 4387 certificate store (`/ejbca/publicweb/certificates/search.cgi`).

use der::Decode;
use x509_cert::name::Name;
use x509_cert::Certificate;

use crate::client::EjbcaClient;
use crate::codec::{canonicalize_dn, index_hash};
use crate::error::{EjbcaError, Result};
use crate::transport::RequestEnvelope;

use super::exchange;

/// Certificate-store adapter. Lookups go over plain HTTP with no client
/// credentials.
#[derive(Debug, Clone, Copy)]
pub struct CertStoreApi<'a> {
    client: &'a EjbcaClient,
}

impl<'a> CertStoreApi<'a> {
    pub(crate) fn new(client: &'a EjbcaClient) -> Self {
        Self { client }
    }

    /// Find the certificate whose subject is `subject`.
    ///
    /// With `ldap_order` the name is reduced to C, O and CN in that order
    /// before hashing, matching how EJBCA indexes subjects.
    pub async fn search_by_subject(&self, subject: &Name, ldap_order: bool) -> Result<Certificate> {
        let name = canonicalize_dn(subject, ldap_order)?;
        let hash = index_hash(&name)?;

        let url = self.client.target().search_url(&hash);
        let response = exchange(self.client, RequestEnvelope::get(url), None).await?;

        if response.status != reqwest::StatusCode::OK {
            self.client.tracer().failure(&response);
            return Err(EjbcaError::CertSearchFailed {
                status: response.status_code(),
            });
        }

        Ok(Certificate::from_der(&response.body)?)
    }
}
