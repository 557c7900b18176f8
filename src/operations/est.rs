// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 U.S. Federal Government (in countries where recognized)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! EST enrollment (`/.well-known/est/{alias}`).
//!
//! Both operations return the server's base64 PKCS#7 body with every `\n`
//! removed; [`parse_certs_only`](crate::types::parse_certs_only) turns it
//! into certificates.

use base64::prelude::*;
use reqwest::StatusCode;
use url::Url;

use crate::client::EjbcaClient;
use crate::credentials::Credentials;
use crate::error::{EjbcaError, Result};
use crate::transport::RequestEnvelope;
use crate::types::{content_types, operations};

use super::{exchange, expect_status, strip_newlines};

/// How a simple enrollment authenticates.
///
/// The default is client mode: the TLS client certificate (if any) is the
/// only authentication. Registration-authority mode adds HTTP Basic auth
/// with the end entity's username and enrollment password.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EstEnrollOptions {
    ra_mode: bool,
    username: Option<String>,
    password: Option<String>,
    url: Option<Url>,
}

impl EstEnrollOptions {
    /// Client mode, default URL.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registration-authority mode with Basic auth.
    pub fn registration_authority(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            ra_mode: true,
            username: Some(username.into()),
            password: Some(password.into()),
            url: None,
        }
    }

    /// Switch between client mode (`false`) and RA mode (`true`).
    pub fn ra_mode(mut self, enabled: bool) -> Self {
        self.ra_mode = enabled;
        self
    }

    /// Basic auth username, used in RA mode.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Basic auth password, used in RA mode.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Post to this URL instead of the target's `simpleenroll` URL.
    pub fn url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    /// Whether RA mode is on.
    pub fn is_ra_mode(&self) -> bool {
        self.ra_mode
    }

    /// The `Authorization` header value, or `None` in client mode.
    ///
    /// # Errors
    ///
    /// [`EjbcaError::Configuration`] in RA mode unless both username and
    /// password are set.
    fn authorization(&self) -> Result<Option<String>> {
        if !self.ra_mode {
            return Ok(None);
        }

        match (&self.username, &self.password) {
            (Some(username), Some(password)) => {
                let token = BASE64_STANDARD.encode(format!("{}:{}", username, password));
                Ok(Some(format!("Basic {}", token)))
            }
            _ => Err(EjbcaError::config(
                "registration-authority mode requires username and password",
            )),
        }
    }
}

/// EST adapter.
#[derive(Debug, Clone, Copy)]
pub struct EstApi<'a> {
    client: &'a EjbcaClient,
}

impl<'a> EstApi<'a> {
    pub(crate) fn new(client: &'a EjbcaClient) -> Self {
        Self { client }
    }

    /// Enroll for a certificate.
    ///
    /// `csr` is sent exactly as given; EJBCA expects the base64 text of a
    /// DER PKCS#10 request.
    ///
    /// # Errors
    ///
    /// [`EjbcaError::Configuration`] before anything is sent if RA mode lacks
    /// a username or password; [`EjbcaError::EstEnrollmentFailed`] for any
    /// status but 200.
    pub async fn simple_enroll(
        &self,
        csr: &[u8],
        credentials: &Credentials,
        options: &EstEnrollOptions,
    ) -> Result<Vec<u8>> {
        let authorization = options.authorization()?;

        let url = match options.url {
            Some(ref url) => url.clone(),
            None => self.client.target().est_url(operations::SIMPLE_ENROLL),
        };

        let mut request = RequestEnvelope::post(url, csr.to_vec())
            .header("Accept", content_types::PKCS7_CERTS_ONLY)
            .header("Content-Type", content_types::PKCS10)
            .header("Content-Transfer-Encoding", content_types::BASE64_TRANSFER);
        if let Some(authorization) = authorization {
            request = request.header("Authorization", authorization);
        }

        let response = exchange(self.client, request, Some(credentials)).await?;
        let response = expect_status(self.client, response, StatusCode::OK, EjbcaError::est_enrollment_failed)?;

        Ok(strip_newlines(response.body))
    }

    /// Fetch the CA certificates.
    pub async fn ca_certs(&self, credentials: &Credentials) -> Result<Vec<u8>> {
        let url = self.client.target().est_url(operations::CACERTS);
        let request = RequestEnvelope::get(url)
            .header("Accept", content_types::PKCS7_MIME)
            .header("Content-Type", content_types::PKCS7_MIME)
            .header("Content-Transfer-Encoding", content_types::BASE64_TRANSFER);

        let response = exchange(self.client, request, Some(credentials)).await?;
        let response = expect_status(self.client, response, StatusCode::OK, EjbcaError::est_fetch_failed)?;

        Ok(strip_newlines(response.body))
    }
}
