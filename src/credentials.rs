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

//! TLS credential bundles.
//!
//! A [`Credentials`] value describes how one call authenticates the server
//! and, optionally, itself. It only holds file paths; the files are read when
//! the transport builds the per-call HTTP client.

use std::path::{Path, PathBuf};

use crate::error::{EjbcaError, Result};

/// Credential bundle used for a single REST or EST call.
///
/// Every referenced file must exist when the bundle is built or when a path
/// is reassigned. The bundle is borrowed for the duration of a call and never
/// retained by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    verify_required: bool,
    ca_bundle_path: Option<PathBuf>,
    client_cert_path: Option<PathBuf>,
    client_key_path: Option<PathBuf>,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            verify_required: true,
            ca_bundle_path: None,
            client_cert_path: None,
            client_key_path: None,
        }
    }
}

impl Credentials {
    /// Create a new credentials builder.
    pub fn builder() -> CredentialsBuilder {
        CredentialsBuilder::default()
    }

    /// Build a bundle from the four fields, checking every supplied path.
    pub fn new(
        verify_required: bool,
        ca_bundle_path: Option<PathBuf>,
        client_cert_path: Option<PathBuf>,
        client_key_path: Option<PathBuf>,
    ) -> Result<Self> {
        check_file(ca_bundle_path.as_deref())?;
        check_file(client_cert_path.as_deref())?;
        check_file(client_key_path.as_deref())?;

        Ok(Self {
            verify_required,
            ca_bundle_path,
            client_cert_path,
            client_key_path,
        })
    }

    /// Credentials that skip server verification and present no client
    /// certificate (insecure, for testing only).
    pub fn insecure() -> Self {
        Self {
            verify_required: false,
            ..Self::default()
        }
    }

    /// Whether the server certificate is verified.
    pub fn verify_required(&self) -> bool {
        self.verify_required
    }

    /// Path to the PEM CA bundle used for server verification.
    pub fn ca_bundle_path(&self) -> Option<&Path> {
        self.ca_bundle_path.as_deref()
    }

    /// Path to the PEM client certificate.
    pub fn client_cert_path(&self) -> Option<&Path> {
        self.client_cert_path.as_deref()
    }

    /// Path to the PEM client private key.
    pub fn client_key_path(&self) -> Option<&Path> {
        self.client_key_path.as_deref()
    }

    /// Returns true if both halves of a client identity are configured.
    pub fn has_client_identity(&self) -> bool {
        self.client_cert_path.is_some() && self.client_key_path.is_some()
    }

    /// Enable or disable server certificate verification.
    pub fn set_verify_required(&mut self, verify: bool) {
        self.verify_required = verify;
    }

    /// Replace the CA bundle path.
    pub fn set_ca_bundle_path(&mut self, path: Option<PathBuf>) -> Result<()> {
        check_file(path.as_deref())?;
        self.ca_bundle_path = path;
        Ok(())
    }

    /// Replace the client certificate path.
    pub fn set_client_cert_path(&mut self, path: Option<PathBuf>) -> Result<()> {
        check_file(path.as_deref())?;
        self.client_cert_path = path;
        Ok(())
    }

    /// Replace the client key path.
    pub fn set_client_key_path(&mut self, path: Option<PathBuf>) -> Result<()> {
        check_file(path.as_deref())?;
        self.client_key_path = path;
        Ok(())
    }
}

/// Builder for [`Credentials`].
#[derive(Debug, Default)]
pub struct CredentialsBuilder {
    verify_required: Option<bool>,
    ca_bundle_path: Option<PathBuf>,
    client_cert_path: Option<PathBuf>,
    client_key_path: Option<PathBuf>,
}

impl CredentialsBuilder {
    /// Require (or skip) server certificate verification. Default: required.
    pub fn verify_required(mut self, verify: bool) -> Self {
        self.verify_required = Some(verify);
        self
    }

    /// Verify the server against the CA certificates in this PEM file.
    pub fn ca_bundle(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_bundle_path = Some(path.into());
        self
    }

    /// Present this PEM certificate during the TLS handshake.
    pub fn client_cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.client_cert_path = Some(path.into());
        self
    }

    /// Private key matching the client certificate.
    pub fn client_key(mut self, path: impl Into<PathBuf>) -> Self {
        self.client_key_path = Some(path.into());
        self
    }

    /// Set both halves of the client identity.
    pub fn client_identity(self, cert: impl Into<PathBuf>, key: impl Into<PathBuf>) -> Self {
        self.client_cert(cert).client_key(key)
    }

    /// Build the bundle.
    ///
    /// # Errors
    ///
    /// Returns [`EjbcaError::CredentialFileNotFound`] for the first supplied
    /// path that does not exist.
    pub fn build(self) -> Result<Credentials> {
        Credentials::new(
            self.verify_required.unwrap_or(true),
            self.ca_bundle_path,
            self.client_cert_path,
            self.client_key_path,
        )
    }
}

fn check_file(path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) if !path.exists() => Err(EjbcaError::credential_file_not_found(path)),
        _ => Ok(()),
    }
}
