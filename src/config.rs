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

//! Configuration types for the EJBCA client.
//!
//! [`ServerTarget`] names the CA server every adapter talks to and knows how
//! to build each protocol's URLs. [`ClientConfig`] is the on-disk TOML form
//! used by the command-line tool:
//!
//! ```toml
//! [server]
//! hostname = "ca.example.com"
//! est_alias = "est"
//!
//! [credentials]
//! verify = true
//! ca_bundle = "/etc/ejbca/ca-bundle.pem"
//! client_cert = "/etc/ejbca/superadmin.pem"
//! client_key = "/etc/ejbca/superadmin-key.pem"
//!
//! [diagnostics]
//! trace = false
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::credentials::Credentials;
use crate::error::{EjbcaError, Result};
use crate::types::paths;

/// Default EST alias configured on EJBCA.
pub const DEFAULT_EST_ALIAS: &str = "est";

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "EJBCA_CLIENT_CONFIG";

/// The CA server targeted by a client.
///
/// REST and EST calls go to the TLS base (`https://{hostname}` by default);
/// OCSP and certificate-store lookups go to the plain base
/// (`http://{hostname}`). Either base may be overridden, e.g. to reach a
/// server behind a non-standard port or a test double.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerTarget {
    hostname: String,
    est_alias: String,
    tls_base: Url,
    plain_base: Url,
}

impl ServerTarget {
    /// Target `hostname` with the default EST alias.
    pub fn new(hostname: impl Into<String>) -> Result<Self> {
        Self::builder().hostname(hostname).build()
    }

    /// Create a new target builder.
    pub fn builder() -> ServerTargetBuilder {
        ServerTargetBuilder::default()
    }

    /// Server hostname (optionally with `:port`).
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// EST alias.
    pub fn est_alias(&self) -> &str {
        &self.est_alias
    }

    /// Base URL for REST and EST calls.
    pub fn tls_base(&self) -> &Url {
        &self.tls_base
    }

    /// Base URL for OCSP and certificate-store calls.
    pub fn plain_base(&self) -> &Url {
        &self.plain_base
    }

    /// Build a REST API URL. `path` must already be percent-encoded.
    pub fn rest_url(&self, path: &str) -> Url {
        with_path(&self.tls_base, &format!("{}{}", paths::REST_API, path))
    }

    /// Build the URL for an EST operation under the configured alias.
    pub fn est_url(&self, operation: &str) -> Url {
        with_path(
            &self.tls_base,
            &format!("{}/{}/{}", paths::EST, self.est_alias, operation),
        )
    }

    /// Build the OCSP GET URL for an already-encoded request.
    pub fn ocsp_url(&self, encoded_request: &str) -> Url {
        with_path(
            &self.plain_base,
            &format!("{}/{}", paths::OCSP, encoded_request),
        )
    }

    /// Build the certificate-store search URL for an index hash.
    pub fn search_url(&self, index_hash: &str) -> Url {
        let mut url = with_path(&self.plain_base, paths::CERT_SEARCH);
        url.query_pairs_mut().append_pair("sHash", index_hash);
        url
    }
}

fn with_path(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    url.set_path(path);
    url.set_query(None);
    url
}

/// Builder for [`ServerTarget`].
#[derive(Debug, Default)]
pub struct ServerTargetBuilder {
    hostname: Option<String>,
    est_alias: Option<String>,
    tls_base: Option<String>,
    plain_base: Option<String>,
}

impl ServerTargetBuilder {
    /// Set the server hostname.
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Set the EST alias. Default: `est`.
    pub fn est_alias(mut self, alias: impl Into<String>) -> Self {
        self.est_alias = Some(alias.into());
        self
    }

    /// Override the base URL used for REST and EST calls.
    pub fn tls_base_url(mut self, url: impl Into<String>) -> Self {
        self.tls_base = Some(url.into());
        self
    }

    /// Override the base URL used for OCSP and certificate-store calls.
    pub fn plain_base_url(mut self, url: impl Into<String>) -> Self {
        self.plain_base = Some(url.into());
        self
    }

    /// Build the target.
    ///
    /// # Errors
    ///
    /// Returns an error if no hostname is set, the hostname is empty, or a
    /// base URL does not parse.
    pub fn build(self) -> Result<ServerTarget> {
        let hostname = self
            .hostname
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| EjbcaError::config("hostname is required"))?;

        let est_alias = self
            .est_alias
            .unwrap_or_else(|| DEFAULT_EST_ALIAS.to_string());
        if est_alias.is_empty() || est_alias.contains('/') {
            return Err(EjbcaError::config(format!(
                "invalid EST alias '{}'",
                est_alias
            )));
        }

        let tls_base = match self.tls_base {
            Some(url) => Url::parse(&url)?,
            None => Url::parse(&format!("https://{}", hostname))?,
        };
        let plain_base = match self.plain_base {
            Some(url) => Url::parse(&url)?,
            None => Url::parse(&format!("http://{}", hostname))?,
        };

        Ok(ServerTarget {
            hostname,
            est_alias,
            tls_base,
            plain_base,
        })
    }
}

/// On-disk client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Server target.
    pub server: ServerSection,

    /// Default credential bundle.
    #[serde(default)]
    pub credentials: CredentialsSection,

    /// Diagnostic output.
    #[serde(default)]
    pub diagnostics: DiagnosticsSection,
}

/// `[server]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Server hostname (optionally with `:port`).
    pub hostname: String,

    /// EST alias.
    #[serde(default = "default_est_alias")]
    pub est_alias: String,

    /// Override for the REST/EST base URL.
    #[serde(default)]
    pub tls_base_url: Option<String>,

    /// Override for the OCSP/certificate-store base URL.
    #[serde(default)]
    pub plain_base_url: Option<String>,
}

/// `[credentials]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialsSection {
    /// Verify the server certificate.
    #[serde(default = "default_true")]
    pub verify: bool,

    /// PEM CA bundle.
    #[serde(default)]
    pub ca_bundle: Option<PathBuf>,

    /// PEM client certificate.
    #[serde(default)]
    pub client_cert: Option<PathBuf>,

    /// PEM client key.
    #[serde(default)]
    pub client_key: Option<PathBuf>,
}

impl Default for CredentialsSection {
    fn default() -> Self {
        Self {
            verify: true,
            ca_bundle: None,
            client_cert: None,
            client_key: None,
        }
    }
}

/// `[diagnostics]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiagnosticsSection {
    /// Dump every request and response to the diagnostic stream.
    #[serde(default)]
    pub trace: bool,
}

fn default_est_alias() -> String {
    DEFAULT_EST_ALIAS.to_string()
}

fn default_true() -> bool {
    true
}

impl ClientConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| EjbcaError::config(format!("Invalid TOML: {e}")))
    }

    /// Read and parse a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            EjbcaError::config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Load from `explicit` if given, else from the file named by
    /// [`CONFIG_ENV_VAR`]. Returns `Ok(None)` when neither is set.
    pub fn load(explicit: Option<&Path>) -> Result<Option<Self>> {
        if let Some(path) = explicit {
            return Self::from_file(path).map(Some);
        }
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => Self::from_file(PathBuf::from(path)).map(Some),
            _ => Ok(None),
        }
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| EjbcaError::config(format!("TOML serialize: {e}")))
    }

    /// Build the server target described by the `[server]` table.
    pub fn server_target(&self) -> Result<ServerTarget> {
        self.server_target_overriding(None, None)
    }

    /// Build the server target described by the `[server]` table, replacing
    /// the hostname and EST alias where given. Base URL overrides are kept.
    pub fn server_target_overriding(
        &self,
        hostname: Option<&str>,
        est_alias: Option<&str>,
    ) -> Result<ServerTarget> {
        let mut builder = ServerTarget::builder()
            .hostname(hostname.unwrap_or(&self.server.hostname))
            .est_alias(est_alias.unwrap_or(&self.server.est_alias));
        if let Some(ref url) = self.server.tls_base_url {
            builder = builder.tls_base_url(url);
        }
        if let Some(ref url) = self.server.plain_base_url {
            builder = builder.plain_base_url(url);
        }
        builder.build()
    }

    /// Build and validate the credential bundle described by `[credentials]`.
    pub fn credentials(&self) -> Result<Credentials> {
        Credentials::new(
            self.credentials.verify,
            self.credentials.ca_bundle.clone(),
            self.credentials.client_cert.clone(),
            self.credentials.client_key.clone(),
        )
    }
}
