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

//! # ejbca-client
//!
//! An async client for the public interfaces of an EJBCA certificate
//! authority.
//!
//! ## Features
//!
//! - **REST management API**: download CA certificates, query revocation
//!   status, add and delete end entities, enroll server-generated keystores
//! - **EST** (RFC 7030): simple enrollment in client or
//!   registration-authority mode, CA certificate distribution
//! - **OCSP** (RFC 6960): single-certificate status over HTTP GET
//! - **Certificate store** (RFC 4387): lookup by subject hash
//! - **Per-call TLS credentials**: every call names the CA bundle and
//!   client identity it uses; nothing is cached between calls
//!
//! ## Quick Start
//!
//! ```no_run
//! use ejbca_client::{Credentials, EjbcaClient, ServerTarget};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EjbcaClient::new(ServerTarget::new("ca.example.com")?);
//!
//!     let creds = Credentials::builder()
//!         .ca_bundle("/etc/ejbca/ManagementCA.pem")
//!         .client_identity("/etc/ejbca/superadmin.pem", "/etc/ejbca/superadmin-key.pem")
//!         .build()?;
//!
//!     let status = client
//!         .rest()
//!         .fetch_revocation_status("CN=ManagementCA,O=EJBCA Sample,C=SE", &[0x1a, 0x2b], &creds)
//!         .await?;
//!     println!("revoked: {}", status.is_revoked());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Failures
//!
//! Every operation makes exactly one request. Connection problems surface as
//! [`EjbcaError::Transport`]; an answer with the wrong status surfaces as the
//! operation's own error variant carrying the status and body. Nothing is
//! retried.
//!
//! ## Diagnostics
//!
//! Library events use [`tracing`]. With tracing enabled on the client, each
//! exchange is reported under the `ejbca_client::wire` target; otherwise only
//! failed exchanges are.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod client;
pub mod codec;
pub mod config;
pub mod credentials;
pub mod error;
pub mod operations;
pub mod tls;
pub mod trace;
pub mod transport;
pub mod types;

// Re-export main types at crate root for convenience
pub use client::{EjbcaClient, EjbcaClientBuilder};
pub use config::{ClientConfig, ServerTarget, ServerTargetBuilder};
pub use credentials::{Credentials, CredentialsBuilder};
pub use error::{EjbcaError, Result};
pub use operations::EstEnrollOptions;
pub use types::{
    CaCertificates, EndEntity, KeystoreResponse, OcspCertStatus, RevocationDetails,
    RevocationStatus, TokenType,
};

// Re-export x509_cert::Certificate for convenience
pub use x509_cert::Certificate;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent string for HTTP requests.
pub const USER_AGENT: &str = concat!("ejbca-client/", env!("CARGO_PKG_VERSION"));
