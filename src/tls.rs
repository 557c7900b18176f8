//! TLS configuration helpers.
//!
//! Every call builds its own `reqwest::Client` from the credential bundle it
//! was given, so no TLS state outlives the call.

use std::path::Path;
use std::time::Duration;

use rustls_pki_types::{CertificateDer, PrivateKeyDer};

use crate::credentials::Credentials;
use crate::error::{EjbcaError, Result};

/// Build a reqwest Client for one call.
///
/// `None` means the default configuration: built-in roots, server
/// verification on, no client certificate. Redirects are not followed and
/// idle connections are not pooled.
pub fn build_http_client(
    credentials: Option<&Credentials>,
    connect_timeout: Duration,
) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .use_rustls_tls()
        .connect_timeout(connect_timeout)
        .pool_max_idle_per_host(0)
        .redirect(reqwest::redirect::Policy::none())
        .user_agent(crate::USER_AGENT)
        .min_tls_version(reqwest::tls::Version::TLS_1_2);

    if let Some(credentials) = credentials {
        if !credentials.verify_required() {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(bundle) = credentials.ca_bundle_path() {
            builder = builder.tls_built_in_root_certs(false);
            for cert in load_ca_bundle(bundle)? {
                let cert = reqwest::Certificate::from_der(cert.as_ref())
                    .map_err(|e| EjbcaError::tls(format!("Failed to add CA certificate: {}", e)))?;
                builder = builder.add_root_certificate(cert);
            }
        }

        match (credentials.client_cert_path(), credentials.client_key_path()) {
            (Some(cert), key) => {
                builder = builder.identity(load_identity(cert, key)?);
            }
            (None, Some(_)) => {
                return Err(EjbcaError::config(
                    "client key given without a client certificate",
                ));
            }
            (None, None) => {}
        }
    }

    builder
        .build()
        .map_err(|e| EjbcaError::tls(format!("Failed to build HTTP client: {}", e)))
}

fn load_ca_bundle(path: &Path) -> Result<Vec<CertificateDer<'static>>> {
    let pem = std::fs::read(path)?;
    parse_pem_certificates(&pem)
        .map_err(|e| EjbcaError::tls(format!("{}: {}", path.display(), e)))
}

/// Build a reqwest Identity from a certificate file and an optional key
/// file. Without a key file the certificate file must hold the key too.
fn load_identity(cert_path: &Path, key_path: Option<&Path>) -> Result<reqwest::Identity> {
    let mut pem_data = std::fs::read(cert_path)?;
    parse_pem_certificates(&pem_data)
        .map_err(|e| EjbcaError::tls(format!("{}: {}", cert_path.display(), e)))?;

    if let Some(key_path) = key_path {
        pem_data.extend_from_slice(b"\n");
        pem_data.extend_from_slice(&std::fs::read(key_path)?);
    }
    parse_pem_private_key(&pem_data)?;

    reqwest::Identity::from_pem(&pem_data)
        .map_err(|e| EjbcaError::tls(format!("Failed to create client identity: {}", e)))
}

/// Parse PEM-encoded certificates.
pub fn parse_pem_certificates(pem_data: &[u8]) -> Result<Vec<CertificateDer<'static>>> {
    let mut reader = std::io::BufReader::new(pem_data);
    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| EjbcaError::tls(format!("Failed to parse PEM: {}", e)))?;

    if certs.is_empty() {
        return Err(EjbcaError::tls("No certificates found in PEM data"));
    }

    Ok(certs)
}

/// Parse the first PEM-encoded private key (PKCS#8, PKCS#1 or SEC1).
pub fn parse_pem_private_key(pem_data: &[u8]) -> Result<PrivateKeyDer<'static>> {
    let mut reader = std::io::BufReader::new(pem_data);
    rustls_pemfile::private_key(&mut reader)
        .map_err(|e| EjbcaError::tls(format!("Failed to parse PEM: {}", e)))?
        .ok_or_else(|| EjbcaError::tls("No private key found in PEM data"))
}
