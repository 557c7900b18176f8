//! EJBCA client implementation.
//!
//! This module provides the main `EjbcaClient` struct, which ties a server
//! target to the four protocol adapters.

use crate::config::{ClientConfig, ServerTarget};
use crate::error::Result;
use crate::operations::{CertStoreApi, EstApi, OcspApi, RestApi};
use crate::trace::WireTracer;
use crate::transport::TransportInvoker;

/// Client for one EJBCA server.
///
/// The client holds no connection state: every operation builds its own
/// HTTP client from the credentials passed to it, sends one request and
/// returns. A client can therefore be shared freely between tasks.
///
/// # Example
///
/// ```no_run
/// use ejbca_client::{Credentials, EjbcaClient, EstEnrollOptions, ServerTarget};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = EjbcaClient::builder()
///     .target(ServerTarget::builder().hostname("ca.example.com").est_alias("devices").build()?)
///     .trace(true)
///     .build()?;
///
/// let creds = Credentials::builder().ca_bundle("/etc/ejbca/ca.pem").build()?;
///
/// let chain = client.est().ca_certs(&creds).await?;
/// println!("{}", String::from_utf8_lossy(&chain));
///
/// let csr = std::fs::read("device.csr.b64")?;
/// let options = EstEnrollOptions::registration_authority("device-42", "foo123");
/// let issued = client.est().simple_enroll(&csr, &creds, &options).await?;
/// # let _ = issued;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct EjbcaClient {
    target: ServerTarget,
    transport: TransportInvoker,
    tracer: WireTracer,
}

impl EjbcaClient {
    /// Create a client for `target` with tracing off.
    pub fn new(target: ServerTarget) -> Self {
        Self {
            target,
            transport: TransportInvoker::new(),
            tracer: WireTracer::default(),
        }
    }

    /// Create a new client builder.
    pub fn builder() -> EjbcaClientBuilder {
        EjbcaClientBuilder::default()
    }

    /// Create a client from a loaded configuration file.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            target: config.server_target()?,
            transport: TransportInvoker::new(),
            tracer: WireTracer::new(config.diagnostics.trace),
        })
    }

    /// The server this client talks to.
    pub fn target(&self) -> &ServerTarget {
        &self.target
    }

    /// The diagnostic tracer.
    pub fn tracer(&self) -> &WireTracer {
        &self.tracer
    }

    pub(crate) fn transport(&self) -> &TransportInvoker {
        &self.transport
    }

    /// REST management API.
    pub fn rest(&self) -> RestApi<'_> {
        RestApi::new(self)
    }

    /// EST enrollment.
    pub fn est(&self) -> EstApi<'_> {
        EstApi::new(self)
    }

    /// OCSP status queries.
    pub fn ocsp(&self) -> OcspApi<'_> {
        OcspApi::new(self)
    }

    /// RFC 4387 certificate store.
    pub fn cert_store(&self) -> CertStoreApi<'_> {
        CertStoreApi::new(self)
    }
}

/// Builder for [`EjbcaClient`].
#[derive(Debug, Default)]
pub struct EjbcaClientBuilder {
    target: Option<ServerTarget>,
    trace: bool,
}

impl EjbcaClientBuilder {
    /// Set the server target (required).
    pub fn target(mut self, target: ServerTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// Enable full wire tracing.
    pub fn trace(mut self, enabled: bool) -> Self {
        self.trace = enabled;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if no target was set.
    pub fn build(self) -> Result<EjbcaClient> {
        let target = self
            .target
            .ok_or_else(|| crate::error::EjbcaError::config("server target is required"))?;

        Ok(EjbcaClient {
            target,
            transport: TransportInvoker::new(),
            tracer: WireTracer::new(self.trace),
        })
    }
}
