//! End-entity and keystore bodies of the REST API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::codec::base64_decode;
use crate::error::Result;

/// Token type delivered to an end entity on enrollment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenType {
    /// PKCS#12 keystore.
    #[default]
    P12,
    /// Java keystore.
    Jks,
    /// PEM files.
    Pem,
    /// Bouncy Castle FIPS keystore.
    Bcfks,
    /// The requester generates its own key.
    UserGenerated,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::P12 => "P12",
            Self::Jks => "JKS",
            Self::Pem => "PEM",
            Self::Bcfks => "BCFKS",
            Self::UserGenerated => "USERGENERATED",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for TokenType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "P12" => Ok(Self::P12),
            "JKS" => Ok(Self::Jks),
            "PEM" => Ok(Self::Pem),
            "BCFKS" => Ok(Self::Bcfks),
            "USERGENERATED" => Ok(Self::UserGenerated),
            other => Err(format!("unknown token type '{}'", other)),
        }
    }
}

/// Body of an "add end entity" call.
///
/// # Example
///
/// ```
/// use ejbca_client::types::{EndEntity, TokenType};
///
/// let entity = EndEntity::new(
///     "device-42",
///     "foo123",
///     "CN=device-42,O=Example",
///     "ManagementCA",
///     "ENDUSER",
///     "EMPTY",
/// )
/// .with_token(TokenType::Pem)
/// .with_email("ops@example.com")
/// .with_extension("1.2.3.4", "value");
///
/// assert_eq!(entity.username, "device-42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndEntity {
    /// Username of the end entity.
    pub username: String,

    /// Enrollment password.
    pub password: String,

    /// Subject distinguished name.
    pub subject_dn: String,

    /// Issuing CA name.
    pub ca_name: String,

    /// Certificate profile name.
    #[serde(rename = "certificate_profile_name")]
    pub cert_profile_name: String,

    /// End-entity profile name.
    pub end_entity_profile_name: String,

    /// Token type.
    pub token: TokenType,

    /// Subject alternative name.
    #[serde(rename = "subject_alt_name", skip_serializing_if = "Option::is_none")]
    pub san: Option<String>,

    /// Email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Extension data, always sent (possibly empty).
    #[serde(rename = "extensions_data")]
    pub extensions: BTreeMap<String, String>,
}

impl EndEntity {
    /// Create a new end entity with the default `P12` token.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        subject_dn: impl Into<String>,
        ca_name: impl Into<String>,
        cert_profile_name: impl Into<String>,
        end_entity_profile_name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            subject_dn: subject_dn.into(),
            ca_name: ca_name.into(),
            cert_profile_name: cert_profile_name.into(),
            end_entity_profile_name: end_entity_profile_name.into(),
            token: TokenType::default(),
            san: None,
            email: None,
            extensions: BTreeMap::new(),
        }
    }

    /// Set the token type.
    pub fn with_token(mut self, token: TokenType) -> Self {
        self.token = token;
        self
    }

    /// Set the subject alternative name.
    pub fn with_san(mut self, san: impl Into<String>) -> Self {
        self.san = Some(san.into());
        self
    }

    /// Set the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Add one extension entry.
    pub fn with_extension(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extensions.insert(name.into(), value.into());
        self
    }

    /// Encode as the JSON request body.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Body of an "enroll keystore" call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct KeystoreRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub key_alg: &'a str,
    pub key_spec: &'a str,
}

/// Result of a keystore enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeystoreResponse {
    /// Keystore format reported by the server, e.g. `PKCS12`.
    pub format: String,

    /// The `certificate` field exactly as delivered (base64 text).
    pub certificate: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct WireKeystoreResponse {
    certificate: String,
    response_format: String,
}

impl KeystoreResponse {
    /// Decode an `enrollkeystore` JSON body.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        let wire: WireKeystoreResponse = serde_json::from_slice(body)?;
        Ok(Self {
            format: wire.response_format,
            certificate: wire.certificate.into_bytes(),
        })
    }

    /// Base64-decode the keystore.
    pub fn decode_certificate(&self) -> Result<Vec<u8>> {
        base64_decode(&self.certificate)
    }
}
