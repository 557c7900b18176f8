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

//! Message types for the EJBCA protocols.
//!
//! This module provides the REST JSON bodies, the OCSP ASN.1 structures and
//! the PKCS#7 helpers used to read EST responses.

mod end_entity;
pub mod ocsp;
mod pkcs7;
mod revocation;

pub use end_entity::{EndEntity, KeystoreResponse, TokenType};
pub(crate) use end_entity::KeystoreRequest;
pub use ocsp::OcspCertStatus;
pub use pkcs7::{parse_certs_only, CaCertificates};
pub use revocation::{RevocationDetails, RevocationStatus};

/// Content types used by the EJBCA protocols.
pub mod content_types {
    /// JSON bodies of the REST API.
    pub const JSON: &str = "application/json";

    /// PKCS#10 CSR content type.
    pub const PKCS10: &str = "application/pkcs10";

    /// PKCS#7/CMS content type.
    pub const PKCS7_MIME: &str = "application/pkcs7-mime";

    /// PKCS#7 certs-only content type with smime-type parameter.
    pub const PKCS7_CERTS_ONLY: &str = "application/pkcs7-mime; smime-type=certs-only";

    /// OCSP request content type.
    pub const OCSP_REQUEST: &str = "application/ocsp-request";

    /// Transfer encoding announced on EST requests.
    pub const BASE64_TRANSFER: &str = "base64";
}

/// Fixed server paths.
pub mod paths {
    /// REST API root.
    pub const REST_API: &str = "/ejbca/ejbca-rest-api/v1";

    /// EST root; the alias and operation follow.
    pub const EST: &str = "/.well-known/est";

    /// OCSP GET endpoint; the encoded request follows.
    pub const OCSP: &str = "/ejbca/publicweb/status/ocsp";

    /// RFC 4387 certificate search.
    pub const CERT_SEARCH: &str = "/ejbca/publicweb/certificates/search.cgi";
}

/// EST operation names.
pub mod operations {
    /// CA certificates endpoint.
    pub const CACERTS: &str = "cacerts";

    /// Simple enrollment endpoint.
    pub const SIMPLE_ENROLL: &str = "simpleenroll";
}
