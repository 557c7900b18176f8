//! URL and text encodings shared by the protocol adapters.

use base64::prelude::*;
use const_oid::db::rfc4519::{C, CN, O};
use der::asn1::{PrintableStringRef, SetOfVec, Utf8StringRef};
use der::{Any, Encode, Tag, Tagged};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use sha1::{Digest, Sha1};
use url::Url;
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::{Name, RdnSequence, RelativeDistinguishedName};

use crate::error::{EjbcaError, Result};

/// Attribute order used for certificate-store hashes in LDAP mode.
const LDAP_ORDER: [der::asn1::ObjectIdentifier; 3] = [C, O, CN];

/// Length of the index hash expected by the certificate store: a SHA-1
/// digest in base64 without its trailing `=`.
pub const INDEX_HASH_LEN: usize = 27;

/// Percent-encode bytes for use as a single URL path segment.
///
/// Every byte that is not an ASCII letter or digit is escaped, including
/// `/`, `=` and `,`, so DNs survive as one segment.
pub fn percent_encode(bytes: &[u8]) -> String {
    percent_encoding::percent_encode(bytes, NON_ALPHANUMERIC).to_string()
}

/// Percent-encode a UTF-8 string. Same escaping as [`percent_encode`].
pub fn percent_encode_str(s: &str) -> String {
    utf8_percent_encode(s, NON_ALPHANUMERIC).to_string()
}

/// Inverse of [`percent_encode`].
pub fn percent_decode(s: &str) -> Vec<u8> {
    percent_encoding::percent_decode(s.as_bytes()).collect()
}

/// Standard base64 with padding.
pub fn base64_encode(bytes: &[u8]) -> String {
    BASE64_STANDARD.encode(bytes)
}

/// Decode standard base64, ignoring embedded whitespace.
pub fn base64_decode(text: &[u8]) -> Result<Vec<u8>> {
    let cleaned: Vec<u8> = text
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    Ok(BASE64_STANDARD.decode(cleaned)?)
}

/// Reorder a name for certificate-store hashing.
///
/// With `ldap_order` set the result holds country, organization and common
/// name, in that order, one attribute per RDN; every other attribute is
/// dropped and for a repeated attribute the last occurrence wins. Without
/// it the name is returned unchanged.
///
/// Kept values are re-encoded the way the CA encodes the names it indexes:
/// country as PrintableString, organization and common name as UTF8String.
pub fn canonicalize_dn(name: &Name, ldap_order: bool) -> Result<Name> {
    if !ldap_order {
        return Ok(name.clone());
    }

    let mut picked: [Option<&AttributeTypeAndValue>; 3] = [None, None, None];
    for rdn in name.0.iter() {
        for atv in rdn.0.iter() {
            if let Some(slot) = LDAP_ORDER.iter().position(|oid| *oid == atv.oid) {
                picked[slot] = Some(atv);
            }
        }
    }

    let mut rdns = Vec::new();
    for atv in picked.into_iter().flatten() {
        let text = attribute_text(&atv.value)?;
        let value = if atv.oid == C {
            Any::encode_from(&PrintableStringRef::new(&text)?)?
        } else {
            Any::encode_from(&Utf8StringRef::new(&text)?)?
        };
        let atv = AttributeTypeAndValue { oid: atv.oid, value };
        rdns.push(RelativeDistinguishedName(SetOfVec::try_from(vec![atv])?));
    }

    Ok(RdnSequence(rdns))
}

/// Text of a directory string value, whichever string type carries it.
fn attribute_text(value: &Any) -> Result<String> {
    let bytes = value.value();
    match value.tag() {
        Tag::Utf8String
        | Tag::PrintableString
        | Tag::Ia5String
        | Tag::VisibleString
        | Tag::TeletexString => String::from_utf8(bytes.to_vec())
            .map_err(|_| EjbcaError::invalid_response("attribute value is not valid text")),
        Tag::BmpString if bytes.len() % 2 == 0 => {
            let units = bytes.chunks_exact(2).map(|c| u16::from_be_bytes([c[0], c[1]]));
            char::decode_utf16(units)
                .collect::<std::result::Result<String, _>>()
                .map_err(|_| EjbcaError::invalid_response("attribute value is not valid UTF-16"))
        }
        tag => Err(EjbcaError::invalid_response(format!(
            "unsupported attribute value type {}",
            tag
        ))),
    }
}

/// RFC 4387 index hash of a name: base64 of the SHA-1 of its DER encoding,
/// cut to [`INDEX_HASH_LEN`] characters.
pub fn index_hash(name: &Name) -> Result<String> {
    let der = name.to_der()?;
    let mut encoded = BASE64_STANDARD.encode(Sha1::digest(&der));
    encoded.truncate(INDEX_HASH_LEN);
    Ok(encoded)
}

/// Lowercase hex rendering of a big-endian serial number, without leading
/// zeros (`"0"` for zero).
pub fn serial_hex(bytes: &[u8]) -> String {
    let hex = hex::encode(bytes);
    let trimmed = hex.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Path, query and fragment of a URL, as shown on request lines.
pub fn local_url(url: &Url) -> String {
    let mut s = url.path().to_string();
    if let Some(query) = url.query() {
        s.push('?');
        s.push_str(query);
    }
    if let Some(fragment) = url.fragment() {
        s.push('#');
        s.push_str(fragment);
    }
    s
}
