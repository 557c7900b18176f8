//! Integration tests for the certificate store lookup

use std::str::FromStr;

use crate::integration::fixtures::issued_pair;
use crate::integration::{MockCaServer, PATH_SEARCH};
use der::Encode;
use ejbca_client::codec::{canonicalize_dn, index_hash};
use ejbca_client::EjbcaError;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};
use x509_cert::name::Name;

#[tokio::test]
async fn test_search_by_subject() {
    let pki = issued_pair();
    let subject = Name::from_str("CN=device-42,O=EJBCA Sample,C=SE").unwrap();
    let hash = index_hash(&canonicalize_dn(&subject, false).unwrap()).unwrap();

    let mock = MockCaServer::start().await;
    Mock::given(method("GET"))
        .and(path(PATH_SEARCH))
        .and(query_param("sHash", hash.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(pki.leaf.to_der().unwrap()))
        .expect(1)
        .mount(mock.inner())
        .await;

    let found = mock
        .client()
        .cert_store()
        .search_by_subject(&subject, false)
        .await
        .expect("search failed");

    assert_eq!(found, pki.leaf);
}

#[tokio::test]
async fn test_search_by_subject_ldap_order() {
    let pki = issued_pair();
    // Extra attributes are dropped and the rest reordered before hashing.
    let subject = Name::from_str("C=SE,OU=Devices,CN=device-42,O=EJBCA Sample").unwrap();
    let canonical = canonicalize_dn(&subject, true).unwrap();
    let hash = index_hash(&canonical).unwrap();
    assert_eq!(hash.len(), 27);

    let mock = MockCaServer::start().await;
    Mock::given(method("GET"))
        .and(path(PATH_SEARCH))
        .and(query_param("sHash", hash.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(pki.ca.to_der().unwrap()))
        .expect(1)
        .mount(mock.inner())
        .await;

    let found = mock
        .client()
        .cert_store()
        .search_by_subject(&subject, true)
        .await
        .expect("search failed");

    assert_eq!(found, pki.ca);
}

#[tokio::test]
async fn test_search_not_found() {
    let mock = MockCaServer::start().await;
    Mock::given(method("GET"))
        .and(path(PATH_SEARCH))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(mock.inner())
        .await;

    let subject = Name::from_str("CN=nobody").unwrap();
    let err = mock
        .client()
        .cert_store()
        .search_by_subject(&subject, false)
        .await
        .unwrap_err();

    assert!(matches!(err, EjbcaError::CertSearchFailed { status: 404 }));
}
