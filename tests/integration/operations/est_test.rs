//! Integration tests for EST simpleenroll and cacerts

use crate::integration::fixtures::{certs_only_base64, issued_pair};
use crate::integration::{MockCaServer, PATH_CACERTS, PATH_SIMPLEENROLL};
use ejbca_client::{CaCertificates, Credentials, EjbcaError, EstEnrollOptions};
use wiremock::matchers::{body_bytes, header, header_exists, method, path};
use wiremock::{Mock, ResponseTemplate};

const CSR_BASE64: &[u8] = b"MIIBWjCBxAIBADAbMRkwFwYDVQQDDBBkZXZpY2UuZXhhbXBsZS5jb20=";

#[tokio::test]
async fn test_simple_enroll_client_mode() {
    let mock = MockCaServer::start().await;

    Mock::given(method("POST"))
        .and(path(PATH_SIMPLEENROLL))
        .and(header("Content-Type", "application/pkcs10"))
        .and(header("Accept", "application/pkcs7-mime; smime-type=certs-only"))
        .and(header("Content-Transfer-Encoding", "base64"))
        .and(body_bytes(CSR_BASE64))
        .respond_with(ResponseTemplate::new(200).set_body_string("MIIC\nAbCd\r\nEfGh\n"))
        .expect(1)
        .mount(mock.inner())
        .await;

    let issued = mock
        .client()
        .est()
        .simple_enroll(CSR_BASE64, &Credentials::insecure(), &EstEnrollOptions::new())
        .await
        .expect("simple_enroll failed");

    // Line breaks are stripped from the returned PKCS#7 text.
    assert_eq!(issued, b"MIICAbCd\rEfGh");

    let requests = mock.inner().received_requests().await.unwrap();
    assert!(requests[0].headers.get("Authorization").is_none());
}

#[tokio::test]
async fn test_simple_enroll_ra_mode_sends_basic_auth() {
    let mock = MockCaServer::start().await;

    Mock::given(method("POST"))
        .and(path(PATH_SIMPLEENROLL))
        .and(header("Authorization", "Basic YWxpY2U6Zm9vMTIz"))
        .respond_with(ResponseTemplate::new(200).set_body_string("MIIC"))
        .expect(1)
        .mount(mock.inner())
        .await;

    let options = EstEnrollOptions::registration_authority("alice", "foo123");
    let issued = mock
        .client()
        .est()
        .simple_enroll(CSR_BASE64, &Credentials::insecure(), &options)
        .await
        .expect("simple_enroll failed");

    assert_eq!(issued, b"MIIC");
}

#[tokio::test]
async fn test_simple_enroll_ra_mode_without_password_sends_nothing() {
    let mock = MockCaServer::start().await;

    Mock::given(method("POST"))
        .and(path(PATH_SIMPLEENROLL))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(mock.inner())
        .await;

    let options = EstEnrollOptions::new().ra_mode(true).username("alice");
    let err = mock
        .client()
        .est()
        .simple_enroll(CSR_BASE64, &Credentials::insecure(), &options)
        .await
        .unwrap_err();

    assert!(matches!(err, EjbcaError::Configuration(_)));
}

#[tokio::test]
async fn test_simple_enroll_url_override() {
    let mock = MockCaServer::start().await;

    Mock::given(method("POST"))
        .and(path("/.well-known/est/devices/simpleenroll"))
        .and(header_exists("Content-Transfer-Encoding"))
        .respond_with(ResponseTemplate::new(200).set_body_string("MIIC"))
        .expect(1)
        .mount(mock.inner())
        .await;

    let url = url::Url::parse(&format!("{}/.well-known/est/devices/simpleenroll", mock.url()))
        .unwrap();
    let options = EstEnrollOptions::new().url(url);

    let issued = mock
        .client()
        .est()
        .simple_enroll(CSR_BASE64, &Credentials::insecure(), &options)
        .await
        .expect("simple_enroll failed");

    assert_eq!(issued, b"MIIC");
}

#[tokio::test]
async fn test_simple_enroll_rejected() {
    let mock = MockCaServer::start().await;
    mock.mock_simple_enroll(401, "Not authorized").await;

    let err = mock
        .client()
        .est()
        .simple_enroll(CSR_BASE64, &Credentials::insecure(), &EstEnrollOptions::new())
        .await
        .unwrap_err();

    match err {
        EjbcaError::EstEnrollmentFailed { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "Not authorized");
        }
        other => panic!("Expected EstEnrollmentFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_ca_certs() {
    let mock = MockCaServer::start().await;

    Mock::given(method("GET"))
        .and(path(PATH_CACERTS))
        .and(header("Accept", "application/pkcs7-mime"))
        .respond_with(ResponseTemplate::new(200).set_body_string("MIIG\nqwYJ\n"))
        .expect(1)
        .mount(mock.inner())
        .await;

    let chain = mock
        .client()
        .est()
        .ca_certs(&Credentials::insecure())
        .await
        .expect("ca_certs failed");

    assert_eq!(chain, b"MIIGqwYJ");
}

#[tokio::test]
async fn test_ca_certs_decodes_chain() {
    let pki = issued_pair();
    let mock = MockCaServer::start().await;
    mock.mock_cacerts(200, &certs_only_base64(&[pki.ca.clone()]))
        .await;

    let body = mock
        .client()
        .est()
        .ca_certs(&Credentials::insecure())
        .await
        .expect("ca_certs failed");
    assert!(!body.contains(&b'\n'));

    let chain = CaCertificates::from_est_body(&body).expect("certs-only body");
    assert_eq!(chain.len(), 1);
    assert_eq!(chain.iter().next(), Some(&pki.ca));
}

#[tokio::test]
async fn test_simple_enroll_returns_issued_certificate() {
    let pki = issued_pair();
    let mock = MockCaServer::start().await;
    mock.mock_simple_enroll(200, &certs_only_base64(&[pki.leaf.clone()]))
        .await;

    let body = mock
        .client()
        .est()
        .simple_enroll(CSR_BASE64, &Credentials::insecure(), &EstEnrollOptions::new())
        .await
        .expect("simple_enroll failed");

    let issued = ejbca_client::types::parse_certs_only(&body).expect("certs-only body");
    assert_eq!(issued, vec![pki.leaf]);
}

#[tokio::test]
async fn test_ca_certs_server_error() {
    let mock = MockCaServer::start().await;
    mock.mock_cacerts(500, "Internal error").await;

    let err = mock
        .client()
        .est()
        .ca_certs(&Credentials::insecure())
        .await
        .unwrap_err();

    assert!(matches!(err, EjbcaError::EstFetchFailed { status: 500, .. }));
}
