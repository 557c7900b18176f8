//! Integration tests for malformed server answers

use crate::integration::fixtures::issued_pair;
use crate::integration::MockCaServer;
use ejbca_client::{Credentials, EjbcaError};

#[tokio::test]
async fn test_malformed_ocsp_body() {
    let pki = issued_pair();
    let mock = MockCaServer::start().await;
    mock.mock_ocsp(200, b"<html>proxy error</html>".to_vec()).await;

    let err = mock
        .client()
        .ocsp()
        .get_status(&pki.leaf, &pki.ca)
        .await
        .unwrap_err();

    assert!(matches!(err, EjbcaError::Der(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_revocation_status_not_json() {
    let mock = MockCaServer::start().await;
    mock.mock_rest(
        "GET",
        "/certificate/CN%3DManagementCA/1/revocationstatus",
        200,
        "not json",
    )
    .await;

    let err = mock
        .client()
        .rest()
        .fetch_revocation_status("CN=ManagementCA", &[0x01], &Credentials::insecure())
        .await
        .unwrap_err();

    assert!(matches!(err, EjbcaError::Json(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_revoked_without_date() {
    let mock = MockCaServer::start().await;
    mock.mock_rest(
        "GET",
        "/certificate/CN%3DManagementCA/1/revocationstatus",
        200,
        r#"{"revoked":true,"revocation_reason":"UNSPECIFIED"}"#,
    )
    .await;

    let err = mock
        .client()
        .rest()
        .fetch_revocation_status("CN=ManagementCA", &[0x01], &Credentials::insecure())
        .await
        .unwrap_err();

    assert!(matches!(err, EjbcaError::InvalidResponse(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_keystore_missing_certificate() {
    let mock = MockCaServer::start().await;
    mock.mock_rest(
        "POST",
        "/certificate/enrollkeystore",
        201,
        r#"{"response_format":"PKCS12"}"#,
    )
    .await;

    let err = mock
        .client()
        .rest()
        .enroll_keystore("device-42", "foo123", "RSA", "2048", &Credentials::insecure())
        .await
        .unwrap_err();

    assert!(matches!(err, EjbcaError::Json(_)), "got {:?}", err);
}
