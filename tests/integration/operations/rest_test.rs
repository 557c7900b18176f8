//! Integration tests for the REST management API

use crate::integration::{MockCaServer, PATH_REST};
use ejbca_client::{Credentials, EjbcaError, EndEntity, RevocationStatus, TokenType};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_fetch_certificate() {
    let mock = MockCaServer::start().await;
    mock.mock_rest(
        "GET",
        "/ca/CN%3DManagementCA%2CO%3DEJBCA%20Sample%2CC%3DSE/certificate/download",
        200,
        "CERTDATA",
    )
    .await;

    let client = mock.client();
    let body = client
        .rest()
        .fetch_certificate("CN=ManagementCA,O=EJBCA Sample,C=SE", &Credentials::insecure())
        .await
        .expect("fetch_certificate failed");

    assert_eq!(body, b"CERTDATA");
}

#[tokio::test]
async fn test_fetch_certificate_not_found() {
    let mock = MockCaServer::start().await;
    mock.mock_rest(
        "GET",
        "/ca/CN%3DNoSuchCA/certificate/download",
        404,
        r#"{"error_code":404,"error_message":"CA not found"}"#,
    )
    .await;

    let err = mock
        .client()
        .rest()
        .fetch_certificate("CN=NoSuchCA", &Credentials::insecure())
        .await
        .unwrap_err();

    match err {
        EjbcaError::RestCallFailed {
            operation,
            status,
            body,
        } => {
            assert_eq!(operation, "fetch_certificate");
            assert_eq!(status, 404);
            assert!(body.contains("CA not found"));
        }
        other => panic!("Expected RestCallFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_revocation_status_not_revoked() {
    let mock = MockCaServer::start().await;
    mock.mock_rest(
        "GET",
        "/certificate/CN%3DManagementCA/1a2b/revocationstatus",
        200,
        r#"{"issuer_dn":"CN=ManagementCA","serial_number":"1a2b","revoked":false}"#,
    )
    .await;

    let status = mock
        .client()
        .rest()
        .fetch_revocation_status("CN=ManagementCA", &[0x1a, 0x2b], &Credentials::insecure())
        .await
        .expect("revocation status failed");

    assert_eq!(status, RevocationStatus::NotRevoked);
}

#[tokio::test]
async fn test_revocation_status_revoked() {
    let mock = MockCaServer::start().await;
    mock.mock_rest(
        "GET",
        "/certificate/CN%3DManagementCA/7f/revocationstatus",
        200,
        r#"{
            "revoked": true,
            "revocation_reason": "KEY_COMPROMISE",
            "revocation_date": "2024-03-01T12:30:00Z",
            "message": "Revoked by administrator"
        }"#,
    )
    .await;

    // Leading zero bytes do not appear in the path.
    let status = mock
        .client()
        .rest()
        .fetch_revocation_status("CN=ManagementCA", &[0x00, 0x7f], &Credentials::insecure())
        .await
        .expect("revocation status failed");

    assert!(status.is_revoked());
    assert_eq!(status.reason(), Some("KEY_COMPROMISE"));
    assert_eq!(
        status.date().map(|d| d.to_rfc3339()),
        Some("2024-03-01T12:30:00+00:00".to_string())
    );
    assert_eq!(status.message(), Some("Revoked by administrator"));
}

#[tokio::test]
async fn test_add_end_entity_sends_json() {
    let mock = MockCaServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{}/endentity", PATH_REST)))
        .and(header("Content-Type", "application/json"))
        .and(header("Accept", "application/json"))
        .and(body_json(serde_json::json!({
            "username": "device-42",
            "password": "foo123",
            "subject_dn": "CN=device-42,O=EJBCA Sample,C=SE",
            "ca_name": "ManagementCA",
            "certificate_profile_name": "ENDUSER",
            "end_entity_profile_name": "EMPTY",
            "token": "PEM",
            "subject_alt_name": "dNSName=device-42.example.com",
            "extensions_data": {}
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(mock.inner())
        .await;

    let entity = EndEntity::new(
        "device-42",
        "foo123",
        "CN=device-42,O=EJBCA Sample,C=SE",
        "ManagementCA",
        "ENDUSER",
        "EMPTY",
    )
    .with_token(TokenType::Pem)
    .with_san("dNSName=device-42.example.com");

    mock.client()
        .rest()
        .add_end_entity(&entity, &Credentials::insecure())
        .await
        .expect("add_end_entity failed");
}

#[tokio::test]
async fn test_add_end_entity_rejected() {
    let mock = MockCaServer::start().await;
    mock.mock_rest(
        "POST",
        "/endentity",
        400,
        r#"{"error_code":400,"error_message":"User already exists"}"#,
    )
    .await;

    let entity = EndEntity::new("dup", "pw", "CN=dup", "ManagementCA", "ENDUSER", "EMPTY");
    let err = mock
        .client()
        .rest()
        .add_end_entity(&entity, &Credentials::insecure())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EjbcaError::RestCallFailed {
            operation: "add_end_entity",
            status: 400,
            ..
        }
    ));
}

#[tokio::test]
async fn test_delete_end_entity() {
    let mock = MockCaServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{}/endentity/user%40example", PATH_REST)))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(mock.inner())
        .await;

    mock.client()
        .rest()
        .delete_end_entity("user@example", &Credentials::insecure())
        .await
        .expect("delete_end_entity failed");
}

#[tokio::test]
async fn test_enroll_keystore_created() {
    let mock = MockCaServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{}/certificate/enrollkeystore", PATH_REST)))
        .and(body_json(serde_json::json!({
            "username": "device-42",
            "password": "foo123",
            "key_alg": "RSA",
            "key_spec": "2048"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_string(
            r#"{"certificate":"SGVsbG8=","serial_number":"1a2b","response_format":"PKCS12"}"#,
        ))
        .mount(mock.inner())
        .await;

    let keystore = mock
        .client()
        .rest()
        .enroll_keystore("device-42", "foo123", "RSA", "2048", &Credentials::insecure())
        .await
        .expect("enroll_keystore failed");

    assert_eq!(keystore.format, "PKCS12");
    assert_eq!(keystore.decode_certificate().unwrap(), b"Hello");
}

#[tokio::test]
async fn test_enroll_keystore_requires_created() {
    let mock = MockCaServer::start().await;
    mock.mock_rest(
        "POST",
        "/certificate/enrollkeystore",
        200,
        r#"{"certificate":"SGVsbG8=","response_format":"PKCS12"}"#,
    )
    .await;

    let err = mock
        .client()
        .rest()
        .enroll_keystore("device-42", "foo123", "RSA", "2048", &Credentials::insecure())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(200));
    assert!(matches!(
        err,
        EjbcaError::RestCallFailed {
            operation: "enroll_keystore",
            ..
        }
    ));
}
